use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::client::HealthEventClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{DashboardStats, FarmEventFilter, HealthEvent, NewHealthEvent};

use super::HealthEventGateway;

/// Gateway backed by the HealthEvent REST API. One round-trip per call, no
/// retries.
pub struct RemoteGateway<T> {
    client: HealthEventClient,
    transport: T,
}

impl<T: Transport> RemoteGateway<T> {
    pub fn new(client: HealthEventClient, transport: T) -> Self {
        Self { client, transport }
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = ?request.method, path = %request.path, "health event request");
        self.transport.execute(request).await
    }

    async fn fetch_events(&self, request: Result<HttpRequest, ApiError>) -> Result<Vec<HealthEvent>, ApiError> {
        let response = self.round_trip(request?).await?;
        self.client.parse_events(response)
    }
}

#[async_trait]
impl<T: Transport> HealthEventGateway for RemoteGateway<T> {
    async fn create_health_event(&self, event: &NewHealthEvent) -> Result<HealthEvent, ApiError> {
        let created = async {
            let request = self.client.build_create_event(event)?;
            let response = self.round_trip(request).await?;
            self.client.parse_event(response)
        }
        .await;
        created.inspect_err(|e| error!(error = %e, "error creating health event"))
    }

    async fn get_events_by_farm(&self, filters: &FarmEventFilter) -> Result<Vec<HealthEvent>, ApiError> {
        self.fetch_events(Ok(self.client.build_events_by_farm(filters)))
            .await
            .inspect_err(|e| error!(error = %e, "error fetching health events for farm"))
    }

    async fn get_events_by_animal(&self, animal_id: &str) -> Result<Vec<HealthEvent>, ApiError> {
        self.fetch_events(self.client.build_events_by_animal(animal_id))
            .await
            .inspect_err(|e| error!(animal_id, error = %e, "error fetching health events for animal"))
    }

    async fn get_events_by_batch(&self, batch_id: &str) -> Result<Vec<HealthEvent>, ApiError> {
        self.fetch_events(self.client.build_events_by_batch(batch_id))
            .await
            .inspect_err(|e| error!(batch_id, error = %e, "error fetching health events for batch"))
    }

    async fn get_events_by_type(&self, event_type: &str) -> Result<Vec<HealthEvent>, ApiError> {
        self.fetch_events(self.client.build_events_by_type(event_type))
            .await
            .inspect_err(|e| error!(event_type, error = %e, "error fetching health events by type"))
    }

    async fn get_dashboard_stats(&self) -> DashboardStats {
        let stats = async {
            let response = self.round_trip(self.client.build_dashboard_stats()).await?;
            self.client.parse_dashboard_stats(response)
        }
        .await;
        stats.unwrap_or_else(|e| {
            warn!(error = %e, "error getting dashboard stats, using zeroed fallback");
            DashboardStats::default()
        })
    }

    async fn get_upcoming_events(&self) -> Vec<HealthEvent> {
        self.fetch_events(Ok(self.client.build_upcoming_events()))
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "error getting upcoming events");
                Vec::new()
            })
    }

    async fn get_recent_treatments(&self) -> Vec<HealthEvent> {
        self.fetch_events(Ok(self.client.build_recent_treatments()))
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "error getting recent treatments");
                Vec::new()
            })
    }
}
