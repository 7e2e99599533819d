//! The `HealthEventGateway` strategy and its two implementations.
//!
//! # Design
//! Callers pick `RemoteGateway` or `MockGateway` once, at the composition
//! root, and hold the result as `Arc<dyn HealthEventGateway>`. Two error
//! policies coexist:
//!
//! - Propagating calls return `Result` and hand back the transport/parser
//!   error unchanged after logging it.
//! - Degrading calls (`get_dashboard_stats`, `get_upcoming_events`,
//!   `get_recent_treatments`) log and fall back to an empty value, so their
//!   signatures carry no error at all.

mod mock;
mod remote;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ApiError;
use crate::types::{
    non_empty, DashboardStats, FarmEventFilter, HealthEvent, HealthRecordFilter, NewHealthEvent,
    VACCINATION_EVENT_TYPE,
};

pub use mock::{MockGateway, MockLatency, MockStore};
pub use remote::RemoteGateway;

#[async_trait]
pub trait HealthEventGateway: Send + Sync {
    /// Register a new event. Not idempotent: every call creates a record.
    async fn create_health_event(&self, event: &NewHealthEvent) -> Result<HealthEvent, ApiError>;

    async fn get_events_by_farm(&self, filters: &FarmEventFilter) -> Result<Vec<HealthEvent>, ApiError>;

    async fn get_events_by_animal(&self, animal_id: &str) -> Result<Vec<HealthEvent>, ApiError>;

    async fn get_events_by_batch(&self, batch_id: &str) -> Result<Vec<HealthEvent>, ApiError>;

    async fn get_events_by_type(&self, event_type: &str) -> Result<Vec<HealthEvent>, ApiError>;

    /// Never fails; unreachable backends yield `DashboardStats::default()`.
    async fn get_dashboard_stats(&self) -> DashboardStats;

    /// Never fails; errors yield an empty list.
    async fn get_upcoming_events(&self) -> Vec<HealthEvent>;

    /// Never fails; errors yield an empty list.
    async fn get_recent_treatments(&self) -> Vec<HealthEvent>;

    /// Events of type `"Vaccination"`. `_filters` is accepted for call-site
    /// compatibility and is not used.
    async fn get_vaccinations(&self, _filters: &FarmEventFilter) -> Result<Vec<HealthEvent>, ApiError> {
        self.get_events_by_type(VACCINATION_EVENT_TYPE).await
    }

    /// Compatibility dispatcher. The first non-empty key wins, in the order
    /// `animal_id`, `batch_id`, `kind`; otherwise the farm listing is queried
    /// with the date and event-type filters.
    async fn get_health_records(&self, filter: &HealthRecordFilter) -> Result<Vec<HealthEvent>, ApiError> {
        if let Some(animal_id) = non_empty(&filter.animal_id) {
            debug!(animal_id, "health records dispatched by animal");
            return self.get_events_by_animal(animal_id).await;
        }
        if let Some(batch_id) = non_empty(&filter.batch_id) {
            debug!(batch_id, "health records dispatched by batch");
            return self.get_events_by_batch(batch_id).await;
        }
        if let Some(kind) = non_empty(&filter.kind) {
            debug!(kind, "health records dispatched by type");
            return self.get_events_by_type(kind).await;
        }
        self.get_events_by_farm(&FarmEventFilter::from(filter)).await
    }
}
