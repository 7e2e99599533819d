use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ApiError;
use crate::types::{
    non_empty, DashboardStats, FarmEventFilter, HealthEvent, NewHealthEvent, Stat, TotalStat,
    TREATMENT_EVENT_TYPE,
};

use super::HealthEventGateway;

/// Number of events served by the mock upcoming-events call.
const UPCOMING_LIMIT: usize = 3;

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// In-memory event list backing `MockGateway`. Owned by whoever builds the
/// gateway; nothing is persisted.
#[derive(Debug, Default)]
pub struct MockStore {
    events: RwLock<Vec<HealthEvent>>,
}

impl MockStore {
    pub fn new(events: Vec<HealthEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// The two demo events used in offline mode.
    pub fn seeded() -> Self {
        Self::new(vec![
            HealthEvent {
                id: "1".to_string(),
                animal_id: "1".to_string(),
                ear_tag: "COL-001".to_string(),
                event_type: "Vacunación".to_string(),
                date: "2025-12-15".to_string(),
                description: "Vacuna antiaftosa".to_string(),
                veterinarian: "Dr. García".to_string(),
            },
            HealthEvent {
                id: "2".to_string(),
                animal_id: "2".to_string(),
                ear_tag: "COL-002".to_string(),
                event_type: TREATMENT_EVENT_TYPE.to_string(),
                date: "2025-12-20".to_string(),
                description: "Desparasitación".to_string(),
                veterinarian: "Dr. Pérez".to_string(),
            },
        ])
    }

    pub async fn snapshot(&self) -> Vec<HealthEvent> {
        self.events.read().await.clone()
    }

    /// Append under a single write lock; the id is the new list length.
    async fn append(&self, input: NewHealthEvent, date: String) -> HealthEvent {
        let mut events = self.events.write().await;
        let event = input.into_event((events.len() + 1).to_string(), date);
        events.push(event.clone());
        event
    }
}

/// Simulated round-trip delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    /// Create and farm listing.
    pub events: Duration,
    /// Dashboard, upcoming and recent-treatment calls.
    pub summaries: Duration,
}

impl MockLatency {
    pub const fn none() -> Self {
        Self::uniform(Duration::ZERO)
    }

    pub const fn uniform(delay: Duration) -> Self {
        Self {
            events: delay,
            summaries: delay,
        }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            events: Duration::from_millis(300),
            summaries: Duration::from_millis(200),
        }
    }
}

/// Offline gateway serving canned data from a `MockStore`.
///
/// The animal, batch and type lookups have no offline data and are
/// forwarded to `passthrough`.
pub struct MockGateway {
    store: Arc<MockStore>,
    passthrough: Arc<dyn HealthEventGateway>,
    latency: MockLatency,
    today: Clock,
}

impl MockGateway {
    pub fn new(store: Arc<MockStore>, passthrough: Arc<dyn HealthEventGateway>) -> Self {
        Self {
            store,
            passthrough,
            latency: MockLatency::default(),
            today: Arc::new(|| Utc::now().date_naive()),
        }
    }

    pub fn with_latency(mut self, latency: MockLatency) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Arc::new(today);
        self
    }

    pub fn store(&self) -> &Arc<MockStore> {
        &self.store
    }

    async fn simulate(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl HealthEventGateway for MockGateway {
    /// Any caller-supplied `date` is replaced with today's date.
    async fn create_health_event(&self, event: &NewHealthEvent) -> Result<HealthEvent, ApiError> {
        debug!("mock store: creating health event");
        self.simulate(self.latency.events).await;
        let today = (self.today)().format("%Y-%m-%d").to_string();
        Ok(self.store.append(event.clone(), today).await)
    }

    /// Only `event_type` is applied; the date bounds are ignored offline.
    async fn get_events_by_farm(&self, filters: &FarmEventFilter) -> Result<Vec<HealthEvent>, ApiError> {
        debug!("mock store: farm health events");
        self.simulate(self.latency.events).await;
        let mut events = self.store.snapshot().await;
        if let Some(event_type) = non_empty(&filters.event_type) {
            events.retain(|e| e.event_type == event_type);
        }
        Ok(events)
    }

    async fn get_events_by_animal(&self, animal_id: &str) -> Result<Vec<HealthEvent>, ApiError> {
        self.passthrough.get_events_by_animal(animal_id).await
    }

    async fn get_events_by_batch(&self, batch_id: &str) -> Result<Vec<HealthEvent>, ApiError> {
        self.passthrough.get_events_by_batch(batch_id).await
    }

    async fn get_events_by_type(&self, event_type: &str) -> Result<Vec<HealthEvent>, ApiError> {
        self.passthrough.get_events_by_type(event_type).await
    }

    async fn get_dashboard_stats(&self) -> DashboardStats {
        debug!("mock store: dashboard stats");
        self.simulate(self.latency.summaries).await;
        DashboardStats {
            healthy: TotalStat {
                value: 115,
                total: 120,
                trend: "+5".to_string(),
            },
            treatment: Stat {
                value: 3,
                trend: "-1".to_string(),
            },
            vaccines_pending: Stat {
                value: 5,
                trend: String::new(),
            },
            critical: Stat {
                value: 2,
                trend: String::new(),
            },
        }
    }

    async fn get_upcoming_events(&self) -> Vec<HealthEvent> {
        debug!("mock store: upcoming events");
        self.simulate(self.latency.summaries).await;
        let mut events = self.store.snapshot().await;
        events.truncate(UPCOMING_LIMIT);
        events
    }

    async fn get_recent_treatments(&self) -> Vec<HealthEvent> {
        debug!("mock store: recent treatments");
        self.simulate(self.latency.summaries).await;
        let mut events = self.store.snapshot().await;
        events.retain(|e| e.event_type == TREATMENT_EVENT_TYPE);
        events
    }
}
