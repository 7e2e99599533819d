use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

const TREATMENT: &str = "Tratamiento";
const VACCINATIONS: [&str; 2] = ["Vacunación", "Vaccination"];

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthEvent {
    pub id: String,
    pub animal_id: String,
    pub ear_tag: String,
    pub event_type: String,
    pub date: String,
    pub description: String,
    pub veterinarian: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateHealthEvent {
    pub animal_id: String,
    pub ear_tag: String,
    pub event_type: String,
    pub date: String,
    pub description: String,
    pub veterinarian: String,
    pub batch_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FarmQuery {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub event_type: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Counter {
    pub value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    pub trend: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub healthy: Counter,
    pub treatment: Counter,
    pub vaccines_pending: Counter,
    pub critical: Counter,
}

pub type Db = Arc<RwLock<Vec<HealthEvent>>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

pub fn app_with(events: Vec<HealthEvent>) -> Router {
    let db: Db = Arc::new(RwLock::new(events));
    let resource = Router::new()
        .route("/HealthEvent", post(create_event))
        .route("/HealthEvent/farm", get(events_by_farm))
        .route("/HealthEvent/animal/{animal_id}", get(events_by_animal))
        .route("/HealthEvent/batch/{batch_id}", get(events_by_batch))
        .route("/HealthEvent/type/{event_type}", get(events_by_type))
        .route("/HealthEvent/dashboard-stats", get(dashboard_stats))
        .route("/HealthEvent/upcoming", get(upcoming_events))
        .route("/HealthEvent/recent-treatments", get(recent_treatments));
    Router::new().nest("/api", resource).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "health event API listening");
    }
    axum::serve(listener, app()).await
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

fn select(events: &[HealthEvent], keep: impl Fn(&HealthEvent) -> bool) -> Vec<HealthEvent> {
    events.iter().filter(|e| keep(e)).cloned().collect()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

async fn create_event(
    State(db): State<Db>,
    Json(input): Json<CreateHealthEvent>,
) -> (StatusCode, Json<HealthEvent>) {
    let event = HealthEvent {
        id: Uuid::new_v4().to_string(),
        animal_id: input.animal_id,
        ear_tag: input.ear_tag,
        event_type: input.event_type,
        date: input.date,
        description: input.description,
        veterinarian: input.veterinarian,
        batch_id: input.batch_id,
    };
    info!(id = %event.id, event_type = %event.event_type, "health event created");
    db.write().await.push(event.clone());
    (StatusCode::CREATED, Json(event))
}

/// ISO dates compare correctly as strings; both bounds are inclusive.
async fn events_by_farm(State(db): State<Db>, Query(query): Query<FarmQuery>) -> Json<Vec<HealthEvent>> {
    let events = db.read().await;
    Json(select(&events, |e| {
        present(&query.from_date).map_or(true, |from| e.date.as_str() >= from)
            && present(&query.to_date).map_or(true, |to| e.date.as_str() <= to)
            && present(&query.event_type).map_or(true, |t| e.event_type == t)
    }))
}

async fn events_by_animal(State(db): State<Db>, Path(animal_id): Path<String>) -> Json<Vec<HealthEvent>> {
    let events = db.read().await;
    Json(select(&events, |e| e.animal_id == animal_id))
}

async fn events_by_batch(State(db): State<Db>, Path(batch_id): Path<String>) -> Json<Vec<HealthEvent>> {
    let events = db.read().await;
    Json(select(&events, |e| e.batch_id.as_deref() == Some(batch_id.as_str())))
}

async fn events_by_type(State(db): State<Db>, Path(event_type): Path<String>) -> Json<Vec<HealthEvent>> {
    let events = db.read().await;
    Json(select(&events, |e| e.event_type == event_type))
}

async fn dashboard_stats(State(db): State<Db>) -> Json<DashboardStats> {
    let events = db.read().await;
    let today = today();

    let animals: HashSet<&str> = events.iter().map(|e| e.animal_id.as_str()).collect();
    let treated: HashSet<&str> = events
        .iter()
        .filter(|e| e.event_type == TREATMENT)
        .map(|e| e.animal_id.as_str())
        .collect();
    let treatments = events.iter().filter(|e| e.event_type == TREATMENT).count();
    let vaccines_pending = events
        .iter()
        .filter(|e| VACCINATIONS.contains(&e.event_type.as_str()) && e.date > today)
        .count();

    Json(DashboardStats {
        healthy: Counter {
            value: count(animals.difference(&treated).count()),
            total: Some(count(animals.len())),
            trend: String::new(),
        },
        treatment: Counter {
            value: count(treatments),
            ..Counter::default()
        },
        vaccines_pending: Counter {
            value: count(vaccines_pending),
            ..Counter::default()
        },
        critical: Counter::default(),
    })
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

async fn upcoming_events(State(db): State<Db>) -> Json<Vec<HealthEvent>> {
    let events = db.read().await;
    let today = today();
    let mut upcoming = select(&events, |e| e.date >= today);
    upcoming.sort_by(|a, b| a.date.cmp(&b.date));
    Json(upcoming)
}

async fn recent_treatments(State(db): State<Db>) -> Json<Vec<HealthEvent>> {
    let events = db.read().await;
    let mut treatments = select(&events, |e| e.event_type == TREATMENT);
    treatments.sort_by(|a, b| b.date.cmp(&a.date));
    Json(treatments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_event_serializes_camel_case() {
        let event = HealthEvent {
            id: "1".to_string(),
            animal_id: "7".to_string(),
            event_type: TREATMENT.to_string(),
            ..HealthEvent::default()
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["animalId"], "7");
        assert_eq!(json["eventType"], "Tratamiento");
        assert!(json.get("batchId").is_none());
    }

    #[test]
    fn create_event_defaults_missing_fields() {
        let input: CreateHealthEvent = serde_json::from_str(r#"{"animalId":"3"}"#).unwrap();
        assert_eq!(input.animal_id, "3");
        assert!(input.date.is_empty());
        assert!(input.batch_id.is_none());
    }

    #[test]
    fn dashboard_total_only_on_healthy() {
        let stats = DashboardStats {
            healthy: Counter {
                value: 1,
                total: Some(2),
                trend: String::new(),
            },
            ..DashboardStats::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["healthy"]["total"], 2);
        assert!(json["treatment"].get("total").is_none());
        assert!(json.get("vaccinesPending").is_some());
    }

    #[test]
    fn present_ignores_empty_strings() {
        assert_eq!(present(&Some(String::new())), None);
        assert_eq!(present(&Some("a".to_string())), Some("a"));
    }
}
