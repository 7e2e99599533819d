//! Domain DTOs for the HealthEvent API.
//!
//! # Design
//! These types mirror the backend's camelCase JSON schema but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift between the two. Filters keep every field optional and treat an
//! empty string the same as an absent field.

use serde::{Deserialize, Serialize};

/// Event type used by the recent-treatments mock filter.
pub const TREATMENT_EVENT_TYPE: &str = "Tratamiento";

/// Event type requested by `get_vaccinations`.
///
/// The mock seed data spells vaccinations `"Vacunación"`; the two literals
/// are kept as observed rather than harmonized.
pub const VACCINATION_EVENT_TYPE: &str = "Vaccination";

/// A recorded health event for one animal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthEvent {
    pub id: String,
    pub animal_id: String,
    pub ear_tag: String,
    pub event_type: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub description: String,
    pub veterinarian: String,
}

/// Request payload for registering a new health event. The server assigns
/// the `id`; omitted fields are left out of the JSON body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veterinarian: Option<String>,
}

impl NewHealthEvent {
    /// Materialize the payload as a stored event with the given identity and
    /// date. Absent fields become empty strings.
    pub fn into_event(self, id: String, date: String) -> HealthEvent {
        HealthEvent {
            id,
            animal_id: self.animal_id.unwrap_or_default(),
            ear_tag: self.ear_tag.unwrap_or_default(),
            event_type: self.event_type.unwrap_or_default(),
            date,
            description: self.description.unwrap_or_default(),
            veterinarian: self.veterinarian.unwrap_or_default(),
        }
    }
}

/// Query filters for farm-wide event listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FarmEventFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

impl FarmEventFilter {
    pub fn by_event_type(event_type: impl Into<String>) -> Self {
        Self {
            event_type: Some(event_type.into()),
            ..Self::default()
        }
    }
}

/// Catch-all filter accepted by `get_health_records`.
///
/// `kind` travels as `type` on the wire and selects the type-keyed lookup;
/// `event_type` only feeds the farm listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecordFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

impl From<&HealthRecordFilter> for FarmEventFilter {
    fn from(filter: &HealthRecordFilter) -> Self {
        Self {
            from_date: filter.from_date.clone(),
            to_date: filter.to_date.clone(),
            event_type: filter.event_type.clone(),
        }
    }
}

/// Headline counter with a population total.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TotalStat {
    pub value: u32,
    pub total: u32,
    pub trend: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Stat {
    pub value: u32,
    pub trend: String,
}

/// Aggregate snapshot for the health dashboard. `Default` is the zeroed
/// structure returned when the backend cannot be reached.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub healthy: TotalStat,
    pub treatment: Stat,
    pub vaccines_pending: Stat,
    pub critical: Stat,
}

/// Returns the value only when it is present and non-empty.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_event_uses_camel_case() {
        let event = HealthEvent {
            id: "1".to_string(),
            animal_id: "7".to_string(),
            ear_tag: "COL-007".to_string(),
            event_type: "Vacunación".to_string(),
            date: "2025-12-15".to_string(),
            description: "Vacuna antiaftosa".to_string(),
            veterinarian: "Dr. García".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["animalId"], "7");
        assert_eq!(json["earTag"], "COL-007");
        assert_eq!(json["eventType"], "Vacunación");
    }

    #[test]
    fn health_event_tolerates_missing_fields() {
        let event: HealthEvent = serde_json::from_str(r#"{"id":"9"}"#).unwrap();
        assert_eq!(event.id, "9");
        assert!(event.veterinarian.is_empty());
    }

    #[test]
    fn new_health_event_omits_absent_fields() {
        let input = NewHealthEvent {
            animal_id: Some("3".to_string()),
            ..NewHealthEvent::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({ "animalId": "3" }));
    }

    #[test]
    fn record_filter_reads_type_field() {
        let filter: HealthRecordFilter =
            serde_json::from_str(r#"{"type":"Tratamiento","eventType":"Vacunación"}"#).unwrap();
        assert_eq!(filter.kind.as_deref(), Some("Tratamiento"));
        assert_eq!(filter.event_type.as_deref(), Some("Vacunación"));
    }

    #[test]
    fn dashboard_default_is_zeroed() {
        let json = serde_json::to_value(DashboardStats::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "healthy": { "value": 0, "total": 0, "trend": "" },
                "treatment": { "value": 0, "trend": "" },
                "vaccinesPending": { "value": 0, "trend": "" },
                "critical": { "value": 0, "trend": "" }
            })
        );
    }

    #[test]
    fn non_empty_treats_blank_as_absent() {
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some("x".to_string())), Some("x"));
    }
}
