//! Stateless HTTP request builder and response parser for the HealthEvent API.
//!
//! # Design
//! `HealthEventClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. A `Transport` executes the round-trip in between, keeping
//! this module deterministic and free of I/O.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{non_empty, DashboardStats, FarmEventFilter, HealthEvent, NewHealthEvent};

const RESOURCE: &str = "HealthEvent";

/// Synchronous, stateless client for the HealthEvent API.
#[derive(Debug, Clone)]
pub struct HealthEventClient {
    base_url: String,
}

impl HealthEventClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_create_event(&self, input: &NewHealthEvent) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/{RESOURCE}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// `GET /HealthEvent/farm`, forwarding every non-empty filter as a query
    /// parameter in `fromDate`, `toDate`, `eventType` order.
    pub fn build_events_by_farm(&self, filters: &FarmEventFilter) -> HttpRequest {
        let params: Vec<String> = [
            ("fromDate", non_empty(&filters.from_date)),
            ("toDate", non_empty(&filters.to_date)),
            ("eventType", non_empty(&filters.event_type)),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("{key}={}", urlencoding::encode(v))))
        .collect();

        let mut path = format!("{}/{RESOURCE}/farm", self.base_url);
        if !params.is_empty() {
            path.push('?');
            path.push_str(&params.join("&"));
        }
        self.get(path)
    }

    pub fn build_events_by_animal(&self, animal_id: &str) -> Result<HttpRequest, ApiError> {
        self.build_keyed("animal", "animal id", animal_id)
    }

    pub fn build_events_by_batch(&self, batch_id: &str) -> Result<HttpRequest, ApiError> {
        self.build_keyed("batch", "batch id", batch_id)
    }

    pub fn build_events_by_type(&self, event_type: &str) -> Result<HttpRequest, ApiError> {
        self.build_keyed("type", "event type", event_type)
    }

    pub fn build_dashboard_stats(&self) -> HttpRequest {
        self.get(format!("{}/{RESOURCE}/dashboard-stats", self.base_url))
    }

    pub fn build_upcoming_events(&self) -> HttpRequest {
        self.get(format!("{}/{RESOURCE}/upcoming", self.base_url))
    }

    pub fn build_recent_treatments(&self) -> HttpRequest {
        self.get(format!("{}/{RESOURCE}/recent-treatments", self.base_url))
    }

    pub fn parse_event(&self, response: HttpResponse) -> Result<HealthEvent, ApiError> {
        parse_json(response)
    }

    pub fn parse_events(&self, response: HttpResponse) -> Result<Vec<HealthEvent>, ApiError> {
        parse_json(response)
    }

    pub fn parse_dashboard_stats(&self, response: HttpResponse) -> Result<DashboardStats, ApiError> {
        parse_json(response)
    }

    fn build_keyed(&self, segment: &str, what: &str, key: &str) -> Result<HttpRequest, ApiError> {
        if key.is_empty() {
            return Err(ApiError::InvalidArgument(format!("{what} must not be empty")));
        }
        Ok(self.get(format!(
            "{}/{RESOURCE}/{segment}/{}",
            self.base_url,
            urlencoding::encode(key)
        )))
    }

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200..=299 => Ok(()),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HealthEventClient {
        HealthEventClient::new("http://localhost:3000/api")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_create_event_produces_correct_request() {
        let input = NewHealthEvent {
            animal_id: Some("1".to_string()),
            event_type: Some("Tratamiento".to_string()),
            date: Some("2024-01-01".to_string()),
            ..NewHealthEvent::default()
        };
        let req = client().build_create_event(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/HealthEvent");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["animalId"], "1");
        assert_eq!(body["date"], "2024-01-01");
        assert!(body.get("veterinarian").is_none());
    }

    #[test]
    fn build_events_by_farm_without_filters_has_no_query() {
        let req = client().build_events_by_farm(&FarmEventFilter::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/HealthEvent/farm");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_events_by_farm_forwards_all_filters_in_order() {
        let filters = FarmEventFilter {
            from_date: Some("2025-01-01".to_string()),
            to_date: Some("2025-12-31".to_string()),
            event_type: Some("Vacunación".to_string()),
        };
        let req = client().build_events_by_farm(&filters);
        assert_eq!(
            req.path,
            "http://localhost:3000/api/HealthEvent/farm?fromDate=2025-01-01&toDate=2025-12-31&eventType=Vacunaci%C3%B3n"
        );
    }

    #[test]
    fn build_events_by_farm_skips_empty_filters() {
        let filters = FarmEventFilter {
            from_date: Some(String::new()),
            to_date: Some("2025-12-31".to_string()),
            event_type: None,
        };
        let req = client().build_events_by_farm(&filters);
        assert_eq!(req.path, "http://localhost:3000/api/HealthEvent/farm?toDate=2025-12-31");
    }

    #[test]
    fn build_keyed_requests_encode_the_key() {
        let c = client();
        assert_eq!(
            c.build_events_by_animal("42").unwrap().path,
            "http://localhost:3000/api/HealthEvent/animal/42"
        );
        assert_eq!(
            c.build_events_by_batch("lote 7").unwrap().path,
            "http://localhost:3000/api/HealthEvent/batch/lote%207"
        );
        assert_eq!(
            c.build_events_by_type("Vaccination").unwrap().path,
            "http://localhost:3000/api/HealthEvent/type/Vaccination"
        );
    }

    #[test]
    fn build_keyed_requests_reject_empty_key() {
        let err = client().build_events_by_animal("").unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert!(client().build_events_by_batch("").is_err());
        assert!(client().build_events_by_type("").is_err());
    }

    #[test]
    fn build_summary_requests() {
        let c = client();
        assert_eq!(c.build_dashboard_stats().path, "http://localhost:3000/api/HealthEvent/dashboard-stats");
        assert_eq!(c.build_upcoming_events().path, "http://localhost:3000/api/HealthEvent/upcoming");
        assert_eq!(
            c.build_recent_treatments().path,
            "http://localhost:3000/api/HealthEvent/recent-treatments"
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = HealthEventClient::new("http://localhost:3000/api/");
        assert_eq!(client.build_upcoming_events().path, "http://localhost:3000/api/HealthEvent/upcoming");
    }

    #[test]
    fn parse_event_accepts_created() {
        let event = client()
            .parse_event(response(201, r#"{"id":"5","animalId":"1","eventType":"Tratamiento"}"#))
            .unwrap();
        assert_eq!(event.id, "5");
        assert_eq!(event.event_type, "Tratamiento");
    }

    #[test]
    fn parse_events_success() {
        let events = client()
            .parse_events(response(200, r#"[{"id":"1","earTag":"COL-001"}]"#))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ear_tag, "COL-001");
    }

    #[test]
    fn parse_events_not_found() {
        let err = client().parse_events(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_events_server_error() {
        let err = client().parse_events(response(500, "boom")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, ref body } if body == "boom"));
    }

    #[test]
    fn parse_events_bad_json() {
        let err = client().parse_events(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_dashboard_stats_success() {
        let stats = client()
            .parse_dashboard_stats(response(
                200,
                r#"{"healthy":{"value":10,"total":12,"trend":"+1"},"treatment":{"value":2,"trend":""},"vaccinesPending":{"value":1,"trend":""},"critical":{"value":0,"trend":""}}"#,
            ))
            .unwrap();
        assert_eq!(stats.healthy.total, 12);
        assert_eq!(stats.vaccines_pending.value, 1);
    }
}
