//! Data-access gateway for the HealthEvent REST resource.
//!
//! # Overview
//! `HealthEventClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network; a `Transport` executes the
//! round-trip. On top of that sit two `HealthEventGateway` strategies:
//! `RemoteGateway` for the live API and `MockGateway` for offline demos,
//! chosen once by `build_gateway`.
//!
//! # Design
//! - `HealthEventClient` is stateless; it holds only `base_url`.
//! - Mock data lives in an injected `MockStore`, never in a global, so each
//!   gateway (and each test) owns its own list.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod transport;
pub mod types;

pub use client::HealthEventClient;
pub use config::{build_gateway, GatewayConfig};
pub use error::{ApiError, ConfigError};
pub use gateway::{HealthEventGateway, MockGateway, MockLatency, MockStore, RemoteGateway};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    DashboardStats, FarmEventFilter, HealthEvent, HealthRecordFilter, NewHealthEvent, Stat, TotalStat,
    TREATMENT_EVENT_TYPE, VACCINATION_EVENT_TYPE,
};
