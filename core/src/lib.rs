//! Synchronous API client core for the Hemolog treatment log.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host executes the
//! actual HTTP round-trip and supplies the UI capabilities the list and
//! form flows report through.
//!
//! # Design
//! - `HemologClient` is stateless. It holds only `base_url`; the API key is
//!   an explicit argument of every request.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Validation, calendar-day normalization and payload construction are
//!   pure; notifications, navigation and the loading flag live in `host`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod date;
pub mod error;
pub mod host;
pub mod http;
pub mod render;
pub mod types;

pub use client::{HemologClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ConfigError, DateError, ErrorKind, TransportError, ValidationError};
pub use host::{
    ApiKeyProvider, LoadingIndicator, LogForm, Navigator, Notifier, RecordList, StaticApiKey,
    Toast, ToastStyle, Transport,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use render::{Icon, ListItem, HEMOLOG_HOME_URL};
pub use types::{LogEndpoint, LogRecordBody, Record, RecordInput, RecordType};
