//! Capabilities the host provides, and the list/form flows that drive them.
//!
//! # Design
//! The core never performs I/O itself. A host supplies a [`Transport`] for
//! the HTTP round-trip and a UI made of [`Notifier`], [`Navigator`] and
//! [`LoadingIndicator`]. [`RecordList`] and [`LogForm`] own their loading
//! flag and mirror every change of it to the indicator.
//!
//! Both flows compute their outcome in a helper that cannot touch the
//! loading flag, then clear the flag before reporting. Every exit path
//! therefore leaves the indicator off.

use tracing::{debug, warn};

use crate::client::HemologClient;
use crate::error::{ApiError, ConfigError, ErrorKind, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::render::{self, ListItem};
use crate::types::{LogEndpoint, Record, RecordInput, LIST_FAILURE_MESSAGE};

/// Executes one HTTP round-trip.
///
/// Non-2xx responses are data, not errors: implementations return them as
/// `Ok` and leave status interpretation to the client.
pub trait Transport {
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastStyle {
    Success,
    Failure,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub style: ToastStyle,
    pub title: String,
    /// Optional detail, e.g. the underlying error.
    pub message: Option<String>,
}

impl Toast {
    pub fn success(title: &str) -> Self {
        Toast {
            style: ToastStyle::Success,
            title: title.to_string(),
            message: None,
        }
    }

    pub fn failure(title: &str) -> Self {
        Toast {
            style: ToastStyle::Failure,
            title: title.to_string(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

pub trait Notifier {
    fn notify(&mut self, toast: Toast);
}

pub trait Navigator {
    /// Return to the top-level view.
    fn pop_to_root(&mut self);
}

pub trait LoadingIndicator {
    fn set_loading(&mut self, loading: bool);
}

/// Supplies the user's API key from persisted settings.
pub trait ApiKeyProvider {
    fn api_key(&self) -> Result<String, ConfigError>;
}

/// A key fixed at construction time.
#[derive(Debug, Clone)]
pub struct StaticApiKey(pub String);

impl ApiKeyProvider for StaticApiKey {
    fn api_key(&self) -> Result<String, ConfigError> {
        Ok(self.0.clone())
    }
}

/// Ask the provider for a key, treating a blank key as missing.
pub fn resolve_api_key(provider: &impl ApiKeyProvider) -> Result<String, ConfigError> {
    let key = provider.api_key()?;
    if key.trim().is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    Ok(key)
}

/// The recent-records view: a loading flag and the last fetched records.
#[derive(Debug, Default)]
pub struct RecordList {
    is_loading: bool,
    records: Vec<Record>,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn items(&self) -> Vec<ListItem> {
        render::render_records(&self.records)
    }

    /// Fetch recent records, replacing the current ones.
    ///
    /// Never fails: on any error one failure toast is shown and the list is
    /// left empty.
    pub fn load<T, U>(
        &mut self,
        client: &HemologClient,
        api_key: &str,
        transport: &mut T,
        ui: &mut U,
    ) -> &[Record]
    where
        T: Transport,
        U: Notifier + LoadingIndicator,
    {
        self.set_loading(ui, true);
        let outcome = fetch_recent(client, api_key, transport);
        self.set_loading(ui, false);

        match outcome {
            Ok(records) => {
                debug!(count = records.len(), "loaded recent records");
                self.records = records;
            }
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "could not load recent records");
                self.records = Vec::new();
                ui.notify(Toast::failure(LIST_FAILURE_MESSAGE).with_message(err.to_string()));
            }
        }
        &self.records
    }

    fn set_loading(&mut self, ui: &mut impl LoadingIndicator, loading: bool) {
        self.is_loading = loading;
        ui.set_loading(loading);
    }
}

fn fetch_recent<T: Transport>(
    client: &HemologClient,
    api_key: &str,
    transport: &mut T,
) -> Result<Vec<Record>, ApiError> {
    let request = client.build_recent_records(api_key);
    debug!(path = %request.path, "fetching recent records");
    let response = transport.execute(&request)?;
    client.parse_recent_records(response)
}

/// A log form bound to one write endpoint.
#[derive(Debug)]
pub struct LogForm {
    endpoint: LogEndpoint,
    is_loading: bool,
}

impl LogForm {
    pub fn new(endpoint: LogEndpoint) -> Self {
        Self {
            endpoint,
            is_loading: false,
        }
    }

    pub fn endpoint(&self) -> LogEndpoint {
        self.endpoint
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Validate, normalize and post `input`. Exactly one request at most.
    ///
    /// Reports the outcome through `ui` and also returns it. On success the
    /// UI is sent back to its root view.
    pub fn submit<T, U>(
        &mut self,
        client: &HemologClient,
        input: &RecordInput,
        api_key: &str,
        transport: &mut T,
        ui: &mut U,
    ) -> Result<(), ApiError>
    where
        T: Transport,
        U: Notifier + Navigator + LoadingIndicator,
    {
        self.set_loading(ui, true);
        let outcome = send_record(client, self.endpoint, input, api_key, transport);
        self.set_loading(ui, false);

        match &outcome {
            Ok(()) => {
                debug!(endpoint = self.endpoint.path(), "record logged");
                ui.notify(Toast::success(self.endpoint.success_message()));
                ui.pop_to_root();
            }
            Err(err) if err.kind() == ErrorKind::Validation => {
                ui.notify(
                    Toast::failure(self.endpoint.validation_message()).with_message(err.to_string()),
                );
            }
            Err(err) => {
                warn!(endpoint = self.endpoint.path(), error = %err, "could not log record");
                ui.notify(
                    Toast::failure(self.endpoint.failure_message()).with_message(err.to_string()),
                );
            }
        }
        outcome
    }

    fn set_loading(&mut self, ui: &mut impl LoadingIndicator, loading: bool) {
        self.is_loading = loading;
        ui.set_loading(loading);
    }
}

fn send_record<T: Transport>(
    client: &HemologClient,
    endpoint: LogEndpoint,
    input: &RecordInput,
    api_key: &str,
    transport: &mut T,
) -> Result<(), ApiError> {
    let request = client.build_log_record(endpoint, input, api_key)?;
    debug!(path = %request.path, "submitting record");
    let response = transport.execute(&request)?;
    client.parse_log_record(response)
}
