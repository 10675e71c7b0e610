//! Stateless HTTP request builder and response parser for the Hemolog API.
//!
//! # Design
//! `HemologClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip, keeping
//! validation, date normalization and payload construction deterministic.
//!
//! The API key is passed to every `build_*` call rather than stored, so the
//! client never outlives a configuration change.

use crate::date;
use crate::error::{ApiError, ValidationError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{LogEndpoint, LogRecordBody, Record, RecordInput, RecordType};

pub const DEFAULT_BASE_URL: &str = "https://hemolog.com";

const RECENT_RECORDS_PATH: &str = "/api/recent-infusions";
const API_KEY_PARAM: &str = "apikey";

/// Form input whose required fields are known to be present.
#[derive(Debug, Clone)]
pub struct ValidatedInput<'a> {
    pub record_type: &'a RecordType,
    pub date: &'a chrono::DateTime<chrono::FixedOffset>,
    pub sites: Option<&'a str>,
    pub cause: Option<&'a str>,
}

/// Synchronous, stateless client for the Hemolog API.
#[derive(Debug, Clone)]
pub struct HemologClient {
    base_url: String,
}

impl Default for HemologClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HemologClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_recent_records(&self, api_key: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{RECENT_RECORDS_PATH}", self.base_url),
            query: api_key_query(api_key),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Records in the order the server sent them.
    pub fn parse_recent_records(&self, response: HttpResponse) -> Result<Vec<Record>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Check that type and date are both present. Sites and cause may be absent.
    pub fn validate<'a>(&self, input: &'a RecordInput) -> Result<ValidatedInput<'a>, ValidationError> {
        match (&input.record_type, &input.date) {
            (Some(record_type), Some(date)) => Ok(ValidatedInput {
                record_type,
                date,
                sites: input.sites.as_deref(),
                cause: input.cause.as_deref(),
            }),
            (None, None) => Err(ValidationError::MissingTypeAndDate),
            (None, Some(_)) => Err(ValidationError::MissingType),
            (Some(_), None) => Err(ValidationError::MissingDate),
        }
    }

    /// Validate the input and normalize its date into the posted body.
    pub fn log_body(&self, input: &RecordInput) -> Result<LogRecordBody, ApiError> {
        let valid = self.validate(input)?;
        Ok(LogRecordBody {
            record_type: valid.record_type.clone(),
            date: date::submission_date(valid.date)?,
            sites: valid.sites.map(str::to_string),
            cause: valid.cause.map(str::to_string),
        })
    }

    pub fn build_log_record(
        &self,
        endpoint: LogEndpoint,
        input: &RecordInput,
        api_key: &str,
    ) -> Result<HttpRequest, ApiError> {
        let payload = self.log_body(input)?;
        let body = serde_json::to_string(&payload)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{}", self.base_url, endpoint.path()),
            query: api_key_query(api_key),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Any 2xx counts as logged. The response body carries no contract.
    pub fn parse_log_record(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn api_key_query(api_key: &str) -> Vec<(String, String)> {
    vec![(API_KEY_PARAM.to_string(), api_key.to_string())]
}

/// Map non-2xx status codes to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn client() -> HemologClient {
        HemologClient::new("http://localhost:3000")
    }

    fn ok(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn picked(y: i32, m: u32, d: u32, east_minutes: i32) -> chrono::DateTime<FixedOffset> {
        let day = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        date::local_midnight(day, &FixedOffset::east_opt(east_minutes * 60).unwrap())
    }

    fn full_input() -> RecordInput {
        RecordInput {
            record_type: Some(RecordType::Bleed),
            date: Some(picked(2024, 3, 1, -300)),
            sites: Some("Left ankle".into()),
            cause: Some("Ran into a door".into()),
        }
    }

    #[test]
    fn build_recent_records_produces_correct_request() {
        let req = client().build_recent_records("k-123");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/recent-infusions");
        assert_eq!(req.query, vec![("apikey".to_string(), "k-123".to_string())]);
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_log_record_produces_correct_request() {
        let req = client()
            .build_log_record(LogEndpoint::Infusion, &full_input(), "k-123")
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/log-infusion");
        assert_eq!(req.query, vec![("apikey".to_string(), "k-123".to_string())]);
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["type"], "BLEED");
        assert_eq!(body["date"], "2024-03-01");
        assert_eq!(body["sites"], "Left ankle");
        assert_eq!(body["cause"], "Ran into a door");
    }

    #[test]
    fn treatment_endpoint_uses_its_own_path() {
        let req = client()
            .build_log_record(LogEndpoint::Treatment, &full_input(), "k")
            .unwrap();
        assert_eq!(req.path, "http://localhost:3000/api/log-treatment");
    }

    #[test]
    fn missing_date_fails_validation() {
        let input = RecordInput {
            date: None,
            ..full_input()
        };
        let err = client()
            .build_log_record(LogEndpoint::Infusion, &input, "k")
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::MissingDate)));
    }

    #[test]
    fn missing_type_fails_validation() {
        let input = RecordInput {
            record_type: None,
            ..full_input()
        };
        let err = client().log_body(&input).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::MissingType)));
    }

    #[test]
    fn empty_input_reports_both_fields() {
        let err = client().validate(&RecordInput::default()).unwrap_err();
        assert_eq!(err, ValidationError::MissingTypeAndDate);
    }

    #[test]
    fn optional_fields_may_be_absent_or_empty() {
        let input = RecordInput {
            sites: None,
            cause: Some(String::new()),
            ..full_input()
        };
        let body = client().log_body(&input).unwrap();
        assert!(body.sites.is_none());
        assert_eq!(body.cause.as_deref(), Some(""));
    }

    #[test]
    fn log_body_normalizes_first_of_month_east_of_utc() {
        let input = RecordInput {
            date: Some(picked(2024, 3, 1, 600)),
            ..full_input()
        };
        assert_eq!(client().log_body(&input).unwrap().date, "2024-03-01");
    }

    #[test]
    fn parse_recent_records_preserves_order() {
        let response = ok(
            200,
            r#"[{"id":"b","date":"2024-03-02","type":"BLEED"},{"id":"a","date":"2024-03-01","type":"PROPHY"}]"#,
        );
        let records = client().parse_recent_records(response).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_deref().unwrap()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn parse_recent_records_unauthorized() {
        let err = client()
            .parse_recent_records(ok(401, "invalid api key"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 401, .. }));
    }

    #[test]
    fn parse_recent_records_bad_json() {
        let err = client().parse_recent_records(ok(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_recent_records_object_instead_of_array() {
        let err = client()
            .parse_recent_records(ok(200, r#"{"error":"nope"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_log_record_accepts_any_2xx_and_ignores_body() {
        assert!(client().parse_log_record(ok(200, "")).is_ok());
        assert!(client().parse_log_record(ok(201, "not json")).is_ok());
        assert!(client().parse_log_record(ok(204, "")).is_ok());
    }

    #[test]
    fn parse_log_record_wrong_status() {
        let err = client()
            .parse_log_record(ok(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = HemologClient::new("http://localhost:3000/");
        let req = client.build_recent_records("k");
        assert_eq!(req.path, "http://localhost:3000/api/recent-infusions");
    }

    #[test]
    fn default_points_at_hemolog() {
        assert_eq!(HemologClient::default().base_url(), "https://hemolog.com");
    }
}
