//! Domain DTOs for the Hemolog API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates.
//!
//! `RecordType` is a closed set of known values plus an `Other` arm that
//! keeps whatever string the server sent, so a new type on the server never
//! turns a whole list response into a parse failure.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Kind of infusion or treatment a record logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    Prophy,
    Bleed,
    Preventative,
    Antibody,
    /// Any value outside the known set, kept verbatim.
    Other(String),
}

impl RecordType {
    /// Map a wire value to a variant. Never fails.
    pub fn parse(value: &str) -> Self {
        match value {
            "PROPHY" => RecordType::Prophy,
            "BLEED" => RecordType::Bleed,
            "PREVENTATIVE" => RecordType::Preventative,
            "ANTIBODY" => RecordType::Antibody,
            other => RecordType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Prophy => "PROPHY",
            RecordType::Bleed => "BLEED",
            RecordType::Preventative => "PREVENTATIVE",
            RecordType::Antibody => "ANTIBODY",
            RecordType::Other(value) => value,
        }
    }

    /// Human label used by form dropdowns.
    pub fn label(&self) -> &str {
        match self {
            RecordType::Prophy => "Prophy",
            RecordType::Bleed => "Bleed",
            RecordType::Preventative => "Preventative",
            RecordType::Antibody => "Antibody",
            RecordType::Other(value) => value,
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        RecordType::parse(&value)
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single log entry returned by the recent-infusions endpoint.
///
/// `date` is kept as the server sent it; see [`crate::date::display_date`]
/// for turning it into the calendar day shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub date: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sites: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Raw values collected by a log form, before validation.
///
/// `date` is the instant of local midnight on the picked day, carrying the
/// local offset in effect at that instant.
#[derive(Debug, Clone, Default)]
pub struct RecordInput {
    pub record_type: Option<RecordType>,
    pub date: Option<DateTime<FixedOffset>>,
    pub sites: Option<String>,
    pub cause: Option<String>,
}

/// JSON body posted to the log endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogRecordBody {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sites: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Which write endpoint a form submits to, together with its labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEndpoint {
    Infusion,
    Treatment,
}

impl LogEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            LogEndpoint::Infusion => "/api/log-infusion",
            LogEndpoint::Treatment => "/api/log-treatment",
        }
    }

    /// Title of the submit action.
    pub fn action_title(self) -> &'static str {
        match self {
            LogEndpoint::Infusion => "Log Infusion",
            LogEndpoint::Treatment => "Log Treatment",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            LogEndpoint::Infusion => "Infusion logged!",
            LogEndpoint::Treatment => "Treatment logged!",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            LogEndpoint::Infusion => "Could not submit infusion",
            LogEndpoint::Treatment => "Could not submit treatment",
        }
    }

    pub fn validation_message(self) -> &'static str {
        match self {
            LogEndpoint::Infusion => "Bleed type and date are required",
            LogEndpoint::Treatment => "Treatment type and date are required",
        }
    }

    pub fn default_type(self) -> RecordType {
        match self {
            LogEndpoint::Infusion => RecordType::Prophy,
            LogEndpoint::Treatment => RecordType::Antibody,
        }
    }

    /// Types offered by the form's dropdown, in display order.
    pub fn choices(self) -> &'static [RecordType] {
        const INFUSION: &[RecordType] = &[
            RecordType::Prophy,
            RecordType::Bleed,
            RecordType::Preventative,
        ];
        const TREATMENT: &[RecordType] = &[
            RecordType::Antibody,
            RecordType::Prophy,
            RecordType::Bleed,
            RecordType::Preventative,
        ];
        match self {
            LogEndpoint::Infusion => INFUSION,
            LogEndpoint::Treatment => TREATMENT,
        }
    }
}

/// Toast shown when the recent-records fetch fails.
pub const LIST_FAILURE_MESSAGE: &str = "Could not load infusions";
