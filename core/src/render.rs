//! Presentation of fetched records as list items.

use crate::date;
use crate::types::{Record, RecordType};

/// Static page opened by the "Visit Hemolog" action.
pub const HEMOLOG_HOME_URL: &str = "https://hemolog.com/home";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Prophy,
    Preventative,
    /// Bleeds, antibody treatments, and anything unrecognized.
    Alert,
}

impl Icon {
    pub fn for_type(record_type: &RecordType) -> Self {
        match record_type {
            RecordType::Prophy => Icon::Prophy,
            RecordType::Preventative => Icon::Preventative,
            RecordType::Bleed | RecordType::Antibody | RecordType::Other(_) => Icon::Alert,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Prophy => "🔵",
            Icon::Preventative => "🟢",
            Icon::Alert => "🔴",
        }
    }
}

/// Glyph shown next to a type in a form dropdown.
pub fn choice_glyph(record_type: &RecordType) -> &'static str {
    match record_type {
        RecordType::Antibody => "⚫",
        other => Icon::for_type(other).glyph(),
    }
}

/// `sites`, followed by ` — cause` when a cause was given.
pub fn subtitle(record: &Record) -> String {
    let sites = record.sites.as_deref().unwrap_or_default();
    match record.cause.as_deref() {
        Some(cause) if !cause.is_empty() => format!("{sites} — {cause}"),
        _ => sites.to_string(),
    }
}

/// One row of the recent-records list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub icon: Icon,
    /// Display date, or the raw wire value if it could not be parsed.
    pub accessory: String,
}

impl From<&Record> for ListItem {
    fn from(record: &Record) -> Self {
        ListItem {
            id: record.id.clone(),
            title: record.record_type.to_string(),
            subtitle: subtitle(record),
            icon: Icon::for_type(&record.record_type),
            accessory: date::display_date(&record.date).unwrap_or_else(|_| record.date.clone()),
        }
    }
}

pub fn render_records(records: &[Record]) -> Vec<ListItem> {
    records.iter().map(ListItem::from).collect()
}
