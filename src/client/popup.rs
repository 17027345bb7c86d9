use chrono::{DateTime, NaiveDate};

use crate::model::TreeRecord;

/// Detail shown when a marker is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    /// The code, or "tree" for uncoded records.
    pub title: String,
    pub name: Option<String>,
    /// `type • area`, either half optional.
    pub subtitle: String,
    /// Planting date as `dd-mm-yyyy`.
    pub planted: Option<String>,
    pub maps_url: String,
}

impl PopupContent {
    pub fn for_record(record: &TreeRecord, lat: f64, lng: f64) -> Self {
        let code = record.code();
        let name = record.name();
        let tree_type = record.tree_type.as_deref().unwrap_or("").trim();
        let area = record.area.as_deref().unwrap_or("").trim();
        let subtitle = match (tree_type.is_empty(), area.is_empty()) {
            (false, false) => format!("{tree_type} • {area}"),
            (false, true) => tree_type.to_string(),
            (true, false) => format!("• {area}"),
            (true, true) => String::new(),
        };

        Self {
            title: if code.is_empty() {
                "tree".to_string()
            } else {
                code.to_string()
            },
            name: (!name.is_empty()).then(|| name.to_string()),
            subtitle,
            planted: record.planted_at.as_deref().and_then(format_planted),
            maps_url: format!("https://maps.google.com/?q={lat},{lng}"),
        }
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; anything else is dropped.
fn format_planted(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))?;
    Some(date.format("%d-%m-%Y").to_string())
}
