use serde::{Deserialize, Serialize};

/// A coordinate as it arrives from storage: legacy rows carry numeric
/// strings, and some carry garbage. Parsing happens at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// The coordinate as a finite number, or `None` for unparseable values.
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(v) => *v,
            Coordinate::Text(raw) => raw.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Coordinate::Number(value)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Text(value.to_string())
    }
}

/// One tree row as exposed over HTTP.
///
/// Field names follow the `v_user_trees` view; the aliases let the map client
/// read payloads from older endpoints that used the short names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    pub id: i64,
    #[serde(default, alias = "code")]
    pub tree_code: Option<String>,
    #[serde(default, alias = "name")]
    pub tree_name: Option<String>,
    #[serde(default, alias = "type")]
    pub tree_type: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub lat: Option<Coordinate>,
    #[serde(default, alias = "lng")]
    pub long: Option<Coordinate>,
    #[serde(default, alias = "planted_date")]
    pub planted_at: Option<String>,
    #[serde(default, alias = "owner_id")]
    pub user_id: Option<i64>,
    #[serde(default, alias = "owner_email")]
    pub email: Option<String>,
}

impl TreeRecord {
    /// Both coordinates as finite numbers, or `None` when either is missing or malformed.
    pub fn position(&self) -> Option<(f64, f64)> {
        let lat = self.lat.as_ref()?.parse()?;
        let lng = self.long.as_ref()?.parse()?;
        Some((lat, lng))
    }

    /// Trimmed code, empty when absent.
    pub fn code(&self) -> &str {
        self.tree_code.as_deref().map(str::trim).unwrap_or("")
    }

    /// Trimmed name, empty when absent.
    pub fn name(&self) -> &str {
        self.tree_name.as_deref().map(str::trim).unwrap_or("")
    }
}

/// One keyset page: rows ascending by `id`, plus the cursor for the next
/// request (`None` on the final page).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeysetPage {
    pub rows: Vec<TreeRecord>,
    #[serde(default)]
    pub next_after_id: Option<i64>,
}

/// Non-paginated listing body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowsBody {
    pub rows: Vec<TreeRecord>,
}
