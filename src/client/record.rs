use serde::Deserialize;

use crate::model::{KeysetPage, TreeRecord};

/// Any response shape a tree endpoint has been known to return.
///
/// Current servers send `{rows, next_after_id}`; older ones sent `{rows}` or
/// a bare array. All of them normalize to a [`KeysetPage`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RowsPayload {
    Page {
        rows: Vec<TreeRecord>,
        #[serde(default)]
        next_after_id: Option<i64>,
    },
    Bare(Vec<TreeRecord>),
}

impl From<RowsPayload> for KeysetPage {
    fn from(payload: RowsPayload) -> Self {
        match payload {
            RowsPayload::Page {
                rows,
                next_after_id,
            } => KeysetPage {
                rows,
                next_after_id,
            },
            RowsPayload::Bare(rows) => KeysetPage {
                rows,
                next_after_id: None,
            },
        }
    }
}

/// Error envelope the API sends with 4xx/5xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    #[serde(default)]
    pub trace_id: Option<String>,
}
