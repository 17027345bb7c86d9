use std::fmt;

use crate::client::bounds::Bounds;
use crate::client::popup::PopupContent;

/// Handle of one marker on the map layer, unique within a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub usize);

/// Everything a map backend needs to draw one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub id: MarkerId,
    pub lat: f64,
    pub lng: f64,
    /// Trimmed code as displayed, empty for uncoded trees.
    pub code: String,
    pub popup: PopupContent,
}

/// One row of the code list panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Dedup key (trimmed, lowercased code); also the list item handle.
    pub key: String,
    pub code: String,
    pub name: String,
}

impl ListEntry {
    pub fn new(code: &str, name: &str) -> Option<Self> {
        let key = crate::validation::code_key(code)?;
        Some(Self {
            key,
            code: code.trim().to_string(),
            name: name.trim().to_string(),
        })
    }

    /// `CODE — name`, or just the code when the tree is unnamed.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.code.clone()
        } else {
            format!("{} — {}", self.code, self.name)
        }
    }

    /// Lowercased text the list filter searches.
    pub fn haystack(&self) -> String {
        format!("{} {}", self.code, self.name).to_lowercase()
    }
}

/// User-facing status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// Nothing to search for.
    Prompt,
    Loading { received: usize },
    Loaded { count: usize },
    Empty,
    /// The server refused the lookup; the message is safe to show.
    Rejected { message: String },
    Failed,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Prompt => write!(f, "enter an email or user id"),
            StatusMessage::Loading { received: 0 } => write!(f, "loading…"),
            StatusMessage::Loading { received } => write!(f, "loading… {received} trees"),
            StatusMessage::Loaded { count } => write!(f, "{count} trees"),
            StatusMessage::Empty => write!(f, "0 trees found"),
            StatusMessage::Rejected { message } => write!(f, "{message}"),
            StatusMessage::Failed => write!(f, "could not load trees"),
        }
    }
}

/// Rendering backend driven by the map controller.
///
/// Implementations only draw; all state (which marker is active, what the
/// list holds) lives in the controller, which calls these methods in a
/// consistent order.
pub trait MapView {
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: &MarkerSpec);
    fn set_marker_active(&mut self, marker: MarkerId, active: bool);
    fn open_popup(&mut self, marker: MarkerId);
    fn pan_to(&mut self, lat: f64, lng: f64);
    fn fit_bounds(&mut self, bounds: &Bounds);

    /// Replace the whole list panel; an empty slice shows the "no codes" placeholder.
    fn replace_list(&mut self, entries: &[ListEntry]);
    fn set_item_active(&mut self, key: &str, active: bool);
    fn scroll_item_into_view(&mut self, key: &str);
    fn set_item_visible(&mut self, key: &str, visible: bool);

    fn set_status(&mut self, status: &StatusMessage);
}
