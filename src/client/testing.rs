//! In-memory doubles for client tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use crate::client::bounds::Bounds;
use crate::client::source::{FetchError, PageRequest, TreeSource};
use crate::client::view::{ListEntry, MapView, MarkerId, MarkerSpec, StatusMessage};
use crate::model::{KeysetPage, TreeRecord};

pub fn tree(id: i64, code: &str, lat: f64, lng: f64) -> TreeRecord {
    TreeRecord {
        id,
        tree_code: Some(code.to_string()),
        tree_name: Some(format!("tree {id}")),
        lat: Some(lat.into()),
        long: Some(lng.into()),
        ..TreeRecord::default()
    }
}

pub fn numbered_trees(ids: std::ops::RangeInclusive<i64>) -> Vec<TreeRecord> {
    ids.map(|id| tree(id, &format!("T-{id}"), 8.0 + id as f64 / 1000.0, -13.0))
        .collect()
}

/// Serves keyset pages out of a vector, sorted by id.
///
/// By default it behaves like the API (cursor only when more rows exist).
/// `naive()` hands out a cursor on every full page instead.
#[derive(Debug, Default)]
pub struct VecSource {
    records: Vec<TreeRecord>,
    naive: bool,
    fail_at: Option<usize>,
    reject: Option<(u16, String)>,
    requests: RefCell<Vec<Option<i64>>>,
    calls: Cell<usize>,
}

impl VecSource {
    pub fn new(mut records: Vec<TreeRecord>) -> Self {
        records.sort_by_key(|r| r.id);
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn naive(mut self) -> Self {
        self.naive = true;
        self
    }

    /// The `n`th request (1-based) fails with a network error.
    pub fn failing_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// Every request fails with the given HTTP status.
    pub fn rejecting(mut self, status: u16, message: &str) -> Self {
        self.reject = Some((status, message.to_string()));
        self
    }

    pub fn request_count(&self) -> usize {
        self.calls.get()
    }

    pub fn requested_cursors(&self) -> Vec<Option<i64>> {
        self.requests.borrow().clone()
    }
}

impl TreeSource for VecSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<KeysetPage, FetchError> {
        tokio::task::yield_now().await;
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push(request.after_id);

        if let Some((status, message)) = &self.reject {
            return Err(FetchError::Status {
                status: *status,
                code: None,
                message: message.clone(),
            });
        }
        if self.fail_at == Some(self.calls.get()) {
            return Err(FetchError::Network("connection reset".into()));
        }

        let limit = request.limit as usize;
        let mut remaining = self
            .records
            .iter()
            .filter(|r| request.after_id.map_or(true, |after| r.id > after));
        let rows: Vec<TreeRecord> = remaining.by_ref().take(limit).cloned().collect();
        let more = remaining.next().is_some();
        let full = rows.len() == limit;
        let next_after_id = if more || (self.naive && full) {
            rows.last().map(|r| r.id)
        } else {
            None
        };
        Ok(KeysetPage {
            rows,
            next_after_id,
        })
    }
}

/// Records every call a controller makes on its view.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub markers: Vec<MarkerSpec>,
    pub clears: usize,
    pub marker_states: BTreeMap<MarkerId, bool>,
    pub popups: Vec<MarkerId>,
    pub pans: Vec<(f64, f64)>,
    pub fitted: Vec<Bounds>,
    pub list: Vec<ListEntry>,
    pub list_replacements: usize,
    pub item_states: BTreeMap<String, bool>,
    pub scrolled: Vec<String>,
    pub hidden: BTreeSet<String>,
    pub statuses: Vec<StatusMessage>,
}

impl RecordingView {
    pub fn active_markers(&self) -> Vec<MarkerId> {
        self.marker_states
            .iter()
            .filter(|(_, active)| **active)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn active_items(&self) -> Vec<String> {
        self.item_states
            .iter()
            .filter(|(_, active)| **active)
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn list_codes(&self) -> Vec<String> {
        self.list.iter().map(|e| e.code.clone()).collect()
    }

    pub fn last_status(&self) -> Option<&StatusMessage> {
        self.statuses.last()
    }
}

impl MapView for RecordingView {
    fn clear_markers(&mut self) {
        self.clears += 1;
        self.markers.clear();
        self.marker_states.clear();
    }

    fn add_marker(&mut self, marker: &MarkerSpec) {
        self.markers.push(marker.clone());
    }

    fn set_marker_active(&mut self, marker: MarkerId, active: bool) {
        self.marker_states.insert(marker, active);
    }

    fn open_popup(&mut self, marker: MarkerId) {
        self.popups.push(marker);
    }

    fn pan_to(&mut self, lat: f64, lng: f64) {
        self.pans.push((lat, lng));
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        self.fitted.push(*bounds);
    }

    fn replace_list(&mut self, entries: &[ListEntry]) {
        self.list_replacements += 1;
        self.list = entries.to_vec();
        self.item_states.clear();
        self.hidden.clear();
    }

    fn set_item_active(&mut self, key: &str, active: bool) {
        self.item_states.insert(key.to_string(), active);
    }

    fn scroll_item_into_view(&mut self, key: &str) {
        self.scrolled.push(key.to_string());
    }

    fn set_item_visible(&mut self, key: &str, visible: bool) {
        if visible {
            self.hidden.remove(key);
        } else {
            self.hidden.insert(key.to_string());
        }
    }

    fn set_status(&mut self, status: &StatusMessage) {
        self.statuses.push(status.clone());
    }
}
