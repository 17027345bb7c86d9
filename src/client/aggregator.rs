use std::collections::HashMap;

use crate::client::bounds::BoundsAccumulator;
use crate::client::collate::compare_codes;
use crate::client::popup::PopupContent;
use crate::client::view::{ListEntry, MapView, MarkerId, MarkerSpec};
use crate::model::TreeRecord;

/// A rendered marker as the aggregator remembers it.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntry {
    pub id: MarkerId,
    pub record_id: i64,
    pub lat: f64,
    pub lng: f64,
    pub code: String,
}

/// Outcome of one `ingest` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub rendered: usize,
    pub skipped: usize,
    pub new_codes: usize,
}

/// Accumulates pages of one load into markers and a deduplicated code index.
///
/// Every record with valid coordinates becomes a marker. Only the first
/// record seen for each dedup key enters the code list and the key → marker
/// index, so the marker layer may hold more entries than the list.
#[derive(Debug, Default)]
pub struct Aggregator {
    markers: Vec<MarkerEntry>,
    by_code: HashMap<String, MarkerId>,
    entries: Vec<ListEntry>,
    bounds: BoundsAccumulator,
    received: usize,
    skipped: usize,
    batches: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Merge one batch, drawing its markers immediately.
    pub fn ingest<V: MapView>(&mut self, rows: &[TreeRecord], view: &mut V) -> IngestReport {
        let mut report = IngestReport::default();
        self.batches += 1;
        self.received += rows.len();

        for record in rows {
            let Some((lat, lng)) = record.position() else {
                tracing::warn!(
                    record_id = record.id,
                    lat = ?record.lat,
                    lng = ?record.long,
                    "Skipping tree with invalid coordinates"
                );
                report.skipped += 1;
                continue;
            };

            let id = MarkerId(self.markers.len());
            let code = record.code().to_string();
            view.add_marker(&MarkerSpec {
                id,
                lat,
                lng,
                code: code.clone(),
                popup: PopupContent::for_record(record, lat, lng),
            });
            self.bounds.extend(lat, lng);

            if let Some(entry) = ListEntry::new(&code, record.name()) {
                if !self.by_code.contains_key(&entry.key) {
                    self.by_code.insert(entry.key.clone(), id);
                    self.entries.push(entry);
                    report.new_codes += 1;
                }
            }

            self.markers.push(MarkerEntry {
                id,
                record_id: record.id,
                lat,
                lng,
                code,
            });
            report.rendered += 1;
        }

        self.skipped += report.skipped;
        report
    }

    /// The code list in display order. Ties keep arrival order.
    pub fn sorted_entries(&self) -> Vec<ListEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| compare_codes(&a.code, &b.code));
        entries
    }

    pub fn marker(&self, id: MarkerId) -> Option<&MarkerEntry> {
        self.markers.get(id.0)
    }

    /// Marker registered for a code (case-insensitive), if any.
    pub fn marker_for_code(&self, code: &str) -> Option<&MarkerEntry> {
        let key = crate::validation::code_key(code)?;
        self.by_code.get(&key).and_then(|id| self.marker(*id))
    }

    pub fn bounds(&self) -> Option<crate::client::bounds::Bounds> {
        self.bounds.bounds()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn code_count(&self) -> usize {
        self.entries.len()
    }

    /// Records received so far, valid or not.
    pub fn received(&self) -> usize {
        self.received
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn batches(&self) -> usize {
        self.batches
    }
}
