use crate::client::aggregator::Aggregator;
use crate::client::panel::ListPanel;
use crate::client::view::{MapView, MarkerId};
use crate::validation::code_key;

/// The active marker and, when it has a code, its list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub marker: MarkerId,
    pub key: Option<String>,
}

/// Keeps the marker highlight and the list highlight pointing at the same
/// code. Every transition clears the previous selection before setting the
/// new one.
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Option<Selection>,
}

impl SelectionState {
    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Drop the selection without touching the view (the view was already wiped).
    pub fn forget(&mut self) {
        self.current = None;
    }

    pub fn clear<V: MapView>(&mut self, view: &mut V) {
        if let Some(previous) = self.current.take() {
            view.set_marker_active(previous.marker, false);
            if let Some(key) = &previous.key {
                view.set_item_active(key, false);
            }
        }
    }

    /// Rebuilding the list drops every item highlight. Put the selected
    /// code's highlight back if the new list has it.
    pub fn restore_item<V: MapView>(&self, panel: &ListPanel, view: &mut V) {
        let Some(key) = self.current.as_ref().and_then(|sel| sel.key.as_deref()) else {
            return;
        };
        if panel.contains(key) {
            view.set_item_active(key, true);
        }
    }

    /// A marker was clicked. Returns `false` for a marker this load never drew.
    pub fn select_marker<V: MapView>(
        &mut self,
        aggregator: &Aggregator,
        marker: MarkerId,
        view: &mut V,
    ) -> bool {
        let Some(entry) = aggregator.marker(marker) else {
            return false;
        };
        let key = code_key(&entry.code);

        self.clear(view);
        view.set_marker_active(marker, true);
        view.open_popup(marker);
        if let Some(key) = &key {
            view.set_item_active(key, true);
            view.scroll_item_into_view(key);
        }
        self.current = Some(Selection { marker, key });
        true
    }

    /// A list item was clicked. Unknown codes leave everything as it was.
    pub fn select_code<V: MapView>(
        &mut self,
        aggregator: &Aggregator,
        code: &str,
        view: &mut V,
    ) -> bool {
        let (Some(key), Some(entry)) = (code_key(code), aggregator.marker_for_code(code)) else {
            tracing::debug!(code, "Selection ignored for unknown code");
            return false;
        };
        let (marker, lat, lng) = (entry.id, entry.lat, entry.lng);

        self.clear(view);
        view.set_marker_active(marker, true);
        view.pan_to(lat, lng);
        view.open_popup(marker);
        view.set_item_active(&key, true);
        self.current = Some(Selection {
            marker,
            key: Some(key),
        });
        true
    }
}
