use std::collections::HashSet;

use crate::client::view::{ListEntry, MapView};

/// The code list: its current entries and which of them the filter hides.
#[derive(Debug, Default)]
pub struct ListPanel {
    entries: Vec<ListEntry>,
    filter: String,
    hidden: HashSet<String>,
}

impl ListPanel {
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.contains(key) && !self.hidden.contains(key)
    }

    /// Swap in a new list in one go, then re-apply the current filter.
    pub fn replace<V: MapView>(&mut self, entries: Vec<ListEntry>, view: &mut V) {
        view.replace_list(&entries);
        self.entries = entries;
        self.hidden.clear();
        let filter = std::mem::take(&mut self.filter);
        self.apply_filter(&filter, view);
    }

    /// Case-insensitive substring filter over `code name`. Only visibility changes.
    pub fn apply_filter<V: MapView>(&mut self, query: &str, view: &mut V) {
        self.filter = query.to_string();
        let needle = query.trim().to_lowercase();

        for entry in &self.entries {
            let visible = needle.is_empty() || entry.haystack().contains(&needle);
            let was_hidden = self.hidden.contains(&entry.key);
            if visible == was_hidden {
                view.set_item_visible(&entry.key, visible);
                if visible {
                    self.hidden.remove(&entry.key);
                } else {
                    self.hidden.insert(entry.key.clone());
                }
            }
        }
    }
}
