//! Map page client: fetches tree pages, draws them incrementally and keeps
//! the marker layer and the code list in sync.
//!
//! Rendering goes through the [`MapView`] trait so the same controller can
//! drive a browser map, a terminal view or a test recorder.

pub mod aggregator;
pub mod bounds;
pub mod collate;
pub mod controller;
pub mod lookup;
pub mod paginator;
pub mod panel;
pub mod popup;
pub mod record;
pub mod selection;
pub mod source;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{open_deep_link, run_load, search, LoadError, MapController};
pub use lookup::{LoadRequest, OwnerLookup};
pub use paginator::{KeysetPaginator, LoadSummary, LoaderConfig};
pub use source::{FetchError, HttpTreeSource, PageRequest, TreeSource};
pub use view::{ListEntry, MapView, MarkerId, MarkerSpec, StatusMessage};
