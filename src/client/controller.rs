use std::cell::RefCell;

use futures::StreamExt;

use crate::client::aggregator::{Aggregator, IngestReport};
use crate::client::lookup::{parse_deep_link, parse_search, LoadRequest};
use crate::client::paginator::{pages, LoadSummary, LoaderConfig};
use crate::client::panel::ListPanel;
use crate::client::selection::SelectionState;
use crate::client::source::{FetchError, TreeSource};
use crate::client::view::{MapView, MarkerId, StatusMessage};
use crate::model::KeysetPage;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("load {generation} was superseded by a newer load")]
    Superseded { generation: u64 },
}

/// Owns every piece of map-page state and funnels all mutation through
/// its methods. Loads are tagged with a generation; anything addressed to
/// an older generation is refused.
#[derive(Debug)]
pub struct MapController<V: MapView> {
    view: V,
    aggregator: Aggregator,
    selection: SelectionState,
    panel: ListPanel,
    status: StatusMessage,
    generation: u64,
}

impl<V: MapView> MapController<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            aggregator: Aggregator::new(),
            selection: SelectionState::default(),
            panel: ListPanel::default(),
            status: StatusMessage::Prompt,
            generation: 0,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn panel(&self) -> &ListPanel {
        &self.panel
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Nothing to search for.
    pub fn prompt(&mut self) {
        self.set_status(StatusMessage::Prompt);
    }

    /// Wipe the map and list and start a new load generation.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.reset_view();
        self.set_status(StatusMessage::Loading { received: 0 });
        self.generation
    }

    /// Draw one page. Pages from a superseded load are dropped untouched.
    pub fn ingest(&mut self, generation: u64, page: &KeysetPage) -> Result<IngestReport, LoadError> {
        self.check_generation(generation)?;
        let report = self.aggregator.ingest(&page.rows, &mut self.view);
        self.set_status(StatusMessage::Loading {
            received: self.aggregator.marker_count(),
        });
        Ok(report)
    }

    /// Build the sorted list and fit the viewport once the load is complete.
    pub fn finish(&mut self, generation: u64, summary: &LoadSummary) -> Result<(), LoadError> {
        self.check_generation(generation)?;
        self.publish_results();

        let count = self.aggregator.marker_count();
        tracing::info!(
            generation,
            batches = summary.batches,
            received = summary.total,
            rendered = count,
            skipped = self.aggregator.skipped(),
            codes = self.aggregator.code_count(),
            truncated = summary.truncated,
            "Tree load finished"
        );
        self.set_status(if count == 0 {
            StatusMessage::Empty
        } else {
            StatusMessage::Loaded { count }
        });
        Ok(())
    }

    /// Report a failed fetch.
    ///
    /// A response from the server (bad input, storage failure) clears the
    /// view. A transport failure part-way through keeps the pages already
    /// drawn.
    pub fn fail(&mut self, generation: u64, error: &FetchError) -> Result<(), LoadError> {
        self.check_generation(generation)?;

        if error.is_status() || self.aggregator.batches() == 0 {
            self.reset_view();
        } else {
            self.publish_results();
        }

        tracing::warn!(generation, error = %error, kept = self.aggregator.marker_count(), "Tree load failed");
        let status = match error {
            FetchError::Status { message, .. } if error.is_client_error() => StatusMessage::Rejected {
                message: message.clone(),
            },
            _ => StatusMessage::Failed,
        };
        self.set_status(status);
        Ok(())
    }

    pub fn select_by_marker(&mut self, marker: MarkerId) -> bool {
        self.selection
            .select_marker(&self.aggregator, marker, &mut self.view)
    }

    pub fn select_by_code(&mut self, code: &str) -> bool {
        self.selection
            .select_code(&self.aggregator, code, &mut self.view)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.view);
    }

    pub fn filter_list(&mut self, query: &str) {
        self.panel.apply_filter(query, &mut self.view);
    }

    fn check_generation(&self, generation: u64) -> Result<(), LoadError> {
        if generation == self.generation {
            Ok(())
        } else {
            tracing::debug!(generation, current = self.generation, "Dropping stale load result");
            Err(LoadError::Superseded { generation })
        }
    }

    fn reset_view(&mut self) {
        self.selection.clear(&mut self.view);
        self.selection.forget();
        self.view.clear_markers();
        self.aggregator.reset();
        self.panel.replace(Vec::new(), &mut self.view);
    }

    fn publish_results(&mut self) {
        let entries = self.aggregator.sorted_entries();
        self.panel.replace(entries, &mut self.view);
        self.selection.restore_item(&self.panel, &mut self.view);
        if let Some(bounds) = self.aggregator.bounds() {
            self.view.fit_bounds(&bounds);
        }
    }

    fn set_status(&mut self, status: StatusMessage) {
        self.view.set_status(&status);
        self.status = status;
    }
}

/// Load every page for `request` into the controller.
///
/// The controller is borrowed only between awaits, so other handlers (a
/// click, a newer search) may run while a page is in flight. If a newer load
/// starts meanwhile this one ends with [`LoadError::Superseded`] and leaves
/// the view alone.
pub async fn run_load<V: MapView, S: TreeSource>(
    controller: &RefCell<MapController<V>>,
    source: &S,
    request: &LoadRequest,
    config: LoaderConfig,
) -> Result<LoadSummary, LoadError> {
    let generation = controller.borrow_mut().begin_load();
    tracing::info!(%request, generation, limit = config.page_limit, "Loading trees");

    let mut summary = LoadSummary::default();
    let mut stream = std::pin::pin!(pages(source, request.clone(), config));
    while let Some(item) = stream.next().await {
        match item {
            Ok(batch) => {
                let mut ctl = controller.borrow_mut();
                ctl.ingest(generation, &batch.page)?;
                summary = batch.summary;
                if batch.last {
                    break;
                }
            }
            Err(err) => {
                controller.borrow_mut().fail(generation, &err)?;
                return Err(LoadError::Fetch(err));
            }
        }
    }

    controller.borrow_mut().finish(generation, &summary)?;
    Ok(summary)
}

/// Run a lookup typed into the search box. Blank input only prompts.
pub async fn search<V: MapView, S: TreeSource>(
    controller: &RefCell<MapController<V>>,
    source: &S,
    input: &str,
    config: LoaderConfig,
) -> Result<Option<LoadSummary>, LoadError> {
    match parse_search(input) {
        Some(request) => run_load(controller, source, &request, config).await.map(Some),
        None => {
            controller.borrow_mut().prompt();
            Ok(None)
        }
    }
}

/// Start from a page URL's query string (`?id=`, `?email=` or `?q=`).
pub async fn open_deep_link<V: MapView, S: TreeSource>(
    controller: &RefCell<MapController<V>>,
    source: &S,
    query: &str,
    config: LoaderConfig,
) -> Result<Option<LoadSummary>, LoadError> {
    match parse_deep_link(query) {
        Some(request) => run_load(controller, source, &request, config).await.map(Some),
        None => {
            controller.borrow_mut().prompt();
            Ok(None)
        }
    }
}
