//! Keyset pagination for the map client.
//!
//! [`KeysetPaginator`] is the pure state machine; [`pages`] drives it against
//! a [`TreeSource`] and yields each page as it arrives.

use futures::Stream;

use crate::client::lookup::LoadRequest;
use crate::client::source::{FetchError, PageRequest, TreeSource};
use crate::constants::{CLIENT_MAX_BATCHES, CLIENT_PAGE_LIMIT};
use crate::model::KeysetPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    pub page_limit: u32,
    pub max_batches: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            page_limit: CLIENT_PAGE_LIMIT,
            max_batches: CLIENT_MAX_BATCHES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    Idle,
    Fetching { after_id: Option<i64> },
    Continue { after_id: i64 },
    Done,
}

/// Result of feeding one page to the paginator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Done,
}

/// Where the next request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub after_id: Option<i64>,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub batches: u32,
    pub total: usize,
    /// The load stopped on a safety bound, not on the end of the data.
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct KeysetPaginator {
    limit: u32,
    max_batches: u32,
    state: PaginatorState,
    summary: LoadSummary,
}

impl KeysetPaginator {
    pub fn new(limit: u32, max_batches: u32) -> Self {
        Self {
            limit: limit.max(1),
            max_batches: max_batches.max(1),
            state: PaginatorState::Idle,
            summary: LoadSummary::default(),
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(config.page_limit, config.max_batches)
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn summary(&self) -> LoadSummary {
        self.summary
    }

    /// Start the next fetch. `None` once done or while a fetch is outstanding.
    pub fn next_request(&mut self) -> Option<PageCursor> {
        let after_id = match self.state {
            PaginatorState::Idle => None,
            PaginatorState::Continue { after_id } => Some(after_id),
            PaginatorState::Fetching { .. } | PaginatorState::Done => return None,
        };
        self.state = PaginatorState::Fetching { after_id };
        Some(PageCursor {
            after_id,
            limit: self.limit,
        })
    }

    /// Account for a received page and decide whether to keep going.
    pub fn advance(&mut self, page: &KeysetPage) -> Step {
        let PaginatorState::Fetching { after_id: current } = self.state else {
            tracing::warn!(state = ?self.state, "Page received without an outstanding fetch");
            return Step::Done;
        };

        self.summary.batches += 1;
        self.summary.total += page.rows.len();

        let full = page.rows.len() >= self.limit as usize;
        let next = match (full, page.next_after_id) {
            (true, Some(next)) => next,
            _ => return self.finish(false),
        };

        if current.is_some_and(|cur| next <= cur) {
            tracing::warn!(
                after_id = ?current,
                next_after_id = next,
                "Cursor did not advance; stopping load"
            );
            return self.finish(true);
        }
        if self.summary.batches >= self.max_batches {
            tracing::warn!(
                batches = self.summary.batches,
                total = self.summary.total,
                "Batch limit reached; stopping load"
            );
            return self.finish(true);
        }

        self.state = PaginatorState::Continue { after_id: next };
        Step::Continue
    }

    /// A fetch failed. There is no retry.
    pub fn fail(&mut self) {
        self.state = PaginatorState::Done;
    }

    fn finish(&mut self, truncated: bool) -> Step {
        self.summary.truncated = truncated;
        self.state = PaginatorState::Done;
        Step::Done
    }
}

/// One page as yielded by [`pages`].
#[derive(Debug, Clone)]
pub struct Batch {
    /// 1-based position within the load.
    pub sequence: u32,
    pub page: KeysetPage,
    /// Running totals; final when `last` is set.
    pub summary: LoadSummary,
    pub last: bool,
}

/// Fetch every page of `target` in cursor order, one request at a time.
///
/// The stream ends after the last page or right after yielding the first
/// error.
pub fn pages<'a, S: TreeSource>(
    source: &'a S,
    target: LoadRequest,
    config: LoaderConfig,
) -> impl Stream<Item = Result<Batch, FetchError>> + 'a {
    async_stream::stream! {
        let mut paginator = KeysetPaginator::from_config(&config);
        while let Some(cursor) = paginator.next_request() {
            let request = PageRequest {
                target: target.clone(),
                after_id: cursor.after_id,
                limit: cursor.limit,
            };
            match source.fetch_page(&request).await {
                Ok(page) => {
                    let step = paginator.advance(&page);
                    let summary = paginator.summary();
                    yield Ok(Batch {
                        sequence: summary.batches,
                        page,
                        summary,
                        last: step == Step::Done,
                    });
                }
                Err(err) => {
                    paginator.fail();
                    tracing::warn!(target_request = %target, after_id = ?cursor.after_id, error = %err, "Page fetch failed");
                    yield Err(err);
                }
            }
        }
    }
}
