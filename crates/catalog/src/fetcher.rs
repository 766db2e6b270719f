//! Paginated catalog fetcher.
//!
//! Owns the listing cursor and the accumulated, index-aligned entries and
//! details. A page fetch runs only from the idle state: any trigger that
//! arrives while a fetch is in flight is dropped, so pages are appended in
//! request order and never overlap.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::TransportError;
use crate::joiner::enrich;
use crate::source::CatalogSource;
use crate::types::{CatalogDetail, CatalogEntry, CatalogPage};

/// Events emitted by the fetcher.
#[derive(Debug)]
pub enum CatalogEvent {
    /// The in-flight flag flipped.
    LoadingChanged(bool),
    /// A page was appended.
    Updated {
        appended: usize,
        total: usize,
        has_more: bool,
    },
    /// A page fetch or its enrichment failed. Nothing was appended.
    Error(TransportError),
}

/// What a fetch request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// A page of `count` entries was appended.
    Appended { count: usize },
    /// The request was ignored: a fetch was in flight, the list end was not
    /// reached, or there are no more pages.
    Skipped,
    /// The fetch ran and failed; see the emitted [`CatalogEvent::Error`].
    Failed,
}

#[derive(Debug, Default)]
struct CatalogState {
    entries: Vec<CatalogEntry>,
    details: Vec<CatalogDetail>,
    cursor: Option<String>,
    loading: bool,
    /// Set once a successful fetch reports no next page.
    exhausted: bool,
}

enum Trigger {
    Explicit,
    NearEnd(usize),
}

fn lock(state: &Mutex<CatalogState>) -> MutexGuard<'_, CatalogState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns to idle if a fetch future is dropped before settling.
struct InFlight<'a> {
    state: &'a Mutex<CatalogState>,
    events_tx: &'a mpsc::UnboundedSender<CatalogEvent>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("page fetch dropped before settling");
            lock(self.state).loading = false;
            let _ = self.events_tx.send(CatalogEvent::LoadingChanged(false));
        }
    }
}

/// Browses a paginated catalog, enriching every page before appending it.
pub struct CatalogFetcher<S> {
    source: S,
    state: Mutex<CatalogState>,
    events_tx: mpsc::UnboundedSender<CatalogEvent>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<CatalogEvent>>>,
}

impl<S: CatalogSource> CatalogFetcher<S> {
    /// Creates an empty fetcher over `source`.
    pub fn new(source: S) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source,
            state: Mutex::new(CatalogState::default()),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<CatalogEvent>> {
        self.events_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// All entries loaded so far, in listing order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        lock(&self.state).entries.clone()
    }

    /// All details loaded so far; `details()[i]` belongs to `entries()[i]`.
    pub fn details(&self) -> Vec<CatalogDetail> {
        lock(&self.state).details.clone()
    }

    pub fn detail(&self, index: usize) -> Option<CatalogDetail> {
        lock(&self.state).details.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// The next-page cursor, `None` before the first page and after the last.
    pub fn cursor(&self) -> Option<String> {
        lock(&self.state).cursor.clone()
    }

    /// Whether another page can still be requested.
    pub fn has_more(&self) -> bool {
        !lock(&self.state).exhausted
    }

    /// Explicit fetch: the first page, or the page at the current cursor.
    ///
    /// Skipped while another fetch is in flight or once the listing is
    /// exhausted.
    pub async fn fetch_initial_page(&self) -> PageOutcome {
        self.run(Trigger::Explicit).await
    }

    /// Requests the next page when the list view shows its last item.
    ///
    /// Proceeds only if `last_visible_index` is at or past the last loaded
    /// entry, a cursor is present, and no fetch is in flight.
    pub async fn notify_near_end_of_list(&self, last_visible_index: usize) -> PageOutcome {
        self.run(Trigger::NearEnd(last_visible_index)).await
    }

    async fn run(&self, trigger: Trigger) -> PageOutcome {
        let Some(cursor) = self.begin(trigger) else {
            return PageOutcome::Skipped;
        };

        let mut in_flight = InFlight {
            state: &self.state,
            events_tx: &self.events_tx,
            settled: false,
        };
        let result = self.load_page(cursor.as_deref()).await;
        let outcome = self.settle(result);
        in_flight.settled = true;
        outcome
    }

    /// Moves idle -> fetching if the trigger allows it, returning the cursor
    /// to fetch.
    fn begin(&self, trigger: Trigger) -> Option<Option<String>> {
        let mut state = lock(&self.state);
        if state.loading {
            debug!("page fetch already in flight, ignoring trigger");
            return None;
        }

        match trigger {
            Trigger::Explicit => {
                if state.exhausted {
                    debug!("catalog exhausted, ignoring fetch");
                    return None;
                }
            }
            Trigger::NearEnd(index) => {
                if state.cursor.is_none() {
                    return None;
                }
                if index.saturating_add(1) < state.entries.len() {
                    return None;
                }
            }
        }

        state.loading = true;
        let cursor = state.cursor.clone();
        drop(state);

        debug!(cursor = ?cursor, "fetching catalog page");
        self.emit(CatalogEvent::LoadingChanged(true));
        Some(cursor)
    }

    async fn load_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<(CatalogPage, Vec<CatalogDetail>), TransportError> {
        let page = self.source.fetch_page(cursor).await?;
        let details = enrich(&self.source, &page.entries).await?;
        debug_assert_eq!(page.entries.len(), details.len());
        Ok((page, details))
    }

    /// Moves fetching -> idle, applying the result only on success.
    fn settle(
        &self,
        result: Result<(CatalogPage, Vec<CatalogDetail>), TransportError>,
    ) -> PageOutcome {
        let (event, outcome) = {
            let mut state = lock(&self.state);
            state.loading = false;

            match result {
                Ok((page, details)) => {
                    let count = page.entries.len();
                    state.entries.extend(page.entries);
                    state.details.extend(details);
                    state.cursor = page.next_cursor;
                    state.exhausted = state.cursor.is_none();

                    let total = state.entries.len();
                    let has_more = !state.exhausted;
                    info!(appended = count, total, has_more, "catalog page loaded");
                    (
                        CatalogEvent::Updated {
                            appended: count,
                            total,
                            has_more,
                        },
                        PageOutcome::Appended { count },
                    )
                }
                Err(e) => {
                    warn!(error = %e, "catalog page fetch failed");
                    (CatalogEvent::Error(e), PageOutcome::Failed)
                }
            }
        };

        self.emit(event);
        self.emit(CatalogEvent::LoadingChanged(false));
        outcome
    }

    fn emit(&self, event: CatalogEvent) {
        // The receiver may have been taken and dropped; events are advisory.
        let _ = self.events_tx.send(event);
    }
}
