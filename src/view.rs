//! Search form state.
//!
//! A search runs in three steps so the owner of the view can release it while
//! the request is in flight:
//!
//! 1. [`SearchView::begin_search`] validates the term and flips the loading flags.
//! 2. [`PendingSearch::run`] performs the backend call without touching the view.
//! 3. [`SearchView::complete`] applies the outcome, unless a newer search has
//!    started since, in which case the outcome is dropped.
//!
//! [`SearchView::search`] chains the three for callers holding the view exclusively.

use crate::client::CreditoApi;
use crate::errors::ClientError;
use crate::models::{Credito, SearchMode};

/// Shown when the search term is empty or blank.
pub const EMPTY_QUERY_MESSAGE: &str = "Digite um número para buscar";

#[derive(Debug, Clone, Default)]
pub struct SearchView {
    pub results: Vec<Credito>,
    pub is_loading: bool,
    pub error_message: String,
    pub search_mode: SearchMode,
    pub query_text: String,
    /// Sequence number of the most recently started search.
    latest_seq: u64,
}

/// A validated search waiting to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    seq: u64,
    pub mode: SearchMode,
    pub query: String,
}

/// Backend answer for a [`PendingSearch`], normalised to a list.
#[derive(Debug)]
pub struct SearchOutcome {
    seq: u64,
    mode: SearchMode,
    result: Result<Vec<Credito>, ClientError>,
}

impl PendingSearch {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Sends the lookup for this search's mode.
    pub async fn run<A>(self, api: &A) -> SearchOutcome
    where
        A: CreditoApi + ?Sized,
    {
        let result = match self.mode {
            SearchMode::Nfse => api.fetch_by_nfse(&self.query).await,
            SearchMode::Credito => api
                .fetch_by_credit_number(&self.query)
                .await
                .map(|credito| vec![credito]),
        };

        if let Err(ref e) = result {
            tracing::warn!(
                "Search #{} ({} = {:?}) failed: {}",
                self.seq,
                self.mode,
                self.query,
                e
            );
        }

        SearchOutcome {
            seq: self.seq,
            mode: self.mode,
            result,
        }
    }
}

impl SearchOutcome {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn result(&self) -> &Result<Vec<Credito>, ClientError> {
        &self.result
    }
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query_text = query.into();
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.search_mode = mode;
    }

    /// Validates the term and moves the view into the loading state.
    ///
    /// Returns `None` (with the validation message set) for a blank term.
    /// Every accepted search supersedes any search still in flight.
    pub fn begin_search(&mut self) -> Option<PendingSearch> {
        if self.query_text.trim().is_empty() {
            self.error_message = EMPTY_QUERY_MESSAGE.to_string();
            return None;
        }

        self.is_loading = true;
        self.error_message.clear();
        self.results.clear();
        self.latest_seq += 1;

        tracing::debug!(
            "Starting search #{} ({} = {:?})",
            self.latest_seq,
            self.search_mode,
            self.query_text
        );

        Some(PendingSearch {
            seq: self.latest_seq,
            mode: self.search_mode,
            query: self.query_text.clone(),
        })
    }

    /// Applies a finished search. Returns `false` if the outcome was stale and dropped.
    pub fn complete(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.seq != self.latest_seq {
            tracing::debug!(
                "Dropping stale search #{} (latest is #{})",
                outcome.seq,
                self.latest_seq
            );
            return false;
        }

        match outcome.result {
            Ok(creditos) => {
                self.results = creditos;
            }
            Err(e) => {
                self.error_message = e
                    .backend_message()
                    .unwrap_or_else(|| outcome.mode.fallback_error())
                    .to_string();
            }
        }
        self.is_loading = false;
        true
    }

    /// Runs a full search against `api`.
    pub async fn search<A>(&mut self, api: &A)
    where
        A: CreditoApi + ?Sized,
    {
        if let Some(pending) = self.begin_search() {
            let outcome = pending.run(api).await;
            self.complete(outcome);
        }
    }

    /// Resets results, error and term. Mode and loading flag are kept.
    pub fn clear(&mut self) {
        self.results.clear();
        self.error_message.clear();
        self.query_text.clear();
    }
}
