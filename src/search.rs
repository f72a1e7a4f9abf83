//! Debounced place search
//!
//! Each edit of the search field cancels the previously scheduled geocode
//! lookup and schedules a new one after a fixed delay. Lookups are numbered;
//! only the result of the most recently scheduled lookup is accepted.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::data::{OpenWeatherClient, SearchResult};
use crate::events::AppEvent;

/// Default pause in typing before a lookup fires
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// State of the search field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Field empty, no results shown
    Idle,
    /// A lookup is scheduled or in flight
    Pending,
    /// The latest lookup has answered
    Resolved,
}

/// Search field with a debounced geocode lookup
pub struct SearchDebouncer {
    client: OpenWeatherClient,
    sender: mpsc::Sender<AppEvent>,
    delay: Duration,
    query: String,
    state: SearchState,
    results: Vec<SearchResult>,
    error: Option<String>,
    selected: usize,
    /// Sequence number of the most recently scheduled lookup
    last_issued: u64,
    scheduled: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    pub fn new(client: OpenWeatherClient, sender: mpsc::Sender<AppEvent>, delay: Duration) -> Self {
        Self {
            client,
            sender,
            delay,
            query: String::new(),
            state: SearchState::Idle,
            results: Vec::new(),
            error: None,
            selected: 0,
            last_issued: 0,
            scheduled: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Error message of the latest lookup, if it failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Appends a typed character
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.on_input();
    }

    /// Removes the last character
    pub fn backspace(&mut self) {
        self.query.pop();
        self.on_input();
    }

    /// Replaces the whole field content
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.on_input();
    }

    /// Handles any change of the field content
    fn on_input(&mut self) {
        self.cancel_pending();

        // Whitespace alone is not a place name
        if self.query.trim().is_empty() {
            self.state = SearchState::Idle;
            self.results.clear();
            self.error = None;
            self.selected = 0;
            return;
        }

        self.state = SearchState::Pending;
        self.last_issued += 1;
        let seq = self.last_issued;
        let query = self.query.trim().to_string();
        let client = self.client.clone();
        let sender = self.sender.clone();
        let delay = self.delay;

        self.scheduled = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(seq, query = %query, "geocode lookup firing");

            let results = client.geocode(&query).await.map_err(|e| {
                warn!(seq, error = %e, "geocode lookup failed");
                e.to_string()
            });
            let _ = sender.send(AppEvent::SearchResults { seq, results }).await;
        }));
    }

    /// Cancels the scheduled lookup, if any
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.scheduled.take() {
            handle.abort();
        }
    }

    /// Applies the result of a lookup
    ///
    /// # Returns
    /// * `true` if the result belongs to the latest lookup and replaced the list
    /// * `false` if it was superseded and discarded
    pub fn accept(&mut self, seq: u64, results: Result<Vec<SearchResult>, String>) -> bool {
        if seq != self.last_issued || self.state != SearchState::Pending {
            debug!(seq, latest = self.last_issued, "discarding stale search results");
            return false;
        }

        self.scheduled = None;
        self.state = SearchState::Resolved;
        self.selected = 0;
        match results {
            Ok(results) => {
                self.results = results;
                self.error = None;
            }
            Err(message) => {
                self.results.clear();
                self.error = Some(message);
            }
        }
        true
    }

    /// Moves the highlighted result down, wrapping to the top
    pub fn select_next(&mut self) {
        let count = self.results.len();
        if count == 0 {
            return;
        }
        self.selected = (self.selected + 1) % count;
    }

    /// Moves the highlighted result up, wrapping to the bottom
    pub fn select_previous(&mut self) {
        let count = self.results.len();
        if count == 0 {
            return;
        }
        if self.selected == 0 {
            self.selected = count - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// The highlighted result, if any
    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.selected)
    }

    /// Dismisses the search: cancels any lookup and discards the field and list
    pub fn dismiss(&mut self) {
        self.cancel_pending();
        self.query.clear();
        self.results.clear();
        self.error = None;
        self.selected = 0;
        self.state = SearchState::Idle;
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
