use tracing::debug;

use crate::models::MovieSummary;

/// Snapshot of the (query, page) pair a fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub query: String,
    pub page: u32,
}

/// Catalog browsing state: what the user typed, which page they are on, and
/// the current result list. One instance per browsing session; nothing here
/// is persisted.
///
/// Fetches run in two phases so the driver owns the await point:
/// `begin_fetch` snapshots the pair and raises `loading`, the driver calls
/// the catalog, then `complete_fetch` applies whatever came back. Completion
/// is unconditional — the last response to arrive owns `results`, even if a
/// newer request already landed.
#[derive(Debug, Default)]
pub struct CatalogBrowser {
    query_text: String,
    page_number: u32,
    results: Vec<MovieSummary>,
    loading: bool,
}

impl CatalogBrowser {
    pub fn new() -> Self {
        Self {
            query_text: String::new(),
            page_number: 1,
            results: Vec::new(),
            loading: false,
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn results(&self) -> &[MovieSummary] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query_text = text.into();
    }

    /// Explicit submit. Pages back to 1 only for a non-empty query, mirroring
    /// the submit guard in the collaborating UI; returns whether the guard
    /// passed so the caller can fire its scroll hook.
    pub fn submit(&mut self) -> bool {
        if self.query_text.trim().is_empty() {
            return false;
        }
        self.page_number = 1;
        true
    }

    /// Unconditional: the catalog may legitimately return an empty page past
    /// the end, so there is no upper bound to check against.
    pub fn next_page(&mut self) {
        self.page_number += 1;
    }

    pub fn prev_page(&mut self) {
        self.page_number = self.page_number.saturating_sub(1).max(1);
    }

    pub fn first_page(&mut self) {
        self.page_number = 1;
    }

    /// Back to the landing state: empty query, page 1. The caller re-issues
    /// the default discovery fetch.
    pub fn reset_to_default(&mut self) {
        self.query_text.clear();
        self.page_number = 1;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.loading = true;
        FetchTicket {
            query: self.query_text.clone(),
            page: self.page_number,
        }
    }

    /// Applies a completed fetch, replacing the result list wholesale.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, results: Vec<MovieSummary>) {
        debug!(
            "Applying {} results for '{}' page {}",
            results.len(),
            ticket.query,
            ticket.page
        );
        self.results = results;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> MovieSummary {
        MovieSummary {
            id: id.to_string(),
            title: id.to_string(),
            year: "2023".to_string(),
            poster_url: "N/A".to_string(),
        }
    }

    #[test]
    fn starts_on_page_one_with_no_results() {
        let browser = CatalogBrowser::new();
        assert_eq!(browser.page_number(), 1);
        assert!(browser.results().is_empty());
        assert!(!browser.is_loading());
    }

    #[test]
    fn submit_resets_page_only_for_nonempty_query() {
        let mut browser = CatalogBrowser::new();
        browser.next_page();
        browser.next_page();
        assert_eq!(browser.page_number(), 3);

        browser.set_query("   ");
        assert!(!browser.submit());
        assert_eq!(browser.page_number(), 3);

        browser.set_query("batman");
        assert!(browser.submit());
        assert_eq!(browser.page_number(), 1);
    }

    #[test]
    fn prev_page_floors_at_one() {
        let mut browser = CatalogBrowser::new();
        browser.prev_page();
        assert_eq!(browser.page_number(), 1);
        browser.next_page();
        browser.prev_page();
        assert_eq!(browser.page_number(), 1);
    }

    #[test]
    fn next_page_increments_even_with_empty_results() {
        let mut browser = CatalogBrowser::new();
        let ticket = browser.begin_fetch();
        browser.complete_fetch(&ticket, Vec::new());
        assert!(browser.results().is_empty());
        browser.next_page();
        assert_eq!(browser.page_number(), 2);
    }

    #[test]
    fn reset_clears_query_and_page() {
        let mut browser = CatalogBrowser::new();
        browser.set_query("batman");
        browser.next_page();
        browser.reset_to_default();
        assert_eq!(browser.query_text(), "");
        assert_eq!(browser.page_number(), 1);
    }

    #[test]
    fn fetch_lifecycle_toggles_loading() {
        let mut browser = CatalogBrowser::new();
        let ticket = browser.begin_fetch();
        assert!(browser.is_loading());
        browser.complete_fetch(&ticket, vec![summary("tt1")]);
        assert!(!browser.is_loading());
        assert_eq!(browser.results().len(), 1);
    }

    #[test]
    fn last_completed_response_wins() {
        // Two overlapping searches: "a" issued first but resolving last.
        let mut browser = CatalogBrowser::new();
        browser.set_query("a");
        let ticket_a = browser.begin_fetch();
        browser.set_query("b");
        let ticket_b = browser.begin_fetch();

        browser.complete_fetch(&ticket_b, vec![summary("from-b")]);
        browser.complete_fetch(&ticket_a, vec![summary("from-a")]);

        assert_eq!(browser.results()[0].id, "from-a");
        assert!(!browser.is_loading());
    }
}
