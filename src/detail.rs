use crate::models::{MovieDetail, WatchedEntry};

/// State for the single selected movie: the fetched record, the rating the
/// user is converging on, and how many times they changed their mind getting
/// there. Everything resets when a new id is selected.
///
/// Detail fetches use the same two-phase protocol as the browser: `select`
/// arms the slot, the driver calls the catalog, `complete_fetch` applies the
/// outcome. A stale response for a superseded selection still lands — last
/// completed wins.
#[derive(Debug, Default)]
pub struct MovieDetailLoader {
    selected_id: Option<String>,
    detail: Option<MovieDetail>,
    loading: bool,
    user_rating: Option<u8>,
    rating_revision_count: u32,
    confirmed: bool,
}

impl MovieDetailLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.detail.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn user_rating(&self) -> Option<u8> {
        self.user_rating
    }

    pub fn rating_revision_count(&self) -> u32 {
        self.rating_revision_count
    }

    /// Whether the current selection was already confirmed into the watched
    /// list during this viewing.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Arms the slot for a new selection. All per-selection state resets,
    /// including the revision counter.
    pub fn select(&mut self, id: impl Into<String>) -> String {
        let id = id.into();
        self.selected_id = Some(id.clone());
        self.detail = None;
        self.loading = true;
        self.user_rating = None;
        self.rating_revision_count = 0;
        self.confirmed = false;
        id
    }

    /// Deselects the movie entirely.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Applies a completed detail fetch; `None` records a failed fetch and
    /// leaves the slot showing nothing.
    pub fn complete_fetch(&mut self, detail: Option<MovieDetail>) {
        self.detail = detail;
        self.loading = false;
    }

    /// Records the user's current rating choice. Every change to a new value
    /// bumps the revision counter; re-picking the same value does not.
    pub fn set_rating(&mut self, rating: u8) {
        if self.user_rating == Some(rating) {
            return;
        }
        self.user_rating = Some(rating);
        self.rating_revision_count += 1;
    }

    /// Builds the watched entry for the loaded movie from the chosen rating
    /// and the revision counter. Calling this without a loaded detail or a
    /// chosen rating is a caller bug, not a runtime condition.
    pub fn confirm_rating(&mut self) -> WatchedEntry {
        let detail = self
            .detail
            .as_ref()
            .expect("confirm_rating called before detail loaded");
        let rating = self
            .user_rating
            .expect("confirm_rating called without a rating");
        debug_assert!((1..=10).contains(&rating));
        self.confirmed = true;
        WatchedEntry {
            id: detail.id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            imdb_rating: detail.imdb_rating,
            runtime_minutes: detail.runtime_minutes,
            user_rating: rating,
            rating_revision_count: self.rating_revision_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: &str) -> MovieDetail {
        MovieDetail {
            id: id.to_string(),
            title: format!("Movie {}", id),
            year: "2023".to_string(),
            poster_url: "N/A".to_string(),
            runtime_minutes: 136,
            imdb_rating: 8.5,
            plot: String::new(),
            released: String::new(),
            actors: String::new(),
            director: String::new(),
            genre: String::new(),
        }
    }

    #[test]
    fn select_arms_the_slot() {
        let mut loader = MovieDetailLoader::new();
        loader.select("tt1");
        assert_eq!(loader.selected_id(), Some("tt1"));
        assert!(loader.is_loading());
        assert!(loader.detail().is_none());
    }

    #[test]
    fn revision_counter_counts_changes_of_mind() {
        let mut loader = MovieDetailLoader::new();
        loader.select("tt1");
        loader.complete_fetch(Some(detail("tt1")));

        loader.set_rating(3);
        loader.set_rating(7);
        let entry = loader.confirm_rating();
        assert_eq!(entry.rating_revision_count, 2);
        assert_eq!(entry.user_rating, 7);
        assert!(loader.is_confirmed());
    }

    #[test]
    fn repicking_the_same_rating_does_not_count() {
        let mut loader = MovieDetailLoader::new();
        loader.select("tt1");
        loader.set_rating(5);
        loader.set_rating(5);
        assert_eq!(loader.rating_revision_count(), 1);
    }

    #[test]
    fn counter_resets_on_new_selection() {
        let mut loader = MovieDetailLoader::new();
        loader.select("tt1");
        loader.set_rating(3);
        loader.set_rating(8);
        loader.select("tt2");
        assert_eq!(loader.rating_revision_count(), 0);
        assert_eq!(loader.user_rating(), None);
        assert!(!loader.is_confirmed());
    }

    #[test]
    fn stale_completion_still_lands() {
        // Selecting a new movie does not cancel the outstanding fetch; its
        // late completion overwrites the slot.
        let mut loader = MovieDetailLoader::new();
        loader.select("tt1");
        loader.select("tt2");
        loader.complete_fetch(Some(detail("tt2")));
        loader.complete_fetch(Some(detail("tt1")));
        assert_eq!(loader.detail().unwrap().id, "tt1");
    }

    #[test]
    fn entry_copies_the_loaded_detail() {
        let mut loader = MovieDetailLoader::new();
        loader.select("tt1");
        loader.complete_fetch(Some(detail("tt1")));
        loader.set_rating(9);
        let entry = loader.confirm_rating();
        assert_eq!(entry.id, "tt1");
        assert_eq!(entry.runtime_minutes, 136);
        assert_eq!(entry.imdb_rating, 8.5);
    }
}
