use serde::{Deserialize, Serialize};

/// One row of a catalog search result. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    /// Four-digit year, or a range like "2019-2022" for series.
    pub year: String,
    /// Poster URL, or the catalog's literal "N/A" placeholder.
    pub poster_url: String,
}

/// Full record for a single selected movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub runtime_minutes: u32,
    pub imdb_rating: f32,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

/// A movie the user rated and added to their watched list. The serialized
/// form is what lands in durable storage, hence the camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedEntry {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub imdb_rating: f32,
    pub runtime_minutes: u32,
    /// 1-10, chosen by the user.
    pub user_rating: u8,
    /// How many times the user changed their rating before confirming.
    pub rating_revision_count: u32,
}
