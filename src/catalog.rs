use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use tracing::debug;

use crate::error::CatalogError;
use crate::models::{MovieDetail, MovieSummary};

const OMDB_BASE: &str = "https://www.omdbapi.com/";

/// Query substituted when the user has not typed anything yet.
const DEFAULT_DISCOVERY_QUERY: &str = "2023";

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    pub base_url: String,
    pub default_discovery_query: String,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OMDB_API_KEY").context("OMDB_API_KEY not set")?;
        let base_url = env::var("OMDB_BASE_URL").unwrap_or_else(|_| OMDB_BASE.to_string());
        Ok(Self {
            api_key,
            base_url,
            default_discovery_query: DEFAULT_DISCOVERY_QUERY.to_string(),
        })
    }
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<MovieSummary>, CatalogError>;
    async fn fetch_detail(&self, id: &str) -> Result<MovieDetail, CatalogError>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    config: CatalogConfig,
}

impl OmdbClient {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(CatalogConfig::from_env()?))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, CatalogError> {
        let res = self.client.get(url).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Transient(format!("{} -> {}", status, text)));
        }
        serde_json::from_str(&text)
            .map_err(|e| CatalogError::Transient(format!("bad catalog payload: {}", e)))
    }
}

#[async_trait]
impl CatalogApi for OmdbClient {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<MovieSummary>, CatalogError> {
        let effective = if query.trim().is_empty() {
            self.config.default_discovery_query.as_str()
        } else {
            query
        };
        let url = format!(
            "{}?apikey={}&s={}&page={}",
            self.config.base_url,
            self.config.api_key,
            urlencoding::encode(effective),
            page
        );
        let data: SearchResponse = self.get_json(&url).await?;
        if data.response != "True" {
            debug!(
                "Catalog search '{}' page {} came back empty ({})",
                effective,
                page,
                data.error.as_deref().unwrap_or("no detail")
            );
            return Ok(Vec::new());
        }
        let mut results: Vec<MovieSummary> = data
            .search
            .into_iter()
            .map(|item| MovieSummary {
                id: item.imdb_id,
                title: item.title,
                year: item.year,
                poster_url: item.poster,
            })
            .collect();
        sort_newest_first(&mut results);
        Ok(results)
    }

    async fn fetch_detail(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        let url = format!(
            "{}?apikey={}&i={}",
            self.config.base_url,
            self.config.api_key,
            urlencoding::encode(id)
        );
        let data: DetailResponse = self.get_json(&url).await?;
        if data.response != "True" {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        let runtime_minutes = parse_runtime_minutes(&data.runtime).ok_or_else(|| {
            CatalogError::Transient(format!("unparseable runtime '{}' for {}", data.runtime, id))
        })?;
        Ok(MovieDetail {
            id: id.to_string(),
            title: data.title,
            year: data.year,
            poster_url: data.poster,
            runtime_minutes,
            imdb_rating: parse_imdb_rating(&data.imdb_rating),
            plot: data.plot,
            released: data.released,
            actors: data.actors,
            director: data.director,
            genre: data.genre,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<SearchItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Poster")]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Genre", default)]
    genre: String,
}

/// Newest first. `sort_by` is stable, so titles sharing a year keep the
/// catalog's relative order.
fn sort_newest_first(results: &mut [MovieSummary]) {
    results.sort_by(|a, b| b.year.cmp(&a.year));
}

/// Extracts the leading integer of a free-text runtime like "136 min".
fn parse_runtime_minutes(runtime: &str) -> Option<u32> {
    runtime.split_whitespace().next()?.parse().ok()
}

/// The catalog reports "N/A" for unrated titles; treat those as 0 so the
/// value stays a plain number downstream.
fn parse_imdb_rating(raw: &str) -> f32 {
    raw.parse().unwrap_or(0.0)
}
