use crate::browser::{CatalogBrowser, FetchTicket};
use crate::catalog::{CatalogApi, OmdbClient};
use crate::detail::MovieDetailLoader;
use crate::error::CatalogError;
use crate::models::{MovieDetail, MovieSummary, WatchedEntry};
use crate::store::PersistentStore;
use crate::watched::{WatchedListStore, WatchedSummary};
use anyhow::Result;
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Presentation-side effects the state layer triggers: window title while a
/// detail view is open, scroll position on navigation. The UI collaborator
/// implements these; every method defaults to a no-op.
pub trait ShellHooks: Send {
    fn set_title(&self, _title: &str) {}
    fn restore_title(&self) {}
    fn scroll_to_top(&self) {}
}

/// Hooks for collaborators that do not care about window chrome.
pub struct NullHooks;

impl ShellHooks for NullHooks {}

/// The client-side core: catalog browsing, the selected movie, and the
/// watched list, wired together behind the operations the presentation layer
/// is allowed to call. Catalog errors never escape this boundary — they
/// collapse into empty results or an empty detail slot, with a warning.
pub struct App {
    catalog: Arc<dyn CatalogApi>,
    hooks: Box<dyn ShellHooks>,
    browser: CatalogBrowser,
    loader: MovieDetailLoader,
    watched: WatchedListStore,
    last_issued: Option<FetchTicket>,
}

impl App {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        store: PersistentStore,
        hooks: Box<dyn ShellHooks>,
    ) -> Self {
        Self {
            catalog,
            hooks,
            browser: CatalogBrowser::new(),
            loader: MovieDetailLoader::new(),
            watched: WatchedListStore::open(store),
            last_issued: None,
        }
    }

    /// Initial load: the default discovery query, before the user has typed
    /// anything.
    pub async fn start(&mut self) {
        self.refresh_browser(true).await;
    }

    // --- catalog browsing ---

    pub async fn set_query(&mut self, text: &str) {
        self.browser.set_query(text);
        self.refresh_browser(false).await;
    }

    pub async fn submit_search(&mut self) {
        if self.browser.submit() {
            self.hooks.scroll_to_top();
        }
        self.refresh_browser(false).await;
    }

    pub async fn next_page(&mut self) {
        self.browser.next_page();
        self.hooks.scroll_to_top();
        self.refresh_browser(false).await;
    }

    pub async fn prev_page(&mut self) {
        self.browser.prev_page();
        self.hooks.scroll_to_top();
        self.refresh_browser(false).await;
    }

    pub async fn first_page(&mut self) {
        self.browser.first_page();
        self.hooks.scroll_to_top();
        self.refresh_browser(false).await;
    }

    /// Logo click: back to the default discovery view. Always refetches,
    /// even if the browser was already on the landing state.
    pub async fn reset_to_default(&mut self) {
        self.browser.reset_to_default();
        self.hooks.scroll_to_top();
        self.refresh_browser(true).await;
    }

    /// Issues one search per change of the (query, page) pair. A failed
    /// search shows an empty result list; the user retries by searching
    /// again.
    async fn refresh_browser(&mut self, force: bool) {
        let due = FetchTicket {
            query: self.browser.query_text().to_string(),
            page: self.browser.page_number(),
        };
        if !force && self.last_issued.as_ref() == Some(&due) {
            return;
        }
        let ticket = self.browser.begin_fetch();
        self.last_issued = Some(ticket.clone());
        let results = match self.catalog.search(&ticket.query, ticket.page).await {
            Ok(results) => results,
            Err(e) => {
                warn!(
                    "Catalog search '{}' page {} failed: {}",
                    ticket.query, ticket.page, e
                );
                Vec::new()
            }
        };
        self.browser.complete_fetch(&ticket, results);
    }

    // --- movie detail ---

    pub async fn select_movie(&mut self, id: &str) {
        let id = self.loader.select(id);
        let detail = match self.catalog.fetch_detail(&id).await {
            Ok(detail) => Some(detail),
            Err(CatalogError::NotFound(_)) => {
                warn!("Movie {} not found in catalog", id);
                None
            }
            Err(e) => {
                warn!("Detail fetch for {} failed: {}", id, e);
                None
            }
        };
        if let Some(d) = &detail {
            self.hooks.set_title(&d.title);
        }
        self.loader.complete_fetch(detail);
    }

    pub fn close_detail(&mut self) {
        self.loader.clear();
        self.hooks.restore_title();
    }

    pub fn set_rating(&mut self, rating: u8) {
        self.loader.set_rating(rating);
    }

    /// Confirms the pending rating: builds the entry from the loaded detail
    /// and appends it to the watched list.
    pub fn add_watched_from_detail(&mut self) -> WatchedEntry {
        let entry = self.loader.confirm_rating();
        self.add_watched(entry.clone());
        entry
    }

    pub fn add_watched(&mut self, entry: WatchedEntry) {
        if let Err(e) = self.watched.add(entry) {
            warn!("Watched list not persisted: {}", e);
        }
    }

    pub fn delete_watched(&mut self, id: &str) {
        if let Err(e) = self.watched.remove(id) {
            warn!("Watched list not persisted: {}", e);
        }
    }

    // --- read accessors for the collaborator ---

    pub fn query_text(&self) -> &str {
        self.browser.query_text()
    }

    pub fn page_number(&self) -> u32 {
        self.browser.page_number()
    }

    pub fn results(&self) -> &[MovieSummary] {
        self.browser.results()
    }

    pub fn is_searching(&self) -> bool {
        self.browser.is_loading()
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.loader.detail()
    }

    pub fn is_detail_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn user_rating(&self) -> Option<u8> {
        self.loader.user_rating()
    }

    pub fn rating_revision_count(&self) -> u32 {
        self.loader.rating_revision_count()
    }

    pub fn is_confirmed(&self) -> bool {
        self.loader.is_confirmed()
    }

    pub fn watched(&self) -> &[WatchedEntry] {
        self.watched.entries()
    }

    pub fn watched_summary(&self) -> WatchedSummary {
        self.watched.summary()
    }

    pub fn is_watched(&self, id: &str) -> bool {
        self.watched.contains(id)
    }

    pub fn watched_rating_for(&self, id: &str) -> Option<u8> {
        self.watched.rating_for(id)
    }
}

/// Entry point for the binary: wires the real client and store, then drives
/// the core from a small line shell standing in for the UI layer.
pub async fn run() -> Result<()> {
    let catalog: Arc<dyn CatalogApi> = Arc::new(OmdbClient::from_env()?);
    let data_dir = env::var("WALLFLIX_DATA_DIR")
        .map(Into::into)
        .unwrap_or_else(|_| PersistentStore::default_dir());
    info!("Storing watched list under {:?}", data_dir);
    let store = PersistentStore::open(data_dir)?;
    let mut app = App::new(catalog, store, Box::new(NullHooks));

    app.start().await;
    print_results(&app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_help();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
        match cmd {
            "search" => {
                app.set_query(arg).await;
                app.submit_search().await;
                print_results(&app);
            }
            "next" => {
                app.next_page().await;
                print_results(&app);
            }
            "prev" => {
                app.prev_page().await;
                print_results(&app);
            }
            "first" => {
                app.first_page().await;
                print_results(&app);
            }
            "home" => {
                app.reset_to_default().await;
                print_results(&app);
            }
            "open" => match arg.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                Some(idx) if idx < app.results().len() => {
                    let id = app.results()[idx].id.clone();
                    app.select_movie(&id).await;
                    print_detail(&app);
                }
                _ => println!("open <n> picks a result by its list number"),
            },
            "rate" => match arg.parse::<u8>() {
                Ok(r @ 1..=10) => {
                    app.set_rating(r);
                    println!("rating set to {}", r);
                }
                _ => println!("rate <1-10>"),
            },
            "add" => {
                let watchable = app.detail().map(|d| d.id.clone());
                match watchable {
                    Some(id) if app.is_watched(&id) => {
                        println!(
                            "already watched (your rating: {})",
                            app.watched_rating_for(&id).unwrap_or(0)
                        );
                    }
                    Some(_) if app.user_rating().is_some() => {
                        let entry = app.add_watched_from_detail();
                        println!("added '{}' with rating {}", entry.title, entry.user_rating);
                    }
                    Some(_) => println!("rate the movie first"),
                    None => println!("open a movie first"),
                }
            }
            "back" => {
                app.close_detail();
                print_results(&app);
            }
            "watched" => print_watched(&app),
            "rm" => {
                app.delete_watched(arg);
                print_watched(&app);
            }
            "stats" => print_stats(&app),
            "quit" | "exit" => break,
            "" => {}
            _ => print_help(),
        }
    }
    Ok(())
}

fn print_help() {
    println!(
        "commands: search <text> | next | prev | first | home | open <n> | \
         rate <1-10> | add | back | watched | rm <id> | stats | quit"
    );
}

fn print_results(app: &App) {
    println!(
        "page {} — {} results for '{}'",
        app.page_number(),
        app.results().len(),
        app.query_text()
    );
    for (i, movie) in app.results().iter().enumerate() {
        println!("{:>3}. {} ({}) [{}]", i + 1, movie.title, movie.year, movie.id);
    }
}

fn print_detail(app: &App) {
    match app.detail() {
        Some(d) => {
            println!("{} ({}) — {} min, IMDb {}", d.title, d.year, d.runtime_minutes, d.imdb_rating);
            println!("{} | {}", d.released, d.genre);
            println!("{}", d.plot);
            println!("Starring {} — directed by {}", d.actors, d.director);
        }
        None => println!("no detail available"),
    }
}

fn print_watched(app: &App) {
    println!("{} watched", app.watched().len());
    for entry in app.watched() {
        println!(
            "  {} ({}) — you: {}, IMDb: {}, {} min [{}]",
            entry.title,
            entry.year,
            entry.user_rating,
            entry.imdb_rating,
            entry.runtime_minutes,
            entry.id
        );
    }
}

fn print_stats(app: &App) {
    let summary = app.watched_summary();
    println!(
        "{} movies — IMDb {:.2}, yours {:.2}, {:.0} min avg",
        summary.count,
        summary.mean_imdb_rating,
        summary.mean_user_rating,
        summary.mean_runtime_minutes
    );
}
