//! Card search API integration and pagination.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::domain::{PipelineConfig, RawCard};
use crate::error::AppError;

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    pub data: Vec<RawCard>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub total_cards: Option<u64>,
}

/// Anything that can fetch a search page by URL.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> Result<SearchPage, AppError>;
}

pub struct ScryfallClient {
    client: Client,
}

impl ScryfallClient {
    pub fn new(config: &PipelineConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| AppError::new(2, format!("Invalid user agent '{}': {e}", config.user_agent)))?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl PageSource for ScryfallClient {
    fn fetch_page(&self, url: &str) -> Result<SearchPage, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(4, format!("Search request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Search request failed with status {}.", resp.status()),
            ));
        }

        resp.json()
            .map_err(|e| AppError::new(4, format!("Failed to parse search response: {e}")))
    }
}

/// Cards accumulated by a pagination run.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Cards in page order.
    pub cards: Vec<RawCard>,
    pub pages: usize,
    /// Set when pagination stopped on an error; `cards` holds what came before it.
    pub error: Option<String>,
}

impl Extraction {
    pub fn is_partial(&self) -> bool {
        self.error.is_some() && !self.cards.is_empty()
    }
}

/// Walk the search result pages starting at `first_url`.
///
/// A failed request ends pagination without retrying; cards from earlier
/// pages are kept.
pub fn extract_cards(source: &dyn PageSource, first_url: &str, delay: Duration) -> Extraction {
    let mut out = Extraction::default();
    let mut next = Some(first_url.to_string());

    while let Some(url) = next.take() {
        debug!(%url, "requesting search page");
        let page = match source.fetch_page(&url) {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, pages = out.pages, "card search aborted");
                out.error = Some(e.to_string());
                break;
            }
        };

        out.pages += 1;
        out.cards.extend(page.data);

        if !page.has_more {
            break;
        }
        match page.next_page {
            Some(next_url) => {
                info!(
                    cards = out.cards.len(),
                    total = ?page.total_cards,
                    "fetching next page"
                );
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                next = Some(next_url);
            }
            None => {
                let msg = "Search response has more pages but no next_page URL.".to_string();
                error!(pages = out.pages, "{msg}");
                out.error = Some(msg);
            }
        }
    }

    out
}
