use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Raw outcome of fetching a single URL, independent of whether the body
/// turns out to be HTML.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: Url,
    pub status: Option<u16>,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub elapsed: Duration,
    pub redirected_url: Option<Url>,
    pub error: Option<String>,
}

impl FetchResult {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }
}

/// Everything extracted from a page that parsed as HTML.
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub canonical: Option<String>,
    pub headings: Vec<(String, String)>,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    pub images: Vec<String>,
}

/// The per-URL record emitted by the crawl manager. Stable field identity:
/// exporters and analyzers depend on this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageData {
    pub url: String,
    pub status: Option<u16>,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub canonical: Option<String>,
    pub headings: Vec<(String, String)>,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    pub h1_count: usize,
    pub content_hash: Option<String>,
    pub response_time: f64,
    pub redirect_target: Option<String>,
    pub error: Option<String>,
}

impl PageData {
    pub fn is_broken(&self) -> bool {
        self.status.map(|s| s >= 400).unwrap_or(false)
    }
}

/// Terminal snapshot of a single `crawl()` invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResult {
    pub pages: Vec<PageData>,
    pub edges: Vec<(String, String)>,
    pub duplicate_map: HashMap<String, Vec<String>>,
    pub broken_links: Vec<PageData>,
}
