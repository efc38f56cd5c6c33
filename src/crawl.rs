use std::collections::HashMap;
use std::sync::Arc;

use seocrawl_core::{urltools, CrawlConfig, CrawlError, CrawlResult, PageData};
use seocrawl_fetch::Fetcher;
use seocrawl_frontier::{CrawlFrontier, FrontierEntry};
use seocrawl_parser::{content_hash, parse_html, parse_sitemap, RobotsRules};
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info};
use url::Url;

/// Invoked once per emitted `PageData`, from whichever worker task
/// produced it. Implementations must be `Send + Sync`; the CLI's own
/// implementation is responsible for its own synchronization.
pub type ProgressCallback = Arc<dyn Fn(&PageData) + Send + Sync>;

#[derive(Default)]
struct Accumulator {
    pages: Vec<PageData>,
    edges: Vec<(String, String)>,
    duplicate_map: HashMap<String, Vec<String>>,
}

/// Drives a single-host crawl to completion: robots/sitemap seeding, a
/// bounded worker pool pulling from the shared frontier, and the
/// duplicate/edge/broken-link bookkeeping that becomes the final
/// `CrawlResult`.
pub struct CrawlManager {
    base_url: Url,
    max_depth: u32,
    threads: usize,
    user_agent: String,
    frontier: Arc<CrawlFrontier>,
    fetcher: Arc<Fetcher>,
    acc: Arc<Mutex<Accumulator>>,
    progress: Option<ProgressCallback>,
}

impl CrawlManager {
    pub fn new(config: CrawlConfig, progress: Option<ProgressCallback>) -> Result<Self, CrawlError> {
        if config.threads == 0 {
            return Err(CrawlError::Config("threads must be at least 1".into()));
        }
        let parsed = Url::parse(&config.base_url)
            .map_err(|e| CrawlError::Config(format!("invalid base_url: {e}")))?;
        let base_url = urltools::canonicalize(&parsed);
        let timeout = config.timeout();

        Ok(Self {
            max_depth: config.max_depth,
            threads: config.threads,
            user_agent: config.user_agent.clone(),
            fetcher: Arc::new(Fetcher::new(config.user_agent, timeout)),
            frontier: Arc::new(CrawlFrontier::new()),
            acc: Arc::new(Mutex::new(Accumulator::default())),
            progress,
            base_url,
        })
    }

    pub async fn crawl(&self) -> CrawlResult {
        self.frontier
            .try_enqueue(self.base_url.clone(), 0, None)
            .await;

        let robots = Arc::new(self.fetch_robots().await);
        self.seed_sitemap().await;

        let semaphore = Arc::new(Semaphore::new(self.threads));
        let mut workers = Vec::with_capacity(self.threads);
        for worker_id in 0..self.threads {
            let frontier = self.frontier.clone();
            let fetcher = self.fetcher.clone();
            let robots = robots.clone();
            let acc = self.acc.clone();
            let progress = self.progress.clone();
            let base_url = self.base_url.clone();
            let semaphore = semaphore.clone();
            let max_depth = self.max_depth;

            workers.push(tokio::spawn(async move {
                debug!(worker_id, "worker started");
                while let Some(entry) = frontier.pop().await {
                    process_entry(
                        entry,
                        &base_url,
                        max_depth,
                        &frontier,
                        &fetcher,
                        &robots,
                        &acc,
                        progress.as_ref(),
                        &semaphore,
                    )
                    .await;
                    frontier.task_done().await;
                }
                debug!(worker_id, "worker drained");
            }));
        }

        for worker in workers {
            let _ = worker.await;
        }
        self.fetcher.close().await;

        let acc = self.acc.lock().await;
        let duplicate_map: HashMap<String, Vec<String>> = acc
            .duplicate_map
            .iter()
            .filter(|(_, urls)| urls.len() >= 2)
            .map(|(hash, urls)| (hash.clone(), urls.clone()))
            .collect();
        let broken_links = acc.pages.iter().filter(|p| p.is_broken()).cloned().collect();

        CrawlResult {
            pages: acc.pages.clone(),
            edges: acc.edges.clone(),
            duplicate_map,
            broken_links,
        }
    }

    async fn fetch_robots(&self) -> RobotsRules {
        let mut robots_url = self.base_url.clone();
        robots_url.set_path("/robots.txt");
        let result = self.fetcher.fetch(&robots_url).await;
        match (&result.error, &result.body) {
            (None, Some(body)) => {
                let text = String::from_utf8_lossy(body).into_owned();
                RobotsRules::build(&self.user_agent, Some(&text))
            }
            _ => {
                debug!(url = %robots_url, "no usable robots.txt, defaulting to permissive");
                RobotsRules::permissive()
            }
        }
    }

    async fn seed_sitemap(&self) {
        let mut sitemap_url = self.base_url.clone();
        sitemap_url.set_path("/sitemap.xml");
        let result = self.fetcher.fetch(&sitemap_url).await;
        let Some(status) = result.status else { return };
        if status >= 400 {
            return;
        }
        let Some(body) = result.body else { return };
        let text = String::from_utf8_lossy(&body).into_owned();
        let urls = parse_sitemap(&self.base_url, &text);
        let mut added = 0;
        for url in urls {
            if !urltools::allowed_scheme(&url) || !urltools::same_host(&url, &self.base_url) {
                continue;
            }
            if self.frontier.try_enqueue(url, 0, None).await {
                added += 1;
            }
        }
        if added > 0 {
            info!(added, "seeded URLs from sitemap.xml");
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn process_entry(
    entry: FrontierEntry,
    base_url: &Url,
    max_depth: u32,
    frontier: &CrawlFrontier,
    fetcher: &Fetcher,
    robots: &RobotsRules,
    acc: &Mutex<Accumulator>,
    progress: Option<&ProgressCallback>,
    semaphore: &Semaphore,
) {
    let FrontierEntry { url, depth, source } = entry;

    if !frontier.mark_visited(&url).await {
        return;
    }

    if !robots.allows(url.as_str()) {
        debug!(url = %url, "robots disallow, skipping fetch");
        return;
    }

    if depth > max_depth {
        debug!(url = %url, depth, max_depth, "beyond max depth, skipping fetch");
        return;
    }

    if let Some(src) = &source {
        let mut acc = acc.lock().await;
        acc.edges.push((src.clone(), url.to_string()));
    }

    let _permit = semaphore.acquire().await;
    let result = fetcher.fetch(&url).await;
    drop(_permit);

    let mut page = PageData {
        url: url.to_string(),
        status: result.status,
        title: None,
        meta_description: None,
        canonical: None,
        headings: Vec::new(),
        internal_links: Vec::new(),
        external_links: Vec::new(),
        h1_count: 0,
        content_hash: None,
        response_time: result.elapsed.as_secs_f64(),
        redirect_target: result.redirected_url.as_ref().map(Url::to_string),
        error: result.error.clone(),
    };

    let mut discovered: Vec<Url> = Vec::new();

    if let Some(body) = &result.body {
        let hash = content_hash(body);
        {
            let mut acc = acc.lock().await;
            acc.duplicate_map.entry(hash.clone()).or_default().push(url.to_string());
        }
        page.content_hash = Some(hash);

        let should_parse = result
            .content_type()
            .map(|ct| {
                let media_type = ct.split(';').next().unwrap_or("").to_lowercase();
                media_type.is_empty() || media_type.contains("html")
            })
            .unwrap_or(true);

        if should_parse {
            let body_str = String::from_utf8_lossy(body);
            let parsed = parse_html(&url, base_url, &body_str);
            page.h1_count = parsed
                .headings
                .iter()
                .filter(|(tag, _)| tag == "h1")
                .count();
            page.title = parsed.title;
            page.meta_description = parsed.meta_description;
            page.canonical = parsed.canonical;
            page.headings = parsed.headings;
            page.external_links = parsed.external_links;

            for link in &parsed.internal_links {
                if let Ok(link_url) = Url::parse(link) {
                    discovered.push(link_url);
                }
            }
            page.internal_links = parsed.internal_links;
        }
    }

    {
        let mut acc = acc.lock().await;
        acc.pages.push(page.clone());
    }
    if let Some(cb) = progress {
        cb(&page);
    }

    // No depth gate here: a link is always enqueued at depth+1 once this
    // page was fetched and parsed. The depth cap is enforced on dequeue
    // (above), so links past max_depth are enqueued but never fetched.
    for link in discovered {
        if !urltools::allowed_scheme(&link) || !urltools::same_host(&link, base_url) {
            continue;
        }
        frontier
            .try_enqueue(link, depth + 1, Some(url.to_string()))
            .await;
    }
}
