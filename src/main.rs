mod cli;
mod crawl;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use seocrawl_core::CrawlConfig;

use crate::cli::{Cli, Commands};
use crate::crawl::CrawlManager;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_str = std::fs::read_to_string(&cli.config).unwrap_or_else(|_| {
        warn!(path = %cli.config, "config file not found, using defaults");
        include_str!("../config/default.toml").to_string()
    });
    let mut config: CrawlConfig = toml::from_str(&config_str)?;

    match cli.command {
        Commands::Crawl {
            url,
            depth,
            threads,
            user_agent,
            timeout,
        } => {
            config.base_url = url;
            if let Some(d) = depth {
                config.max_depth = d;
            }
            if let Some(t) = threads {
                config.threads = t;
            }
            if let Some(ua) = user_agent {
                config.user_agent = ua;
            }
            if let Some(t) = timeout {
                config.timeout_seconds = t;
            }

            let pages_done = Arc::new(AtomicU64::new(0));
            let broken_done = Arc::new(AtomicU64::new(0));
            let progress_pages = pages_done.clone();
            let progress_broken = broken_done.clone();
            let progress: crawl::ProgressCallback = Arc::new(move |page| {
                let total = progress_pages.fetch_add(1, Ordering::Relaxed) + 1;
                if page.is_broken() {
                    progress_broken.fetch_add(1, Ordering::Relaxed);
                }
                info!(url = %page.url, status = ?page.status, total, "page crawled");
            });

            let manager = CrawlManager::new(config, Some(progress))?;
            let result = manager.crawl().await;

            info!(
                pages = result.pages.len(),
                edges = result.edges.len(),
                duplicate_groups = result.duplicate_map.len(),
                broken = result.broken_links.len(),
                "crawl finished"
            );
        }
    }

    Ok(())
}
