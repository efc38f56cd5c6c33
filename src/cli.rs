use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "seocrawl", about = "Single-host SEO crawler")]
pub struct Cli {
    /// Path to a TOML config file; missing file falls back to built-in defaults
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl a single host starting from a seed URL
    Crawl {
        /// Seed URL to crawl
        url: String,

        /// Maximum link depth from the seed
        #[arg(short, long)]
        depth: Option<u32>,

        /// Number of concurrent worker tasks
        #[arg(short, long)]
        threads: Option<usize>,

        /// User-Agent header sent with every request
        #[arg(long)]
        user_agent: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}
