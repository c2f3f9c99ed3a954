use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cinefeed::types::ContentKind;

/// Browse catalog feeds from the terminal
#[derive(Parser)]
#[command(name = "cinefeed")]
#[command(about = "Fetch, page and print TV and movie listings", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Top rated TV, or a TV search when a keyword is given
    Tv {
        #[arg(short, long, default_value = "")]
        keyword: String,
        /// Number of pages to load by scrolling
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Now playing, popular and upcoming movies
    Movies,
    /// Reviews for one title
    Reviews {
        id: u64,
        #[arg(short, long, default_value = "tv")]
        kind: ContentKind,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
}
