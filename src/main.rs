mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

use cinefeed::prelude::*;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cinefeed=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CatalogConfig::load(cli.config.as_deref())?;
    let app = Cinefeed::new(config)?;

    match cli.command {
        Commands::Tv { keyword, pages } => tv(&app, keyword, pages.max(1)).await,
        Commands::Movies => movies(&app).await,
        Commands::Reviews { id, kind, page } => {
            let reviews = app.reviews(id, kind, page).await.with_context(|| format!("fetching reviews for {} {}", kind, id))?;
            println!("Reviews for {} {} (page {}/{})", kind, id, reviews.page, reviews.total_pages);
            for r in reviews.results {
                let rating = r.rating.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".into());
                println!("- {} [{}] {}", r.author, rating, r.created_at);
                println!("  {}", r.content.replace('\n', " "));
            }
            Ok(())
        }
    }
}

async fn tv(app: &Cinefeed, keyword: String, pages: u32) -> Result<()> {
    let (mut controller, mut out) = app.feed_with(None);
    controller.set_keyword(keyword);
    let mut printed: usize = 0;
    let mut loaded = 1;
    let mut retried = false;
    while let Some(update) = out.tv_list.next().await {
        let items = match update {
            Ok(items) => items,
            // one retry for a failed follow-up page
            Err(e) if loaded > 1 && !retried => {
                tracing::warn!(page = loaded, error = %e, "page failed, retrying");
                retried = true;
                controller.page_failed(loaded);
                match controller.scrolled(printed.saturating_sub(1), printed) {
                    Some(page) => loaded = page,
                    None => break,
                }
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("fetching tv page {}", loaded)),
        };
        let snapshot = Snapshot::from_tv(&items[printed.min(items.len())..]);
        print_snapshot(&snapshot);
        printed = items.len();
        if loaded >= pages || items.is_empty() {
            break;
        }
        // Pretend the user scrolled to the bottom of what is shown.
        match controller.scrolled(items.len() - 1, items.len()) {
            Some(page) => loaded = page,
            None => break,
        }
    }
    Ok(())
}

async fn movies(app: &Cinefeed) -> Result<()> {
    let (mut controller, mut out) = app.feed_with(None);
    controller.switch_kind(ContentKind::Movie);
    let Some(update) = out.movie_list.next().await else { bail!("feed closed before movies arrived") };
    let result = update.context("fetching movie lists")?;
    print_snapshot(&Snapshot::from_movies(&result));
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    for (section, items) in &snapshot.sections {
        if let Some(title) = section.title() {
            println!("== {} ==", title);
        } else if matches!(section, Section::Banner) {
            println!("== Now Playing ==");
        }
        for item in items {
            match item {
                Item::Normal(c) => println!("{:>8}  {}  {}", c.vote, c.title, c.date),
                Item::BigImage(m) => println!("[{}] {}  {}", m.vote, m.title, m.poster_url),
                Item::List(m) => println!("  {}  ({})", m.title, m.release_date),
            }
        }
    }
}
