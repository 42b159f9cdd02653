use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cinelist::bookmarks::AddOutcome;
use cinelist::catalog::{CatalogProvider, CatalogSlice, HomeFeed, SliceItems};
use cinelist::config::{self, Config};
use cinelist::error::Result;
use cinelist::trailer::TrailerProvider;
use cinelist::{Bookmark, BookmarkStore, HttpClient, LiveSearch, TmdbGateway, YouTubeGateway};

#[derive(Debug, Parser)]
#[command(name = "cinelist", version, about = "Browse movie and TV catalogs and keep a watch list")]
struct Cli {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Movies trending today
    TrendingMovies,
    /// TV shows trending today
    TrendingTv,
    Popular,
    Upcoming,
    TopRated,
    Discover,
    /// All home sections at once
    Home,
    /// Search movies by title
    Search { query: String },
    /// Search as you type: one query per line on stdin
    LiveSearch,
    /// Look up a trailer for a title
    Trailer { title: String },
    /// Show the saved list
    List,
    /// Save a title to the list
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        overview: String,
        #[arg(long, default_value = "")]
        image_path: String,
    },
    /// Remove the entry at the given position (0-based)
    Remove { index: usize },
}

fn setup_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "cinelist.log");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cinelist=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

fn print_items(items: &SliceItems) {
    match items {
        SliceItems::Movies(movies) => {
            for (i, m) in movies.iter().enumerate() {
                println!("{:>3}. {} ({}) {:.1}", i + 1, m.title, m.release_date, m.vote_average);
            }
        }
        SliceItems::Series(series) => {
            for (i, s) in series.iter().enumerate() {
                println!("{:>3}. {} ({}) {:.1}", i + 1, s.name, s.first_air_date, s.vote_average);
            }
        }
    }
}

fn catalog(config: &Config) -> Result<TmdbGateway> {
    Ok(TmdbGateway::new(HttpClient::new(), &config.metadata)?)
}

async fn run_slice(config: &Config, slice: CatalogSlice) -> Result<()> {
    let gateway = catalog(config)?;
    let items = slice.fetch(&gateway).await?;
    println!("== {} ==", slice.title());
    print_items(&items);
    Ok(())
}

async fn run_live_search(config: &Config) -> Result<()> {
    let provider: Arc<dyn CatalogProvider> = Arc::new(catalog(config)?);
    let search = LiveSearch::new(provider, config.search.debounce_window());
    let mut results = search.subscribe();

    let printer = tokio::spawn(async move {
        while results.changed().await.is_ok() {
            let latest = results.borrow_and_update().clone();
            if latest.query.is_empty() {
                continue;
            }
            println!("== {} ==", latest.query);
            print_items(&SliceItems::Movies(latest.movies));
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        search.on_query_changed(&line);
    }

    // Let the last pending search fire before shutting down.
    tokio::time::sleep(config.search.debounce_window() * 2).await;
    drop(search);
    printer.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = setup_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    info!(command = ?cli.command, "Starting cinelist");

    match cli.command {
        Command::TrendingMovies => run_slice(&config, CatalogSlice::TrendingMovies).await?,
        Command::TrendingTv => run_slice(&config, CatalogSlice::TrendingSeries).await?,
        Command::Popular => run_slice(&config, CatalogSlice::Popular).await?,
        Command::Upcoming => run_slice(&config, CatalogSlice::Upcoming).await?,
        Command::TopRated => run_slice(&config, CatalogSlice::TopRated).await?,
        Command::Discover => run_slice(&config, CatalogSlice::Discover).await?,
        Command::Home => {
            let gateway = catalog(&config)?;
            let feed = HomeFeed::load(&gateway).await;
            for section in &feed.sections {
                println!("== {} ==", section.slice.title());
                match &section.items {
                    Ok(items) => print_items(items),
                    Err(e) => println!("  (unavailable: {})", e),
                }
            }
        }
        Command::Search { query } => {
            if query.trim().is_empty() {
                println!("Nothing to search for.");
                return Ok(());
            }
            let movies = catalog(&config)?.search(&query).await?;
            print_items(&SliceItems::Movies(movies));
        }
        Command::LiveSearch => run_live_search(&config).await?,
        Command::Trailer { title } => {
            let gateway = YouTubeGateway::new(HttpClient::new(), &config.video)?;
            let trailer = gateway.find_trailer(&title).await?;
            match trailer.embed_url() {
                Some(url) => println!("{}", url),
                None => println!("No trailer found for {}", title),
            }
        }
        Command::List => {
            let store = BookmarkStore::open_default()?;
            let list = store.list();
            if list.is_empty() {
                println!("Your list is empty.");
            }
            for (i, b) in list.iter().enumerate() {
                println!("{:>3}. {}", i, b.title);
                if let Some(url) = b.image_url(&config.metadata.image_base_url) {
                    println!("     {}", url);
                }
            }
        }
        Command::Add {
            title,
            overview,
            image_path,
        } => {
            let store = BookmarkStore::open_default()?;
            match store.add(Bookmark::new(title.clone(), overview, image_path))? {
                AddOutcome::Added => println!("{} has been added to your list.", title),
                AddOutcome::AlreadyExists => println!("{} is already in your list.", title),
            }
        }
        Command::Remove { index } => {
            let store = BookmarkStore::open_default()?;
            let removed = store.remove(index)?;
            println!("Removed {}.", removed.title);
        }
    }

    Ok(())
}
