use clap::Parser;
use log::{error, info};
use splendor_lobby::catalog::{Catalog, CatalogError, WordList};
use splendor_lobby::constants::DEFAULT_PORT;
use splendor_lobby::lobby::{serve, spawn_sweeper, LobbyConfig, SessionPool};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(about = "Serves Splendor games to browsers over HTTP long polling")]
pub struct Args {
    /// The port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Card and noble catalog to use instead of the bundled one
    #[arg(long)]
    cards: Option<PathBuf>,

    /// Word list for game name suggestions instead of the bundled one
    #[arg(long)]
    words: Option<PathBuf>,

    /// Directory holding the browser front end
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Milliseconds between checks of a waiting poll
    #[arg(long)]
    poll_ms: Option<u64>,
}

fn load(args: &Args) -> Result<(Arc<Catalog>, WordList), CatalogError> {
    let catalog = match &args.cards {
        Some(path) => Arc::new(Catalog::load(path)?),
        None => Catalog::standard()?,
    };
    let words = match &args.words {
        Some(path) => WordList::load(path)?,
        None => WordList::standard()?,
    };
    Ok((catalog, words))
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let (catalog, words) = match load(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    };

    let mut config = LobbyConfig::default();
    if let Some(ms) = args.poll_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }

    let pool = Arc::new(SessionPool::new(catalog, words, config));
    spawn_sweeper(pool.clone());

    info!("Listening on port {}", args.port);
    serve(pool, ([0, 0, 0, 0], args.port).into(), args.static_dir.clone()).await;
}
