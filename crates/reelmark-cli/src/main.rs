//! reelmark - movie and TV discovery CLI.

/// Application configuration (TOML).
mod config;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use reelmark_api::image::{DEFAULT_IMAGE_BASE_URL, ImageResolver, ImageSize};
use reelmark_api::tmdb::TmdbClient;
use reelmark_api::{Catalog, ContentDetails, ContentItem, MediaType};
use reelmark_store::views::{browse_page, filter_items};
use reelmark_store::{
    ContentStore, DetailState, DetailView, GenreBrowser, LoadState, MediaFilter, SearchSession,
    SearchSettings, SqliteStorage, WatchListStore,
};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Trending movies and series of the day.
    Trending(ListArgs),
    /// Popular movies and series.
    Popular(ListArgs),
    /// Top-rated movies and series.
    TopRated(ListArgs),
    /// List genres.
    Genres(GenresArgs),
    /// Show the grid of one genre.
    Genre(GenreArgs),
    /// Search movies and series.
    Search(SearchArgs),
    /// Show details of one item.
    Details(ItemArgs),
    /// Show a browse page (hero and carousels).
    Browse(BrowseArgs),
    /// Manage the watch list.
    Watchlist(WatchlistCommand),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Media filter accepted on the command line.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum MediaArg {
    /// Movies and series.
    #[default]
    All,
    /// Movies only.
    Movie,
    /// Series only.
    Tv,
}

impl From<MediaArg> for MediaFilter {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::All => Self::All,
            MediaArg::Movie => Self::Movies,
            MediaArg::Tv => Self::Shows,
        }
    }
}

/// Media type of a single item.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    /// Feature film.
    Movie,
    /// TV series.
    Tv,
}

impl From<KindArg> for MediaType {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Movie => Self::Movie,
            KindArg::Tv => Self::Tv,
        }
    }
}

/// Arguments for list subcommands.
#[derive(clap::Args)]
struct ListArgs {
    /// Media filter.
    #[arg(long, value_enum, default_value_t = MediaArg::All)]
    media: MediaArg,

    /// Maximum number of items to print.
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

/// Arguments for `genres`.
#[derive(clap::Args)]
struct GenresArgs {
    /// Only list genres that have content for the media filter.
    #[arg(long)]
    available: bool,

    /// Media filter used with `--available`.
    #[arg(long, value_enum, default_value_t = MediaArg::All)]
    media: MediaArg,
}

/// Arguments for `genre`.
#[derive(clap::Args)]
struct GenreArgs {
    /// Genre ID.
    #[arg(long, required = true)]
    id: u32,

    /// Items to fetch before filtering (defaults to the config value).
    #[arg(long)]
    count: Option<usize>,

    /// Media filter.
    #[arg(long, value_enum, default_value_t = MediaArg::All)]
    media: MediaArg,
}

/// Arguments for `search`.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query.
    #[arg(long, required = true)]
    query: String,

    /// Maximum results (defaults to the config value).
    #[arg(long)]
    limit: Option<usize>,
}

/// Identifies one item.
#[derive(clap::Args)]
struct ItemArgs {
    /// TMDB ID.
    #[arg(long, required = true)]
    id: u64,

    /// Media type of the ID.
    #[arg(long, value_enum, required = true)]
    media: KindArg,
}

/// Arguments for `browse`.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Page to show.
    #[arg(long, value_enum, default_value_t = MediaArg::All)]
    media: MediaArg,
}

/// `watchlist` subcommand group.
#[derive(clap::Args)]
struct WatchlistCommand {
    /// Watch list operation.
    #[command(subcommand)]
    command: WatchlistSubcommands,
}

/// Watch list subcommands.
#[derive(Subcommand)]
enum WatchlistSubcommands {
    /// Print the watch list.
    List,
    /// Fetch an item and add it.
    Add(ItemArgs),
    /// Remove an item.
    Remove(ItemArgs),
    /// Check whether an item is in the list.
    Contains(ItemArgs),
    /// Remove every item.
    Clear,
}

/// `config` subcommand group.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config operation.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective config.
    Show,
    /// Write a default config file if none exists.
    Init,
}

/// Loads the config file for `dir`.
fn load_config(dir: Option<&Path>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Creates a TMDB client from the environment and config.
///
/// Uses `TMDB_API_TOKEN` (bearer) if set, otherwise `TMDB_API_KEY`.
///
/// # Errors
///
/// Returns an error if neither variable is set, the base URL is invalid, or
/// the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let mut builder = TmdbClient::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    builder = if let Ok(token) = std::env::var("TMDB_API_TOKEN") {
        builder.api_token(token)
    } else if let Ok(key) = std::env::var("TMDB_API_KEY") {
        builder.api_key(key)
    } else {
        bail!("TMDB_API_TOKEN or TMDB_API_KEY environment variable is required");
    };

    if let Some(base_url) = &config.tmdb.base_url {
        let url = Url::parse(base_url).with_context(|| format!("invalid base_url {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build TMDB client")
}

/// Creates the catalog facade.
fn build_catalog(config: &AppConfig) -> Result<Catalog<TmdbClient>> {
    let client = build_tmdb_client(config)?;
    Ok(Catalog::new(client).with_language(config.tmdb.language.as_str()))
}

/// Image URL resolver for the configured CDN.
fn image_resolver(config: &AppConfig) -> ImageResolver {
    ImageResolver::new(
        config
            .tmdb
            .image_base_url
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_BASE_URL),
    )
}

/// Prints one line per item.
fn log_items(items: &[ContentItem]) {
    if items.is_empty() {
        tracing::info!("  (none)");
        return;
    }
    for item in items {
        tracing::info!(
            "  {}\t{}\t{}\t{}",
            item.key(),
            item.year_label(),
            item.rating_label(),
            item.title
        );
    }
}

/// Which top-level list a list subcommand prints.
#[derive(Debug, Clone, Copy)]
enum ListKind {
    Trending,
    Popular,
    TopRated,
}

/// Runs the `trending`, `popular` and `top-rated` subcommands.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_list(kind: ListKind, args: &ListArgs, dir: Option<&Path>) -> Result<()> {
    let config = load_config(dir)?;
    let catalog = build_catalog(&config)?;

    let items = match kind {
        ListKind::Trending => catalog.try_trending().await,
        ListKind::Popular => catalog.try_popular().await,
        ListKind::TopRated => catalog.try_top_rated().await,
    }?;

    let mut items = filter_items(&items, args.media.into());
    items.truncate(args.limit);
    log_items(&items);
    tracing::info!("Total: {} items", items.len());
    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_genres(args: &GenresArgs, dir: Option<&Path>) -> Result<()> {
    let config = load_config(dir)?;
    let catalog = build_catalog(&config)?;

    let mut genres = catalog.try_genres().await?;
    if args.available {
        let browser = GenreBrowser::new(&catalog, args.media.into());
        tracing::info!("{}", browser.section_title());
        genres = browser.available_genres(&genres).await;
    }

    for genre in &genres {
        tracing::info!("  {:>5}  {}", genre.id, genre.name);
    }
    tracing::info!("Total: {} genres", genres.len());
    Ok(())
}

/// Runs the `genre` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
async fn run_genre(args: &GenreArgs, dir: Option<&Path>) -> Result<()> {
    let config = load_config(dir)?;
    let catalog = build_catalog(&config)?;

    let browser = GenreBrowser::new(&catalog, args.media.into()).with_limits(
        args.count.unwrap_or(config.genres.items_to_fetch),
        config.genres.grid_size,
    );
    let items = browser.genre_content(args.id).await;

    tracing::info!("{} (genre {})", browser.section_title(), args.id);
    log_items(&items);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&Path>) -> Result<()> {
    let config = load_config(dir)?;
    let catalog = build_catalog(&config)?;

    // One query per run, so there is nothing to debounce.
    let mut settings = SearchSettings {
        debounce: Duration::ZERO,
        ..config.search.settings()
    };
    if let Some(limit) = args.limit {
        settings.max_results = limit;
    }

    let session = SearchSession::with_settings(&catalog, settings);
    let items = session.submit(&args.query).await.unwrap_or_default();
    log_items(&items);
    Ok(())
}

/// Prints a detail record.
fn log_details(details: &ContentDetails, images: &ImageResolver) {
    let item = &details.item;
    tracing::info!("{} ({})", item.title, item.year_label());
    if let Some(tagline) = &details.tagline {
        tracing::info!("  \"{tagline}\"");
    }
    tracing::info!("  Type: {}", item.media_type);
    tracing::info!("  Rating: {} ({} votes)", item.rating_label(), item.vote_count);
    tracing::info!("  Runtime: {}", details.runtime_label());
    tracing::info!("  Status: {}", details.status.as_deref().unwrap_or("-"));
    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("  Genres: {}", genres.join(", "));
    if item.media_type == MediaType::Movie {
        tracing::info!("  Budget: {}", details.budget_label());
        tracing::info!("  Revenue: {}", details.revenue_label());
    } else {
        tracing::info!(
            "  Seasons: {}, Episodes: {}",
            details.number_of_seasons.unwrap_or(0),
            details.number_of_episodes.unwrap_or(0)
        );
    }
    if !details.spoken_languages.is_empty() {
        tracing::info!("  Languages: {}", details.spoken_languages.join(", "));
    }
    if !details.production_companies.is_empty() {
        tracing::info!("  Companies: {}", details.production_companies.join(", "));
    }
    tracing::info!(
        "  Poster: {}",
        images.url(item.poster_path.as_deref(), ImageSize::W500)
    );
    if let Some(trailer) = &details.trailer {
        tracing::info!("  Trailer: {} ({})", trailer.youtube_url(), trailer.kind);
    }
    tracing::info!("  TMDB: {}", details.tmdb_url());
    if let Some(overview) = &item.overview {
        tracing::info!("  {overview}");
    }
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the item cannot be loaded.
#[instrument(skip_all)]
async fn run_details(args: &ItemArgs, dir: Option<&Path>) -> Result<()> {
    let config = load_config(dir)?;
    let catalog = build_catalog(&config)?;
    let view = DetailView::new(&catalog);

    match view.open(args.id, args.media.into()).await {
        Some(DetailState::Loaded(details)) => {
            log_details(&details, &image_resolver(&config));
            Ok(())
        }
        Some(DetailState::Unavailable(key)) => bail!("details for {key} are unavailable"),
        state => bail!("unexpected detail state: {state:?}"),
    }
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the content load fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, dir: Option<&Path>) -> Result<()> {
    let config = load_config(dir)?;
    let catalog = build_catalog(&config)?;
    let store = ContentStore::new();

    if let LoadState::Failed(message) = store.load(&catalog).await {
        bail!("{message}");
    }

    let page = browse_page(&store.snapshot(), args.media.into());
    tracing::info!("Featured");
    log_items(&page.hero);
    for row in &page.rows {
        tracing::info!("{}", row.title);
        log_items(&row.items);
    }
    Ok(())
}

/// Runs the `watchlist` subcommands.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or written, or the
/// item to add cannot be fetched.
#[instrument(skip_all)]
async fn run_watchlist(command: &WatchlistSubcommands, dir: Option<&Path>) -> Result<()> {
    let storage = SqliteStorage::open(dir).context("failed to open database")?;
    let list = WatchListStore::open(storage);

    match command {
        WatchlistSubcommands::List => {
            if list.is_empty() {
                tracing::info!("Watch list is empty");
                return Ok(());
            }
            for entry in list.entries() {
                let item = &entry.item;
                tracing::info!(
                    "  {}\t{}\t{}\t{}\tadded {}",
                    item.key(),
                    item.year_label(),
                    item.rating_label(),
                    item.title,
                    entry.added_at.format("%Y-%m-%d")
                );
            }
            tracing::info!("Total: {} items", list.len());
        }
        WatchlistSubcommands::Add(args) => {
            let media_type = MediaType::from(args.media);
            if list.contains(args.id, media_type) {
                tracing::info!("{media_type}/{} is already in your watch list", args.id);
                return Ok(());
            }
            let config = load_config(dir)?;
            let catalog = build_catalog(&config)?;
            let details = catalog.try_details(args.id, media_type).await?;
            list.add(&details.item)?;
            tracing::info!("Added to your watch list: {}", details.item.title);
        }
        WatchlistSubcommands::Remove(args) => {
            let media_type = MediaType::from(args.media);
            if list.remove(args.id, media_type)? {
                tracing::info!("Removed from your watch list: {media_type}/{}", args.id);
            } else {
                tracing::info!("{media_type}/{} is not in your watch list", args.id);
            }
        }
        WatchlistSubcommands::Contains(args) => {
            let media_type = MediaType::from(args.media);
            let present = list.contains(args.id, media_type);
            tracing::info!("{media_type}/{}: {}", args.id, if present { "yes" } else { "no" });
        }
        WatchlistSubcommands::Clear => {
            let count = list.len();
            list.clear()?;
            tracing::info!("Cleared {count} items");
        }
    }
    Ok(())
}

/// Runs the `config` subcommands.
///
/// # Errors
///
/// Returns an error if the config cannot be read or written.
#[instrument(skip_all)]
fn run_config(command: &ConfigSubcommands, dir: Option<&Path>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    match command {
        ConfigSubcommands::Show => {
            let config = AppConfig::load(&path)?;
            tracing::info!("# {}", path.display());
            for line in config.to_toml()?.lines() {
                tracing::info!("{line}");
            }
        }
        ConfigSubcommands::Init => {
            if path.exists() {
                tracing::info!("Config already exists: {}", path.display());
                return Ok(());
            }
            AppConfig::default().save(&path)?;
            tracing::info!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_deref();
    match cli.command {
        Commands::Trending(args) => run_list(ListKind::Trending, &args, dir).await,
        Commands::Popular(args) => run_list(ListKind::Popular, &args, dir).await,
        Commands::TopRated(args) => run_list(ListKind::TopRated, &args, dir).await,
        Commands::Genres(args) => run_genres(&args, dir).await,
        Commands::Genre(args) => run_genre(&args, dir).await,
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Browse(args) => run_browse(&args, dir).await,
        Commands::Watchlist(cmd) => run_watchlist(&cmd.command, dir).await,
        Commands::Config(cmd) => run_config(&cmd.command, dir),
    }
}
