use clap::{ArgAction, Parser, Subcommand};
use commands::{config, movie, search, watchlist};
use marquee_core::{SortDirection, SortKey};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Marquee - Search movies and keep a watchlist from the terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to a daily rotated file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies by title
    Search {
        /// Title or part of a title
        query: String,

        /// Results page to show
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show details, cast, trailer and reviews for a movie
    #[command(long_about = "Show details for a movie by its TMDB id. Credits, videos and reviews are loaded alongside the details; if one of them fails the rest is still shown.")]
    Movie {
        /// TMDB movie id
        id: u64,

        /// Page of reviews to show
        #[arg(long, default_value_t = 1)]
        reviews_page: u32,
    },
    /// Manage your watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommands,
    },
    /// View or change configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum WatchlistCommands {
    /// List saved movies
    #[command(long_about = "List saved movies ordered by the saved sort preference. --sort and --direction apply to this listing only; use 'watchlist sort' to change the preference.")]
    List {
        /// dateAdded, title, releaseDate or rating
        #[arg(long)]
        sort: Option<SortKey>,

        /// asc or desc
        #[arg(long)]
        direction: Option<SortDirection>,
    },
    /// Look up a movie and save it
    Add {
        /// TMDB movie id
        id: u64,
    },
    /// Remove a saved movie
    Remove {
        /// TMDB movie id
        id: u64,
    },
    /// Save the movie if absent, remove it if present
    Toggle {
        /// TMDB movie id
        id: u64,
    },
    /// Remove every saved movie
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Change the saved sort order
    #[command(long_about = "Change the saved sort order. Choosing the current key again flips the direction; a new key starts newest-first for dateAdded and ascending otherwise.")]
    Sort {
        /// dateAdded, title, releaseDate or rating
        key: SortKey,

        /// asc or desc
        #[arg(long)]
        direction: Option<SortDirection>,
    },
    /// Show watchlist statistics
    Stats,
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a default config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Store the TMDB API key in the credentials file
    ApiKey {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_guard = logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match cli.command {
        Commands::Search { query, page } => search::run_search(query, page, &output).await,
        Commands::Movie { id, reviews_page } => movie::run_movie(id, reviews_page, &output).await,
        Commands::Watchlist { cmd } => watchlist::run_watchlist(cmd, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
    };

    match result {
        Err(e) if output.format() != output::OutputFormat::Human => {
            // Keep stdout machine-readable; the eyre report is for terminals
            tracing::error!("Command failed: {:?}", e);
            output.error(e.to_string());
            drop(log_guard);
            std::process::exit(1);
        }
        result => result,
    }
}
