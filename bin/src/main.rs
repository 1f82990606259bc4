//! pixfetch CLI - Rate-limited pixiv bookmark and artwork metadata fetcher.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use pixfetch_lib::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "pixfetch")]
#[command(about = "Rate-limited pixiv bookmark and artwork metadata fetcher", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Session credential (`<user id>_<secret>`, the PHPSESSID cookie value)
    #[arg(long, env = "PIXFETCH_SESSION", hide_env_values = true, global = true)]
    session: Option<String>,

    /// Requests admitted per pool interval
    #[arg(long, default_value_t = DEFAULT_POOL_SIZE, global = true)]
    pool_size: usize,

    /// How long an admitted request holds its slot, in milliseconds
    #[arg(long, default_value_t = DEFAULT_POOL_INTERVAL.as_millis() as u64, global = true)]
    pool_interval_ms: u64,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the number of public bookmarks
    Count,

    /// Fetch bookmarked works
    Bookmarks {
        /// Number of bookmarks to fetch. Defaults to all of them.
        #[arg(short, long)]
        count: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "ndjson")]
        format: Format,

        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show full detail of a work
    Work {
        /// Work id
        id: u64,
    },

    /// List the pages of one or more works
    Pages {
        /// Work ids
        #[arg(required = true)]
        ids: Vec<u64>,

        /// Maximum page list requests admitted per pool interval
        #[arg(long, default_value_t = DEFAULT_POOL_SIZE)]
        max_concurrent: usize,
    },

    /// Download the original image of a page
    Image {
        /// Work id
        id: u64,

        /// Zero-based page number
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -q and -v
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let session = cli
        .session
        .context("A session credential is required (--session or PIXFETCH_SESSION)")?;
    let config = FetcherConfig::new(&session)
        .context("Invalid session credential")?
        .with_pool(cli.pool_size, Duration::from_millis(cli.pool_interval_ms));
    let fetcher = FetcherSlot::global()
        .configure(config)
        .context("Failed to configure fetcher")?;
    tracing::debug!(user_id = fetcher.user_id(), "session loaded");

    match command {
        Commands::Count => commands::count::count(fetcher).await,
        Commands::Bookmarks {
            count,
            format,
            output,
        } => commands::bookmarks::bookmarks(fetcher, count, format, output, cli.quiet).await,
        Commands::Work { id } => commands::work::work(fetcher, id).await,
        Commands::Pages {
            ids,
            max_concurrent,
        } => commands::pages::pages(fetcher, ids, max_concurrent).await,
        Commands::Image {
            id,
            page,
            output_dir,
        } => commands::image::image(fetcher, id, page, &output_dir, cli.quiet).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bookmarks() {
        let cli = Cli::try_parse_from([
            "pixfetch",
            "--session",
            "1_x",
            "-vv",
            "bookmarks",
            "--count",
            "250",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.session.as_deref(), Some("1_x"));
        assert!(matches!(
            cli.command,
            Some(Commands::Bookmarks {
                count: Some(250),
                format: Format::Json,
                output: None,
            })
        ));
    }

    #[test]
    fn test_parse_pages_requires_ids() {
        assert!(Cli::try_parse_from(["pixfetch", "pages"]).is_err());
        let cli = Cli::try_parse_from(["pixfetch", "pages", "1", "2", "--max-concurrent", "2"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Pages { ref ids, max_concurrent: 2 }) if ids == &[1, 2]
        ));
    }

    #[test]
    fn test_pool_defaults() {
        let cli = Cli::try_parse_from(["pixfetch", "count"]).unwrap();
        assert_eq!(cli.pool_size, 8);
        assert_eq!(cli.pool_interval_ms, 2000);
        assert_eq!(
            Duration::from_millis(cli.pool_interval_ms),
            DEFAULT_POOL_INTERVAL
        );
    }
}
