mod analyze;
mod detail;
mod rank;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Minimum items per tag in `--sample` mode.
const SAMPLE_MIN_ITEM_COUNT: usize = 3;

#[derive(Debug, Parser)]
#[command(name = "tagsignal")]
#[command(about = "Aggregate tagged social-media items into trading signals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline and emit a JSON report
    Analyze {
        /// JSON array of enriched items
        #[arg(long)]
        input: PathBuf,

        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Minimum items a tag needs to be analyzed
        #[arg(long)]
        min_items: Option<usize>,

        /// Analyze only the first N items and lower the per-tag minimum to 3
        #[arg(long, value_name = "N")]
        sample: Option<usize>,

        /// Tags to break down in detail after the summary
        #[arg(long, num_args = 1.., default_values = detail::DEFAULT_TARGET_TAGS)]
        tags: Vec<String>,

        /// Skip the per-tag breakdown
        #[arg(long, conflicts_with = "tags")]
        all_tags: bool,
    },
    /// Print the tag ranking table
    Rank {
        /// JSON array of enriched items
        #[arg(long)]
        input: PathBuf,

        /// Show at most this many tags
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Minimum items a tag needs to be ranked
        #[arg(long)]
        min_items: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = tagsignal_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(env = %config.env, "loaded configuration");

    if let Some(threads) = config.worker_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
        tracing::debug!(threads, "configured worker pool");
    }

    let mut signal_config = tagsignal_core::resolve_signal_config(&config)?;

    match cli.command {
        Commands::Analyze {
            input,
            output,
            min_items,
            sample,
            tags,
            all_tags,
        } => {
            if let Some(min) = effective_min_items(min_items, sample) {
                signal_config.tags.min_item_count = min;
            }
            let targets = (!all_tags).then_some(tags.as_slice());
            analyze::run_analyze(
                &input,
                output.as_deref(),
                sample,
                targets,
                &signal_config,
            )?;
        }
        Commands::Rank {
            input,
            limit,
            min_items,
        } => {
            if let Some(min) = min_items {
                signal_config.tags.min_item_count = min;
            }
            rank::run_rank(&input, limit, &signal_config)?;
        }
    }

    Ok(())
}

/// An explicit `--min-items` wins over `--sample`.
fn effective_min_items(min_items: Option<usize>, sample: Option<usize>) -> Option<usize> {
    min_items.or(sample.map(|_| SAMPLE_MIN_ITEM_COUNT))
}
