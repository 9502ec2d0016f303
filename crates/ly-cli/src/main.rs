//! CLI frontend for the Liuyao divination engine.

mod commands;

use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::cast::CastOptions;

#[derive(Parser)]
#[command(
    name = "liuyao",
    about = "Liuyao: I-Ching divination with three coins",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cast a hexagram for a question, one line per round
    Cast {
        /// The question to ask
        question: String,

        /// Question category: career, relationship, health, wealth, study, family
        #[arg(short, long)]
        category: Option<String>,

        /// Casting method: liuyao or ai
        #[arg(short, long, default_value = "liuyao")]
        method: String,

        /// RNG seed for a reproducible cast
        #[arg(short, long, conflicts_with = "coins")]
        seed: Option<u64>,

        /// Scripted coin faces, e.g. "hht tth ..." (H = heads, T = tails)
        #[arg(long)]
        coins: Option<String>,

        /// Pause before each round, in milliseconds
        #[arg(long, default_value = "0")]
        pace_ms: u64,

        /// Skip the rest of the cast once this many lines are in
        #[arg(long)]
        skip_after: Option<u8>,

        /// On skip, stop without a reading instead of casting all six lines at once
        #[arg(long)]
        abort_on_skip: bool,

        /// Print the record as JSON
        #[arg(long, conflicts_with = "request")]
        json: bool,

        /// Print the interpretation request body as JSON
        #[arg(long)]
        request: bool,
    },

    /// Show one hexagram by encoding (bottom line first), number or name
    Lookup {
        /// e.g. 100000, 24, 复 or "return"
        query: String,
    },

    /// List the 64 hexagrams
    List {
        /// Only hexagrams with this trigram above or below
        #[arg(short, long)]
        trigram: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Cast {
            question,
            category,
            method,
            seed,
            coins,
            pace_ms,
            skip_after,
            abort_on_skip,
            json,
            request,
        } => {
            commands::cast::run(CastOptions {
                question,
                category,
                method,
                seed,
                coins,
                pace_ms,
                skip_after,
                abort_on_skip,
                json,
                request,
            })
            .await
        }
        Commands::Lookup { query } => commands::lookup::run(&query),
        Commands::List { trigram } => commands::list::run(trigram.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
