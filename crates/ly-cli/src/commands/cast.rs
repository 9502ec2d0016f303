use std::future::Future;
use std::time::Duration;

use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::info;

use ly_core::line::position_name;
use ly_core::{Category, CoinSource, DivinationRecord, FixedCoins, Method, Origin};
use ly_session::{
    Commentary, InterpretationRequest, LineEvent, LocalInterpreter, Pacer, Reading,
    SessionConfig, SessionHooks, SessionOutcome, SkipPolicy, start_session,
};

/// Flags of the `cast` subcommand.
pub struct CastOptions {
    pub question: String,
    pub category: Option<String>,
    pub method: String,
    pub seed: Option<u64>,
    pub coins: Option<String>,
    pub pace_ms: u64,
    pub skip_after: Option<u8>,
    pub abort_on_skip: bool,
    pub json: bool,
    pub request: bool,
}

/// Sleeps between rounds and holds back every round after `skip_after` so
/// the skip lands before another line is tossed.
struct CliPacer {
    delay: Duration,
    skip_after: Option<u8>,
}

impl Pacer for CliPacer {
    fn pause(&mut self, round: u8) -> impl Future<Output = ()> + Send {
        let hold = self.skip_after.is_some_and(|n| round > n);
        let delay = self.delay;
        async move {
            if hold {
                std::future::pending::<()>().await;
            }
            tokio::time::sleep(delay).await;
        }
    }
}

pub async fn run(opts: CastOptions) -> Result<(), String> {
    let method = Method::parse(&opts.method).map_err(|e| e.to_string())?;
    let mut config = SessionConfig::new(opts.question.clone()).with_method(method);
    if let Some(category) = opts.category.as_deref() {
        config = config.with_category(Category::parse(category).map_err(|e| e.to_string())?);
    }
    if opts.abort_on_skip {
        config = config.with_skip_policy(SkipPolicy::Abort);
    }

    let outcome = match (opts.coins.as_deref(), opts.seed) {
        (Some(script), _) => {
            let coins = FixedCoins::parse(script).map_err(|e| e.to_string())?;
            drive(config, coins, &opts).await?
        }
        (None, Some(seed)) => drive(config, StdRng::seed_from_u64(seed), &opts).await?,
        (None, None) => drive(config, StdRng::from_os_rng(), &opts).await?,
    };

    let quiet = opts.json || opts.request;
    let Some(record) = outcome.into_record() else {
        if quiet {
            println!("null");
        } else {
            println!();
            println!("  {}", "Cast skipped; no reading.".yellow());
        }
        return Ok(());
    };

    if opts.json {
        let json = serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }
    if opts.request {
        let request = InterpretationRequest::from_record(&record);
        let json = serde_json::to_string_pretty(&request).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    print_reading(record).await;
    Ok(())
}

/// Run the session, echoing lines as they land and skipping on Ctrl-C or
/// once `skip_after` lines are in.
async fn drive<S>(
    config: SessionConfig,
    source: S,
    opts: &CastOptions,
) -> Result<SessionOutcome, String>
where
    S: CoinSource + Send + 'static,
{
    let quiet = opts.json || opts.request;
    if !quiet {
        println!("  {} {}", "Question:".bold(), config.question);
        if let Some(category) = config.category {
            println!("  {} {category}", "Category:".bold());
        }
        println!();
    }

    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<LineEvent>();
    let hooks = SessionHooks::default()
        .on_line_resolved(move |event| {
            let _ = line_tx.send(*event);
        })
        .on_cancel_requested(|| info!("skip requested"));
    let pacer = CliPacer {
        delay: Duration::from_millis(opts.pace_ms),
        skip_after: opts.skip_after,
    };

    let handle = start_session(config, source, pacer, hooks).map_err(|e| e.to_string())?;
    let canceller = handle.canceller();
    if opts.skip_after == Some(0) {
        canceller.cancel();
    }

    let result = handle.result();
    tokio::pin!(result);
    let outcome = loop {
        tokio::select! {
            outcome = &mut result => break outcome,
            Some(event) = line_rx.recv() => {
                if !quiet {
                    print_event(&event);
                }
                if opts.skip_after == Some(event.round) {
                    canceller.cancel();
                }
            }
            Ok(()) = tokio::signal::ctrl_c() => {
                if !quiet {
                    println!("  {}", "(skipping)".dimmed());
                }
                canceller.cancel();
            }
        }
    };
    while let Ok(event) = line_rx.try_recv() {
        if !quiet {
            print_event(&event);
        }
    }

    outcome.map_err(|e| e.to_string())
}

fn print_event(event: &LineEvent) {
    println!(
        "  {} {}  {}  {}",
        format!("[round {}]", event.round).dimmed(),
        position_name(event.position),
        event.toss,
        event.toss.line.label()
    );
}

async fn print_reading(record: DivinationRecord) {
    println!();
    if record.origin == Origin::Synthesized {
        println!(
            "  {}",
            "Skipped: the partial cast was set aside and six lines were cast at once.".yellow()
        );
        println!();
    }

    super::print_lines(&record.original);
    println!();
    println!("  {}  {}", "本卦".bold(), super::describe(record.original_hexagram()));
    if let Some(transformed) = record.transformed_hexagram() {
        println!("  {}  {}", "变卦".bold(), super::describe(transformed));
    } else {
        println!("  {}", "No changing lines.".dimmed());
    }
    println!();

    let reading = Reading::consult(record, &LocalInterpreter).await;
    match reading.commentary {
        Commentary::Provided(text) => println!("  {text}"),
        Commentary::Unavailable(reason) => {
            println!("  {}", format!("Commentary unavailable: {reason}").dimmed());
        }
    }
}
