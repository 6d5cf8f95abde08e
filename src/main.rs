use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use keno_bias_watch::{
    board, db, history, report, AnalysisConfig, AnalysisOutcome, Pipeline, RankedResult,
    ScoreWeights,
};

#[derive(Parser)]
#[command(name = "keno-bias-watch")]
#[command(about = "Detects spatial frequency bias on an 80-number Keno board", long_about = None)]
struct Cli {
    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Import draw history from a results CSV
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Score the latest window and decide whether to alert
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Read history from this CSV instead of the database
    #[arg(long)]
    csv: Option<PathBuf>,
    /// JSON file with analysis settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    window: Option<usize>,
    #[arg(long)]
    min_games: Option<usize>,
    #[arg(long)]
    top_k: Option<usize>,
    /// Confidence percentage a top number needs to qualify
    #[arg(long)]
    threshold: Option<f64>,
    #[arg(long)]
    min_qualifying: Option<usize>,
    /// Share of the score taken from the neighborhood average (rest is the number itself)
    #[arg(long)]
    cluster_weight: Option<f64>,
    /// Print the result as JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Write a markdown report here
    #[arg(long)]
    report: Option<PathBuf>,
    /// Store the completed run in the database
    #[arg(long)]
    record: bool,
}

impl AnalyzeArgs {
    fn resolve_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(value) = self.window {
            config.window_size = value;
        }
        if let Some(value) = self.min_games {
            config.min_games = value;
        }
        if let Some(value) = self.top_k {
            config.top_k = value;
        }
        if let Some(value) = self.threshold {
            config.alert_threshold = value;
        }
        if let Some(value) = self.min_qualifying {
            config.min_qualifying = value;
        }
        if let Some(value) = self.cluster_weight {
            config.weights = ScoreWeights::with_cluster(value);
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

fn print_ranking(result: &RankedResult, config: &AnalysisConfig) {
    println!(
        "Top {} numbers by spatial weighted score (games {} to {}):",
        result.top.len(),
        result.first_game_id,
        result.last_game_id
    );
    println!(
        "{:<6}{:<10}{:<8}{:<12}{:<12}{:<14}Region",
        "Rank", "Number", "Hits", "Expected", "Z-Score", "Confidence"
    );
    println!("{}", "-".repeat(75));
    for (rank, stat) in result.top.iter().enumerate() {
        println!(
            "{:<6}{:<10}{:<8}{:<12.1}{:<12.3}{:<14.1}{}",
            rank + 1,
            stat.number,
            stat.observed,
            result.expected_count,
            stat.z_score,
            stat.confidence,
            board::region(stat.number)
        );
    }
    println!();
    println!(
        "Numbers at or above {:.1}% confidence: {}",
        config.alert_threshold,
        result.qualifying.len()
    );
    if result.alert {
        println!("ALERT: {}", report::alert_subject(result));
        println!("{}", report::verdict(result));
    } else {
        println!(
            "Game appears fair. No alert (need {}+ numbers above {:.1}%).",
            config.min_qualifying, config.alert_threshold
        );
    }
}

async fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = args.resolve_config()?;
    let pipeline = Pipeline::new(config).context("invalid analysis configuration")?;
    let config = pipeline.config();

    let mut pool = None;
    let draws = match &args.csv {
        Some(path) => history::load_csv(path)?,
        None => {
            let connected = connect().await?;
            let draws = db::fetch_window(&connected, config.window_size).await?;
            pool = Some(connected);
            draws
        }
    };

    let result = match pipeline.analyze(draws) {
        AnalysisOutcome::Skipped(reason) => {
            println!("Skipping analysis: {reason}.");
            return Ok(());
        }
        AnalysisOutcome::Completed(result) => result,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_ranking(&result, config);
    }

    let now = chrono::Utc::now();
    if let Some(path) = &args.report {
        std::fs::write(path, report::build_report(&result, config, now))
            .with_context(|| format!("failed to write report {}", path.display()))?;
        println!("Report written to {}.", path.display());
    }

    if args.record {
        let pool = match pool {
            Some(pool) => pool,
            None => connect().await?,
        };
        let id = db::record_run(&pool, &result, now).await?;
        println!("Recorded run {id}.");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Import { csv } => {
            let pool = connect().await?;
            let inserted = db::import_csv(&pool, &csv).await?;
            let total = db::count_draws(&pool).await?;
            println!(
                "Inserted {inserted} draws from {} ({total} stored).",
                csv.display()
            );
        }
        Commands::Analyze(args) => run_analyze(args).await?,
    }

    Ok(())
}
