use analytics::RiskEngine;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use database::connection::{connect, run_migrations};
use database::repository::DbRepository;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use rating::RatingEngine;
use settlement::{MetricsOrchestrator, PredictionSettler, RankingService};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// The main entry point for the Podium ranking and risk engine.
#[tokio::main]
async fn main() {
    // Load environment variables from a .env file when one is present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Initialize the database connection and run migrations.
    let db_pool = connect().await.expect("Failed to connect to the database");
    run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let config = configuration::load_config().expect("Failed to load configuration");

    // Parse command-line arguments.
    let cli = Cli::parse();
    let repo = DbRepository::new(db_pool);

    // Execute the appropriate command.
    let result = match cli.command {
        Commands::SettleContest(args) => handle_settle_contest(args, &repo, &config).await,
        Commands::RiskMetrics(args) => handle_risk_metrics(args, &repo, &config).await,
        Commands::ScoreEvent(args) => handle_score_event(args, &repo).await,
        Commands::Leaderboard(args) => handle_leaderboard(args, &repo).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Ranking and risk-scoring engine for agent trading competitions.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a concluded contest's finish order to the rating pools.
    SettleContest(SettleContestArgs),

    /// Compute and store risk metrics for a contest's participants.
    RiskMetrics(RiskMetricsArgs),

    /// Score every prediction submitted against a resolved event.
    ScoreEvent(ScoreEventArgs),

    /// Print the prediction leaderboard for a contest.
    Leaderboard(LeaderboardArgs),
}

#[derive(Parser)]
struct SettleContestArgs {
    /// The concluded contest to settle.
    #[arg(long)]
    contest_id: Uuid,
}

#[derive(Parser)]
struct RiskMetricsArgs {
    /// The contest to compute metrics for.
    #[arg(long)]
    contest_id: Uuid,

    /// A single participant; omit to process every participant.
    #[arg(long)]
    participant_id: Option<Uuid>,
}

#[derive(Parser)]
struct ScoreEventArgs {
    /// The resolved event to score.
    #[arg(long)]
    event_id: Uuid,
}

#[derive(Parser)]
struct LeaderboardArgs {
    /// The contest whose leaderboard to print.
    #[arg(long)]
    contest_id: Uuid,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_settle_contest(
    args: SettleContestArgs,
    repo: &DbRepository,
    config: &configuration::Config,
) -> anyhow::Result<()> {
    let engine = RatingEngine::new(config.rating.clone())?;
    RankingService::new(repo, engine)
        .settle_contest(args.contest_id)
        .await?;

    println!("Ratings settled for contest {}", args.contest_id);
    Ok(())
}

/// Computes risk metrics for one participant, or concurrently for every
/// participant in the contest. Each (participant, contest) pair is
/// independent, so the fan-out needs no coordination beyond the per-pair
/// transaction the store already provides.
async fn handle_risk_metrics(
    args: RiskMetricsArgs,
    repo: &DbRepository,
    config: &configuration::Config,
) -> anyhow::Result<()> {
    let engine = RiskEngine::new(config.risk.clone())?;
    let orchestrator = MetricsOrchestrator::new(repo, engine);

    if let Some(participant_id) = args.participant_id {
        let record = orchestrator
            .calculate_and_save_verified(participant_id, args.contest_id)
            .await?;
        println!(
            "Participant {}: return {}, max drawdown {}, calmar {}, sortino {} ({} snapshots)",
            participant_id,
            record.simple_return,
            record.max_drawdown,
            record.calmar_ratio,
            record.sortino_ratio,
            record.snapshot_count
        );
        return Ok(());
    }

    let participants = repo.get_participants(args.contest_id).await?;
    println!(
        "Computing risk metrics for {} participants in contest {}",
        participants.len(),
        args.contest_id
    );

    let progress_bar = ProgressBar::new(participants.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    // Validation failures (too few snapshots, unstarted contest, transfer
    // activity) are per-participant conditions: log and move on. Anything
    // else aborts the batch.
    let tasks = participants.iter().map(|participant_id| {
        let orchestrator = &orchestrator;
        let progress_bar = &progress_bar;
        async move {
            let outcome = orchestrator
                .calculate_and_save_verified(*participant_id, args.contest_id)
                .await;
            progress_bar.inc(1);
            match outcome {
                Ok(_) => Ok(1usize),
                Err(e) if e.is_validation() => {
                    warn!(participant = %participant_id, error = %e, "skipping participant");
                    Ok(0)
                }
                Err(e) => Err(e),
            }
        }
    });

    let results = join_all(tasks).await;
    progress_bar.finish_with_message("done");

    let mut saved = 0usize;
    for result in results {
        saved += result?;
    }
    println!("Saved risk metrics for {saved}/{} participants", participants.len());

    Ok(())
}

async fn handle_score_event(args: ScoreEventArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let scored = PredictionSettler::new(repo).score_event(args.event_id).await?;
    println!("Scored {scored} prediction(s) for event {}", args.event_id);
    Ok(())
}

async fn handle_leaderboard(args: LeaderboardArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let rows = PredictionSettler::new(repo).leaderboard(args.contest_id).await?;

    let mut table = Table::new();
    table.set_header(vec!["Rank", "Competitor", "Accuracy", "Brier", "Predictions"]);
    for row in &rows {
        table.add_row(vec![
            row.rank.to_string(),
            row.competitor_id.to_string(),
            format!("{:.4}", row.accuracy),
            format!("{:.4}", row.brier_score),
            row.total_predictions.to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}
