use clap::Parser;
use issue_triage::{
    evaluate, feature_pipeline, load_model, load_tsv, save_model, Config, IssueRecord,
    PredictionEngine, Result, Trainer,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "issue-triage")]
#[command(about = "Train and evaluate a GitHub issue triage model", long_about = None)]
struct Cli {
    /// Training dataset (TSV), overrides the configured path
    #[arg(long)]
    train_data: Option<PathBuf>,

    /// Held-out evaluation dataset (TSV), overrides the configured path
    #[arg(long)]
    test_data: Option<PathBuf>,

    /// Model artifact path, overrides the configured path
    #[arg(long)]
    model: Option<PathBuf>,

    /// Seed recorded for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "issue_triage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// The whole pipeline, start to finish: load, build, train, save, evaluate,
/// predict. Any failure aborts the run at the failing step.
fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(path) = cli.train_data {
        config.paths.train_data = path;
    }
    if let Some(path) = cli.test_data {
        config.paths.test_data = path;
    }
    if let Some(path) = cli.model {
        config.paths.model = path;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    tracing::info!("Starting issue triage training v{}", env!("CARGO_PKG_VERSION"));

    let training_data = load_tsv(&config.paths.train_data, true)?;

    let pipeline = feature_pipeline();

    let trainer = Trainer::new(config.features.clone(), config.trainer.clone(), config.seed);
    let model = trainer.fit(pipeline, &training_data)?;

    save_model(&model, &config.paths.model)?;

    let test_data = load_tsv(&config.paths.test_data, true)?;
    let metrics = evaluate(&model, &test_data)?;
    println!("{}", metrics.report());

    // The illustrative single prediction runs against the model reloaded
    // from disk, exercising the persisted artifact.
    let loaded_model = load_model(&config.paths.model)?;
    let engine = PredictionEngine::new(&loaded_model);

    let issue = IssueRecord::unlabeled(
        "Entity Framework crashes",
        "When connecting to the database, EF is crashing",
    );
    let prediction = engine.predict(&issue)?;
    println!("=============== Single Prediction - Result: {} ===============", prediction.area);

    Ok(())
}
