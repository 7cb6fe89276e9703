use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use geoverify_core::CoordinateInput;
use geoverify_engine::Verifier;

#[derive(Debug, Parser)]
#[command(name = "geoverify")]
#[command(about = "Verify LLM-generated coordinates against geocoding providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Verify a single coordinate.
    Verify {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
        /// Short label for the place itself (landmark, venue, chapter name).
        #[arg(long)]
        context: String,
        /// Broader place name (city, region, country).
        #[arg(long)]
        location: String,
    },
    /// Verify a JSON array of coordinates from a file.
    Batch {
        /// Path to a JSON file holding an array of coordinate inputs.
        file: PathBuf,
        /// Also print the accumulated performance counters.
        #[arg(long)]
        stats: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = geoverify_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let verifier = Verifier::new(config)?;

    match cli.command {
        Commands::Verify {
            lat,
            lng,
            context,
            location,
        } => {
            let input = CoordinateInput {
                lat,
                lng,
                context,
                location_name: location,
            };
            let result = verifier.verify(&input).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Batch { file, stats } => {
            let raw = std::fs::read_to_string(&file)?;
            let inputs: Vec<CoordinateInput> = serde_json::from_str(&raw)?;
            tracing::info!(count = inputs.len(), file = %file.display(), "starting batch");

            let results = verifier.batch_verify(inputs).await;
            println!("{}", serde_json::to_string_pretty(&results)?);

            if stats {
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&verifier.performance_stats())?
                );
            }
        }
    }

    Ok(())
}
