//! Courier worker binary.
//!
//! Runs on the Lambda runtime by default; `replay` pushes a local SQS event
//! or job message through the same pipeline.

use clap::{Parser, Subcommand};
use courier_config::{EnvLoader, WorkerConfig};
use courier_worker::{SqsWorker, build_intake, replay};
use tracing::debug;

/// Queue-driven batch email worker
#[derive(Parser)]
#[command(name = "courier-worker")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Batch email worker for SQS-triggered AWS Lambda")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Load environment variables from this file first
    #[arg(long, global = true, env = "COURIER_ENV_FILE")]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run on the AWS Lambda runtime (default)
    Lambda,

    /// Process an SQS event or a single job message locally
    Replay {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Lambda);

    // The env file may set LOG_LEVEL, so it is read before tracing starts.
    let env_file = courier_config::load_dotenv(cli.env_file.as_deref())?;
    let log_level = WorkerConfig::log_level_from(&EnvLoader::new());
    match command {
        Commands::Lambda => courier_worker::init_tracing(&log_level),
        Commands::Replay { .. } => courier_worker::init_local_tracing(&log_level),
    }
    if let Some(path) = env_file {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let config = WorkerConfig::from_env()?;
    debug!(config = ?config, "Configuration loaded");
    let intake = build_intake(&config).await?;

    match command {
        Commands::Lambda => SqsWorker::new(intake).run().await,
        Commands::Replay { input } => {
            let document = replay::read_input(&input)?;
            let response = replay::replay(&intake, &document).await?;
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
    }
}
