//! `morph-studio` — run the design studio from the command line.
//!
//! Configuration comes from `--config <file.toml>` when given, otherwise from
//! defaults; `STUDIO_*` / `GEMINI_API_KEY` environment variables are overlaid
//! in both cases. Results are printed as pretty JSON on stdout, logs go to
//! stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use studio::{
    build_provider, DesignContext, DesignRequest, DesignStudio, StudioConfig, Transcript,
};
use tracing::info;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML studio config (defaults + environment otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the maximum number of propose/review rounds
    #[arg(long, global = true)]
    max_iterations: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full designer → engineer → UX collaboration
    Generate(RequestArgs),
    /// Ask the designer alone for a single proposal
    Quick(RequestArgs),
    /// Print agent roster and capabilities
    Status,
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// What to design
    #[arg(long)]
    prompt: String,

    /// Current mood of the user (e.g. "stressed", "focused")
    #[arg(long)]
    mood: Option<String>,

    #[arg(long)]
    time_of_day: Option<String>,

    /// Feature or screen being designed
    #[arg(long)]
    feature: Option<String>,

    /// Constraint the design must respect (repeatable)
    #[arg(long = "constraint")]
    constraints: Vec<String>,
}

impl RequestArgs {
    fn into_request(self) -> DesignRequest {
        DesignRequest {
            prompt: self.prompt,
            user_mood: self.mood,
            time_of_day: self.time_of_day,
            feature: self.feature,
            constraints: self.constraints,
        }
    }
}

fn load_config(cli: &Cli) -> Result<StudioConfig> {
    let base = match &cli.config {
        Some(path) => StudioConfig::from_file(path)?,
        None => StudioConfig::default(),
    };
    let mut config = base.with_env(|key| std::env::var(key).ok())?;
    if let Some(max_iterations) = cli.max_iterations {
        config.max_iterations = max_iterations;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio=info,morph_studio=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli).context("failed to load studio configuration")?;
    info!(
        provider = ?config.provider.kind,
        model = %config.provider.model_or_default(),
        max_iterations = config.max_iterations,
        "Design studio starting"
    );

    let provider = build_provider(&config.provider).context("failed to build completion provider")?;
    let studio = DesignStudio::new(provider, config)?;

    let output = match cli.command {
        Command::Generate(args) => {
            let request = args.into_request();
            let result = studio.generate_design(&request).await?;
            info!(
                run_id = %result.run_id,
                consensus = result.consensus,
                confidence = result.confidence,
                iterations = result.iteration_count,
                "Design generated"
            );
            serde_json::to_string_pretty(&result)?
        }
        Command::Quick(args) => {
            let request = args.into_request();
            let context = DesignContext::for_request(&request, &Transcript::new());
            let proposal = studio.quick_design(&request.prompt, Some(&context)).await?;
            serde_json::to_string_pretty(&proposal)?
        }
        Command::Status => serde_json::to_string_pretty(&studio.status())?,
    };

    println!("{}", output);
    Ok(())
}
