use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use listening_common::{BackendKind, Config, Domain, ListeningError};
use listening_survey::export::{export_file_name, write_json};
use listening_survey::questions::{resolve_question, PRESET_QUESTIONS};
use listening_survey::session::DEFAULT_SAMPLE_SIZE;
use listening_survey::{BackendConfig, SurveySession};

#[derive(Parser)]
#[command(
    name = "listening-survey",
    about = "Ask a synthetic population of humans or animals the same question"
)]
struct Cli {
    /// Persona domain: humans or animals
    #[arg(long)]
    domain: Option<String>,

    /// Number of personas to generate
    #[arg(long, default_value_t = 50)]
    count: usize,

    /// Response backend: simulation or model
    #[arg(long)]
    backend: Option<String>,

    /// Model provider: openai, anthropic, google or ollama
    #[arg(long)]
    provider: Option<String>,

    /// Model identifier; defaults to the provider's default model
    #[arg(long)]
    model: Option<String>,

    /// Credential for the provider; overrides the provider's env var
    #[arg(long)]
    api_key: Option<String>,

    /// Override the provider API root
    #[arg(long)]
    base_url: Option<String>,

    /// Preset question key (see --list-presets)
    #[arg(long, default_value = "climate-change")]
    preset: String,

    /// Free-text question; takes precedence over --preset
    #[arg(long)]
    question: Option<String>,

    /// Print the preset catalog and exit
    #[arg(long)]
    list_presets: bool,

    /// Generate model-written insights after the run
    #[arg(long)]
    insights: bool,

    /// Write persona records as JSON (a directory gets a timestamped file name)
    #[arg(long)]
    export_personas: Option<PathBuf>,

    /// Write response records as JSON (a directory gets a timestamped file name)
    #[arg(long)]
    export_responses: Option<PathBuf>,

    /// Number of sample responses to print
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("listening=info".parse()?))
        .init();

    let cli = Cli::parse();

    if cli.list_presets {
        for q in PRESET_QUESTIONS.iter() {
            println!("{:<18} {}", q.key, q.text);
        }
        return Ok(());
    }

    if let Err(e) = run(cli).await {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> listening_common::Result<()> {
    let mut config = Config::from_env()?;
    apply_overrides(&mut config, &cli)?;

    info!(domain = %config.domain, backend = %config.backend, "Listening survey starting");

    let mut backend_config = BackendConfig::from_config(&config);
    if let Some(key) = &cli.api_key {
        backend_config.endpoint_credential = Some(key.clone());
    }
    if let Some(url) = &cli.base_url {
        backend_config.base_url = Some(url.clone());
    }

    let question = resolve_question(Some(cli.preset.as_str()), cli.question.as_deref())?;

    let mut session = SurveySession::new(config.domain);
    session.configure_backend(&backend_config)?;

    println!("{}", config.domain.title());
    let persona_summary = session.generate_personas(cli.count)?;
    print!("{persona_summary}");

    if let Some(path) = &cli.export_personas {
        let path = resolve_export_path(path, "personas");
        write_json(&path, &session.persona_records())?;
        println!("Personas written to {}", path.display());
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping after the current persona");
            ctrl_c.cancel();
        }
    });

    let run_summary = session.run_survey(&question, &cancel).await?;
    print!("{run_summary}");
    session.ledger().log_status();
    print!("{}", session.cost_summary());

    let samples = session.sample_responses(cli.sample);
    if !samples.is_empty() {
        println!("\n=== Sample Responses ===");
        for sample in &samples {
            println!("- {sample}");
        }
    }

    if cli.insights {
        let insights = session.generate_insights().await?;
        println!("\n=== Insights ===\n{insights}");
    }

    if let Some(path) = &cli.export_responses {
        let path = resolve_export_path(path, "survey_export");
        write_json(&path, &session.response_records())?;
        println!("Responses written to {}", path.display());
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) -> listening_common::Result<()> {
    if let Some(domain) = &cli.domain {
        config.domain = domain.parse::<Domain>()?;
    }
    if let Some(backend) = &cli.backend {
        config.backend = backend.parse::<BackendKind>()?;
    }
    if let Some(provider) = &cli.provider {
        config.provider = provider.clone();
    }
    if let Some(model) = &cli.model {
        config.model = Some(model.clone());
    }
    if config.backend == BackendKind::Simulation && cli.insights {
        return Err(ListeningError::NotConfigured(
            "--insights needs the model backend".to_string(),
        ));
    }
    Ok(())
}

fn resolve_export_path(path: &std::path::Path, stem: &str) -> PathBuf {
    if path.is_dir() {
        path.join(export_file_name(stem, Utc::now()))
    } else {
        path.to_path_buf()
    }
}
