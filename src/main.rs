//! clientgen CLI entrypoint
//! Parses command-line arguments and runs the Python client generator.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use clientgen::application::{GenerateClientRequest, GenerateClientUseCase};
use clientgen::core::config::GeneratorConfig;
use clientgen::generation::GenerationOrchestrator;
use clientgen::infrastructure::{
    CompositeSchemaLoader, FileSystemOutputService, TeraModuleRenderer,
};
use std::path::PathBuf;
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clientgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate a typed async Python client from an OpenAPI/Swagger schema
    Generate {
        /// Path or URL to the schema (YAML or JSON)
        #[arg(long)]
        schema: String,
        /// Output directory for the generated modules
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Name of the schema that carries the enum definitions
        #[arg(long)]
        enum_holder: Option<String>,
        /// Base URL written into the request session helper
        #[arg(long)]
        base_url: Option<String>,
        /// Fail without writing when any diagnostic is reported
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            schema,
            output_dir,
            config,
            enum_holder,
            base_url,
            strict,
        } => {
            generate_client(GenerateParams {
                schema,
                output_dir,
                config,
                enum_holder,
                base_url,
                strict,
            })
            .await?
        }
    }
    Ok(())
}

/// Parameters for client generation
struct GenerateParams {
    schema: String,
    output_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    enum_holder: Option<String>,
    base_url: Option<String>,
    strict: bool,
}

/// Build the configuration: file first, flags on top
async fn resolve_config(params: &GenerateParams) -> anyhow::Result<GeneratorConfig> {
    let mut config = match &params.config {
        Some(path) => GeneratorConfig::load(path)
            .await
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(output_dir) = &params.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(enum_holder) = &params.enum_holder {
        config.enum_holder = enum_holder.clone();
    }
    if let Some(base_url) = &params.base_url {
        config.base_url = Some(base_url.clone());
    }
    config.strict |= params.strict;

    Ok(config)
}

/// Generate the Python client modules
async fn generate_client(params: GenerateParams) -> anyhow::Result<()> {
    info!(schema = %params.schema, "Generating Python client");

    let config = resolve_config(&params).await?;

    let schema_loader =
        CompositeSchemaLoader::try_new().context("Failed to initialize schema loader")?;
    let renderer = TeraModuleRenderer::try_new().context("Failed to load Python templates")?;
    let use_case = GenerateClientUseCase::new(
        Arc::new(schema_loader),
        Arc::new(GenerationOrchestrator::new(Arc::new(renderer))),
        Arc::new(FileSystemOutputService::new()),
    );

    let response = use_case
        .execute(GenerateClientRequest {
            schema_source: params.schema,
            config,
        })
        .await
        .context("Failed to generate client")?;

    for diagnostic in &response.diagnostics {
        warn!("{diagnostic}");
    }
    for path in &response.skipped {
        info!(path = %path.display(), "Kept existing file");
    }

    info!(
        output_path = %response.output_path.display(),
        files = response.written.len(),
        models = response.summary.models,
        generic_models = response.summary.generic_models,
        enums = response.summary.enums,
        functions = response.summary.functions,
        "Successfully generated Python client"
    );
    Ok(())
}
