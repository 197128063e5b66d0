///! Portside CLI
///!
///! Terminal front end for the Portside console controllers

mod api;
mod backend;
mod commands;
mod config;
mod logging;
mod output;
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::azure::AzureCommands;
use commands::config::ConfigCommands;
use commands::endpoints::EndpointCommands;
use commands::pool::PoolCommands;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// API server address (overrides the config file)
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Endpoint ID to operate on (overrides the config file)
    #[arg(short, long, global = true)]
    endpoint: Option<u32>,

    /// Output format (table, json, yaml)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Azure container instances
    Azure {
        #[command(subcommand)]
        command: AzureCommands,
    },
    /// Kubernetes resource pools
    Pool {
        #[command(subcommand)]
        command: PoolCommands,
    },
    /// Endpoints, endpoint groups and tags
    Endpoints {
        #[command(subcommand)]
        command: EndpointCommands,
    },
    /// Show or change the CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Everything a command needs, resolved from flags and config
pub struct Context {
    pub backend: Arc<backend::HttpBackend>,
    pub config: config::Config,
    pub format: output::OutputFormat,
    pub assume_yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::Config::load().unwrap_or_default();
    let _log_guard = logging::LoggingConfig::from(&config.logging)
        .with_env_overrides()
        .init()?;

    let command = match cli.command {
        Commands::Completions { shell } => {
            generate_completions(shell);
            return Ok(());
        }
        Commands::Config { command } => {
            return commands::config::handle_config_command(command, &mut config);
        }
        command => command,
    };

    if let Some(server) = cli.server {
        config.server = server;
    }
    if let Some(endpoint) = cli.endpoint {
        config.endpoint_id = endpoint;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }

    let api_client = api::ApiClient::new(&config.server);
    if let Some(token) = &config.token {
        api_client.set_token(token.clone()).await;
    }

    let ctx = Context {
        backend: Arc::new(backend::HttpBackend::new(api_client, config.endpoint_id)),
        format: output::OutputFormat::from_str(&config.output),
        assume_yes: cli.yes,
        config,
    };
    tracing::debug!(server = %ctx.config.server, endpoint = ctx.config.endpoint_id, "Running command");

    match command {
        Commands::Azure { command } => commands::azure::handle_azure_command(command, &ctx).await?,
        Commands::Pool { command } => commands::pool::handle_pool_command(command, &ctx).await?,
        Commands::Endpoints { command } => {
            commands::endpoints::handle_endpoint_command(command, &ctx).await?
        }
        Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut io::stdout());
}
