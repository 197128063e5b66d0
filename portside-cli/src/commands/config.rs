///! Configuration commands

use crate::config::Config;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set the default endpoint
    UseEndpoint {
        /// Endpoint ID
        id: u32,
    },
    /// Set the API server address
    SetServer {
        /// Server URL
        url: String,
    },
    /// Store the API token
    SetToken {
        /// Bearer token
        token: String,
    },
}

pub fn handle_config_command(command: ConfigCommands, config: &mut Config) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let mut shown = config.clone();
            if shown.token.is_some() {
                shown.token = Some("********".to_string());
            }
            let format = match OutputFormat::from_str(&config.output) {
                OutputFormat::Json => OutputFormat::Json,
                _ => OutputFormat::Yaml,
            };
            output::print_single(&shown, format)?;
            return Ok(());
        }
        ConfigCommands::UseEndpoint { id } => config.endpoint_id = id,
        ConfigCommands::SetServer { url } => config.server = url,
        ConfigCommands::SetToken { token } => config.token = Some(token),
    }

    config.save()?;
    output::print_success("Configuration saved");
    Ok(())
}
