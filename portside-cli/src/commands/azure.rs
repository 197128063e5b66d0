///! Azure container instance commands

use crate::output::{self, OutputFormat};
use crate::ui::{TerminalNavigator, TerminalNotifier};
use crate::Context;
use anyhow::{bail, Result};
use clap::{Subcommand, ValueEnum};
use portside_common::azure::{OsType, PortBinding, PortProtocol};
use portside_console::azure::{AzureServices, CreateContainerInstanceController};
use serde::Serialize;
use std::sync::Arc;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum AzureCommands {
    /// Create a container instance
    Create {
        /// Container group name
        #[arg(short, long)]
        name: String,
        /// Container image
        #[arg(short, long)]
        image: String,
        /// Subscription ID (defaults to the first subscription)
        #[arg(long)]
        subscription: Option<String>,
        /// Resource group name (defaults to the first group of the subscription)
        #[arg(long)]
        resource_group: Option<String>,
        /// Location (defaults to the first location of the subscription)
        #[arg(long)]
        location: Option<String>,
        /// CPU cores
        #[arg(long, default_value_t = 1.0)]
        cpu: f64,
        /// Memory in GB
        #[arg(long, default_value_t = 1.0)]
        memory: f64,
        /// Port binding HOST:CONTAINER[/tcp|udp], repeatable (default 80:80/tcp)
        #[arg(short, long = "port", value_parser = parse_port_binding)]
        ports: Vec<PortBinding>,
        /// Do not allocate a public IP
        #[arg(long)]
        no_public_ip: bool,
        /// Operating system
        #[arg(long, value_enum, default_value = "linux")]
        os: OsArg,
    },
    /// List subscriptions with their resource groups and locations
    Resources,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OsArg {
    Linux,
    Windows,
}

impl From<OsArg> for OsType {
    fn from(os: OsArg) -> Self {
        match os {
            OsArg::Linux => OsType::Linux,
            OsArg::Windows => OsType::Windows,
        }
    }
}

#[derive(Tabled, Serialize)]
struct SubscriptionRow {
    subscription: String,
    id: String,
    resource_groups: String,
    locations: String,
}

/// Parse `HOST:CONTAINER[/PROTO]`
fn parse_port_binding(value: &str) -> std::result::Result<PortBinding, String> {
    let (ports, protocol) = match value.split_once('/') {
        Some((ports, protocol)) => (ports, protocol),
        None => (value, "tcp"),
    };

    let protocol = match protocol.to_ascii_lowercase().as_str() {
        "tcp" => PortProtocol::Tcp,
        "udp" => PortProtocol::Udp,
        other => return Err(format!("unknown protocol '{}'", other)),
    };

    let (host, container) = ports
        .split_once(':')
        .ok_or_else(|| format!("expected HOST:CONTAINER, got '{}'", value))?;
    let host: u16 = host
        .trim()
        .parse()
        .map_err(|_| format!("invalid host port '{}'", host))?;
    let container: u16 = container
        .trim()
        .parse()
        .map_err(|_| format!("invalid container port '{}'", container))?;

    Ok(PortBinding::new(host, container, protocol))
}

fn services(ctx: &Context, notifier: Arc<TerminalNotifier>) -> AzureServices {
    AzureServices {
        azure: ctx.backend.clone(),
        notifier,
        navigator: Arc::new(TerminalNavigator),
    }
}

pub async fn handle_azure_command(command: AzureCommands, ctx: &Context) -> Result<()> {
    let notifier = Arc::new(TerminalNotifier::default());
    let mut controller = CreateContainerInstanceController::new(services(ctx, notifier.clone()));

    let spinner = output::spinner("Loading Azure resources...");
    controller.init().await;
    spinner.finish_and_clear();
    if !controller.state.view_ready {
        bail!("Azure resources are unavailable");
    }

    match command {
        AzureCommands::Resources => {
            let subscriptions = controller.subscriptions.clone();
            let mut rows = Vec::with_capacity(subscriptions.len());
            for subscription in subscriptions {
                controller.change_subscription(&subscription.id)?;
                rows.push(SubscriptionRow {
                    subscription: subscription.name,
                    id: subscription.id,
                    resource_groups: controller
                        .resource_groups
                        .iter()
                        .map(|g| g.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    locations: controller.locations.join(", "),
                });
            }
            output::print_output(rows, ctx.format)?;
        }

        AzureCommands::Create {
            name,
            image,
            subscription,
            resource_group,
            location,
            cpu,
            memory,
            ports,
            no_public_ip,
            os,
        } => {
            if let Some(subscription) = subscription {
                controller.change_subscription(&subscription)?;
            }
            if let Some(resource_group) = resource_group {
                controller.select_resource_group(&resource_group)?;
            }
            if let Some(location) = location {
                if !controller.locations.contains(&location) {
                    bail!(
                        "Location '{}' is not available (available: {})",
                        location,
                        controller.locations.join(", ")
                    );
                }
                controller.model.location = location;
            }

            let model = &mut controller.model;
            model.name = name;
            model.image = image;
            model.cpu = cpu;
            model.memory = memory;
            model.os_type = os.into();
            model.allocate_public_ip = !no_public_ip;
            if !ports.is_empty() {
                model.ports = ports;
            }

            let spinner = output::spinner(&format!("Creating container group '{}'...", controller.model.name));
            let submitted = controller.create().await;
            spinner.finish_and_clear();

            if !submitted {
                let reason = controller
                    .state
                    .form_validation_error
                    .clone()
                    .unwrap_or_else(|| "Invalid form".to_string());
                bail!(reason);
            }
            if notifier.failures() > 0 {
                bail!("Container creation failed");
            }

            if ctx.format != OutputFormat::Table {
                output::print_single(&controller.model, ctx.format)?;
            }
        }
    }

    Ok(())
}
