///! Endpoint selection commands

use crate::output;
use crate::Context;
use anyhow::{bail, Result};
use clap::Subcommand;
use portside_common::endpoint::Endpoint;
use portside_console::MultiEndpointSelector;
use serde::Serialize;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum EndpointCommands {
    /// List endpoints by group, hiding groups without endpoints
    Select {
        /// Restrict the selection to these endpoint IDs, repeatable
        #[arg(long = "endpoint-id")]
        endpoint_ids: Vec<u32>,
    },
}

#[derive(Tabled, Serialize)]
struct EndpointRow {
    group: String,
    id: u32,
    name: String,
    tags: String,
}

/// Keep the requested endpoints; no ids means all of them
fn select_endpoints(endpoints: Vec<Endpoint>, ids: &[u32]) -> Vec<Endpoint> {
    if ids.is_empty() {
        return endpoints;
    }
    endpoints
        .into_iter()
        .filter(|endpoint| ids.contains(&endpoint.id))
        .collect()
}

pub async fn handle_endpoint_command(command: EndpointCommands, ctx: &Context) -> Result<()> {
    match command {
        EndpointCommands::Select { endpoint_ids } => {
            let (endpoints, groups, tags) = futures::try_join!(
                ctx.backend.endpoints(),
                ctx.backend.endpoint_groups(),
                ctx.backend.tags()
            )?;

            let endpoints = select_endpoints(endpoints, &endpoint_ids);
            if endpoints.is_empty() && !endpoint_ids.is_empty() {
                bail!("No endpoint matches the requested IDs");
            }
            tracing::debug!(endpoints = endpoints.len(), groups = groups.len(), "Building endpoint selector");

            let selector = MultiEndpointSelector::new(endpoints, groups, tags);
            let rows: Vec<EndpointRow> = selector
                .grouped()
                .into_iter()
                .flat_map(|(group, members)| {
                    let selector = &selector;
                    members.into_iter().map(move |endpoint| EndpointRow {
                        group: group.name.clone(),
                        id: endpoint.id,
                        name: endpoint.name.clone(),
                        tags: selector.tag_ids_to_tag_names(&endpoint.tag_ids).join(", "),
                    })
                })
                .collect();

            output::print_output(rows, ctx.format)?;
        }
    }

    Ok(())
}
