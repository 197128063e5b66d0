///! Resource pool commands

use crate::output::{self, OutputFormat};
use crate::ui::{FileTabStore, PromptModal, TerminalNavigator, TerminalNotifier};
use crate::Context;
use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use portside_common::kubernetes::EventKind;
use portside_console::kubernetes::resource_pool::{is_valid_cpu_limit, EDITOR_TAB};
use portside_console::kubernetes::{
    AnnotationFormValue, QuotaDefaults, ResourcePoolController, ResourcePoolServices, UpdateOutcome,
};
use serde::Serialize;
use std::sync::Arc;
use tabled::Tabled;

/// Route of the resource pool view
const POOL_ROUTE: &str = "kubernetes.resourcePools.resourcePool";

const EVENTS_TAB: usize = 1;

#[derive(Subcommand)]
pub enum PoolCommands {
    /// Show capacity, quota, usage, events, applications and ingress classes
    Show {
        /// Resource pool (namespace) name
        name: String,
        /// Switch to a tab: 0 details, 1 events, 2 YAML
        #[arg(long)]
        tab: Option<usize>,
    },
    /// Edit quota and ingress settings
    Edit {
        /// Resource pool (namespace) name
        name: String,
        /// Enable the resource quota
        #[arg(long, conflicts_with = "no_quota")]
        quota: bool,
        /// Remove the resource quota
        #[arg(long)]
        no_quota: bool,
        /// CPU limit in cores
        #[arg(long, value_parser = parse_cpu_limit)]
        cpu: Option<f64>,
        /// Memory limit in MB
        #[arg(long)]
        memory: Option<u64>,
        /// Ingress class to enable, repeatable
        #[arg(long = "enable-ingress")]
        enable_ingress: Vec<String>,
        /// Ingress class to disable, repeatable
        #[arg(long = "disable-ingress")]
        disable_ingress: Vec<String>,
        /// Hostname of an ingress class as CLASS=HOST, repeatable
        #[arg(long = "host", value_parser = parse_class_host)]
        hosts: Vec<(String, String)>,
        /// Annotation of an ingress class as CLASS=KEY=VALUE, repeatable
        #[arg(long = "annotation", value_parser = parse_class_annotation)]
        annotations: Vec<(String, AnnotationFormValue)>,
    },
}

fn parse_cpu_limit(value: &str) -> std::result::Result<f64, String> {
    let cpu: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid CPU limit '{}'", value))?;
    if !is_valid_cpu_limit(cpu) {
        return Err(format!("CPU limit must be a finite, non-negative number, got '{}'", value));
    }
    Ok(cpu)
}

fn parse_class_host(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((class, host)) if !class.is_empty() => Ok((class.to_string(), host.to_string())),
        _ => Err(format!("expected CLASS=HOST, got '{}'", value)),
    }
}

fn parse_class_annotation(
    value: &str,
) -> std::result::Result<(String, AnnotationFormValue), String> {
    let mut parts = value.splitn(3, '=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(class), Some(key), Some(annotation))
            if !class.is_empty() && !key.is_empty() =>
        {
            Ok((
                class.to_string(),
                AnnotationFormValue {
                    key: key.to_string(),
                    value: annotation.to_string(),
                },
            ))
        }
        _ => Err(format!("expected CLASS=KEY=VALUE, got '{}'", value)),
    }
}

#[derive(Tabled, Serialize)]
struct EventRow {
    #[tabled(rename = "type")]
    kind: String,
    reason: String,
    object: String,
    message: String,
    last_seen: String,
}

#[derive(Tabled, Serialize)]
struct ApplicationRow {
    name: String,
    cpu: String,
    memory: String,
}

#[derive(Tabled, Serialize)]
struct IngressClassRow {
    class: String,
    enabled: bool,
    host: String,
    rewrite_target: bool,
    annotations: String,
}

#[derive(Tabled, Serialize)]
struct IngressPathRow {
    ingress: String,
    host: String,
    path: String,
    service: String,
    application: String,
}

async fn load_controller(
    ctx: &Context,
    name: &str,
    notifier: Arc<TerminalNotifier>,
) -> Result<ResourcePoolController> {
    let endpoint = ctx.backend.endpoint().await?;

    let services = ResourcePoolServices::from_backend(
        ctx.backend.clone(),
        notifier.clone(),
        Arc::new(PromptModal::new(ctx.assume_yes)),
        Arc::new(TerminalNavigator),
        Arc::new(FileTabStore::new(ctx.config.tab_store_path()?)),
    );
    let defaults = QuotaDefaults::from(&ctx.config.quota_defaults);
    let mut controller = ResourcePoolController::new(services, endpoint, true, defaults, POOL_ROUTE);

    let spinner = output::spinner(&format!("Loading resource pool '{}'...", name));
    controller.init(name).await;
    spinner.finish_and_clear();

    if controller.pool.is_none() {
        bail!("Resource pool '{}' could not be loaded", name);
    }
    Ok(controller)
}

pub async fn handle_pool_command(command: PoolCommands, ctx: &Context) -> Result<()> {
    let notifier = Arc::new(TerminalNotifier::default());

    match command {
        PoolCommands::Show { name, tab } => {
            let mut controller = load_controller(ctx, &name, notifier.clone()).await?;
            match tab {
                Some(EDITOR_TAB) => controller.show_editor(),
                Some(tab) => controller.select_tab(tab),
                None => {}
            }
            print_pool(&controller, ctx.format)?;
            controller.on_destroy(POOL_ROUTE);
        }

        PoolCommands::Edit {
            name,
            quota,
            no_quota,
            cpu,
            memory,
            enable_ingress,
            disable_ingress,
            hosts,
            annotations,
        } => {
            let mut controller = load_controller(ctx, &name, notifier.clone()).await?;
            if !controller.is_editable {
                bail!("Resource pool '{}' is a system namespace and cannot be edited", name);
            }
            if !controller.can_edit() {
                bail!("Only administrators can edit resource pool '{}'", name);
            }

            if quota || cpu.is_some() || memory.is_some() {
                controller.form_values.has_quota = true;
            }
            if no_quota {
                controller.form_values.has_quota = false;
            }
            if let Some(cpu) = cpu {
                controller.form_values.cpu_limit = cpu;
            }
            if let Some(memory) = memory {
                controller.form_values.memory_limit = memory;
            }

            if !(enable_ingress.is_empty() && disable_ingress.is_empty() && hosts.is_empty() && annotations.is_empty())
                && !controller.state.can_use_ingress
            {
                bail!("Ingresses are not configured on this endpoint");
            }
            for class in &enable_ingress {
                ingress_class(&mut controller, class)?.selected = true;
            }
            for class in &disable_ingress {
                ingress_class(&mut controller, class)?.selected = false;
            }
            for (class, host) in hosts {
                ingress_class(&mut controller, &class)?.host = Some(host);
            }
            for (class, annotation) in annotations {
                let fv = ingress_class(&mut controller, &class)?;
                fv.annotations.retain(|a| a.key != annotation.key);
                fv.annotations.push(annotation);
                fv.advanced_config = true;
            }

            controller.on_change_ingress_hostname();
            if controller.is_update_button_disabled() {
                bail!(refusal_reason(&controller));
            }

            match controller.update_resource_pool().await {
                UpdateOutcome::Updated => {}
                UpdateOutcome::Cancelled => output::print_info("Update cancelled"),
                UpdateOutcome::Failed => bail!("Resource pool update failed"),
            }
            controller.on_destroy(POOL_ROUTE);
        }
    }

    if notifier.failures() > 0 {
        bail!("{} request(s) failed", notifier.failures());
    }
    Ok(())
}

fn ingress_class<'a>(
    controller: &'a mut ResourcePoolController,
    class: &str,
) -> Result<&'a mut portside_console::kubernetes::IngressClassFormValue> {
    controller
        .form_values
        .ingress_class_mut(class)
        .ok_or_else(|| anyhow!("Unknown ingress class '{}'", class))
}

fn refusal_reason(controller: &ResourcePoolController) -> String {
    let duplicates = &controller.state.ingress_host_duplicates;
    if duplicates.has_duplicates {
        let hosts: Vec<&str> = duplicates.refs.values().map(String::as_str).collect();
        return format!("Hostname already in use: {}", hosts.join(", "));
    }

    let fv = &controller.form_values;
    if !is_valid_cpu_limit(fv.cpu_limit) {
        return format!("Invalid CPU limit: {}", fv.cpu_limit);
    }
    if fv.cpu_limit == 0.0 && fv.memory_limit == 0 {
        return "A quota needs a CPU or memory limit".to_string();
    }
    format!(
        "Quota exceeds cluster capacity ({} cores, {})",
        controller.state.slider_max_cpu,
        output::format_megabytes(controller.state.slider_max_memory)
    )
}

#[derive(Serialize)]
struct PoolView<'a> {
    namespace: &'a str,
    editable: bool,
    state: &'a portside_console::kubernetes::ResourcePoolState,
    form: &'a portside_console::kubernetes::ResourcePoolFormValues,
    events: &'a [portside_common::kubernetes::Event],
    applications: &'a [portside_common::kubernetes::Application],
    ingresses: &'a [portside_common::kubernetes::Ingress],
}

fn print_pool(controller: &ResourcePoolController, format: OutputFormat) -> Result<()> {
    if format != OutputFormat::Table {
        let view = PoolView {
            namespace: controller.namespace(),
            editable: controller.can_edit(),
            state: &controller.state,
            form: &controller.form_values,
            events: &controller.events,
            applications: &controller.applications,
            ingresses: &controller.ingresses,
        };
        return output::print_single(&view, format);
    }

    if controller.state.show_editor_tab || controller.state.active_tab == EDITOR_TAB {
        return output::print_yaml(&controller.pool);
    }

    let state = &controller.state;
    let fv = &controller.form_values;
    output::print_heading(&format!("Resource pool {}", controller.namespace()));
    println!(
        "Cluster capacity: {} cores, {}",
        state.slider_max_cpu,
        output::format_megabytes(state.slider_max_memory)
    );
    if fv.has_quota {
        println!(
            "Quota: {} cores ({:.0}% used), {} ({:.0}% used)",
            fv.cpu_limit,
            state.cpu_usage,
            output::format_megabytes(fv.memory_limit),
            state.memory_usage
        );
    } else {
        println!("Quota: none");
    }
    if !controller.is_editable {
        output::print_warning("System namespace, read only");
    }
    if controller.has_event_warnings() {
        output::print_warning(&format!(
            "{} warning event(s) in this namespace",
            state.event_warning_count
        ));
    }

    if state.active_tab == EVENTS_TAB {
        output::print_heading("Events");
        let rows = controller
            .events
            .iter()
            .map(|event| EventRow {
                kind: match event.kind {
                    EventKind::Warning => "Warning".to_string(),
                    EventKind::Normal => "Normal".to_string(),
                    EventKind::Unknown => "-".to_string(),
                },
                reason: event.reason.clone(),
                object: event.involved_object.clone(),
                message: output::truncate(&event.message, 60),
                last_seen: event
                    .last_timestamp
                    .map(output::format_relative_time)
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();
        output::print_table::<EventRow>(rows);
    } else if state.can_use_ingress {
        output::print_heading("Ingress classes");
        let rows = fv
            .ingress_classes
            .iter()
            .map(|class| IngressClassRow {
                class: class.ingress_class.name.clone(),
                enabled: class.selected,
                host: class.host().unwrap_or("-").to_string(),
                rewrite_target: class.rewrite_target,
                annotations: class
                    .annotations
                    .iter()
                    .map(|a| format!("{}={}", output::truncate(&a.key, 40), a.value))
                    .collect::<Vec<_>>()
                    .join("\n"),
            })
            .collect();
        output::print_table::<IngressClassRow>(rows);

        output::print_heading("Ingress routes");
        let rows = controller
            .ingresses
            .iter()
            .flat_map(|ingress| {
                ingress.paths.iter().map(move |path| IngressPathRow {
                    ingress: ingress.name.clone(),
                    host: ingress.host.clone().unwrap_or_else(|| "-".to_string()),
                    path: path.path.clone(),
                    service: format!("{}:{}", path.service_name, path.port),
                    application: path.application_name.clone().unwrap_or_else(|| "-".to_string()),
                })
            })
            .collect();
        output::print_table::<IngressPathRow>(rows);
    }

    output::print_heading("Applications");
    let rows = controller
        .applications
        .iter()
        .map(|app| ApplicationRow {
            name: app.name.clone(),
            cpu: format!("{:.2}", app.cpu),
            memory: output::format_megabytes(portside_console::helpers::resource_reservation::mega_bytes_value(app.memory)),
        })
        .collect();
    output::print_table::<ApplicationRow>(rows);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpu_limit() {
        assert_eq!(parse_cpu_limit("1.5").unwrap(), 1.5);
        assert_eq!(parse_cpu_limit("0").unwrap(), 0.0);
        assert!(parse_cpu_limit("-1").is_err());
        assert!(parse_cpu_limit("NaN").is_err());
        assert!(parse_cpu_limit("inf").is_err());
        assert!(parse_cpu_limit("two").is_err());
    }

    #[test]
    fn test_parse_class_host() {
        assert_eq!(
            parse_class_host("nginx=app.example.com").unwrap(),
            ("nginx".to_string(), "app.example.com".to_string())
        );
        assert_eq!(
            parse_class_host("nginx=").unwrap(),
            ("nginx".to_string(), String::new())
        );
        assert!(parse_class_host("app.example.com").is_err());
        assert!(parse_class_host("=app.example.com").is_err());
    }

    #[test]
    fn test_parse_class_annotation() {
        let (class, annotation) =
            parse_class_annotation("nginx=nginx.ingress.kubernetes.io/proxy-body-size=8m").unwrap();
        assert_eq!(class, "nginx");
        assert_eq!(annotation.key, "nginx.ingress.kubernetes.io/proxy-body-size");
        assert_eq!(annotation.value, "8m");

        let (_, annotation) = parse_class_annotation("traefik=key=a=b").unwrap();
        assert_eq!(annotation.value, "a=b");

        assert!(parse_class_annotation("nginx=key").is_err());
        assert!(parse_class_annotation("nginx==value").is_err());
    }
}
