//! Container instance creation tests

mod common;

use common::*;
use portside_common::azure::{OsType, PortBinding, PortProtocol};
use portside_console::azure::{AzureServices, CreateContainerInstanceController, CONTAINER_INSTANCES_ROUTE};
use std::sync::Arc;

struct Harness {
    azure: Arc<FakeAzure>,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
}

impl Harness {
    fn new(azure: FakeAzure) -> Self {
        Self {
            azure: Arc::new(azure),
            notifier: Arc::new(RecordingNotifier::default()),
            navigator: Arc::new(RecordingNavigator::default()),
        }
    }

    fn controller(&self) -> CreateContainerInstanceController {
        CreateContainerInstanceController::new(AzureServices {
            azure: self.azure.clone(),
            notifier: self.notifier.clone(),
            navigator: self.navigator.clone(),
        })
    }
}

// ============== Initialization ==============

#[tokio::test]
async fn test_init_selects_first_subscription_and_its_defaults() {
    let harness = Harness::new(FakeAzure::populated());
    let mut ctrl = harness.controller();

    ctrl.init().await;

    assert!(ctrl.state.view_ready);
    assert_eq!(ctrl.subscriptions.len(), 2);
    assert_eq!(ctrl.state.selected_subscription.as_ref().unwrap().id, "sub-1");
    assert_eq!(ctrl.resource_groups.len(), 2);
    assert_eq!(ctrl.state.selected_resource_group.as_ref().unwrap().name, "web");
    assert_eq!(ctrl.locations, vec!["westeurope", "northeurope"]);
    assert_eq!(ctrl.model.location, "westeurope");
    assert!(harness.notifier.toasts().is_empty());
}

#[tokio::test]
async fn test_init_loads_groups_and_providers_for_all_subscriptions() {
    let harness = Harness::new(FakeAzure::populated());
    let mut ctrl = harness.controller();

    ctrl.init().await;

    let calls = harness.azure.log.calls();
    assert_eq!(calls[0], "subscriptions");
    assert!(calls.contains(&"resource_groups 2".to_string()));
    assert!(calls.contains(&"providers 2".to_string()));
}

#[tokio::test]
async fn test_init_model_defaults() {
    let harness = Harness::new(FakeAzure::populated());
    let mut ctrl = harness.controller();

    ctrl.init().await;

    assert_eq!(ctrl.model.os_type, OsType::Linux);
    assert!(ctrl.model.allocate_public_ip);
    assert_eq!(ctrl.model.ports, vec![PortBinding::new(80, 80, PortProtocol::Tcp)]);
    assert_eq!(ctrl.model.cpu, 1.0);
    assert_eq!(ctrl.model.memory, 1.0);
}

#[tokio::test]
async fn test_init_without_subscriptions_reports_failure() {
    let harness = Harness::new(FakeAzure::default());
    let mut ctrl = harness.controller();

    ctrl.init().await;

    assert!(!ctrl.state.view_ready);
    let errors = harness.notifier.errors();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        Toast::Error { title, message, .. } => {
            assert_eq!(title, "Failure");
            assert_eq!(message, "Unable to retrieve Azure resources");
        }
        other => panic!("unexpected toast {:?}", other),
    }
}

#[tokio::test]
async fn test_init_reports_one_failure_when_a_lookup_fails() {
    let azure = FakeAzure::populated();
    azure.log.fail("providers");
    let harness = Harness::new(azure);
    let mut ctrl = harness.controller();

    ctrl.init().await;

    assert!(!ctrl.state.view_ready);
    assert_eq!(harness.notifier.errors().len(), 1);
    assert!(ctrl.locations.is_empty());
}

// ============== Subscription selection ==============

#[tokio::test]
async fn test_change_subscription_rederives_groups_and_location() {
    let harness = Harness::new(FakeAzure::populated());
    let mut ctrl = harness.controller();
    ctrl.init().await;

    ctrl.change_subscription("sub-2").unwrap();

    assert_eq!(ctrl.state.selected_subscription.as_ref().unwrap().name, "Lab");
    assert_eq!(ctrl.resource_groups.len(), 1);
    assert_eq!(ctrl.state.selected_resource_group.as_ref().unwrap().name, "sandbox");
    assert_eq!(ctrl.locations, vec!["eastus"]);
    assert_eq!(ctrl.model.location, "eastus");
}

#[tokio::test]
async fn test_change_to_unknown_subscription_is_rejected() {
    let harness = Harness::new(FakeAzure::populated());
    let mut ctrl = harness.controller();
    ctrl.init().await;

    assert!(ctrl.change_subscription("sub-404").is_err());
    assert_eq!(ctrl.state.selected_subscription.as_ref().unwrap().id, "sub-1");
}

#[tokio::test]
async fn test_subscription_without_groups_or_locations() {
    let azure = FakeAzure::populated();
    azure
        .subscriptions
        .lock()
        .unwrap()
        .push(subscription("sub-3", "Empty"));
    let harness = Harness::new(azure);
    let mut ctrl = harness.controller();
    ctrl.init().await;

    ctrl.change_subscription("sub-3").unwrap();

    assert!(ctrl.resource_groups.is_empty());
    assert!(ctrl.state.selected_resource_group.is_none());
    assert!(ctrl.locations.is_empty());
    assert_eq!(ctrl.model.location, "");
}

#[tokio::test]
async fn test_select_resource_group() {
    let harness = Harness::new(FakeAzure::populated());
    let mut ctrl = harness.controller();
    ctrl.init().await;

    ctrl.select_resource_group("batch").unwrap();
    assert_eq!(ctrl.state.selected_resource_group.as_ref().unwrap().name, "batch");

    assert!(ctrl.select_resource_group("sandbox").is_err());
}

// ============== Port bindings ==============

#[tokio::test]
async fn test_add_and_remove_port_bindings() {
    let harness = Harness::new(FakeAzure::populated());
    let mut ctrl = harness.controller();
    ctrl.init().await;

    ctrl.add_port_binding();
    assert_eq!(ctrl.model.ports.len(), 2);
    assert_eq!(ctrl.model.ports[1].protocol, PortProtocol::Tcp);
    assert!(!ctrl.model.ports[1].is_complete());

    ctrl.remove_port_binding(0);
    assert_eq!(ctrl.model.ports.len(), 1);

    ctrl.remove_port_binding(5);
    assert_eq!(ctrl.model.ports.len(), 1);
}

// ============== Creation ==============

#[tokio::test]
async fn test_create_submits_and_navigates() {
    let harness = Harness::new(FakeAzure::populated());
    let mut ctrl = harness.controller();
    ctrl.init().await;
    ctrl.model.name = "web-frontend".to_string();
    ctrl.model.image = "nginx:1.25".to_string();

    assert!(ctrl.create().await);

    let created = harness.azure.created.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0.name, "web-frontend");
    assert_eq!(created[0].1, "sub-1");
    assert_eq!(created[0].2, "web");

    assert_eq!(
        harness.notifier.successes(),
        vec![Toast::Success {
            title: "Container successfully created".to_string(),
            text: "web-frontend".to_string(),
        }]
    );
    assert_eq!(harness.navigator.routes(), vec![CONTAINER_INSTANCES_ROUTE]);
    assert!(!ctrl.state.action_in_progress);
}

#[tokio::test]
async fn test_create_blocked_without_complete_port() {
    let harness = Harness::new(FakeAzure::populated());
    let mut ctrl = harness.controller();
    ctrl.init().await;
    ctrl.remove_port_binding(0);
    ctrl.add_port_binding();

    assert!(!ctrl.create().await);

    assert_eq!(
        ctrl.state.form_validation_error.as_deref(),
        Some("At least one port binding is required")
    );
    assert!(harness.azure.log.calls_to("create_container_group").is_empty());
    assert!(harness.notifier.toasts().is_empty());
}

#[tokio::test]
async fn test_create_clears_previous_validation_error() {
    let harness = Harness::new(FakeAzure::populated());
    let mut ctrl = harness.controller();
    ctrl.init().await;
    ctrl.remove_port_binding(0);
    assert!(!ctrl.create().await);

    ctrl.model.ports.push(PortBinding::new(8080, 80, PortProtocol::Udp));
    assert!(ctrl.create().await);
    assert!(ctrl.state.form_validation_error.is_none());
}

#[tokio::test]
async fn test_create_requires_resource_group() {
    let azure = FakeAzure::populated();
    azure
        .subscriptions
        .lock()
        .unwrap()
        .push(subscription("sub-3", "Empty"));
    let harness = Harness::new(azure);
    let mut ctrl = harness.controller();
    ctrl.init().await;
    ctrl.change_subscription("sub-3").unwrap();

    assert!(!ctrl.create().await);
    assert!(ctrl.state.form_validation_error.is_some());
    assert!(harness.azure.log.calls_to("create_container_group").is_empty());
}

#[tokio::test]
async fn test_create_failure_reports_error_and_stays() {
    let azure = FakeAzure::populated();
    azure.log.fail("create_container_group");
    let harness = Harness::new(azure);
    let mut ctrl = harness.controller();
    ctrl.init().await;
    ctrl.model.name = "web-frontend".to_string();

    assert!(ctrl.create().await);

    assert!(!ctrl.state.action_in_progress);
    assert!(harness.navigator.routes().is_empty());
    assert_eq!(
        harness.notifier.errors(),
        vec![Toast::Error {
            title: "Failure".to_string(),
            message: "Unable to create container".to_string(),
            detail: "backend rejected create_container_group".to_string(),
        }]
    );
}
