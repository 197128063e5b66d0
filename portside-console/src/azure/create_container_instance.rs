///! Container instance creation form

use crate::notifications::{notify_failure, Notifier};
use crate::services::{AzureService, Navigator};
use portside_common::azure::{
    ContainerGroup, ContainerInstanceProvider, PortBinding, ResourceGroup, Subscription,
};
use portside_common::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// View shown after a successful creation
pub const CONTAINER_INSTANCES_ROUTE: &str = "azure.containerinstances";

const PORT_BINDING_REQUIRED: &str = "At least one port binding is required";
const SELECTION_REQUIRED: &str = "A subscription and a resource group are required";

#[derive(Clone)]
pub struct AzureServices {
    pub azure: Arc<dyn AzureService>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateContainerInstanceState {
    pub action_in_progress: bool,
    pub selected_subscription: Option<Subscription>,
    pub selected_resource_group: Option<ResourceGroup>,
    /// Inline error blocking submission
    pub form_validation_error: Option<String>,
    /// Reference data has been loaded
    pub view_ready: bool,
}

/// Inline error for a model that cannot be submitted
pub fn validate_form(model: &ContainerGroup) -> Option<String> {
    if model.ports.is_empty() || model.ports.iter().all(|port| !port.is_complete()) {
        return Some(PORT_BINDING_REQUIRED.to_string());
    }
    None
}

pub struct CreateContainerInstanceController {
    services: AzureServices,
    all_resource_groups: HashMap<String, Vec<ResourceGroup>>,
    all_providers: HashMap<String, ContainerInstanceProvider>,
    pub state: CreateContainerInstanceState,
    pub subscriptions: Vec<Subscription>,
    /// Resource groups of the selected subscription
    pub resource_groups: Vec<ResourceGroup>,
    /// Locations offered by the selected subscription
    pub locations: Vec<String>,
    pub model: ContainerGroup,
}

impl CreateContainerInstanceController {
    pub fn new(services: AzureServices) -> Self {
        Self {
            services,
            all_resource_groups: HashMap::new(),
            all_providers: HashMap::new(),
            state: CreateContainerInstanceState::default(),
            subscriptions: Vec::new(),
            resource_groups: Vec::new(),
            locations: Vec::new(),
            model: ContainerGroup::default(),
        }
    }

    /// Load subscriptions, then their resource groups and providers
    pub async fn init(&mut self) {
        if let Err(err) = self.load().await {
            notify_failure(
                self.services.notifier.as_ref(),
                &err,
                "Unable to retrieve Azure resources",
            );
        }
    }

    async fn load(&mut self) -> Result<()> {
        let subscriptions = self.services.azure.subscriptions().await?;
        let first = subscriptions
            .first()
            .cloned()
            .ok_or_else(|| Error::NotFound("Azure subscription".to_string()))?;
        self.state.selected_subscription = Some(first.clone());
        self.subscriptions = subscriptions;

        let (resource_groups, providers) = futures::try_join!(
            self.services.azure.resource_groups(&self.subscriptions),
            self.services
                .azure
                .container_instance_providers(&self.subscriptions)
        )?;
        tracing::debug!(
            subscriptions = self.subscriptions.len(),
            resource_groups = resource_groups.len(),
            "Loaded Azure resources"
        );

        self.all_resource_groups = resource_groups;
        self.all_providers = providers;
        self.model = ContainerGroup::default();
        self.update_resource_groups_and_locations(&first.id);
        self.state.view_ready = true;

        Ok(())
    }

    /// Select another subscription and re-derive its defaults
    pub fn change_subscription(&mut self, subscription_id: &str) -> Result<()> {
        let subscription = self
            .subscriptions
            .iter()
            .find(|s| s.id == subscription_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Azure subscription {}", subscription_id)))?;

        self.state.selected_subscription = Some(subscription);
        self.update_resource_groups_and_locations(subscription_id);
        Ok(())
    }

    /// Select a resource group of the current subscription by name
    pub fn select_resource_group(&mut self, name: &str) -> Result<()> {
        let group = self
            .resource_groups
            .iter()
            .find(|g| g.name == name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("resource group {}", name)))?;

        self.state.selected_resource_group = Some(group);
        Ok(())
    }

    fn update_resource_groups_and_locations(&mut self, subscription_id: &str) {
        self.resource_groups = self
            .all_resource_groups
            .get(subscription_id)
            .cloned()
            .unwrap_or_default();
        self.state.selected_resource_group = self.resource_groups.first().cloned();

        self.locations = self
            .all_providers
            .get(subscription_id)
            .map(|provider| provider.locations.clone())
            .unwrap_or_default();
        self.model.location = self.locations.first().cloned().unwrap_or_default();
    }

    pub fn add_port_binding(&mut self) {
        self.model.ports.push(PortBinding::default());
    }

    pub fn remove_port_binding(&mut self, index: usize) {
        if index < self.model.ports.len() {
            self.model.ports.remove(index);
        }
    }

    /// Submit the form. Returns `false` when validation blocked submission.
    pub async fn create(&mut self) -> bool {
        self.state.form_validation_error = validate_form(&self.model);
        if self.state.form_validation_error.is_some() {
            return false;
        }

        let (subscription_id, resource_group_name) = match (
            &self.state.selected_subscription,
            &self.state.selected_resource_group,
        ) {
            (Some(subscription), Some(group)) => (subscription.id.clone(), group.name.clone()),
            _ => {
                self.state.form_validation_error = Some(SELECTION_REQUIRED.to_string());
                return false;
            }
        };

        self.state.action_in_progress = true;
        tracing::info!(
            name = %self.model.name,
            subscription = %subscription_id,
            resource_group = %resource_group_name,
            "Creating container group"
        );

        match self
            .services
            .azure
            .create_container_group(&self.model, &subscription_id, &resource_group_name)
            .await
        {
            Ok(()) => {
                self.services
                    .notifier
                    .success("Container successfully created", &self.model.name);
                self.services.navigator.go(CONTAINER_INSTANCES_ROUTE);
            }
            Err(err) => notify_failure(
                self.services.notifier.as_ref(),
                &err,
                "Unable to create container",
            ),
        }

        self.state.action_in_progress = false;
        true
    }
}
