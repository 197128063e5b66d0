//! Resource pool edit controller
//!
//! Loads a namespace's quota, cluster capacity, events, applications and
//! ingresses, lets the admin edit the quota and per-class ingress settings,
//! and saves the result as quota and ingress create/update/delete calls.

use crate::helpers::form_validation::{self, FormValueDuplicate};
use crate::helpers::{events, namespace, resource_reservation};
use crate::kubernetes::form_values::{AnnotationFormValue, QuotaDefaults, ResourcePoolFormValues};
use crate::kubernetes::ingress::{self, IngressChange};
use crate::notifications::{notify_failure, Notifier};
use crate::services::{
    ApplicationService, EventService, IngressService, ModalService, Navigator, NodeService,
    ResourcePoolService, ResourceQuotaService, TabStorage,
};
use futures::future::try_join_all;
use portside_common::endpoint::Endpoint;
use portside_common::kubernetes::{Application, Event, Ingress, ResourcePool, ResourceQuota};
use portside_common::{Error, Result};
use serde::Serialize;
use std::sync::Arc;

/// Tab memory key of this view
pub const TAB_STORAGE_KEY: &str = "resourcePool";

/// Index of the YAML editor tab
pub const EDITOR_TAB: usize = 2;

const QUOTA_REDUCTION_WARNING: &str = "Reducing the quota assigned to an \"in-use\" resource pool may have unintended consequences, including preventing running applications from functioning correctly and potentially even blocking them from running at all.";
const INGRESS_DEACTIVATION_WARNING: &str = "Deactivating ingresses may cause applications to be unaccessible. All ingress configurations from affected applications will be removed.";
const CONFIRMATION_QUESTION: &str = "Do you wish to continue?";

/// Collaborators of the resource pool view
#[derive(Clone)]
pub struct ResourcePoolServices {
    pub nodes: Arc<dyn NodeService>,
    pub pools: Arc<dyn ResourcePoolService>,
    pub quotas: Arc<dyn ResourceQuotaService>,
    pub events: Arc<dyn EventService>,
    pub applications: Arc<dyn ApplicationService>,
    pub ingresses: Arc<dyn IngressService>,
    pub notifier: Arc<dyn Notifier>,
    pub modal: Arc<dyn ModalService>,
    pub navigator: Arc<dyn Navigator>,
    pub tabs: Arc<dyn TabStorage>,
}

impl ResourcePoolServices {
    /// Use one backend for every Kubernetes call
    pub fn from_backend<B>(
        backend: Arc<B>,
        notifier: Arc<dyn Notifier>,
        modal: Arc<dyn ModalService>,
        navigator: Arc<dyn Navigator>,
        tabs: Arc<dyn TabStorage>,
    ) -> Self
    where
        B: NodeService
            + ResourcePoolService
            + ResourceQuotaService
            + EventService
            + ApplicationService
            + IngressService
            + 'static,
    {
        Self {
            nodes: backend.clone(),
            pools: backend.clone(),
            quotas: backend.clone(),
            events: backend.clone(),
            applications: backend.clone(),
            ingresses: backend,
            notifier,
            modal,
            navigator,
            tabs,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourcePoolState {
    pub action_in_progress: bool,
    /// Cluster memory in megabytes
    pub slider_max_memory: u64,
    /// Cluster CPU in cores
    pub slider_max_cpu: f64,
    /// Share of the CPU limit in use, in percent
    pub cpu_usage: f64,
    pub cpu_used: f64,
    /// Share of the memory limit in use, in percent
    pub memory_usage: f64,
    /// Megabytes
    pub memory_used: u64,
    pub active_tab: usize,
    /// Route the view was opened on
    pub current_name: String,
    pub show_editor_tab: bool,
    pub events_loading: bool,
    pub applications_loading: bool,
    pub ingresses_loading: bool,
    pub view_ready: bool,
    pub event_warning_count: usize,
    pub can_use_ingress: bool,
    pub ingress_host_duplicates: FormValueDuplicate,
}

/// Consequences of the pending update the admin must acknowledge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateWarnings {
    pub quota: bool,
    pub ingress: bool,
}

impl UpdateWarnings {
    /// Confirmation text, or `None` when nothing needs confirming
    pub fn message(&self) -> Option<String> {
        if !self.quota && !self.ingress {
            return None;
        }

        let mut parts = Vec::new();
        if self.quota {
            parts.push(QUOTA_REDUCTION_WARNING);
        }
        if self.ingress {
            parts.push(INGRESS_DEACTIVATION_WARNING);
        }
        parts.push(CONFIRMATION_QUESTION);

        Some(parts.join("\n\n"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Failed,
    /// The admin declined the confirmation; nothing was sent
    Cancelled,
}

pub struct ResourcePoolController {
    services: ResourcePoolServices,
    endpoint: Endpoint,
    is_admin: bool,
    defaults: QuotaDefaults,
    name: String,
    pub state: ResourcePoolState,
    pub form_values: ResourcePoolFormValues,
    pub pool: Option<ResourcePool>,
    /// Quota as loaded, for reduction warnings
    pub old_quota: Option<ResourceQuota>,
    pub events: Vec<Event>,
    pub applications: Vec<Application>,
    /// Ingresses of every namespace
    pub all_ingresses: Vec<Ingress>,
    /// Ingresses of this namespace
    pub ingresses: Vec<Ingress>,
    pub is_editable: bool,
}

impl ResourcePoolController {
    pub fn new(
        services: ResourcePoolServices,
        endpoint: Endpoint,
        is_admin: bool,
        defaults: QuotaDefaults,
        current_route: &str,
    ) -> Self {
        let state = ResourcePoolState {
            current_name: current_route.to_string(),
            events_loading: true,
            applications_loading: true,
            ingresses_loading: true,
            can_use_ingress: endpoint.supports_ingress(),
            ..Default::default()
        };

        let mut form_values = ResourcePoolFormValues::new(&defaults);
        form_values.has_quota = false;

        Self {
            services,
            endpoint,
            is_admin,
            defaults,
            name: String::new(),
            state,
            form_values,
            pool: None,
            old_quota: None,
            events: Vec::new(),
            applications: Vec::new(),
            all_ingresses: Vec::new(),
            ingresses: Vec::new(),
            is_editable: false,
        }
    }

    /// Only administrators may change user namespaces
    pub fn can_edit(&self) -> bool {
        self.is_admin && self.is_editable
    }

    /// Namespace being edited
    pub fn namespace(&self) -> &str {
        self.pool
            .as_ref()
            .map(|pool| pool.namespace.name.as_str())
            .unwrap_or(&self.name)
    }

    /// Load everything the view shows. Failures are reported, never returned.
    pub async fn init(&mut self, name: &str) {
        self.name = name.to_string();
        self.state.active_tab = self.services.tabs.get_active_tab(TAB_STORAGE_KEY);

        if let Err(err) = self.load(name).await {
            notify_failure(self.services.notifier.as_ref(), &err, "Unable to load view data");
        }

        self.state.view_ready = true;
    }

    async fn load(&mut self, name: &str) -> Result<()> {
        tracing::debug!(pool = name, "Loading resource pool");

        let (nodes, pool) = futures::try_join!(
            self.services.nodes.nodes(),
            self.services.pools.pool(name)
        )?;

        let mut memory_bytes: u64 = 0;
        let mut cpu = 0.0;
        for node in &nodes {
            let node_memory = resource_reservation::parse_size(&node.memory)?;
            memory_bytes = memory_bytes.saturating_add(node_memory);
            cpu += node.cpu;
        }
        self.state.slider_max_memory = resource_reservation::mega_bytes_value(memory_bytes);
        self.state.slider_max_cpu = cpu;

        if let Some(quota) = &pool.quota {
            self.old_quota = Some(quota.clone());
            self.form_values.has_quota = true;
            self.form_values.cpu_limit = quota.cpu_limit;
            self.form_values.memory_limit = resource_reservation::mega_bytes_value(quota.memory_limit);

            self.state.cpu_used = quota.cpu_limit_used;
            self.state.memory_used = resource_reservation::mega_bytes_value(quota.memory_limit_used);
            if quota.cpu_limit > 0.0 {
                self.state.cpu_usage = quota.cpu_limit_used / quota.cpu_limit * 100.0;
            }
            if quota.memory_limit > 0 {
                self.state.memory_usage =
                    quota.memory_limit_used as f64 / quota.memory_limit as f64 * 100.0;
            }
        }

        self.is_editable = namespace::is_editable_namespace(&pool.namespace.name);
        self.pool = Some(pool);

        self.get_events().await;
        self.get_applications().await;

        if self.state.can_use_ingress {
            self.get_ingresses().await;
            self.form_values.ingress_classes = ingress::ingress_classes_to_form_values(
                &self.endpoint.kubernetes.configuration.ingress_classes,
                &self.ingresses,
            );
        }

        Ok(())
    }

    pub async fn get_events(&mut self) {
        self.state.events_loading = true;
        let namespace = self.namespace().to_string();

        match self.services.events.events(&namespace).await {
            Ok(events) => {
                self.state.event_warning_count = events::warning_count(&events);
                self.events = events;
            }
            Err(err) => notify_failure(
                self.services.notifier.as_ref(),
                &err,
                "Unable to retrieve resource pool related events",
            ),
        }

        self.state.events_loading = false;
    }

    pub fn has_event_warnings(&self) -> bool {
        self.state.event_warning_count > 0
    }

    pub async fn get_applications(&mut self) {
        self.state.applications_loading = true;

        match self.load_applications().await {
            Ok(applications) => self.applications = applications,
            Err(err) => notify_failure(
                self.services.notifier.as_ref(),
                &err,
                "Unable to retrieve applications.",
            ),
        }

        self.state.applications_loading = false;
    }

    async fn load_applications(&self) -> Result<Vec<Application>> {
        let mut applications = self.services.applications.applications(self.namespace()).await?;

        for application in &mut applications {
            let reservation = resource_reservation::compute_resource_reservation(&application.pods)?;
            application.cpu = reservation.cpu;
            application.memory = reservation.memory;
        }

        Ok(applications)
    }

    pub async fn get_ingresses(&mut self) {
        self.state.ingresses_loading = true;

        match self.services.ingresses.ingresses().await {
            Ok(all_ingresses) => {
                let namespace = self.namespace().to_string();
                let mut ingresses: Vec<Ingress> = all_ingresses
                    .iter()
                    .filter(|ing| ing.namespace == namespace)
                    .cloned()
                    .collect();

                for path in ingresses.iter_mut().flat_map(|ing| ing.paths.iter_mut()) {
                    let application = self
                        .applications
                        .iter()
                        .find(|app| app.service_name.as_deref() == Some(path.service_name.as_str()))
                        .filter(|app| !app.name.is_empty());
                    path.application_name = Some(
                        application
                            .map(|app| app.name.clone())
                            .unwrap_or_else(|| "-".to_string()),
                    );
                }

                self.all_ingresses = all_ingresses;
                self.ingresses = ingresses;
            }
            Err(err) => notify_failure(
                self.services.notifier.as_ref(),
                &err,
                "Unable to retrieve ingresses.",
            ),
        }

        self.state.ingresses_loading = false;
    }

    /// Recompute host conflicts between ingress classes of this form and
    /// ingresses of other namespaces
    pub fn on_change_ingress_hostname(&mut self) {
        let namespace = self.namespace().to_string();
        let hosts: Vec<Option<&str>> = self
            .form_values
            .ingress_classes
            .iter()
            .map(|fv| fv.host())
            .collect();

        let other_hosts: Vec<&str> = self
            .all_ingresses
            .iter()
            .filter(|ing| ing.namespace != namespace)
            .filter_map(|ing| ing.host.as_deref())
            .filter(|host| !host.is_empty())
            .collect();

        let mut duplicates = form_validation::get_duplicates(&hosts);
        for (index, host) in hosts.iter().enumerate() {
            if let Some(host) = host {
                if other_hosts.contains(host) {
                    duplicates.insert(index, host.to_string());
                }
            }
        }

        self.state.ingress_host_duplicates.set(duplicates);
    }

    pub fn add_annotation(&mut self, class_index: usize) {
        if let Some(fv) = self.form_values.ingress_classes.get_mut(class_index) {
            fv.annotations.push(AnnotationFormValue::default());
        }
    }

    pub fn remove_annotation(&mut self, class_index: usize, index: usize) {
        if let Some(fv) = self.form_values.ingress_classes.get_mut(class_index) {
            if index < fv.annotations.len() {
                fv.annotations.remove(index);
            }
        }
    }

    pub fn select_tab(&mut self, index: usize) {
        self.state.active_tab = index;
        self.services.tabs.store_active_tab(TAB_STORAGE_KEY, index);
    }

    pub fn show_editor(&mut self) {
        self.state.show_editor_tab = true;
        self.select_tab(EDITOR_TAB);
    }

    /// Limits fit the cluster and at least one of them is set
    pub fn is_quota_valid(&self) -> bool {
        let fv = &self.form_values;
        if !is_valid_cpu_limit(fv.cpu_limit) {
            return false;
        }
        !(self.state.slider_max_cpu < fv.cpu_limit
            || self.state.slider_max_memory < fv.memory_limit
            || (fv.cpu_limit == 0.0 && fv.memory_limit == 0))
    }

    pub fn is_update_button_disabled(&self) -> bool {
        self.state.action_in_progress
            || (self.form_values.has_quota && !self.is_quota_valid())
            || self.state.ingress_host_duplicates.has_duplicates
    }

    /// Raise limits below the configured defaults
    pub fn check_defaults(&mut self) {
        if self.form_values.cpu_limit < self.defaults.cpu_limit {
            self.form_values.cpu_limit = self.defaults.cpu_limit;
        }
        if self.form_values.memory_limit < self.defaults.memory_limit {
            self.form_values.memory_limit = self.defaults.memory_limit;
        }
    }

    pub fn has_resource_quota_been_reduced(&self) -> bool {
        match (&self.old_quota, self.form_values.has_quota) {
            (Some(old), true) => {
                let memory_reduced = resource_reservation::bytes_value(self.form_values.memory_limit)
                    .map(|memory_limit| memory_limit < old.memory_limit)
                    .unwrap_or(false);
                self.form_values.cpu_limit < old.cpu_limit || memory_reduced
            }
            _ => false,
        }
    }

    pub fn update_warnings(&self) -> UpdateWarnings {
        UpdateWarnings {
            quota: self.has_resource_quota_been_reduced(),
            ingress: self
                .form_values
                .ingress_classes
                .iter()
                .any(|fv| fv.was_selected && !fv.selected),
        }
    }

    /// Save the form, asking for confirmation first when the update reduces
    /// an in-use quota or deactivates an ingress
    pub async fn update_resource_pool(&mut self) -> UpdateOutcome {
        if let Some(message) = self.update_warnings().message() {
            if !self.services.modal.confirm_update(&message).await {
                tracing::info!(namespace = self.namespace(), "Resource pool update cancelled");
                return UpdateOutcome::Cancelled;
            }
        }

        self.state.action_in_progress = true;
        let outcome = match self.save().await {
            Ok(namespace) => {
                tracing::info!(namespace = %namespace, "Resource pool updated");
                self.services
                    .notifier
                    .success("Resource pool successfully updated", &namespace);
                self.services.navigator.reload();
                UpdateOutcome::Updated
            }
            Err(err) => {
                notify_failure(
                    self.services.notifier.as_ref(),
                    &err,
                    "Unable to create resource pool",
                );
                UpdateOutcome::Failed
            }
        };
        self.state.action_in_progress = false;

        outcome
    }

    /// Quota first, then every ingress change at once
    async fn save(&mut self) -> Result<String> {
        if self.form_values.has_quota && !is_valid_cpu_limit(self.form_values.cpu_limit) {
            return Err(Error::Validation(format!(
                "Invalid CPU limit: {}",
                self.form_values.cpu_limit
            )));
        }
        self.check_defaults();

        let cpu_limit = self.form_values.cpu_limit;
        let pool = self
            .pool
            .as_mut()
            .ok_or_else(|| Error::NotFound(format!("resource pool {}", self.name)))?;
        let namespace = pool.namespace.name.clone();

        if self.form_values.has_quota {
            let memory_limit = resource_reservation::bytes_value(self.form_values.memory_limit)?;
            if let Some(quota) = pool.quota.as_mut() {
                quota.cpu_limit = cpu_limit;
                quota.memory_limit = memory_limit;
                tracing::debug!(namespace = %namespace, cpu_limit, memory_limit, "Updating resource quota");
                self.services.quotas.update_quota(quota).await?;
            } else {
                let mut quota = ResourceQuota::new(&namespace);
                quota.cpu_limit = cpu_limit;
                quota.memory_limit = memory_limit;
                quota.resource_pool_name = namespace.clone();
                quota.resource_pool_owner = pool.namespace.resource_pool_owner.clone();
                tracing::debug!(namespace = %namespace, cpu_limit, memory_limit, "Creating resource quota");
                self.services.quotas.create_quota(&quota).await?;
            }
        } else if let Some(quota) = &pool.quota {
            tracing::debug!(namespace = %namespace, quota = %quota.name, "Deleting resource quota");
            self.services.quotas.delete_quota(quota).await?;
        }

        for fv in &mut self.form_values.ingress_classes {
            fv.namespace = namespace.clone();
        }
        let changes =
            ingress::plan_ingress_changes(&self.form_values.ingress_classes, &self.ingresses)?;

        let service = &self.services.ingresses;
        try_join_all(changes.iter().map(|change| async move {
            tracing::debug!(ingress = change.name(), change = ?change, "Applying ingress change");
            match change {
                IngressChange::Create(ingress) => service.create_ingress(ingress).await,
                IngressChange::Delete(ingress) => service.delete_ingress(ingress).await,
                IngressChange::Patch { old, new } => service.patch_ingress(old, new).await,
            }
        }))
        .await?;

        Ok(namespace)
    }

    /// Forget the active tab when leaving for another view
    pub fn on_destroy(&self, next_route: &str) {
        if self.state.current_name != next_route {
            self.services.tabs.store_active_tab(TAB_STORAGE_KEY, 0);
        }
    }
}

/// CPU limits are finite, non-negative core counts
pub fn is_valid_cpu_limit(cpu_limit: f64) -> bool {
    cpu_limit.is_finite() && cpu_limit >= 0.0
}
