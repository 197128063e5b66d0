//! Common test utilities and in-memory collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use portside_common::azure::{
    ContainerGroup, ContainerInstanceProvider, ResourceGroup, Subscription,
};
use portside_common::endpoint::{Endpoint, KubernetesConfiguration, KubernetesSettings};
use portside_common::kubernetes::{
    Application, Event, Ingress, IngressClass, IngressClassType, Namespace, Node, ResourcePool,
    ResourceQuota,
};
use portside_common::{Error, Result};
use portside_console::services::{
    ApplicationService, AzureService, EventService, IngressService, ModalService, Navigator,
    NodeService, ResourcePoolService, ResourceQuotaService, TabStorage,
};
use portside_console::Notifier;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

fn backend_error(operation: &str) -> Error {
    Error::Api {
        status: 500,
        message: format!("{} failed", operation),
        details: Some(format!("backend rejected {}", operation)),
    }
}

/// Records every call and fails the operations named in `failing`
#[derive(Default)]
pub struct CallLog {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl CallLog {
    pub fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.split(' ').next() == Some(operation))
            .collect()
    }

    pub fn fail(&self, operation: &str) {
        self.failing.lock().unwrap().insert(operation.to_string());
    }

    pub fn check(&self, operation: &str) -> Result<()> {
        if self.failing.lock().unwrap().contains(operation) {
            return Err(backend_error(operation));
        }
        Ok(())
    }
}

// ============== Azure ==============

#[derive(Default)]
pub struct FakeAzure {
    pub subscriptions: Mutex<Vec<Subscription>>,
    pub resource_groups: Mutex<HashMap<String, Vec<ResourceGroup>>>,
    pub providers: Mutex<HashMap<String, ContainerInstanceProvider>>,
    pub created: Mutex<Vec<(ContainerGroup, String, String)>>,
    pub log: CallLog,
}

impl FakeAzure {
    /// Two subscriptions; the first has two resource groups and two locations
    pub fn populated() -> Self {
        let fake = Self::default();

        *fake.subscriptions.lock().unwrap() = vec![
            subscription("sub-1", "Production"),
            subscription("sub-2", "Lab"),
        ];

        let mut groups = HashMap::new();
        groups.insert(
            "sub-1".to_string(),
            vec![
                resource_group("sub-1", "web", "westeurope"),
                resource_group("sub-1", "batch", "northeurope"),
            ],
        );
        groups.insert(
            "sub-2".to_string(),
            vec![resource_group("sub-2", "sandbox", "eastus")],
        );
        *fake.resource_groups.lock().unwrap() = groups;

        let mut providers = HashMap::new();
        providers.insert(
            "sub-1".to_string(),
            provider("sub-1", &["westeurope", "northeurope"]),
        );
        providers.insert("sub-2".to_string(), provider("sub-2", &["eastus"]));
        *fake.providers.lock().unwrap() = providers;

        fake
    }
}

pub fn subscription(id: &str, name: &str) -> Subscription {
    Subscription {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn resource_group(subscription_id: &str, name: &str, location: &str) -> ResourceGroup {
    ResourceGroup {
        id: format!("/subscriptions/{}/resourceGroups/{}", subscription_id, name),
        name: name.to_string(),
        location: location.to_string(),
    }
}

pub fn provider(subscription_id: &str, locations: &[&str]) -> ContainerInstanceProvider {
    ContainerInstanceProvider {
        id: format!(
            "/subscriptions/{}/providers/Microsoft.ContainerInstance",
            subscription_id
        ),
        namespace: "Microsoft.ContainerInstance".to_string(),
        locations: locations.iter().map(|l| l.to_string()).collect(),
    }
}

#[async_trait]
impl AzureService for FakeAzure {
    async fn subscriptions(&self) -> Result<Vec<Subscription>> {
        self.log.record("subscriptions".to_string());
        self.log.check("subscriptions")?;
        Ok(self.subscriptions.lock().unwrap().clone())
    }

    async fn resource_groups(
        &self,
        subscriptions: &[Subscription],
    ) -> Result<HashMap<String, Vec<ResourceGroup>>> {
        self.log
            .record(format!("resource_groups {}", subscriptions.len()));
        self.log.check("resource_groups")?;
        Ok(self.resource_groups.lock().unwrap().clone())
    }

    async fn container_instance_providers(
        &self,
        subscriptions: &[Subscription],
    ) -> Result<HashMap<String, ContainerInstanceProvider>> {
        self.log.record(format!("providers {}", subscriptions.len()));
        self.log.check("providers")?;
        Ok(self.providers.lock().unwrap().clone())
    }

    async fn create_container_group(
        &self,
        model: &ContainerGroup,
        subscription_id: &str,
        resource_group_name: &str,
    ) -> Result<()> {
        self.log.record(format!(
            "create_container_group {} {} {}",
            model.name, subscription_id, resource_group_name
        ));
        self.log.check("create_container_group")?;
        self.created.lock().unwrap().push((
            model.clone(),
            subscription_id.to_string(),
            resource_group_name.to_string(),
        ));
        Ok(())
    }
}

// ============== Kubernetes ==============

#[derive(Default)]
pub struct FakeKubernetes {
    pub nodes: Mutex<Vec<Node>>,
    pub pool: Mutex<Option<ResourcePool>>,
    pub events: Mutex<Vec<Event>>,
    pub applications: Mutex<Vec<Application>>,
    pub ingresses: Mutex<Vec<Ingress>>,
    pub created_quotas: Mutex<Vec<ResourceQuota>>,
    pub updated_quotas: Mutex<Vec<ResourceQuota>>,
    pub created_ingresses: Mutex<Vec<Ingress>>,
    pub patched_ingresses: Mutex<Vec<(Ingress, Ingress)>>,
    pub log: CallLog,
}

impl FakeKubernetes {
    /// Two nodes totalling 6 cores and 6000 MB, and a pool without quota
    pub fn with_pool(namespace: &str) -> Self {
        let fake = Self::default();
        *fake.nodes.lock().unwrap() = vec![
            node("node-1", 2.0, "2000000000"),
            node("node-2", 4.0, "4000000000"),
        ];
        *fake.pool.lock().unwrap() = Some(ResourcePool {
            namespace: Namespace {
                name: namespace.to_string(),
                status: "Active".to_string(),
                resource_pool_owner: Some("admin".to_string()),
            },
            quota: None,
        });
        fake
    }

    pub fn set_quota(&self, quota: ResourceQuota) {
        if let Some(pool) = self.pool.lock().unwrap().as_mut() {
            pool.quota = Some(quota);
        }
    }
}

pub fn node(name: &str, cpu: f64, memory: &str) -> Node {
    Node {
        name: name.to_string(),
        cpu,
        memory: memory.to_string(),
    }
}

pub fn ingress(name: &str, namespace: &str, host: Option<&str>) -> Ingress {
    Ingress {
        name: name.to_string(),
        namespace: namespace.to_string(),
        host: host.map(str::to_string),
        ingress_class_name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn ingress_class(name: &str, class_type: IngressClassType) -> IngressClass {
    IngressClass {
        name: name.to_string(),
        class_type,
    }
}

pub fn endpoint_with_classes(classes: Vec<IngressClass>) -> Endpoint {
    Endpoint {
        id: 1,
        name: "local".to_string(),
        group_id: 1,
        tag_ids: Vec::new(),
        url: "https://kubernetes.local:6443".to_string(),
        kubernetes: KubernetesSettings {
            configuration: KubernetesConfiguration {
                ingress_classes: classes,
                use_load_balancer: false,
                use_server_metrics: false,
            },
        },
    }
}

#[async_trait]
impl NodeService for FakeKubernetes {
    async fn nodes(&self) -> Result<Vec<Node>> {
        self.log.record("nodes".to_string());
        self.log.check("nodes")?;
        Ok(self.nodes.lock().unwrap().clone())
    }
}

#[async_trait]
impl ResourcePoolService for FakeKubernetes {
    async fn pool(&self, name: &str) -> Result<ResourcePool> {
        self.log.record(format!("pool {}", name));
        self.log.check("pool")?;
        self.pool
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::NotFound(format!("resource pool {}", name)))
    }
}

#[async_trait]
impl ResourceQuotaService for FakeKubernetes {
    async fn create_quota(&self, quota: &ResourceQuota) -> Result<()> {
        self.log.record(format!("create_quota {}", quota.name));
        self.log.check("create_quota")?;
        self.created_quotas.lock().unwrap().push(quota.clone());
        Ok(())
    }

    async fn update_quota(&self, quota: &ResourceQuota) -> Result<()> {
        self.log.record(format!("update_quota {}", quota.name));
        self.log.check("update_quota")?;
        self.updated_quotas.lock().unwrap().push(quota.clone());
        Ok(())
    }

    async fn delete_quota(&self, quota: &ResourceQuota) -> Result<()> {
        self.log.record(format!("delete_quota {}", quota.name));
        self.log.check("delete_quota")
    }
}

#[async_trait]
impl EventService for FakeKubernetes {
    async fn events(&self, namespace: &str) -> Result<Vec<Event>> {
        self.log.record(format!("events {}", namespace));
        self.log.check("events")?;
        Ok(self.events.lock().unwrap().clone())
    }
}

#[async_trait]
impl ApplicationService for FakeKubernetes {
    async fn applications(&self, namespace: &str) -> Result<Vec<Application>> {
        self.log.record(format!("applications {}", namespace));
        self.log.check("applications")?;
        Ok(self.applications.lock().unwrap().clone())
    }
}

#[async_trait]
impl IngressService for FakeKubernetes {
    async fn ingresses(&self) -> Result<Vec<Ingress>> {
        self.log.record("ingresses".to_string());
        self.log.check("ingresses")?;
        Ok(self.ingresses.lock().unwrap().clone())
    }

    async fn create_ingress(&self, ingress: &Ingress) -> Result<()> {
        self.log.record(format!("create_ingress {}", ingress.name));
        self.log.check("create_ingress")?;
        self.created_ingresses.lock().unwrap().push(ingress.clone());
        Ok(())
    }

    async fn patch_ingress(&self, old: &Ingress, new: &Ingress) -> Result<()> {
        self.log.record(format!("patch_ingress {}", new.name));
        self.log.check("patch_ingress")?;
        self.patched_ingresses
            .lock()
            .unwrap()
            .push((old.clone(), new.clone()));
        Ok(())
    }

    async fn delete_ingress(&self, ingress: &Ingress) -> Result<()> {
        self.log.record(format!("delete_ingress {}", ingress.name));
        self.log.check("delete_ingress")
    }
}

// ============== View collaborators ==============

#[derive(Debug, Clone, PartialEq)]
pub enum Toast {
    Success { title: String, text: String },
    Error { title: String, message: String, detail: String },
}

#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<Toast> {
        self.toasts()
            .into_iter()
            .filter(|t| matches!(t, Toast::Error { .. }))
            .collect()
    }

    pub fn successes(&self) -> Vec<Toast> {
        self.toasts()
            .into_iter()
            .filter(|t| matches!(t, Toast::Success { .. }))
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, title: &str, text: &str) {
        self.toasts.lock().unwrap().push(Toast::Success {
            title: title.to_string(),
            text: text.to_string(),
        });
    }

    fn error(&self, title: &str, err: &Error, message: &str) {
        self.toasts.lock().unwrap().push(Toast::Error {
            title: title.to_string(),
            message: message.to_string(),
            detail: err.user_detail(),
        });
    }
}

/// Answers every confirmation the same way
pub struct FakeModal {
    answer: bool,
    messages: Mutex<Vec<String>>,
}

impl FakeModal {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModalService for FakeModal {
    async fn confirm_update(&self, message: &str) -> bool {
        self.messages.lock().unwrap().push(message.to_string());
        self.answer
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
    reloads: Mutex<usize>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }

    pub fn reloads(&self) -> usize {
        *self.reloads.lock().unwrap()
    }
}

impl Navigator for RecordingNavigator {
    fn go(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }

    fn reload(&self) {
        *self.reloads.lock().unwrap() += 1;
    }
}

#[derive(Default)]
pub struct MemoryTabs {
    tabs: Mutex<HashMap<String, usize>>,
}

impl MemoryTabs {
    pub fn with(key: &str, index: usize) -> Self {
        let tabs = Self::default();
        tabs.store_active_tab(key, index);
        tabs
    }
}

impl TabStorage for MemoryTabs {
    fn get_active_tab(&self, key: &str) -> usize {
        self.tabs.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    fn store_active_tab(&self, key: &str, index: usize) {
        self.tabs.lock().unwrap().insert(key.to_string(), index);
    }
}

/// Everything a resource pool controller talks to, kept for assertions
pub struct PoolHarness {
    pub backend: Arc<FakeKubernetes>,
    pub notifier: Arc<RecordingNotifier>,
    pub modal: Arc<FakeModal>,
    pub navigator: Arc<RecordingNavigator>,
    pub tabs: Arc<MemoryTabs>,
}

impl PoolHarness {
    pub fn new(backend: FakeKubernetes, confirm: bool) -> Self {
        Self {
            backend: Arc::new(backend),
            notifier: Arc::new(RecordingNotifier::default()),
            modal: Arc::new(FakeModal::answering(confirm)),
            navigator: Arc::new(RecordingNavigator::default()),
            tabs: Arc::new(MemoryTabs::default()),
        }
    }

    pub fn services(&self) -> portside_console::ResourcePoolServices {
        portside_console::ResourcePoolServices::from_backend(
            self.backend.clone(),
            self.notifier.clone(),
            self.modal.clone(),
            self.navigator.clone(),
            self.tabs.clone(),
        )
    }
}
