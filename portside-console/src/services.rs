//! Backend collaborators
//!
//! Controllers never talk to the network directly. Every backend call goes
//! through one of these traits so the view layer decides how requests are
//! made (REST client, in-memory fake, ...).

use async_trait::async_trait;
use portside_common::azure::{
    ContainerGroup, ContainerInstanceProvider, ResourceGroup, Subscription,
};
use portside_common::kubernetes::{
    Application, Event, Ingress, Node, ResourcePool, ResourceQuota,
};
use portside_common::Result;
use std::collections::HashMap;

/// Azure subscription, resource group and container-instance calls
#[async_trait]
pub trait AzureService: Send + Sync {
    async fn subscriptions(&self) -> Result<Vec<Subscription>>;

    /// Resource groups keyed by subscription id
    async fn resource_groups(
        &self,
        subscriptions: &[Subscription],
    ) -> Result<HashMap<String, Vec<ResourceGroup>>>;

    /// Container-instance providers keyed by subscription id
    async fn container_instance_providers(
        &self,
        subscriptions: &[Subscription],
    ) -> Result<HashMap<String, ContainerInstanceProvider>>;

    async fn create_container_group(
        &self,
        model: &ContainerGroup,
        subscription_id: &str,
        resource_group_name: &str,
    ) -> Result<()>;
}

#[async_trait]
pub trait NodeService: Send + Sync {
    async fn nodes(&self) -> Result<Vec<Node>>;
}

#[async_trait]
pub trait ResourcePoolService: Send + Sync {
    async fn pool(&self, name: &str) -> Result<ResourcePool>;
}

#[async_trait]
pub trait ResourceQuotaService: Send + Sync {
    async fn create_quota(&self, quota: &ResourceQuota) -> Result<()>;
    async fn update_quota(&self, quota: &ResourceQuota) -> Result<()>;
    async fn delete_quota(&self, quota: &ResourceQuota) -> Result<()>;
}

#[async_trait]
pub trait EventService: Send + Sync {
    async fn events(&self, namespace: &str) -> Result<Vec<Event>>;
}

#[async_trait]
pub trait ApplicationService: Send + Sync {
    async fn applications(&self, namespace: &str) -> Result<Vec<Application>>;
}

#[async_trait]
pub trait IngressService: Send + Sync {
    /// Ingresses across all namespaces
    async fn ingresses(&self) -> Result<Vec<Ingress>>;
    async fn create_ingress(&self, ingress: &Ingress) -> Result<()>;
    async fn patch_ingress(&self, old: &Ingress, new: &Ingress) -> Result<()>;
    async fn delete_ingress(&self, ingress: &Ingress) -> Result<()>;
}

/// Blocking confirmation dialog
#[async_trait]
pub trait ModalService: Send + Sync {
    /// Ask the user to confirm an update; `true` means proceed
    async fn confirm_update(&self, message: &str) -> bool;
}

/// View routing
pub trait Navigator: Send + Sync {
    /// Leave the current view for `route`
    fn go(&self, route: &str);

    /// Reload the current view
    fn reload(&self);
}

/// Per-view "last active tab" memory
pub trait TabStorage: Send + Sync {
    fn get_active_tab(&self, key: &str) -> usize;
    fn store_active_tab(&self, key: &str, index: usize);
}
