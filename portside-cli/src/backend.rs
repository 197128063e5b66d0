///! REST implementations of the console collaborators
///!
///! Every call is scoped to one endpoint:
///! `/api/endpoints/{id}/azure/...` and `/api/endpoints/{id}/kubernetes/...`

use crate::api::ApiClient;
use async_trait::async_trait;
use futures::future::try_join_all;
use portside_common::azure::{
    ContainerGroup, ContainerInstanceProvider, ResourceGroup, Subscription,
};
use portside_common::endpoint::{Endpoint, EndpointGroup, Tag};
use portside_common::kubernetes::{
    Application, Event, Ingress, Node, ResourcePool, ResourceQuota,
};
use portside_common::Result;
use portside_console::services::{
    ApplicationService, AzureService, EventService, IngressService, NodeService,
    ResourcePoolService, ResourceQuotaService,
};
use std::collections::HashMap;
use urlencoding::encode;

pub struct HttpBackend {
    api: ApiClient,
    endpoint_id: u32,
}

impl HttpBackend {
    pub fn new(api: ApiClient, endpoint_id: u32) -> Self {
        Self { api, endpoint_id }
    }

    fn azure_path(&self, suffix: &str) -> String {
        format!("/api/endpoints/{}/azure/subscriptions{}", self.endpoint_id, suffix)
    }

    fn kubernetes_path(&self, suffix: &str) -> String {
        format!("/api/endpoints/{}/kubernetes{}", self.endpoint_id, suffix)
    }

    fn namespace_path(&self, namespace: &str, suffix: &str) -> String {
        self.kubernetes_path(&format!("/namespaces/{}{}", encode(namespace), suffix))
    }

    pub async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        self.api.get("/api/endpoints").await
    }

    pub async fn endpoint(&self) -> Result<Endpoint> {
        self.api.get(&format!("/api/endpoints/{}", self.endpoint_id)).await
    }

    pub async fn endpoint_groups(&self) -> Result<Vec<EndpointGroup>> {
        self.api.get("/api/endpoint_groups").await
    }

    pub async fn tags(&self) -> Result<Vec<Tag>> {
        self.api.get("/api/tags").await
    }
}

#[async_trait]
impl AzureService for HttpBackend {
    async fn subscriptions(&self) -> Result<Vec<Subscription>> {
        self.api.get(&self.azure_path("")).await
    }

    async fn resource_groups(
        &self,
        subscriptions: &[Subscription],
    ) -> Result<HashMap<String, Vec<ResourceGroup>>> {
        let groups = try_join_all(subscriptions.iter().map(|subscription| async move {
            let path = self.azure_path(&format!("/{}/resourcegroups", encode(&subscription.id)));
            let groups: Vec<ResourceGroup> = self.api.get(&path).await?;
            Ok::<_, portside_common::Error>((subscription.id.clone(), groups))
        }))
        .await?;

        Ok(groups.into_iter().collect())
    }

    async fn container_instance_providers(
        &self,
        subscriptions: &[Subscription],
    ) -> Result<HashMap<String, ContainerInstanceProvider>> {
        let providers = try_join_all(subscriptions.iter().map(|subscription| async move {
            let path = self.azure_path(&format!(
                "/{}/providers/containerinstance",
                encode(&subscription.id)
            ));
            let provider: ContainerInstanceProvider = self.api.get(&path).await?;
            Ok::<_, portside_common::Error>((subscription.id.clone(), provider))
        }))
        .await?;

        Ok(providers.into_iter().collect())
    }

    async fn create_container_group(
        &self,
        model: &ContainerGroup,
        subscription_id: &str,
        resource_group_name: &str,
    ) -> Result<()> {
        let path = self.azure_path(&format!(
            "/{}/resourcegroups/{}/containergroups/{}",
            encode(subscription_id),
            encode(resource_group_name),
            encode(&model.name)
        ));
        self.api.put_empty(&path, model).await
    }
}

#[async_trait]
impl NodeService for HttpBackend {
    async fn nodes(&self) -> Result<Vec<Node>> {
        self.api.get(&self.kubernetes_path("/nodes")).await
    }
}

#[async_trait]
impl ResourcePoolService for HttpBackend {
    async fn pool(&self, name: &str) -> Result<ResourcePool> {
        self.api
            .get(&self.kubernetes_path(&format!("/pools/{}", encode(name))))
            .await
    }
}

#[async_trait]
impl ResourceQuotaService for HttpBackend {
    async fn create_quota(&self, quota: &ResourceQuota) -> Result<()> {
        self.api
            .post_empty(&self.namespace_path(&quota.namespace, "/quotas"), quota)
            .await
    }

    async fn update_quota(&self, quota: &ResourceQuota) -> Result<()> {
        let path = self.namespace_path(&quota.namespace, &format!("/quotas/{}", encode(&quota.name)));
        self.api.put_empty(&path, quota).await
    }

    async fn delete_quota(&self, quota: &ResourceQuota) -> Result<()> {
        let path = self.namespace_path(&quota.namespace, &format!("/quotas/{}", encode(&quota.name)));
        self.api.delete(&path).await
    }
}

#[async_trait]
impl EventService for HttpBackend {
    async fn events(&self, namespace: &str) -> Result<Vec<Event>> {
        self.api.get(&self.namespace_path(namespace, "/events")).await
    }
}

#[async_trait]
impl ApplicationService for HttpBackend {
    async fn applications(&self, namespace: &str) -> Result<Vec<Application>> {
        self.api
            .get(&self.namespace_path(namespace, "/applications"))
            .await
    }
}

#[async_trait]
impl IngressService for HttpBackend {
    async fn ingresses(&self) -> Result<Vec<Ingress>> {
        self.api.get(&self.kubernetes_path("/ingresses")).await
    }

    async fn create_ingress(&self, ingress: &Ingress) -> Result<()> {
        self.api
            .post_empty(&self.namespace_path(&ingress.namespace, "/ingresses"), ingress)
            .await
    }

    /// The new ingress carries the old host as `previous_host`
    async fn patch_ingress(&self, old: &Ingress, new: &Ingress) -> Result<()> {
        let path = self.namespace_path(&old.namespace, &format!("/ingresses/{}", encode(&old.name)));
        self.api.patch_empty(&path, new).await
    }

    async fn delete_ingress(&self, ingress: &Ingress) -> Result<()> {
        let path = self.namespace_path(
            &ingress.namespace,
            &format!("/ingresses/{}", encode(&ingress.name)),
        );
        self.api.delete(&path).await
    }
}
