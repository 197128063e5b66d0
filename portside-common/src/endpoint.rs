///! Endpoint, endpoint group and tag types

use crate::kubernetes::IngressClass;
use serde::{Deserialize, Serialize};

/// Kubernetes features enabled on an endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KubernetesConfiguration {
    #[serde(default)]
    pub ingress_classes: Vec<IngressClass>,
    #[serde(default)]
    pub use_load_balancer: bool,
    #[serde(default)]
    pub use_server_metrics: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KubernetesSettings {
    #[serde(default)]
    pub configuration: KubernetesConfiguration,
}

/// Managed environment registered in the console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: u32,
    pub name: String,
    pub group_id: u32,
    #[serde(default)]
    pub tag_ids: Vec<u32>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub kubernetes: KubernetesSettings,
}

impl Endpoint {
    /// Ingress classes are configured, so namespaces may expose ingresses
    pub fn supports_ingress(&self) -> bool {
        !self.kubernetes.configuration.ingress_classes.is_empty()
    }
}

/// Endpoint group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointGroup {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Endpoint tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: u32,
    pub name: String,
}
