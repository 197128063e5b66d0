//! Kubernetes resource pool types
//!
//! Simplified views of nodes, namespaces, quotas, ingresses, events and
//! applications as the console backend returns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of quotas managed by the console
pub const RESOURCE_QUOTA_PREFIX: &str = "portside-rq-";

/// Cluster node capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// Allocatable CPU in cores
    pub cpu: f64,
    /// Allocatable memory as a size string ("16318292Ki", "8Gi", "512M")
    pub memory: String,
}

/// Namespace backing a resource pool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Namespace {
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub resource_pool_owner: Option<String>,
}

/// Namespace resource quota
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceQuota {
    pub name: String,
    pub namespace: String,
    /// CPU limit in cores
    pub cpu_limit: f64,
    /// Memory limit in bytes
    pub memory_limit: u64,
    #[serde(default)]
    pub cpu_limit_used: f64,
    #[serde(default)]
    pub memory_limit_used: u64,
    #[serde(default)]
    pub resource_pool_name: String,
    #[serde(default)]
    pub resource_pool_owner: Option<String>,
}

impl ResourceQuota {
    pub fn new(namespace: &str) -> Self {
        Self {
            name: format!("{}{}", RESOURCE_QUOTA_PREFIX, namespace),
            namespace: namespace.to_string(),
            cpu_limit: 0.0,
            memory_limit: 0,
            cpu_limit_used: 0.0,
            memory_limit_used: 0,
            resource_pool_name: String::new(),
            resource_pool_owner: None,
        }
    }
}

/// Namespace plus its quota
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePool {
    pub namespace: Namespace,
    #[serde(default)]
    pub quota: Option<ResourceQuota>,
}

/// Ingress controller implementation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IngressClassType {
    #[default]
    Nginx,
    Traefik,
    #[serde(other)]
    Other,
}

/// Ingress class configured on an endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngressClass {
    pub name: String,
    #[serde(rename = "type", default)]
    pub class_type: IngressClassType,
}

/// Ingress path routed to a service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngressPath {
    pub path: String,
    pub service_name: String,
    pub port: u16,
    /// Application exposing the service, filled in by the console
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
}

/// Namespace ingress, one per ingress class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Ingress {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub ingress_class_name: Option<String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub paths: Vec<IngressPath>,
    /// Host before a patch, so the backend can rewrite rules keyed by it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_host: Option<String>,
}

/// Event type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EventKind {
    #[default]
    Normal,
    Warning,
    #[serde(other)]
    Unknown,
}

/// Namespace event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub involved_object: String,
    #[serde(default)]
    pub last_timestamp: Option<DateTime<Utc>>,
}

/// Container resource requests as size/CPU strings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResourceRequests {
    #[serde(default)]
    pub cpu: Option<String>,
    #[serde(default)]
    pub memory: Option<String>,
}

/// Pod container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodContainer {
    pub name: String,
    #[serde(default)]
    pub requests: ResourceRequests,
}

/// Pod of an application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pod {
    pub name: String,
    #[serde(default)]
    pub containers: Vec<PodContainer>,
}

/// Application deployed in a namespace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub pods: Vec<Pod>,
    /// Reserved CPU in cores, computed by the console
    #[serde(default)]
    pub cpu: f64,
    /// Reserved memory in bytes, computed by the console
    #[serde(default)]
    pub memory: u64,
}
