///! Namespace classification

/// Namespaces owned by the cluster or the console itself
pub const SYSTEM_NAMESPACES: &[&str] = &["kube-system", "kube-public", "kube-node-lease", "portainer"];

pub const DEFAULT_NAMESPACE: &str = "default";

pub fn is_system_namespace(name: &str) -> bool {
    SYSTEM_NAMESPACES.contains(&name)
}

/// Quota and ingress settings of this namespace may be changed
pub fn is_editable_namespace(name: &str) -> bool {
    !is_system_namespace(name) && name != DEFAULT_NAMESPACE
}
