///! Resource pool form values

use crate::kubernetes::ingress::IngressAction;
use portside_common::kubernetes::IngressClass;
use serde::{Deserialize, Serialize};

/// Lower bounds applied to quota limits before saving
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct QuotaDefaults {
    /// Cores
    #[serde(default)]
    pub cpu_limit: f64,
    /// Megabytes
    #[serde(default)]
    pub memory_limit: u64,
}

impl Default for QuotaDefaults {
    fn default() -> Self {
        Self {
            cpu_limit: 0.0,
            memory_limit: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationFormValue {
    pub key: String,
    pub value: String,
}

/// One ingress class as edited in the resource pool form
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IngressClassFormValue {
    pub ingress_class: IngressClass,
    pub selected: bool,
    /// Selection state when the form was loaded
    pub was_selected: bool,
    pub host: Option<String>,
    pub annotations: Vec<AnnotationFormValue>,
    pub rewrite_target: bool,
    pub advanced_config: bool,
    pub namespace: String,
}

impl IngressClassFormValue {
    pub fn new(ingress_class: IngressClass) -> Self {
        Self {
            ingress_class,
            selected: false,
            was_selected: false,
            host: None,
            annotations: Vec::new(),
            rewrite_target: false,
            advanced_config: false,
            namespace: String::new(),
        }
    }

    pub fn action(&self) -> IngressAction {
        IngressAction::for_pair(self.was_selected, self.selected)
    }

    /// Host with blank input treated as unset
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref().filter(|host| !host.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourcePoolFormValues {
    pub has_quota: bool,
    /// Cores
    pub cpu_limit: f64,
    /// Megabytes
    pub memory_limit: u64,
    pub ingress_classes: Vec<IngressClassFormValue>,
}

impl ResourcePoolFormValues {
    pub fn new(defaults: &QuotaDefaults) -> Self {
        Self {
            has_quota: true,
            cpu_limit: defaults.cpu_limit,
            memory_limit: defaults.memory_limit,
            ingress_classes: Vec::new(),
        }
    }

    /// Form entry of the named ingress class
    pub fn ingress_class_mut(&mut self, name: &str) -> Option<&mut IngressClassFormValue> {
        self.ingress_classes
            .iter_mut()
            .find(|fv| fv.ingress_class.name == name)
    }
}
