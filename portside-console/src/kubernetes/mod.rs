//! Kubernetes resource pool editing

pub mod form_values;
pub mod ingress;
pub mod resource_pool;

pub use form_values::{
    AnnotationFormValue, IngressClassFormValue, QuotaDefaults, ResourcePoolFormValues,
};
pub use ingress::{IngressAction, IngressChange};
pub use resource_pool::{
    ResourcePoolController, ResourcePoolServices, ResourcePoolState, UpdateOutcome,
    UpdateWarnings,
};
