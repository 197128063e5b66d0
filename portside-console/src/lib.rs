//! Portside console controllers
//!
//! View-model controllers for the infrastructure console. Each controller
//! owns its form state and talks to the backend only through the
//! collaborator traits in [`services`]:
//! - Azure container-instance creation
//! - Kubernetes resource pool (namespace quota and ingress) editing
//! - Multi-endpoint selection

pub mod azure;
pub mod endpoints;
pub mod helpers;
pub mod kubernetes;
pub mod notifications;
pub mod services;

pub use azure::{AzureServices, CreateContainerInstanceController};
pub use endpoints::MultiEndpointSelector;
pub use kubernetes::{ResourcePoolController, ResourcePoolServices, UpdateOutcome};
pub use notifications::Notifier;
