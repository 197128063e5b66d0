//! Azure container instances

pub mod create_container_instance;

pub use create_container_instance::{
    validate_form, AzureServices, CreateContainerInstanceController, CreateContainerInstanceState,
    CONTAINER_INSTANCES_ROUTE,
};
