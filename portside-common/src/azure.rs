///! Azure container-instance types

use serde::{Deserialize, Serialize};

/// Azure subscription
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    pub id: String,
    pub name: String,
}

/// Resource group inside a subscription
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
}

/// Container-instance resource provider of a subscription
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerInstanceProvider {
    pub id: String,
    #[serde(default)]
    pub namespace: String,
    pub locations: Vec<String>,
}

/// Container group operating system
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OsType {
    #[default]
    Linux,
    Windows,
}

impl std::fmt::Display for OsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linux => write!(f, "Linux"),
            Self::Windows => write!(f, "Windows"),
        }
    }
}

/// Port binding protocol
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PortProtocol {
    #[default]
    Tcp,
    Udp,
}

impl std::fmt::Display for PortProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

/// Host to container port binding.
///
/// `None` and `0` both mean the field has not been filled in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PortBinding {
    pub host: Option<u16>,
    pub container: Option<u16>,
    pub protocol: PortProtocol,
}

impl PortBinding {
    pub fn new(host: u16, container: u16, protocol: PortProtocol) -> Self {
        Self {
            host: Some(host),
            container: Some(container),
            protocol,
        }
    }

    /// Both sides of the binding are set
    pub fn is_complete(&self) -> bool {
        matches!(self.host, Some(h) if h != 0) && matches!(self.container, Some(c) if c != 0)
    }
}

/// Container group creation model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerGroup {
    pub name: String,
    pub location: String,
    pub os_type: OsType,
    pub image: String,
    pub allocate_public_ip: bool,
    pub ports: Vec<PortBinding>,
    pub cpu: f64,
    /// Memory in GB
    pub memory: f64,
}

impl Default for ContainerGroup {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: String::new(),
            os_type: OsType::Linux,
            image: String::new(),
            allocate_public_ip: true,
            ports: vec![PortBinding::new(80, 80, PortProtocol::Tcp)],
            cpu: 1.0,
            memory: 1.0,
        }
    }
}
