use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Disc,
    Ram,
    #[default]
    Unknown,
}

impl NodeType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "disc" | "disk" => NodeType::Disc,
            "ram" => NodeType::Ram,
            _ => NodeType::Unknown,
        }
    }
}

/// One cluster member as reported by `GET /api/nodes`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NodeInfo {
    pub name: String,
    pub node_type: NodeType,
    pub running: bool,
    pub fd_used: u64,
    pub fd_total: u64,
    pub sockets_used: u64,
    pub sockets_total: u64,
    pub proc_used: u64,
    pub proc_total: u64,
    pub run_queue: u64,
    pub processors: u64,
    pub mem_used: u64,
    pub mem_limit: u64,
    pub mem_alarm: bool,
    pub disk_free: u64,
    pub disk_free_limit: u64,
    pub disk_free_alarm: bool,
    /// Milliseconds since the node booted.
    pub uptime: u64,
    pub auth_mechanisms: Vec<AuthMechanism>,
    pub applications: Vec<ErlangApp>,
}

impl NodeInfo {
    pub fn is_disc_node(&self) -> bool {
        self.node_type == NodeType::Disc
    }

    pub fn is_ram_node(&self) -> bool {
        self.node_type == NodeType::Ram
    }

    /// Either resource alarm blocks publishers cluster-wide.
    pub fn has_alarm(&self) -> bool {
        self.mem_alarm || self.disk_free_alarm
    }

    /// Bytes left before the memory high watermark.
    pub fn memory_headroom(&self) -> u64 {
        self.mem_limit.saturating_sub(self.mem_used)
    }

    /// Bytes of free disk above the configured limit.
    pub fn disk_headroom(&self) -> u64 {
        self.disk_free.saturating_sub(self.disk_free_limit)
    }

    pub fn supports_auth_mechanism(&self, name: &str) -> bool {
        self.auth_mechanisms.iter().any(|m| m.name == name && m.enabled)
    }

    pub fn application(&self, name: &str) -> Option<&ErlangApp> {
        self.applications.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AuthMechanism {
    pub name: String,
    pub description: String,
    pub enabled: bool,
}

/// An application loaded in the node's runtime.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ErlangApp {
    pub name: String,
    pub description: String,
    pub version: String,
}
