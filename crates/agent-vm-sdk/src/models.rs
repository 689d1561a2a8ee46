//! Request and response types for the provisioning API.

use serde::{Deserialize, Serialize};

use crate::client::AgentVmClient;
use crate::error::Result;
use crate::mcp::McpTool;

/// Status a record takes locally after a successful destroy.
pub const STATUS_STOPPED: &str = "stopped";

/// Parameters for provisioning a new VM.
///
/// Serialized verbatim as the request body. The defaults ask for the base
/// image on the smallest preset:
///
/// ```
/// use agent_vm_sdk::VmConfig;
///
/// let config = VmConfig {
///     preset_slug: "large".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.image, "agent-vm-base");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmConfig {
    /// Image the VM boots from.
    pub image: String,
    /// Named size preset (cpu, memory, disk) picked by the service.
    pub preset_slug: String,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            image: "agent-vm-base".to_string(),
            preset_slug: "micro".to_string(),
        }
    }
}

/// A provisioned VM as last reported by the service.
///
/// Records returned by [`AgentVmClient`] keep a private handle back to the
/// client that produced them so [`Vm::destroy`] can reach the service without
/// the caller threading the client through. The handle and the ownership flag
/// are local bookkeeping only: serialization emits just the wire fields and
/// equality ignores both.
///
/// A record deserialized by hand has no client handle; its [`Vm::destroy`] is
/// a harmless no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vm {
    pub vm_id: String,
    pub account_id: String,
    pub user_id: String,
    pub image: String,
    pub preset_slug: String,
    pub vcpu: f64,
    pub memory_mb: u64,
    pub disk_gb: u64,
    /// Streamable-HTTP MCP endpoint exposing the VM's tools.
    pub mcp_url: String,
    pub status: String,
    /// Creation time as a unix timestamp in seconds.
    pub created_at: f64,
    pub last_active_at: f64,

    #[serde(skip)]
    pub(crate) client: Option<AgentVmClient>,
    #[serde(skip)]
    pub(crate) owns_client: bool,
}

impl PartialEq for Vm {
    fn eq(&self, other: &Self) -> bool {
        self.vm_id == other.vm_id
            && self.account_id == other.account_id
            && self.user_id == other.user_id
            && self.image == other.image
            && self.preset_slug == other.preset_slug
            && self.vcpu == other.vcpu
            && self.memory_mb == other.memory_mb
            && self.disk_gb == other.disk_gb
            && self.mcp_url == other.mcp_url
            && self.status == other.status
            && self.created_at == other.created_at
            && self.last_active_at == other.last_active_at
    }
}

impl Vm {
    /// Attach the client that produced this record.
    pub(crate) fn bind(mut self, client: &AgentVmClient) -> Self {
        self.client = Some(client.clone());
        self.owns_client = false;
        self
    }

    /// Make this record responsible for releasing its client handle.
    pub(crate) fn mark_owned(&mut self) {
        self.owns_client = true;
    }

    /// Whether the record still holds a client handle.
    pub fn is_bound(&self) -> bool {
        self.client.is_some()
    }

    /// Whether a successful destroy will also release the client handle.
    pub fn owns_client(&self) -> bool {
        self.owns_client
    }

    /// Adapter for wiring this VM's MCP endpoint into agent frameworks.
    pub fn mcp_tool(&self) -> McpTool {
        McpTool::new(self.mcp_url.clone())
    }

    /// Destroy the remote VM through the bound client.
    ///
    /// On an unbound record this is a no-op. On success the local status
    /// flips to [`STATUS_STOPPED`], and a record that owns its client handle
    /// drops it, so repeated calls stop touching the service. If the service
    /// rejects the request the record is left exactly as it was and the call
    /// can be retried.
    #[tracing::instrument(level = "debug", skip(self), fields(vm_id = %self.vm_id))]
    pub async fn destroy(&mut self) -> Result<()> {
        let Some(client) = self.client.clone() else {
            tracing::debug!("record has no client handle; nothing to do");
            return Ok(());
        };
        client.destroy_vm(&self.vm_id).await?;
        self.status = STATUS_STOPPED.to_string();
        if self.owns_client {
            self.client = None;
            tracing::debug!("released owned client handle");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vm_json() -> serde_json::Value {
        json!({
            "vm_id": "vm-1",
            "account_id": "acct-1",
            "user_id": "user-1",
            "image": "agent-vm-base",
            "preset_slug": "micro",
            "vcpu": 2.0,
            "memory_mb": 2048,
            "disk_gb": 20,
            "mcp_url": "https://vm-1.vms.example.com/mcp",
            "status": "running",
            "created_at": 1_700_000_000.0,
            "last_active_at": 1_700_000_100.0
        })
    }

    #[test]
    fn default_config_targets_base_image_on_micro() {
        let config = VmConfig::default();
        assert_eq!(config.image, "agent-vm-base");
        assert_eq!(config.preset_slug, "micro");
    }

    #[test]
    fn deserialized_record_is_unbound() {
        let vm: Vm = serde_json::from_value(vm_json()).unwrap();
        assert!(!vm.is_bound());
        assert!(!vm.owns_client());
        assert_eq!(vm.vm_id, "vm-1");
        assert_eq!(vm.vcpu, 2.0);
        assert_eq!(vm.memory_mb, 2048);
    }

    #[test]
    fn serialization_emits_wire_fields_only() {
        let vm: Vm = serde_json::from_value(vm_json()).unwrap();
        let value = serde_json::to_value(&vm).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 12);
        assert!(!object.contains_key("client"));
        assert!(!object.contains_key("owns_client"));
    }

    #[test]
    fn equality_ignores_client_bookkeeping() {
        let unbound: Vm = serde_json::from_value(vm_json()).unwrap();
        let client = AgentVmClient::new("http://localhost:8000");
        let bound = unbound.clone().bind(&client);
        assert_eq!(unbound, bound);

        let mut renamed = unbound.clone();
        renamed.vm_id = "vm-2".to_string();
        assert_ne!(unbound, renamed);
    }

    #[tokio::test]
    async fn destroy_on_unbound_record_is_noop() {
        let mut vm: Vm = serde_json::from_value(vm_json()).unwrap();
        vm.destroy().await.unwrap();
        assert_eq!(vm.status, "running");
    }
}
