//! Blocking variants of the client surface.
//!
//! Mirrors the async API over `reqwest::blocking` for callers without an
//! async runtime. The types here are same-shaped twins of their async
//! counterparts; a record produced by one surface stays on that surface.

use std::env;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::client::{ACCESS_TOKEN_ENV_VAR, DEFAULT_SERVICE_URL, REQUEST_TIMEOUT};
use crate::error::{Result, SdkError};
use crate::mcp::McpTool;
use crate::models::{VmConfig, STATUS_STOPPED};

/// Blocking client for the Agent VM provisioning service.
///
/// Token resolution, URL normalization, and error mapping match
/// [`crate::AgentVmClient`]. Do not use this inside an async runtime;
/// `reqwest::blocking` will refuse to run there.
///
/// ```no_run
/// use agent_vm_sdk::blocking::AgentVmClient;
/// use agent_vm_sdk::VmConfig;
///
/// # fn run() -> agent_vm_sdk::Result<()> {
/// let client = AgentVmClient::new("https://vms.example.com");
/// let mut vm = client.provision_vm(&VmConfig::default())?;
/// println!("{} -> {}", vm.vm_id, vm.mcp_url);
/// vm.destroy()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AgentVmClient {
    http: Client,
    base_url: String,
    access_token: Option<String>,
}

impl AgentVmClient {
    /// Create a client for the service at `service_url`.
    pub fn new(service_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");
        Self {
            http,
            base_url: service_url.into().trim_end_matches('/').to_string(),
            access_token: env::var(ACCESS_TOKEN_ENV_VAR).ok(),
        }
    }

    /// Use `token` for bearer auth, overriding [`ACCESS_TOKEN_ENV_VAR`].
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn apply_auth(&self, request: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SdkError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Provision a new VM and return its record, bound to this client.
    #[tracing::instrument(level = "debug", skip(self, config))]
    pub fn provision_vm(&self, config: &VmConfig) -> Result<Vm> {
        let response = self
            .apply_auth(self.http.post(self.url("/vms")))
            .json(config)
            .send()?;
        let response = Self::check(response)?;
        let vm: Vm = response.json()?;
        tracing::debug!(vm_id = %vm.vm_id, "provisioned vm");
        Ok(vm.bind(self))
    }

    /// Fetch one VM by id.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_vm(&self, vm_id: &str) -> Result<Vm> {
        let response = self
            .apply_auth(self.http.get(self.url(&format!("/vms/{vm_id}"))))
            .send()?;
        let response = Self::check(response)?;
        let vm: Vm = response.json()?;
        Ok(vm.bind(self))
    }

    /// List the account's VMs in the order the service reports them.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn list_vms(&self) -> Result<Vec<Vm>> {
        let response = self.apply_auth(self.http.get(self.url("/vms"))).send()?;
        let response = Self::check(response)?;
        let vms: Vec<Vm> = response.json()?;
        Ok(vms.into_iter().map(|vm| vm.bind(self)).collect())
    }

    /// Destroy a VM by id.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn destroy_vm(&self, vm_id: &str) -> Result<()> {
        let response = self
            .apply_auth(self.http.delete(self.url(&format!("/vms/{vm_id}"))))
            .send()?;
        Self::check(response)?;
        tracing::debug!("destroyed vm");
        Ok(())
    }

    /// Release this client handle.
    pub fn close(self) {
        tracing::debug!("client handle released");
    }
}

/// A client for the service at [`DEFAULT_SERVICE_URL`].
impl Default for AgentVmClient {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_URL)
    }
}

/// A provisioned VM bound to the blocking client that produced it.
///
/// Same wire shape and destroy protocol as [`crate::Vm`]; see there for the
/// full semantics.
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
    pub mcp_url: String,
    pub status: String,
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
    pub(crate) fn bind(mut self, client: &AgentVmClient) -> Self {
        self.client = Some(client.clone());
        self.owns_client = false;
        self
    }

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
    /// No-op when unbound; on success the status flips to
    /// [`STATUS_STOPPED`] and an owned client handle is released. A service
    /// rejection leaves the record untouched.
    #[tracing::instrument(level = "debug", skip(self), fields(vm_id = %self.vm_id))]
    pub fn destroy(&mut self) -> Result<()> {
        let Some(client) = self.client.clone() else {
            tracing::debug!("record has no client handle; nothing to do");
            return Ok(());
        };
        client.destroy_vm(&self.vm_id)?;
        self.status = STATUS_STOPPED.to_string();
        if self.owns_client {
            self.client = None;
            tracing::debug!("released owned client handle");
        }
        Ok(())
    }
}

/// A VM paired with the blocking client that created it, for one-shot use.
///
/// Like [`crate::AgentVm`], but with a safety net the async surface cannot
/// offer: if the wrapper is dropped while the VM is still bound, the drop
/// destroys it and logs a warning. Call [`AgentVm::destroy`] yourself to see
/// the error if teardown fails, or [`AgentVm::into_vm`] to take the record
/// and disarm the guard.
#[derive(Debug)]
pub struct AgentVm {
    // Some until into_vm consumes the wrapper.
    vm: Option<Vm>,
}

impl AgentVm {
    /// Provision a VM that owns `client`.
    pub fn provision(client: AgentVmClient, config: &VmConfig) -> Result<Self> {
        let mut vm = client.provision_vm(config)?;
        vm.mark_owned();
        Ok(Self { vm: Some(vm) })
    }

    fn inner(&self) -> &Vm {
        self.vm.as_ref().expect("record is present until the wrapper is consumed")
    }

    fn inner_mut(&mut self) -> &mut Vm {
        self.vm.as_mut().expect("record is present until the wrapper is consumed")
    }

    /// The owned record.
    pub fn vm(&self) -> &Vm {
        self.inner()
    }

    /// Mutable access to the owned record.
    pub fn vm_mut(&mut self) -> &mut Vm {
        self.inner_mut()
    }

    /// Adapter for the VM's MCP endpoint.
    pub fn mcp_tool(&self) -> McpTool {
        self.inner().mcp_tool()
    }

    /// Take the record out of the wrapper, disarming the drop guard.
    pub fn into_vm(mut self) -> Vm {
        self.vm.take().expect("record is present until the wrapper is consumed")
    }

    /// Destroy the VM and release the owned client handle.
    pub fn destroy(&mut self) -> Result<()> {
        self.inner_mut().destroy()
    }
}

impl Drop for AgentVm {
    fn drop(&mut self) {
        let Some(vm) = self.vm.as_mut() else {
            return;
        };
        if !vm.is_bound() {
            return;
        }
        tracing::warn!(vm_id = %vm.vm_id, "AgentVm dropped while still bound; destroying");
        if let Err(error) = vm.destroy() {
            tracing::warn!(vm_id = %vm.vm_id, %error, "failed to destroy vm on drop");
        }
    }
}

/// Provision a VM with a dedicated, throwaway client in one call.
///
/// Blocking twin of [`crate::create_vm`]; the returned record owns its
/// client handle.
pub fn create_vm(
    config: &VmConfig,
    service_url: Option<&str>,
    access_token: Option<&str>,
) -> Result<Vm> {
    let mut client = AgentVmClient::new(service_url.unwrap_or(DEFAULT_SERVICE_URL));
    if let Some(token) = access_token {
        client = client.with_access_token(token);
    }
    let agent_vm = AgentVm::provision(client, config)?;
    Ok(agent_vm.into_vm())
}
