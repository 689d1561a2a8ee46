//! Async client for the Agent VM provisioning service.

use std::env;
use std::time::Duration;

use reqwest::Client;

use crate::error::{Result, SdkError};
use crate::mcp::McpTool;
use crate::models::{Vm, VmConfig};

/// Service base URL used when none is configured.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

/// Environment variable consulted for a bearer token when no explicit token
/// is supplied.
pub const ACCESS_TOKEN_ENV_VAR: &str = "AGENT_SERVICE_ACCESS_TOKEN";

/// Timeout applied to every request.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Async client for the Agent VM provisioning service.
///
/// The client resolves its bearer token once at construction: an explicit
/// [`AgentVmClient::with_access_token`] wins, otherwise
/// [`ACCESS_TOKEN_ENV_VAR`] is read, otherwise requests go out
/// unauthenticated. Later changes to the environment do not affect an
/// existing client.
///
/// Cloning is cheap and clones share one connection pool, so records handed
/// out by this client stay usable for [`Vm::destroy`] after the original
/// handle is gone.
///
/// ```no_run
/// use agent_vm_sdk::{AgentVmClient, VmConfig};
///
/// # async fn run() -> agent_vm_sdk::Result<()> {
/// let client = AgentVmClient::new("https://vms.example.com");
/// let mut vm = client.provision_vm(&VmConfig::default()).await?;
/// println!("{} -> {}", vm.vm_id, vm.mcp_url);
/// vm.destroy().await?;
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
    ///
    /// Trailing slashes are trimmed, so `https://host/` and `https://host`
    /// address the same service.
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

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SdkError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Provision a new VM and return its record, bound to this client.
    #[tracing::instrument(level = "debug", skip(self, config))]
    pub async fn provision_vm(&self, config: &VmConfig) -> Result<Vm> {
        let response = self
            .apply_auth(self.http.post(self.url("/vms")))
            .json(config)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let vm: Vm = response.json().await?;
        tracing::debug!(vm_id = %vm.vm_id, "provisioned vm");
        Ok(vm.bind(self))
    }

    /// Fetch one VM by id.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_vm(&self, vm_id: &str) -> Result<Vm> {
        let response = self
            .apply_auth(self.http.get(self.url(&format!("/vms/{vm_id}"))))
            .send()
            .await?;
        let response = Self::check(response).await?;
        let vm: Vm = response.json().await?;
        Ok(vm.bind(self))
    }

    /// List the account's VMs in the order the service reports them.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list_vms(&self) -> Result<Vec<Vm>> {
        let response = self.apply_auth(self.http.get(self.url("/vms"))).send().await?;
        let response = Self::check(response).await?;
        let vms: Vec<Vm> = response.json().await?;
        Ok(vms.into_iter().map(|vm| vm.bind(self)).collect())
    }

    /// Destroy a VM by id.
    ///
    /// Prefer [`Vm::destroy`] on a record you already hold; it keeps the
    /// record's local status in step with the service.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn destroy_vm(&self, vm_id: &str) -> Result<()> {
        let response = self
            .apply_auth(self.http.delete(self.url(&format!("/vms/{vm_id}"))))
            .send()
            .await?;
        Self::check(response).await?;
        tracing::debug!("destroyed vm");
        Ok(())
    }

    /// Release this client handle.
    ///
    /// The underlying connection pool closes once the last clone (including
    /// those held by bound records) is gone.
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

/// A VM paired with the client that created it, for one-shot use.
///
/// [`AgentVm::provision`] consumes the client and marks the record as owning
/// that handle, so the record's first successful [`Vm::destroy`] also
/// releases it. This is the shape behind [`create_vm`]; hold the wrapper (or
/// the record from [`AgentVm::into_vm`]) when the VM's lifetime should track
/// one piece of work rather than a long-lived client.
#[derive(Debug)]
pub struct AgentVm {
    vm: Vm,
}

impl AgentVm {
    /// Provision a VM that owns `client`.
    pub async fn provision(client: AgentVmClient, config: &VmConfig) -> Result<Self> {
        let mut vm = client.provision_vm(config).await?;
        vm.mark_owned();
        Ok(Self { vm })
    }

    /// The owned record.
    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    /// Mutable access to the owned record.
    pub fn vm_mut(&mut self) -> &mut Vm {
        &mut self.vm
    }

    /// Adapter for the VM's MCP endpoint.
    pub fn mcp_tool(&self) -> McpTool {
        self.vm.mcp_tool()
    }

    /// Take the record out of the wrapper.
    pub fn into_vm(self) -> Vm {
        self.vm
    }

    /// Destroy the VM and release the owned client handle.
    pub async fn destroy(&mut self) -> Result<()> {
        self.vm.destroy().await
    }
}

/// Provision a VM with a dedicated, throwaway client in one call.
///
/// With `service_url` unset the client targets [`DEFAULT_SERVICE_URL`]; with
/// `access_token` unset the usual environment fallback applies. The returned
/// record owns its client handle, so destroying it releases everything this
/// call created.
pub async fn create_vm(
    config: &VmConfig,
    service_url: Option<&str>,
    access_token: Option<&str>,
) -> Result<Vm> {
    let mut client = AgentVmClient::new(service_url.unwrap_or(DEFAULT_SERVICE_URL));
    if let Some(token) = access_token {
        client = client.with_access_token(token);
    }
    let agent_vm = AgentVm::provision(client, config).await?;
    Ok(agent_vm.into_vm())
}
