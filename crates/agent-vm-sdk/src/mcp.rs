//! Adapters from a VM's MCP endpoint to agent-framework configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdkError};

#[cfg(feature = "rmcp")]
use rmcp::transport::StreamableHttpClientTransport;

/// Server name advertised to agent frameworks when none is given.
pub const DEFAULT_SERVER_NAME: &str = "agent-vm-mcp";

/// Adapter for one VM's MCP endpoint.
///
/// Obtained from [`crate::Vm::mcp_tool`]. Each method renders the endpoint in
/// the shape one agent framework expects; none of them talk to the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpTool {
    url: String,
}

impl McpTool {
    /// Wrap a raw streamable-HTTP MCP endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The raw endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Server entry for a Claude agent configuration.
    ///
    /// The entry serializes as `{"name": ..., "type": "url", "url": ...}` and
    /// can be dropped into an agent's MCP server list as-is. With no `name`
    /// the entry uses [`DEFAULT_SERVER_NAME`].
    pub fn claude_agent(&self, name: Option<&str>) -> McpServerConfig {
        McpServerConfig {
            name: name.unwrap_or(DEFAULT_SERVER_NAME).to_string(),
            kind: "url".to_string(),
            url: self.url.clone(),
        }
    }

    /// Handle for connecting an `rmcp`-based agent to this endpoint.
    ///
    /// Requires the `rmcp` cargo feature. Without it this fails fast with
    /// [`SdkError::Config`] instead of handing back a handle that cannot
    /// connect.
    pub fn rmcp_server(&self, options: McpServerOptions) -> Result<McpServerHandle> {
        if cfg!(feature = "rmcp") {
            Ok(McpServerHandle {
                url: self.url.clone(),
                options,
            })
        } else {
            Err(SdkError::Config(
                "rmcp integration is not enabled. Rebuild with the `rmcp` feature of \
                 agent-vm-sdk to use this adapter."
                    .to_string(),
            ))
        }
    }
}

/// Options for [`McpTool::rmcp_server`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpServerOptions {
    /// Display name advertised for the server.
    pub name: String,
    /// Cache the server's tool list instead of refetching it per call.
    pub cache_tools_list: bool,
    /// How many times a failed tool call may be retried by the framework.
    pub max_retry_attempts: u32,
}

impl Default for McpServerOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            cache_tools_list: true,
            max_retry_attempts: 3,
        }
    }
}

/// Connection parameters for an rmcp streamable-HTTP MCP server.
///
/// The handle itself is plain data. With the `rmcp` feature enabled, its
/// `transport()` method builds the transport to hand to an rmcp client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpServerHandle {
    url: String,
    options: McpServerOptions,
}

impl McpServerHandle {
    /// Endpoint URL the transport will connect to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Options the handle was built with.
    pub fn options(&self) -> &McpServerOptions {
        &self.options
    }

    /// Build the streamable-HTTP transport for this endpoint, ready for
    /// `rmcp`'s client service.
    #[cfg(feature = "rmcp")]
    pub fn transport(&self) -> StreamableHttpClientTransport<reqwest::Client> {
        StreamableHttpClientTransport::from_uri(self.url.clone())
    }
}

/// One server entry in an agent's MCP configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}
