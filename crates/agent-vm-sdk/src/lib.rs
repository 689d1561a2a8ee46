//! # Agent VM SDK
//!
//! Rust client for the Agent VM provisioning service: sandboxed VMs for
//! agent workloads, each exposing its tools over an MCP endpoint.
//!
//! ## Quick Start
//!
//! ```no_run
//! use agent_vm_sdk::{AgentVmClient, VmConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AgentVmClient::new("http://localhost:8000");
//!
//!     let mut vm = client.provision_vm(&VmConfig::default()).await?;
//!     println!("{} is {}", vm.vm_id, vm.status);
//!     println!("tools at {}", vm.mcp_url);
//!
//!     vm.destroy().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Key Features
//!
//! - **🚀 One-call provisioning**: [`create_vm`] spins up a VM whose record
//!   tears everything down again with a single [`Vm::destroy`]
//! - **🔌 MCP wiring**: render any VM's endpoint as agent-framework
//!   configuration via [`Vm::mcp_tool`]
//! - **🧵 Async and blocking**: the same surface twice; [`blocking`] works
//!   without an async runtime
//! - **🔑 Ambient auth**: bearer tokens picked up from the environment once
//!   at client construction
//!
//! ## One-shot VMs
//!
//! ```no_run
//! use agent_vm_sdk::{create_vm, VmConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut vm = create_vm(&VmConfig::default(), None, None).await?;
//!     // ... point an agent at vm.mcp_url ...
//!     vm.destroy().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## MCP Integration
//!
//! ```
//! use agent_vm_sdk::McpTool;
//!
//! let entry = McpTool::new("https://vm-1.vms.example.com/mcp").claude_agent(None);
//! assert_eq!(entry.kind, "url");
//! ```
//!
//! With the `rmcp` cargo feature enabled, [`McpTool::rmcp_server`] returns a
//! [`McpServerHandle`] whose `transport()` plugs straight into the
//! re-exported `rmcp` client stack. Without the feature the same call fails
//! fast with [`SdkError::Config`].
//!
//! ## Authentication
//!
//! Every request carries a bearer token when one is available. An explicit
//! [`AgentVmClient::with_access_token`] takes precedence; otherwise the
//! client reads [`ACCESS_TOKEN_ENV_VAR`] once at construction.

pub mod blocking;
mod client;
mod error;
mod mcp;
mod models;

pub use client::{create_vm, AgentVm, AgentVmClient, ACCESS_TOKEN_ENV_VAR, DEFAULT_SERVICE_URL};
pub use error::{Result, SdkError};
pub use mcp::{McpServerConfig, McpServerHandle, McpServerOptions, McpTool, DEFAULT_SERVER_NAME};
pub use models::{Vm, VmConfig, STATUS_STOPPED};

/// The MCP client stack behind [`McpServerHandle::transport`], re-exported
/// so downstream crates need not pin their own copy.
#[cfg(feature = "rmcp")]
pub use rmcp;
