//! Quickstart demo: provision a VM, wire up MCP, tear it down.
//!
//! Point `AGENT_SERVICE_URL` at a running provisioning service (and set
//! `AGENT_SERVICE_ACCESS_TOKEN` if it requires auth) before running.

use agent_vm_sdk::{AgentVmClient, VmConfig, DEFAULT_SERVICE_URL};
use anyhow::Result;
use chrono::DateTime;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let service_url =
        std::env::var("AGENT_SERVICE_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());

    println!("Agent VM Quickstart ({service_url})\n");

    let client = AgentVmClient::new(&service_url);

    // 1. Provision a VM on the smallest preset
    println!("1. Provisioning:");
    let mut vm = client.provision_vm(&VmConfig::default()).await?;
    println!("   id:      {}", vm.vm_id);
    println!("   status:  {}", vm.status);
    println!(
        "   size:    {} vCPU / {} MiB / {} GiB",
        vm.vcpu, vm.memory_mb, vm.disk_gb
    );
    if let Some(created) = DateTime::from_timestamp(vm.created_at as i64, 0) {
        println!("   created: {}", created.to_rfc3339());
    }

    // 2. Render the MCP endpoint as agent configuration
    println!("\n2. MCP endpoint: {}", vm.mcp_url);
    let entry = vm.mcp_tool().claude_agent(None);
    println!("{}", serde_json::to_string_pretty(&entry)?);

    // 3. The new VM shows up in the account inventory
    let vms = client.list_vms().await?;
    println!("\n3. Account now has {} VM(s)", vms.len());

    // 4. Tear down
    vm.destroy().await?;
    println!("\n4. Destroyed {} (status: {})", vm.vm_id, vm.status);

    client.close();
    Ok(())
}
