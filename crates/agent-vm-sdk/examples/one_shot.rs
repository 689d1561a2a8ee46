//! Provision, use, and destroy a VM with a single helper call.
//!
//! Reads `AGENT_SERVICE_URL` if set, otherwise targets the local default.

use agent_vm_sdk::{create_vm, VmConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let service_url = std::env::var("AGENT_SERVICE_URL").ok();

    let mut vm = create_vm(&VmConfig::default(), service_url.as_deref(), None).await?;
    println!("provisioned {} ({})", vm.vm_id, vm.status);
    println!("tools at {}", vm.mcp_url);

    // One destroy stops the VM and releases the throwaway client.
    vm.destroy().await?;
    println!("destroyed {} ({})", vm.vm_id, vm.status);
    Ok(())
}
