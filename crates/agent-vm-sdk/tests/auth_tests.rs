//! Bearer token resolution against the process environment.
//!
//! Environment mutation is process global, and each integration test binary
//! is its own process, so every environment-sensitive scenario lives in this
//! single sequential test. The async phases run on a locally built runtime
//! for the same reason.

use agent_vm_sdk::{blocking, AgentVmClient, ACCESS_TOKEN_ENV_VAR};
use mockito::{Matcher, Server};
use serde_json::json;

fn vm_body(vm_id: &str) -> String {
    json!({
        "vm_id": vm_id,
        "account_id": "acct-1",
        "user_id": "user-1",
        "image": "agent-vm-base",
        "preset_slug": "micro",
        "vcpu": 2.0,
        "memory_mb": 2048,
        "disk_gb": 20,
        "mcp_url": format!("https://{vm_id}.vms.example.com/mcp"),
        "status": "running",
        "created_at": 1_700_000_000.0,
        "last_active_at": 1_700_000_100.0
    })
    .to_string()
}

#[test]
fn test_token_resolution_order() {
    let mut server = Server::new();

    // No explicit token and no environment variable: unauthenticated.
    std::env::remove_var(ACCESS_TOKEN_ENV_VAR);
    let unauthenticated = server
        .mock("GET", "/vms/vm-1")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(vm_body("vm-1"))
        .create();
    blocking::AgentVmClient::new(server.url()).get_vm("vm-1").unwrap();
    unauthenticated.assert();

    // The environment fallback is read at construction.
    std::env::set_var(ACCESS_TOKEN_ENV_VAR, "env-token");
    let from_env = server
        .mock("GET", "/vms/vm-2")
        .match_header("authorization", "Bearer env-token")
        .with_status(200)
        .with_body(vm_body("vm-2"))
        .create();
    blocking::AgentVmClient::new(server.url()).get_vm("vm-2").unwrap();
    from_env.assert();

    // An explicit token wins over the environment.
    let explicit = server
        .mock("GET", "/vms/vm-3")
        .match_header("authorization", "Bearer explicit-token")
        .with_status(200)
        .with_body(vm_body("vm-3"))
        .create();
    blocking::AgentVmClient::new(server.url())
        .with_access_token("explicit-token")
        .get_vm("vm-3")
        .unwrap();
    explicit.assert();

    // Resolution happens once; later environment changes do not move an
    // existing client.
    let pinned_client = blocking::AgentVmClient::new(server.url());
    std::env::set_var(ACCESS_TOKEN_ENV_VAR, "late-token");
    let pinned = server
        .mock("GET", "/vms/vm-4")
        .match_header("authorization", "Bearer env-token")
        .with_status(200)
        .with_body(vm_body("vm-4"))
        .create();
    pinned_client.get_vm("vm-4").unwrap();
    pinned.assert();

    // The async surface resolves tokens the same way: environment fallback...
    std::env::set_var(ACCESS_TOKEN_ENV_VAR, "async-env-token");
    let async_from_env = server
        .mock("GET", "/vms/vm-5")
        .match_header("authorization", "Bearer async-env-token")
        .with_status(200)
        .with_body(vm_body("vm-5"))
        .create();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        AgentVmClient::new(server.url()).get_vm("vm-5").await.unwrap();
    });
    async_from_env.assert();

    // ...and unauthenticated requests once the variable is gone.
    std::env::remove_var(ACCESS_TOKEN_ENV_VAR);
    let async_unauthenticated = server
        .mock("GET", "/vms/vm-6")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(vm_body("vm-6"))
        .create();
    runtime.block_on(async {
        AgentVmClient::new(server.url()).get_vm("vm-6").await.unwrap();
    });
    async_unauthenticated.assert();
}
