//! Integration tests for the CAM client
//!
//! These tests require a reachable Clean Access Manager.
//! Set CAM_URL, CAM_USERNAME and CAM_PASSWORD environment variables to run,
//! and CAM_TEST_ROLE to a user role that exists on the appliance.

use cam_client::{CamClient, CamConfig, FilterAccess, MacFilter};

const TEST_MAC: &str = "02:00:5E:10:00:01";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn client() -> anyhow::Result<CamClient> {
    init_tracing();
    let config = CamConfig::from_env()?;
    Ok(CamClient::from_config(&config)?)
}

#[test]
#[ignore] // Requires running appliance
fn test_get_version() -> anyhow::Result<()> {
    let client = client()?;
    let version = client.get_cam_version()?;
    assert!(!version.is_empty());
    println!("CAM version {version}");
    Ok(())
}

#[test]
#[ignore]
fn test_get_mac_address_list() -> anyhow::Result<()> {
    let client = client()?;
    let devices = client.get_mac_address_list()?;
    println!("Found {} device filters", devices.len());
    Ok(())
}

#[test]
#[ignore]
fn test_get_local_user_list() -> anyhow::Result<()> {
    let client = client()?;
    let users = client.get_local_user_list()?;
    println!("Found {} local users", users.len());
    Ok(())
}

#[test]
#[ignore]
fn test_add_check_and_remove_mac_address() -> anyhow::Result<()> {
    let client = client()?;

    let mut filter = MacFilter::new(TEST_MAC);
    filter.access = Some(FilterAccess::Deny);
    filter.description = Some("cam-client integration test".to_string());
    client.add_mac_address(filter)?;

    let device = client
        .check_mac_address(TEST_MAC, None)?
        .ok_or_else(|| anyhow::anyhow!("{TEST_MAC} not found after add"))?;
    assert_eq!(device.mac_address.to_uppercase(), TEST_MAC);

    client.remove_mac_address(TEST_MAC, None)?;
    assert!(client.check_mac_address(TEST_MAC, None)?.is_none());
    Ok(())
}

#[test]
#[ignore]
fn test_add_and_delete_local_user() -> anyhow::Result<()> {
    let client = client()?;
    let role = std::env::var("CAM_TEST_ROLE")?;

    client.add_local_user("cam-client-test", "Integration-Test-1", &role)?;
    let users = client.get_local_user_list()?;
    assert!(users.iter().any(|u| u.username == "cam-client-test"));

    client.delete_local_user("cam-client-test")?;
    let users = client.get_local_user_list()?;
    assert!(users.iter().all(|u| u.username != "cam-client-test"));
    Ok(())
}
