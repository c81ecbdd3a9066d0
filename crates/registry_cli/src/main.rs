//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `registry_core` linkage and that the configured store opens.
//! - Keep output deterministic for quick local sanity checks.

use log::info;
use registry_core::db::migrations;
use registry_core::{RegistryConfig, RegistryService, Store};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("registry_core version={}", registry_core::core_version());

    match probe() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("registry_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn probe() -> Result<(), String> {
    let config = RegistryConfig::from_env().map_err(|err| err.to_string())?;
    registry_core::init_from_config(&config)?;

    let store = Store::open(&config).map_err(|err| err.to_string())?;
    let schema_version = {
        let handle = store.acquire().map_err(|err| err.to_string())?;
        migrations::current_user_version(&handle).map_err(|err| err.to_string())?
    };

    let registry = RegistryService::new(store);
    let gateways = registry
        .list_gateways()
        .map_err(|err| err.to_string())?
        .len();

    println!(
        "registry_core store={} schema_version={} gateways={}",
        config
            .db_path
            .as_deref()
            .map_or_else(|| ":memory:".to_string(), |path| path.display().to_string()),
        schema_version,
        gateways
    );
    info!(
        "event=cli_probe module=cli status=ok schema_version={} gateways={}",
        schema_version, gateways
    );
    Ok(())
}
