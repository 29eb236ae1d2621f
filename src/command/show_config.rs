use anyhow::{Context, Result};

use crate::config::DashConfig;

pub fn run_show_config(config: &DashConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", json);
    Ok(())
}
