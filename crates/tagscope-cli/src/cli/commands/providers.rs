//! `tagscope providers` – list known providers and enabled state.

use anyhow::Result;
use tagscope_core::config::TagscopeConfig;
use tagscope_core::provider::RegistrySnapshot;
use tagscope_core::ProviderKind;

pub fn run_providers(cfg: &TagscopeConfig) -> Result<()> {
    let snapshot = RegistrySnapshot::build(&cfg.enabled_providers)?;
    println!("{:<22} {:<9} PATTERN", "NAME", "ENABLED");
    for provider in ProviderKind::ALL {
        println!(
            "{:<22} {:<9} {}",
            provider.name(),
            if snapshot.is_enabled(*provider) {
                "yes"
            } else {
                "no"
            },
            provider.pattern()
        );
    }
    Ok(())
}
