//! Show or save the effective configuration.

use gazetrack_common::config::AppConfig;

pub fn run(config: &AppConfig, save: bool) -> anyhow::Result<()> {
    config.tracking.validate()?;
    println!("{}", serde_json::to_string_pretty(config)?);

    if save {
        let path = config.save()?;
        eprintln!("Configuration written to {}", path.display());
    }
    Ok(())
}
