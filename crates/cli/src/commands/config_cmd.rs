//! `selene config`: Configuration display.

use std::path::Path;

use selene_config::EngineConfig;

use super::load_config;

pub fn run(config: Option<&Path>, defaults: bool, path: bool) -> anyhow::Result<()> {
    if path {
        let config_path = match config {
            Some(p) => p.to_path_buf(),
            None => EngineConfig::config_dir().join("context.toml"),
        };
        println!("{}", config_path.display());
        return Ok(());
    }

    if defaults {
        println!("{}", EngineConfig::default_toml());
        return Ok(());
    }

    let config = load_config(config)?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
