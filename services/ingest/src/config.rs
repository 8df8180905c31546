use std::path::PathBuf;

use anyhow::{bail, Context};
use ecolingua_core::Config;

/// Resolve configuration: defaults or `--config <path>`, then `ECOLINGUA_*`
/// environment overrides, then validation.
pub fn load(args: &[String]) -> anyhow::Result<Config> {
    let mut config = match parse_config_path(args)? {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default_config(),
    };

    config
        .apply_env_overrides()
        .context("applying environment overrides")?;
    config.validate().context("validating configuration")?;
    Ok(config)
}

fn parse_config_path(args: &[String]) -> anyhow::Result<Option<PathBuf>> {
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        if arg == "--config" {
            if let Some(path) = args_iter.next() {
                return Ok(Some(PathBuf::from(path)));
            }
            bail!("--config was provided without a path");
        }
    }

    Ok(None)
}
