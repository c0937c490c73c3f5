//! Configuration commands: `config show` and `config set-key`.

use super::{load_config, open_store};
use crate::cli::SetKeyArgs;
use crate::config::Config;
use crate::config::types::mask_key;
use crate::error::{PromptlabError, Result};
use crate::locks::acquire_store_lock;
use crate::store::FileStore;
use tracing::info;

/// Execute the `promptlab config show` command.
pub fn cmd_config_show() -> Result<()> {
    let store = open_store()?;
    let config = load_config(&store)?;

    println!("# {}", store.context().config_path().display());
    print!("{}", masked(&config).to_yaml()?);

    let exec = &config.execution;
    let env_set = std::env::var(&exec.api_key_env).is_ok_and(|v| !v.trim().is_empty());
    let source = if env_set {
        format!("environment ({})", exec.api_key_env)
    } else if exec.api_key.is_some() {
        "config file".to_string()
    } else {
        "not set".to_string()
    };
    println!();
    println!("API key source: {}", source);
    Ok(())
}

/// Copy of `config` with the API key masked for display.
fn masked(config: &Config) -> Config {
    let mut shown = config.clone();
    shown.execution.api_key = shown.execution.api_key.as_deref().map(mask_key);
    shown
}

/// Execute the `promptlab config set-key` command.
pub fn cmd_config_set_key(args: SetKeyArgs) -> Result<()> {
    let store = open_store()?;
    set_api_key(&store, &args.key)?;

    let config = load_config(&store)?;
    println!("API key saved to {}.", store.context().config_path().display());
    if std::env::var(&config.execution.api_key_env).is_ok() {
        println!(
            "Note: {} is set in the environment and takes precedence.",
            config.execution.api_key_env
        );
    }
    Ok(())
}

fn set_api_key(store: &FileStore, key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(PromptlabError::UserError(
            "API key must not be empty".to_string(),
        ));
    }

    let _lock = acquire_store_lock(store.context(), "config")?;

    let mut config = load_config(store)?;
    config.execution.api_key = Some(key.to_string());
    config.save(store.context().config_path())?;

    info!("api key stored in config file");
    Ok(())
}
