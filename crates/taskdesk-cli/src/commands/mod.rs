pub mod profile;
pub mod request;
pub mod tasks;

pub use profile::ProfileCommandRunner;
pub use request::RequestCommand;
pub use tasks::TasksCommand;

use crate::cli::Cli;
use crate::error::CliResult;
use crate::utils::ConsoleNotifier;
use std::path::Path;
use std::sync::Arc;
use taskdesk_client::{ApiClient, ClientConfig, StaticCredentials};
use tracing::debug;

/// Config file (if any), then `TASKDESK_*` variables, then explicit flags
pub fn resolve_config(
    config_path: Option<&Path>,
    base_url: Option<&str>,
    timeout_ms: Option<u64>,
) -> CliResult<ClientConfig> {
    let mut config = match config_path {
        Some(path) => ClientConfig::from_file(path)?.with_env_overrides()?,
        None => ClientConfig::from_env()?,
    };
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }
    if let Some(ms) = timeout_ms {
        config = config.with_timeout_ms(ms);
    }
    config.validate()?;
    Ok(config)
}

/// Client wired to console notifications and the token from args/env
pub fn build_client(cli: &Cli) -> CliResult<ApiClient> {
    let config = resolve_config(cli.config.as_deref(), cli.base_url.as_deref(), cli.timeout_ms)?;
    debug!(base_url = %config.base_url, timeout_ms = config.timeout_ms, "Client configured");

    let credentials = Arc::new(StaticCredentials::new(cli.token.clone()));
    Ok(ApiClient::new(&config, credentials, Arc::new(ConsoleNotifier))?)
}
