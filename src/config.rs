use std::time::Duration;

use snafu::prelude::*;

use crate::common::{key_file_or_string, ConfigSnafu, EnvironmentSnafu, Result};

pub const DEFAULT_UPDATE_INTERVAL_HOURS: f64 = 16.0;
pub const MAX_UPDATE_INTERVAL_HOURS: f64 = 24.0;

/// Raw view of the environment. Every value is optional here so that
/// missing settings can be reported by their variable name.
#[derive(serde::Deserialize)]
struct Environment {
    cf_api_token: Option<String>,
    domain_name: Option<String>,
    subdomain: Option<String>,
    update_interval: Option<String>,
    ip_echo_url: Option<String>,
}

/// Validated settings, built once at startup. `api_token` already holds
/// the secret itself, even when it was given as `@path`.
#[derive(Clone)]
pub struct Config {
    pub api_token: String,
    pub domain: String,
    pub subdomain: Option<String>,
    pub update_interval: Duration,
    pub ip_echo_url: url::Url,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("domain", &self.domain)
            .field("subdomain", &self.subdomain)
            .field("update_interval", &self.update_interval)
            .field("ip_echo_url", &self.ip_echo_url.as_str())
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_interval(value: Option<String>) -> Result<Duration> {
    let hours = match value {
        None => DEFAULT_UPDATE_INTERVAL_HOURS,
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|hours| (0.0..=MAX_UPDATE_INTERVAL_HOURS).contains(hours))
            .with_context(|| ConfigSnafu {
                message: format!(
                    "must be a number of hours between 0 and {MAX_UPDATE_INTERVAL_HOURS}, got {raw:?}"
                ),
                prefix: "UPDATE_INTERVAL",
            })?,
    };
    Ok(Duration::from_secs_f64(hours * 3600.0))
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_source(None)
    }

    /// Read the configuration from the given variables, or from the process
    /// environment when `source` is `None`.
    pub fn from_source(source: Option<config::Map<String, String>>) -> Result<Self> {
        let env: Environment = config::Config::builder()
            .add_source(config::Environment::default().source(source))
            .build()
            .and_then(|c| c.try_deserialize())
            .context(EnvironmentSnafu)?;

        let api_token = non_empty(env.cf_api_token).context(ConfigSnafu {
            message: "an API token is required",
            prefix: "CF_API_TOKEN",
        })?;
        let api_token = key_file_or_string(api_token, "CF_API_TOKEN")?;
        ensure!(
            !api_token.is_empty(),
            ConfigSnafu {
                message: "the API token file is empty",
                prefix: "CF_API_TOKEN",
            }
        );
        let domain = non_empty(env.domain_name)
            .map(|d| d.trim_end_matches('.').to_ascii_lowercase())
            .context(ConfigSnafu {
                message: "a domain name is required",
                prefix: "DOMAIN_NAME",
            })?;
        let subdomain = non_empty(env.subdomain).map(|s| s.to_ascii_lowercase());
        let update_interval = parse_interval(non_empty(env.update_interval))?;

        let ip_echo_url = non_empty(env.ip_echo_url)
            .unwrap_or_else(|| crate::ipecho::DEFAULT_ECHO_URL.to_string());
        let ip_echo_url = url::Url::parse(&ip_echo_url).map_err(|err| {
            ConfigSnafu {
                message: format!("{ip_echo_url:?} is not a valid URL: {err}"),
                prefix: "IP_ECHO_URL",
            }
            .build()
        })?;

        Ok(Self {
            api_token,
            domain,
            subdomain,
            update_interval,
            ip_echo_url,
        })
    }

    /// The fully qualified name whose A records are kept in sync.
    pub fn target_name(&self) -> String {
        target_name(&self.domain, self.subdomain.as_deref())
    }
}

pub fn target_name(domain: &str, subdomain: Option<&str>) -> String {
    match subdomain {
        Some(sub) if !sub.is_empty() => format!("{sub}.{domain}"),
        _ => domain.to_string(),
    }
}
