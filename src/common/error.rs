use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid configuration for {prefix}: {message}"))]
    ConfigError { message: String, prefix: String },
    #[snafu(display("Failed to read configuration from the environment: {source}"))]
    EnvironmentError { source: config::ConfigError },
    #[snafu(display("{method} {url} failed: {source}"))]
    RequestError {
        url: String,
        method: String,
        source: ureq::Error,
    },
    /// The provider answered, but with its own error list.
    #[snafu(display("{provider} rejected the request: {message}"))]
    ProviderError { provider: String, message: String },
    #[snafu(display("{message}: {source}"))]
    DecodeError {
        message: String,
        source: Box<dyn std::error::Error>,
    },
    #[snafu(display("{address:?} is not an IPv4 address: {source}"))]
    InvalidAddressError {
        address: String,
        source: std::net::AddrParseError,
    },
    #[snafu(display("No zones found for domain {domain}"))]
    NoZonesError { domain: String },
    #[snafu(display("No active zone found for domain {domain}"))]
    NoActiveZoneError { domain: String },
}

pub type Result<T> = std::result::Result<T, Error>;
