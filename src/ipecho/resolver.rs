use std::net::Ipv4Addr;
use std::time::Duration;

use snafu::prelude::*;

use crate::common::{
    DecodeSnafu, InvalidAddressSnafu, PublicIpSource, RequestSnafu, Result,
};

use super::models::EchoResponse;

pub const DEFAULT_ECHO_URL: &str = "https://ipecho.io/json";

const SOURCE_NAME: &str = "IpEcho";

/// Extract the IPv4 address from an echo service body.
pub fn parse_echo(body: &str) -> Result<Ipv4Addr> {
    let echo: EchoResponse = serde_json::from_str(body)
        .boxed_local()
        .context(DecodeSnafu {
            message: "Failed to parse public IP response",
        })?;

    let address = echo.ip.trim();
    address.parse().context(InvalidAddressSnafu { address })
}

pub struct IpEcho {
    url: url::Url,
    agent: ureq::Agent,
}

impl IpEcho {
    pub fn new(url: url::Url) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self { url, agent }
    }
}

impl PublicIpSource for IpEcho {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn public_ip(&self) -> Result<Ipv4Addr> {
        let url = self.url.as_str();
        tracing::debug!(url = url, source = SOURCE_NAME, "Requesting public IP");

        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    url = url,
                    error = %err,
                    "Request for the public IP address was rejected"
                );
                return Err(err).context(RequestSnafu { url, method: "GET" });
            }
        };

        let body = response
            .into_string()
            .boxed_local()
            .context(DecodeSnafu {
                message: "Failed to read public IP response",
            })?;
        let address = parse_echo(&body)?;

        tracing::info!(address = %address, "Resolved public IP address");
        Ok(address)
    }
}
