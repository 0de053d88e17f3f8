use std::time::Duration;

use serde::de::DeserializeOwned;
use snafu::prelude::*;

use crate::common::{
    self, DecodeSnafu, NewRecord, ProviderSnafu, Record, RecordEdit, RequestSnafu, Result, Zone,
};

use super::models::{
    APIError, CreateRecord, DNSRecord, EditRecord, ErrorResponse, PaginatedResponse,
    WriteResponse,
};

pub const API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

pub const PROVIDER_NAME: &str = "Cloudflare";

const ZONES_PER_PAGE: usize = 50;
const RECORDS_PER_PAGE: usize = 100;

enum WriteMethod {
    Create,
    Edit,
}

impl std::fmt::Display for WriteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WriteMethod::Create => "POST",
            WriteMethod::Edit => "PATCH",
        })
    }
}

fn format_errors(errors: Vec<APIError>) -> String {
    errors
        .into_iter()
        .map(|err| format!("{} {}", err.code, err.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn process_errors(success: bool, errors: Vec<APIError>) -> Result<()> {
    if !success || !errors.is_empty() {
        let mut message = format_errors(errors);
        if message.is_empty() {
            message.push_str("request unsuccessful without further details");
        }
        return ProviderSnafu {
            provider: PROVIDER_NAME,
            message,
        }
        .fail();
    }
    Ok(())
}

pub struct Cloudflare {
    api_token: String,
    base_url: String,
    agent: ureq::Agent,
}

impl std::fmt::Debug for Cloudflare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cloudflare")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Cloudflare {
    pub fn new(api_token: String) -> Self {
        Self::with_base_url(api_token, API_BASE_URL)
    }

    pub fn with_base_url(api_token: String, base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .build();
        Self {
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn with_headers(&self, req: ureq::Request) -> ureq::Request {
        req.set("Authorization", &format!("Bearer {}", self.api_token))
            .set("Content-Type", "application/json; charset=utf8")
    }

    /// Turns a ureq outcome into a response body, surfacing Cloudflare's own
    /// error list when the API answered with an error status.
    fn read_response(
        &self,
        result: std::result::Result<ureq::Response, ureq::Error>,
        url: &str,
        method: &str,
    ) -> Result<ureq::Response> {
        match result {
            Ok(resp) => Ok(resp),
            Err(ureq::Error::Status(status, resp)) => {
                let errors = resp
                    .into_json::<ErrorResponse>()
                    .map(|body| body.errors)
                    .unwrap_or_default();
                let message = match errors.is_empty() {
                    true => format!("{method} {url} answered HTTP {status}"),
                    false => format_errors(errors),
                };
                ProviderSnafu {
                    provider: PROVIDER_NAME,
                    message,
                }
                .fail()
            }
            Err(err) => Err(err).context(RequestSnafu { url, method }),
        }
    }

    fn api_get_paginated<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        per_page: usize,
    ) -> Result<Vec<T>> {
        let mut page = 1;
        let mut items: Vec<T> = Vec::new();
        loop {
            tracing::debug!(
                url = url,
                method = "GET",
                page = page,
                provider = PROVIDER_NAME,
                "Sending request"
            );
            let result = self
                .with_headers(self.agent.get(url))
                .query_pairs(query.iter().copied())
                .query("page", &page.to_string())
                .query("per_page", &per_page.to_string())
                .call();

            let mut resp: PaginatedResponse<T> = self
                .read_response(result, url, "GET")?
                .into_json()
                .boxed_local()
                .context(DecodeSnafu {
                    message: format!("Failed to deserialize {PROVIDER_NAME} response"),
                })?;

            process_errors(resp.success, resp.errors)?;

            items.append(&mut resp.result);

            match resp.result_info {
                Some(info) if info.has_next_page() => page += 1,
                _ => return Ok(items),
            }
        }
    }

    fn api_write<T: DeserializeOwned>(
        &self,
        url: &str,
        method: WriteMethod,
        body: impl serde::Serialize,
    ) -> Result<T> {
        let method_name = method.to_string();
        tracing::debug!(
            url = url,
            method = %method_name,
            provider = PROVIDER_NAME,
            "Sending request"
        );
        let req = match method {
            WriteMethod::Create => self.agent.post(url),
            WriteMethod::Edit => self.agent.patch(url),
        };
        let result = self.with_headers(req).send_json(body);

        let resp: WriteResponse<T> = self
            .read_response(result, url, &method_name)?
            .into_json()
            .boxed_local()
            .context(DecodeSnafu {
                message: format!("Failed to deserialize {PROVIDER_NAME} response"),
            })?;

        process_errors(resp.success, resp.errors)?;

        resp.result.context(ProviderSnafu {
            provider: PROVIDER_NAME,
            message: format!("{method_name} {url} returned no result"),
        })
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{zone_id}/dns_records", self.base_url)
    }
}

impl common::DnsProvider for Cloudflare {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn list_zones(&self, domain: &str) -> Result<Vec<Zone>> {
        let url = format!("{}/zones", self.base_url);
        let zones: Vec<super::models::Zone> =
            self.api_get_paginated(&url, &[("name", domain)], ZONES_PER_PAGE)?;
        Ok(zones.into_iter().map(Into::into).collect())
    }

    fn list_records(&self, zone_id: &str, name: &str) -> Result<Vec<Record>> {
        let url = self.records_url(zone_id);
        let records: Vec<DNSRecord> =
            self.api_get_paginated(&url, &[("name.exact", name)], RECORDS_PER_PAGE)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    fn create_record(&self, zone_id: &str, record: &NewRecord) -> Result<Record> {
        let created: DNSRecord = self.api_write(
            &self.records_url(zone_id),
            WriteMethod::Create,
            CreateRecord::from(record),
        )?;
        Ok(created.into())
    }

    fn edit_record(&self, zone_id: &str, record_id: &str, edit: &RecordEdit) -> Result<Record> {
        let edited: DNSRecord = self.api_write(
            &format!("{}/{record_id}", self.records_url(zone_id)),
            WriteMethod::Edit,
            EditRecord::from(edit),
        )?;
        Ok(edited.into())
    }
}

impl From<&crate::Config> for Cloudflare {
    fn from(value: &crate::Config) -> Self {
        Self::new(value.api_token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_joined_into_one_message() {
        let err = process_errors(
            false,
            vec![
                APIError {
                    code: 9109,
                    message: "Invalid access token".into(),
                },
                APIError {
                    code: 10000,
                    message: "Authentication error".into(),
                },
            ],
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Cloudflare rejected the request: 9109 Invalid access token; 10000 Authentication error"
        );
    }

    #[test]
    fn unsuccessful_response_without_errors_still_fails() {
        let err = process_errors(false, Vec::new()).unwrap_err();
        assert!(matches!(err, common::Error::ProviderError { .. }));
    }

    #[test]
    fn successful_response_passes() {
        assert!(process_errors(true, Vec::new()).is_ok());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let cf = Cloudflare::with_base_url("secret-token-value".into(), "http://localhost:1/");
        let debug = format!("{cf:?}");
        assert!(!debug.contains("secret-token-value"));
        assert!(debug.contains("http://localhost:1"));
    }

    #[test]
    fn records_url_is_scoped_to_the_zone() {
        let cf = Cloudflare::with_base_url("token".into(), "http://localhost:1/");
        assert_eq!(
            cf.records_url("abc"),
            "http://localhost:1/zones/abc/dns_records"
        );
    }
}
