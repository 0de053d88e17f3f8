use std::net::Ipv4Addr;

use crate::common::{self, RECORD_KIND_A};

#[derive(Debug, serde::Deserialize)]
pub(super) struct APIError {
    pub code: usize,
    pub message: String,
}

#[derive(serde::Deserialize)]
pub(super) struct PaginatedResponse<T> {
    pub success: bool,
    pub result: Vec<T>,
    #[serde(default)]
    pub errors: Vec<APIError>,
    pub result_info: Option<ResultInfo>,
}

#[derive(serde::Deserialize)]
pub(super) struct WriteResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<APIError>,
}

/// Body of a non-2xx answer. Only the errors are of interest.
#[derive(serde::Deserialize)]
pub(super) struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<APIError>,
}

#[derive(serde::Deserialize)]
pub(super) struct ResultInfo {
    pub page: usize,
    pub total_pages: Option<usize>,
    pub count: usize,
    pub per_page: usize,
    pub total_count: Option<usize>,
}

impl ResultInfo {
    pub fn has_next_page(&self) -> bool {
        match (self.total_pages, self.total_count) {
            (Some(total_pages), _) => self.page < total_pages,
            (None, Some(total_count)) => total_count > self.page * self.per_page,
            (None, None) => self.count >= self.per_page && self.count > 0,
        }
    }
}

#[derive(serde::Deserialize)]
pub(super) struct Zone {
    pub id: String,
    pub name: String,
    pub status: String,
}

impl From<Zone> for common::Zone {
    fn from(value: Zone) -> Self {
        Self {
            id: value.id,
            name: value.name,
            status: value.status,
        }
    }
}

#[derive(serde::Deserialize)]
pub(super) struct DNSRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
}

impl From<DNSRecord> for common::Record {
    fn from(value: DNSRecord) -> Self {
        Self {
            id: value.id,
            kind: value.kind,
            name: value.name,
            content: value.content,
            ttl: value.ttl,
            proxied: value.proxied,
        }
    }
}

#[derive(serde::Serialize)]
pub(super) struct CreateRecord<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'a str,
    pub content: Ipv4Addr,
    pub ttl: u32,
    pub proxied: bool,
}

impl<'a> From<&'a common::NewRecord> for CreateRecord<'a> {
    fn from(value: &'a common::NewRecord) -> Self {
        Self {
            kind: RECORD_KIND_A,
            name: &value.name,
            content: value.content,
            ttl: value.ttl,
            proxied: value.proxied,
        }
    }
}

#[derive(serde::Serialize)]
pub(super) struct EditRecord<'a> {
    pub name: &'a str,
    pub content: Ipv4Addr,
}

impl<'a> From<&'a common::RecordEdit> for EditRecord<'a> {
    fn from(value: &'a common::RecordEdit) -> Self {
        Self {
            name: &value.name,
            content: value.content,
        }
    }
}
