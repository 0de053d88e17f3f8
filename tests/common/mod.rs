//! In-memory stand-ins for the IP echo service and the DNS provider.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::rc::Rc;

use cfddns_rs::common::{
    DnsProvider, Error, NewRecord, PublicIpSource, Record, RecordEdit, Result, Zone,
    RECORD_KIND_A,
};
use cfddns_rs::service::Updater;

pub const DOMAIN: &str = "example.com";

/// How the fake provider answers record creation.
#[derive(Clone, Copy)]
pub enum CreateFailure {
    Rejected,
    Broken,
}

#[derive(Default)]
pub struct ProviderState {
    pub zones: Vec<Zone>,
    pub records: Vec<(String, Record)>,
    pub zone_lists: usize,
    pub record_lists: usize,
    pub creates: Vec<(String, NewRecord)>,
    pub edits: Vec<(String, String, RecordEdit)>,
    pub create_failure: Option<CreateFailure>,
    pub fail_edits: bool,
    next_id: usize,
}

impl ProviderState {
    pub fn record_calls(&self) -> usize {
        self.record_lists + self.creates.len() + self.edits.len()
    }

    /// A records in `zone_id` named `name`.
    pub fn a_records(&self, zone_id: &str, name: &str) -> Vec<Record> {
        self.records
            .iter()
            .filter(|(zone, r)| zone == zone_id && r.kind == RECORD_KIND_A && r.name == name)
            .map(|(_, r)| r.clone())
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct FakeProvider {
    pub state: Rc<RefCell<ProviderState>>,
}

impl FakeProvider {
    pub fn with_zones(zones: &[(&str, &str)]) -> Self {
        let provider = Self::default();
        provider.state.borrow_mut().zones = zones
            .iter()
            .map(|(id, status)| Zone {
                id: id.to_string(),
                name: DOMAIN.to_string(),
                status: status.to_string(),
            })
            .collect();
        provider
    }

    pub fn add_record(&self, zone_id: &str, kind: &str, name: &str, content: &str) -> String {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = format!("rec{}", state.next_id);
        state.records.push((
            zone_id.to_string(),
            Record {
                id: id.clone(),
                kind: kind.to_string(),
                name: name.to_string(),
                content: content.to_string(),
                ttl: 300,
                proxied: false,
            },
        ));
        id
    }
}

impl DnsProvider for FakeProvider {
    fn name(&self) -> &str {
        "Fake"
    }

    fn list_zones(&self, domain: &str) -> Result<Vec<Zone>> {
        let mut state = self.state.borrow_mut();
        state.zone_lists += 1;
        Ok(state
            .zones
            .iter()
            .filter(|z| z.name == domain)
            .cloned()
            .collect())
    }

    fn list_records(&self, zone_id: &str, name: &str) -> Result<Vec<Record>> {
        let mut state = self.state.borrow_mut();
        state.record_lists += 1;
        Ok(state
            .records
            .iter()
            .filter(|(zone, r)| zone == zone_id && r.name == name)
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn create_record(&self, zone_id: &str, record: &NewRecord) -> Result<Record> {
        let mut state = self.state.borrow_mut();
        state.creates.push((zone_id.to_string(), record.clone()));
        match state.create_failure {
            Some(CreateFailure::Rejected) => {
                return Err(Error::ProviderError {
                    provider: "Fake".into(),
                    message: "81057 Record already exists.".into(),
                })
            }
            Some(CreateFailure::Broken) => {
                return Err(Error::DecodeError {
                    message: "Failed to deserialize Fake response".into(),
                    source: "unexpected end of input".into(),
                })
            }
            None => {}
        }

        state.next_id += 1;
        let created = Record {
            id: format!("rec{}", state.next_id),
            kind: RECORD_KIND_A.to_string(),
            name: record.name.clone(),
            content: record.content.to_string(),
            ttl: record.ttl,
            proxied: record.proxied,
        };
        state.records.push((zone_id.to_string(), created.clone()));
        Ok(created)
    }

    fn edit_record(&self, zone_id: &str, record_id: &str, edit: &RecordEdit) -> Result<Record> {
        let mut state = self.state.borrow_mut();
        state
            .edits
            .push((zone_id.to_string(), record_id.to_string(), edit.clone()));
        if state.fail_edits {
            return Err(Error::ProviderError {
                provider: "Fake".into(),
                message: "1004 DNS Validation Error".into(),
            });
        }

        let (_, record) = state
            .records
            .iter_mut()
            .find(|(zone, r)| zone == zone_id && r.id == record_id)
            .ok_or_else(|| Error::ProviderError {
                provider: "Fake".into(),
                message: "81044 Record does not exist.".into(),
            })?;
        record.name = edit.name.clone();
        record.content = edit.content.to_string();
        Ok(record.clone())
    }
}

/// Answers with each queued address in turn, repeating the last one.
#[derive(Clone)]
pub struct FakeIpSource {
    pub addresses: Rc<RefCell<VecDeque<Option<Ipv4Addr>>>>,
    pub calls: Rc<RefCell<usize>>,
}

impl FakeIpSource {
    pub fn fixed(address: Ipv4Addr) -> Self {
        Self::sequence(&[Some(address)])
    }

    pub fn failing() -> Self {
        Self::sequence(&[None])
    }

    /// `None` entries make the lookup fail.
    pub fn sequence(addresses: &[Option<Ipv4Addr>]) -> Self {
        Self {
            addresses: Rc::new(RefCell::new(addresses.iter().copied().collect())),
            calls: Rc::new(RefCell::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl PublicIpSource for FakeIpSource {
    fn name(&self) -> &str {
        "FakeEcho"
    }

    fn public_ip(&self) -> Result<Ipv4Addr> {
        *self.calls.borrow_mut() += 1;
        let mut addresses = self.addresses.borrow_mut();
        let next = match addresses.len() {
            0 | 1 => addresses.front().copied().flatten(),
            _ => addresses.pop_front().flatten(),
        };
        next.ok_or_else(|| Error::DecodeError {
            message: "Failed to parse public IP response".into(),
            source: "expected value at line 1 column 1".into(),
        })
    }
}

pub fn updater(ip: &FakeIpSource, provider: &FakeProvider, subdomain: Option<&str>) -> Updater {
    Updater::new(
        Box::new(ip.clone()),
        Box::new(provider.clone()),
        DOMAIN.to_string(),
        subdomain.map(str::to_string),
    )
}
