use std::net::Ipv4Addr;

pub const RECORD_KIND_A: &str = "A";
pub const ZONE_STATUS_ACTIVE: &str = "active";

/// Cloudflare treats a TTL of 1 as "automatic".
pub const DEFAULT_TTL: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub status: String,
}

impl Zone {
    pub fn is_active(&self) -> bool {
        self.status == ZONE_STATUS_ACTIVE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

impl Record {
    pub fn is_a_record_for(&self, name: &str) -> bool {
        self.kind == RECORD_KIND_A && self.name == name
    }
}

/// Body of a record creation. Always an A record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub content: Ipv4Addr,
    pub ttl: u32,
    pub proxied: bool,
}

impl NewRecord {
    pub fn a(name: &str, content: Ipv4Addr) -> Self {
        Self {
            name: name.to_string(),
            content,
            ttl: DEFAULT_TTL,
            proxied: true,
        }
    }
}

/// Fields changed when an existing record is edited.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEdit {
    pub name: String,
    pub content: Ipv4Addr,
}

pub trait PublicIpSource {
    fn name(&self) -> &str;
    fn public_ip(&self) -> super::Result<Ipv4Addr>;
}

pub trait DnsProvider {
    fn name(&self) -> &str;
    fn list_zones(&self, domain: &str) -> super::Result<Vec<Zone>>;
    fn list_records(&self, zone_id: &str, name: &str) -> super::Result<Vec<Record>>;
    fn create_record(&self, zone_id: &str, record: &NewRecord) -> super::Result<Record>;
    fn edit_record(&self, zone_id: &str, record_id: &str, edit: &RecordEdit)
        -> super::Result<Record>;
}
