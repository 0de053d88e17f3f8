use std::net::Ipv4Addr;

use crate::common::{
    DnsProvider, Error, NewRecord, NoActiveZoneSnafu, NoZonesSnafu, PublicIpSource, RecordEdit,
    Result, Zone,
};

/// What a single reconciliation did to the provider.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Changes {
    pub created: usize,
    pub updated: usize,
    pub failed_creates: usize,
}

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub address: Ipv4Addr,
    pub target: String,
    pub zone_id: String,
    pub changes: Changes,
}

/// Pick the first active zone, in the order the provider returned them.
pub fn select_zone(zones: Vec<Zone>, domain: &str) -> Result<Zone> {
    if zones.is_empty() {
        return NoZonesSnafu { domain }.fail();
    }
    zones
        .into_iter()
        .find(Zone::is_active)
        .ok_or_else(|| NoActiveZoneSnafu { domain }.build())
}

pub fn locate_zone(provider: &dyn DnsProvider, domain: &str) -> Result<Zone> {
    let zones = provider.list_zones(domain)?;
    tracing::debug!(
        provider = provider.name(),
        domain = domain,
        zones = zones.len(),
        "Listed zones"
    );

    let zone = select_zone(zones, domain)?;
    tracing::info!(
        provider = provider.name(),
        zone = %zone.name,
        zone_id = %zone.id,
        "Selected zone"
    );
    Ok(zone)
}

/// Bring every A record named `target` in line with `address`, creating one
/// when none exist. A failed create is logged and counted, never returned.
pub fn reconcile_records(
    provider: &dyn DnsProvider,
    zone_id: &str,
    target: &str,
    address: Ipv4Addr,
    dry_run: bool,
) -> Result<Changes> {
    let records: Vec<_> = provider
        .list_records(zone_id, target)?
        .into_iter()
        .filter(|record| record.is_a_record_for(target))
        .collect();

    let mut changes = Changes::default();

    if records.is_empty() {
        let record = NewRecord::a(target, address);
        tracing::info!(
            provider = provider.name(),
            name = %record.name,
            content = %record.content,
            proxied = record.proxied,
            "Creating record"
        );
        if dry_run {
            tracing::info!(provider = provider.name(), create = 1, "Dry run completed");
            return Ok(changes);
        }

        match provider.create_record(zone_id, &record) {
            Ok(created) => {
                tracing::info!(
                    provider = provider.name(),
                    name = %created.name,
                    content = %created.content,
                    record_id = %created.id,
                    "Created record"
                );
                changes.created += 1;
            }
            Err(Error::ProviderError {
                provider: provider_name,
                message,
            }) => {
                tracing::error!(
                    provider = %provider_name,
                    name = target,
                    "Record creation rejected: {message}"
                );
                changes.failed_creates += 1;
            }
            Err(err) => {
                tracing::error!(
                    provider = provider.name(),
                    name = target,
                    "Failed to create record: {err}"
                );
                changes.failed_creates += 1;
            }
        }
        return Ok(changes);
    }

    let edit = RecordEdit {
        name: target.to_string(),
        content: address,
    };

    for record in records {
        tracing::info!(
            provider = provider.name(),
            name = %record.name,
            previous = %record.content,
            content = %address,
            record_id = %record.id,
            "Updating record"
        );
        if dry_run {
            continue;
        }

        let updated = provider.edit_record(zone_id, &record.id, &edit)?;
        tracing::info!(
            provider = provider.name(),
            name = %updated.name,
            content = %updated.content,
            record_id = %updated.id,
            "Updated record"
        );
        changes.updated += 1;
    }

    if dry_run {
        tracing::info!(provider = provider.name(), "Dry run completed");
    }

    Ok(changes)
}

/// Runs the resolve, locate and reconcile steps in order.
pub struct Updater {
    ip_source: Box<dyn PublicIpSource>,
    provider: Box<dyn DnsProvider>,
    domain: String,
    subdomain: Option<String>,
    dry_run: bool,
}

impl Updater {
    pub fn new(
        ip_source: Box<dyn PublicIpSource>,
        provider: Box<dyn DnsProvider>,
        domain: String,
        subdomain: Option<String>,
    ) -> Self {
        Self {
            ip_source,
            provider,
            domain,
            subdomain,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self) -> Result<Outcome> {
        let address = self.ip_source.public_ip()?;
        let target = crate::config::target_name(&self.domain, self.subdomain.as_deref());
        tracing::info!(
            source = self.ip_source.name(),
            address = %address,
            name = target,
            "Reconciling"
        );

        let zone = locate_zone(self.provider.as_ref(), &self.domain)?;
        let changes =
            reconcile_records(self.provider.as_ref(), &zone.id, &target, address, self.dry_run)?;

        Ok(Outcome {
            address,
            target,
            zone_id: zone.id,
            changes,
        })
    }
}

impl From<&crate::Config> for Updater {
    fn from(value: &crate::Config) -> Self {
        let provider = crate::cloudflare::Cloudflare::from(value);
        let ip_source = crate::ipecho::IpEcho::new(value.ip_echo_url.clone());
        Self::new(
            Box::new(ip_source),
            Box::new(provider),
            value.domain.clone(),
            value.subdomain.clone(),
        )
    }
}
