// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    strings::*,
    structs::{IpAddress, IpFam, IpNetwork},
};
use ipnet::IpNet;
use lazy_static::lazy_static;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::{debug, info, warn};

/// Which family of named blocks an entry belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RangeGroup {
    /// RFC1918 private address space
    Rfc1918,
    /// RFC6598 shared (carrier-grade NAT) address space
    Rfc6598,
    Cloudflare,
    /// loaded from a caller supplied list
    Custom,
}

/// Where the entries of one family of a [RangeTable] came from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeSource {
    /// compiled-in list
    #[default]
    Builtin,
    /// parsed from a caller supplied list
    List,
    /// list had no entries for the family, copied from another table
    Fallback,
}

/// One named CIDR block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RangeEntry {
    pub network: IpNetwork,
    /// canonical CIDR text, f.ex. "192.168.0.0/16"
    pub label: String,
    pub group: RangeGroup,
}

impl RangeEntry {
    pub fn new(network: IpNetwork, group: RangeGroup) -> Self {
        // table entries are always aligned
        let network: IpNetwork = IpNetwork::from_parts(network.addr, network.prefix);
        Self {
            label: network.to_string(),
            network,
            group,
        }
    }
}

/**
Ordered, immutable set of named CIDR blocks, kept apart per IP family.

Tables are built once and only ever read afterwards, so a single instance
(see the statics below) can be shared by any number of threads.
*/
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RangeTable {
    v4: Vec<RangeEntry>,
    v6: Vec<RangeEntry>,
    v4_source: RangeSource,
    v6_source: RangeSource,
}

impl RangeTable {
    /// Build a table; entry order within each family is preserved.
    pub fn new(entries: impl IntoIterator<Item = RangeEntry>) -> Self {
        let mut table: RangeTable = RangeTable::default();
        for e in entries {
            match e.network.fam() {
                IpFam::V4 => table.v4.push(e),
                IpFam::V6 => table.v6.push(e),
            }
        }
        table
    }

    /// Entries for one IP family, in table order.
    pub fn entries(&self, fam: IpFam) -> &[RangeEntry] {
        match fam {
            IpFam::V4 => &self.v4,
            IpFam::V6 => &self.v6,
        }
    }

    pub fn source(&self, fam: IpFam) -> RangeSource {
        match fam {
            IpFam::V4 => self.v4_source,
            IpFam::V6 => self.v6_source,
        }
    }

    /// All entries, IPv4 first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &RangeEntry> {
        self.v4.iter().chain(self.v6.iter())
    }

    pub fn len(&self) -> usize {
        self.v4.len() + self.v6.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn labels(&self, fam: IpFam) -> Vec<&str> {
        self.entries(fam).iter().map(|e| e.label.as_str()).collect()
    }

    /**
    Build a table from a list of CIDRs, one per line (the format Cloudflare
    publishes at `/ips-v4/` and `/ips-v6/`).

    - blank lines and `#` comments are skipped
    - host bits are allowed and cleared
    - a bare address becomes a /32 or /128 block
    - lines that do not parse are skipped with a warning
    */
    pub fn from_cidr_list(text: impl AsRef<str>, group: RangeGroup) -> Self {
        let mut entries: Vec<RangeEntry> = Vec::new();

        for line in text.as_ref().lines() {
            let line: &str = line.split(COMMENT).next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            if let Ok(net) = line.parse::<IpNet>() {
                entries.push(RangeEntry::new(net.into(), group));
            } else if let Ok(ip) = line.parse::<IpAddr>() {
                entries.push(RangeEntry::new(IpNetwork::host(ip.into()), group));
            } else {
                warn!(line, "skipping invalid CIDR in range list");
            }
        }

        let mut table: RangeTable = RangeTable::new(entries);
        table.v4_source = RangeSource::List;
        table.v6_source = RangeSource::List;
        debug!(v4 = table.v4.len(), v6 = table.v6.len(), "built range table from list");
        table
    }

    /// Replace any empty family of this table with the same family of `fallback`.
    pub fn or_fallback(mut self, fallback: &RangeTable) -> Self {
        if self.v4.is_empty() {
            info!(count = fallback.v4.len(), "using fallback IPv4 ranges");
            self.v4 = fallback.v4.clone();
            self.v4_source = RangeSource::Fallback;
        }
        if self.v6.is_empty() {
            info!(count = fallback.v6.len(), "using fallback IPv6 ranges");
            self.v6 = fallback.v6.clone();
            self.v6_source = RangeSource::Fallback;
        }
        self
    }
}

/* ---------------------------------- */

/// Per-family summary of a [RangeTable].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FamilyInfo {
    pub source: RangeSource,
    pub count: usize,
    pub ranges: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RangesInfo {
    pub ipv4: FamilyInfo,
    pub ipv6: FamilyInfo,
}

/// Summarize the contents of a table.
pub fn ranges_info(table: &RangeTable) -> RangesInfo {
    let family = |fam: IpFam| FamilyInfo {
        source: table.source(fam),
        count: table.entries(fam).len(),
        ranges: table.entries(fam).iter().map(|e| e.label.clone()).collect(),
    };
    RangesInfo {
        ipv4: family(IpFam::V4),
        ipv6: family(IpFam::V6),
    }
}

/* ---------------------------------- */

#[rustfmt::skip]
static RFC1918_V4: [([u8; 4], u8); 3] = [
    ([10, 0, 0, 0],    8),
    ([172, 16, 0, 0],  12),
    ([192, 168, 0, 0], 16),
];

static RFC6598_V4: [([u8; 4], u8); 1] = [([100, 64, 0, 0], 10)];

// https://www.cloudflare.com/ips-v4/ (2025-01)
#[rustfmt::skip]
static CLOUDFLARE_V4: [([u8; 4], u8); 15] = [
    ([173, 245, 48, 0],  20),
    ([103, 21, 244, 0],  22),
    ([103, 22, 200, 0],  22),
    ([103, 31, 4, 0],    22),
    ([141, 101, 64, 0],  18),
    ([108, 162, 192, 0], 18),
    ([190, 93, 240, 0],  20),
    ([188, 114, 96, 0],  20),
    ([197, 234, 240, 0], 22),
    ([198, 41, 128, 0],  17),
    ([162, 158, 0, 0],   15),
    ([104, 16, 0, 0],    13),
    ([104, 24, 0, 0],    14),
    ([172, 64, 0, 0],    13),
    ([131, 0, 72, 0],    22),
];

// https://www.cloudflare.com/ips-v6/ (2025-01)
#[rustfmt::skip]
static CLOUDFLARE_V6: [([u16; 2], u8); 7] = [
    ([0x2400, 0xcb00], 32),
    ([0x2606, 0x4700], 32),
    ([0x2803, 0xf800], 32),
    ([0x2405, 0xb500], 32),
    ([0x2405, 0x8100], 32),
    ([0x2a06, 0x98c0], 29),
    ([0x2c0f, 0xf248], 32),
];

fn v4_entries(blocks: &[([u8; 4], u8)], group: RangeGroup) -> impl Iterator<Item = RangeEntry> + '_ {
    blocks.iter().map(move |(octets, prefix)| {
        let addr: IpAddress = Ipv4Addr::from(*octets).into();
        RangeEntry::new(IpNetwork::from_parts(addr, *prefix), group)
    })
}

fn v6_entries(blocks: &[([u16; 2], u8)], group: RangeGroup) -> impl Iterator<Item = RangeEntry> + '_ {
    blocks.iter().map(move |([a, b], prefix)| {
        let addr: IpAddress = Ipv6Addr::new(*a, *b, 0, 0, 0, 0, 0, 0).into();
        RangeEntry::new(IpNetwork::from_parts(addr, *prefix), group)
    })
}

// Built once per process on first use, read-only afterwards.
lazy_static! {
    /// RFC1918 private blocks followed by the RFC6598 shared block.
    pub static ref PRIVATE_RANGES: RangeTable = RangeTable::new(
        v4_entries(&RFC1918_V4, RangeGroup::Rfc1918)
            .chain(v4_entries(&RFC6598_V4, RangeGroup::Rfc6598)),
    );

    /// Cloudflare IPv4 and IPv6 edge ranges.
    pub static ref CLOUDFLARE_RANGES: RangeTable = RangeTable::new(
        v4_entries(&CLOUDFLARE_V4, RangeGroup::Cloudflare)
            .chain(v6_entries(&CLOUDFLARE_V6, RangeGroup::Cloudflare)),
    );
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = "\
# Cloudflare, trimmed
173.245.48.0/20
103.21.244.1/22   # host bits set

not-a-cidr
2400:cb00::/32
198.51.100.7
10.0.0.0/33
";

    #[test]
    fn test_private_table() {
        assert_eq!(
            PRIVATE_RANGES.labels(IpFam::V4),
            vec!["10.0.0.0/8", "172.16.0.0/12", "192.168.0.0/16", "100.64.0.0/10"]
        );
        assert!(PRIVATE_RANGES.entries(IpFam::V6).is_empty());
        let groups: Vec<RangeGroup> = PRIVATE_RANGES.iter().map(|e| e.group).collect();
        assert_eq!(groups.iter().filter(|g| **g == RangeGroup::Rfc1918).count(), 3);
        assert_eq!(groups.last(), Some(&RangeGroup::Rfc6598));
    }

    #[test]
    fn test_cloudflare_table() {
        assert_eq!(CLOUDFLARE_RANGES.entries(IpFam::V4).len(), 15);
        assert_eq!(CLOUDFLARE_RANGES.entries(IpFam::V6).len(), 7);
        assert!(CLOUDFLARE_RANGES.labels(IpFam::V4).contains(&"104.16.0.0/13"));
        assert!(CLOUDFLARE_RANGES.labels(IpFam::V4).contains(&"173.245.48.0/20"));
        assert!(CLOUDFLARE_RANGES.labels(IpFam::V6).contains(&"2606:4700::/32"));
        assert!(CLOUDFLARE_RANGES.labels(IpFam::V6).contains(&"2a06:98c0::/29"));
    }

    #[test]
    fn test_builtin_entries_are_aligned() {
        for e in PRIVATE_RANGES.iter().chain(CLOUDFLARE_RANGES.iter()) {
            assert!(e.network.is_aligned(), "{} not aligned", e.label);
            assert_eq!(e.network.addr.value & e.network.mask(), e.network.addr.value);
        }
    }

    #[test]
    fn test_from_cidr_list() {
        let table: RangeTable = RangeTable::from_cidr_list(LIST, RangeGroup::Custom);
        assert_eq!(
            table.labels(IpFam::V4),
            vec!["173.245.48.0/20", "103.21.244.0/22", "198.51.100.7/32"]
        );
        assert_eq!(table.labels(IpFam::V6), vec!["2400:cb00::/32"]);
        assert!(table.iter().all(|e| e.group == RangeGroup::Custom));
        assert_eq!(table.source(IpFam::V4), RangeSource::List);
        assert_eq!(table.source(IpFam::V6), RangeSource::List);
    }

    #[test]
    fn test_or_fallback() {
        let only_v6: RangeTable = RangeTable::from_cidr_list("2400:cb00::/32", RangeGroup::Custom);
        let merged: RangeTable = only_v6.or_fallback(&CLOUDFLARE_RANGES);
        assert_eq!(merged.entries(IpFam::V4).len(), 15);
        assert_eq!(merged.entries(IpFam::V6).len(), 1);
        assert_eq!(merged.source(IpFam::V4), RangeSource::Fallback);
        assert_eq!(merged.source(IpFam::V6), RangeSource::List);

        let empty: RangeTable = RangeTable::from_cidr_list("", RangeGroup::Custom);
        assert!(empty.is_empty());
        let filled: RangeTable = empty.or_fallback(&CLOUDFLARE_RANGES);
        assert!(filled.iter().eq(CLOUDFLARE_RANGES.iter()));
        assert_eq!(filled.source(IpFam::V4), RangeSource::Fallback);
        assert_eq!(filled.source(IpFam::V6), RangeSource::Fallback);
    }

    #[test]
    fn test_ranges_info() {
        let info: RangesInfo = ranges_info(&CLOUDFLARE_RANGES);
        assert_eq!(info.ipv4.count, 15);
        assert_eq!(info.ipv6.count, 7);
        assert_eq!(info.ipv6.ranges[0], "2400:cb00::/32");
        assert_eq!(info.ipv4.source, RangeSource::Builtin);

        let list: RangeTable = RangeTable::from_cidr_list("2400:cb00::/32", RangeGroup::Cloudflare);
        let info: RangesInfo = ranges_info(&list.or_fallback(&CLOUDFLARE_RANGES));
        assert_eq!(info.ipv4.source, RangeSource::Fallback);
        assert_eq!(info.ipv4.count, 15);
        assert_eq!(info.ipv6.source, RangeSource::List);
        assert_eq!(info.ipv6.count, 1);
    }
}
