// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    netmask_v4,
    reservation::Mode,
    strings::*,
    structs::{IpFam, IpNetwork},
    CalcError, IPV4_BITS, IPV6_BITS,
};
use serde::Serialize;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::debug;

/// Computed facts about an IPv4 subnet under a reservation [Mode].
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct SubnetInfo {
    pub mode: Mode,
    pub network_address: Ipv4Addr,
    /// `None` for /31 and /32
    pub broadcast_address: Option<Ipv4Addr>,
    pub netmask: Ipv4Addr,
    pub wildcard_mask: Ipv4Addr,
    pub prefix_length: u8,
    pub total_addresses: u64,
    pub usable_addresses: u64,
    /// `None` when the reservations leave nothing usable
    pub first_usable_ip: Option<Ipv4Addr>,
    pub last_usable_ip: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/**
Compute subnet information for an IPv4 network.

Host bits in `network` are ignored; all arithmetic uses the normalized
network address. The usable range is `total - reserved` addresses, starting
after the mode's leading reservations and ending just before broadcast.

Special cases:
- /31: no broadcast, both addresses usable (RFC 3021)
- /32: no broadcast, the single address is the only usable one
- networks too small for the mode's reservations (f.ex. /30 under Azure)
  have 0 usable addresses and no first/last usable address

### Errors
[CalcError::VersionUnsupported] for IPv6 networks.
*/
pub fn compute(network: &IpNetwork, mode: Mode) -> Result<SubnetInfo, CalcError> {
    if network.fam() != IpFam::V4 {
        return Err(CalcError::VersionUnsupported {
            expected: IpFam::V4,
            input: network.to_string(),
        });
    }

    // hand-built networks may carry a prefix > 32
    let prefix: u8 = network.prefix.min(IPV4_BITS);
    let mask: u32 = netmask_v4(prefix);
    let wildcard: u32 = !mask;
    let net: u32 = network.addr.value as u32 & mask;
    let total: u64 = 1u64 << (IPV4_BITS - prefix);
    let reserved: u64 = mode.reserved_count(prefix) as u64;
    let usable: u64 = total.saturating_sub(reserved);

    let (broadcast, first, last, note) = match prefix {
        32 => (None, Some(net), Some(net), Some(NOTE_HOST.to_string())),
        31 => (None, Some(net), Some(net + 1), Some(NOTE_P2P.to_string())),
        _ => {
            let broadcast: u32 = net | wildcard;
            if usable == 0 {
                let note: String = format!("{NOTE_NO_USABLE} {mode}");
                (Some(broadcast), None, None, Some(note))
            } else {
                let first: u32 = net + mode.leading_reserved();
                (Some(broadcast), Some(first), Some(broadcast - 1), None)
            }
        }
    };

    let info = SubnetInfo {
        mode,
        network_address: Ipv4Addr::from(net),
        broadcast_address: broadcast.map(Ipv4Addr::from),
        netmask: Ipv4Addr::from(mask),
        wildcard_mask: Ipv4Addr::from(wildcard),
        prefix_length: prefix,
        total_addresses: total,
        usable_addresses: usable,
        first_usable_ip: first.map(Ipv4Addr::from),
        last_usable_ip: last.map(Ipv4Addr::from),
        note,
    };
    debug!(%network, %mode, usable, "computed subnet");
    Ok(info)
}

/* ---------------------------------- */

/// IPv6 subnets have no provider reservations; only the basics are reported.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct Ipv6SubnetInfo {
    pub network_address: Ipv6Addr,
    pub prefix_length: u8,
    /// decimal string, as /0 holds 2^128 addresses
    pub total_addresses: String,
    pub note: String,
}

/// Compute subnet information for an IPv6 network.
pub fn compute_v6(network: &IpNetwork) -> Result<Ipv6SubnetInfo, CalcError> {
    if network.fam() != IpFam::V6 {
        return Err(CalcError::VersionUnsupported {
            expected: IpFam::V6,
            input: network.to_string(),
        });
    }

    Ok(Ipv6SubnetInfo {
        network_address: Ipv6Addr::from(network.addr.value),
        prefix_length: network.prefix.min(IPV6_BITS),
        total_addresses: network.num_addresses(),
        note: NOTE_V6.to_string(),
    })
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const NET_24: &str = "192.168.1.0/24";
    const NET_AWS: &str = "10.0.1.0/24";
    const NET_OCI: &str = "172.16.0.0/24";
    const NET_STD: &str = "10.0.0.0/24";
    const NET_31: &str = "10.0.0.0/31";
    const NET_32: &str = "10.0.0.1/32";
    const NET_8: &str = "10.0.0.0/8";
    const UNALIGNED: &str = "192.168.1.77/24";
    const NET_V6: &str = "2001:db8::/64";

    fn net(s: &str) -> IpNetwork {
        s.parse().unwrap()
    }

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[test]
    fn test_azure_24() {
        let info = compute(&net(NET_24), Mode::Azure).unwrap();
        assert_eq!(info.network_address, ip("192.168.1.0"));
        assert_eq!(info.broadcast_address, Some(ip("192.168.1.255")));
        assert_eq!(info.netmask, ip("255.255.255.0"));
        assert_eq!(info.wildcard_mask, ip("0.0.0.255"));
        assert_eq!(info.prefix_length, 24);
        assert_eq!(info.total_addresses, 256);
        assert_eq!(info.usable_addresses, 251);
        assert_eq!(info.first_usable_ip, Some(ip("192.168.1.4")));
        assert_eq!(info.last_usable_ip, Some(ip("192.168.1.254")));
        assert_eq!(info.note, None);
    }

    #[test]
    fn test_other_modes() {
        let info = compute(&net(NET_AWS), Mode::Aws).unwrap();
        assert_eq!(info.usable_addresses, 251);
        assert_eq!(info.first_usable_ip, Some(ip("10.0.1.4")));

        let info = compute(&net(NET_OCI), Mode::Oci).unwrap();
        assert_eq!(info.usable_addresses, 253);
        assert_eq!(info.first_usable_ip, Some(ip("172.16.0.2")));
        assert_eq!(info.last_usable_ip, Some(ip("172.16.0.254")));

        let info = compute(&net(NET_STD), Mode::Standard).unwrap();
        assert_eq!(info.usable_addresses, 254);
        assert_eq!(info.first_usable_ip, Some(ip("10.0.0.1")));
        assert_eq!(info.last_usable_ip, Some(ip("10.0.0.254")));
    }

    #[test]
    fn test_point_to_point() {
        for mode in Mode::ALL {
            let info = compute(&net(NET_31), mode).unwrap();
            assert_eq!(info.total_addresses, 2);
            assert_eq!(info.usable_addresses, 2);
            assert_eq!(info.broadcast_address, None);
            assert_eq!(info.first_usable_ip, Some(ip("10.0.0.0")));
            assert_eq!(info.last_usable_ip, Some(ip("10.0.0.1")));
            assert!(info.note.unwrap().contains("RFC 3021"));
        }
    }

    #[test]
    fn test_single_host() {
        let info = compute(&net(NET_32), Mode::Azure).unwrap();
        assert_eq!(info.total_addresses, 1);
        assert_eq!(info.usable_addresses, 1);
        assert_eq!(info.broadcast_address, None);
        assert_eq!(info.network_address, ip("10.0.0.1"));
        assert_eq!(info.first_usable_ip, Some(info.network_address));
        assert_eq!(info.last_usable_ip, Some(info.network_address));
        assert_eq!(info.wildcard_mask, ip("0.0.0.0"));
        assert!(info.note.unwrap().contains("Single host"));
    }

    #[test]
    fn test_large_and_zero_prefix() {
        let info = compute(&net(NET_8), Mode::Azure).unwrap();
        assert_eq!(info.total_addresses, 16_777_216);
        assert_eq!(info.last_usable_ip, Some(ip("10.255.255.254")));

        let info = compute(&net("0.0.0.0/0"), Mode::Standard).unwrap();
        assert_eq!(info.netmask, ip("0.0.0.0"));
        assert_eq!(info.wildcard_mask, ip("255.255.255.255"));
        assert_eq!(info.total_addresses, 1u64 << 32);
        assert_eq!(info.usable_addresses, (1u64 << 32) - 2);
        assert_eq!(info.broadcast_address, Some(ip("255.255.255.255")));
    }

    #[test]
    fn test_unaligned_input_is_normalized() {
        let info = compute(&net(UNALIGNED), Mode::Azure).unwrap();
        assert_eq!(info, compute(&net(NET_24), Mode::Azure).unwrap());
    }

    #[test]
    fn test_degenerate_small_networks() {
        let info = compute(&net("10.0.0.0/30"), Mode::Azure).unwrap();
        assert_eq!(info.total_addresses, 4);
        assert_eq!(info.usable_addresses, 0);
        assert_eq!(info.first_usable_ip, None);
        assert_eq!(info.last_usable_ip, None);
        assert_eq!(info.broadcast_address, Some(ip("10.0.0.3")));
        assert!(info.note.unwrap().contains("Azure"));

        let info = compute(&net("10.0.0.0/30"), Mode::Oci).unwrap();
        assert_eq!(info.usable_addresses, 1);
        assert_eq!(info.first_usable_ip, Some(ip("10.0.0.2")));
        assert_eq!(info.last_usable_ip, Some(ip("10.0.0.2")));

        let info = compute(&net("10.0.0.0/29"), Mode::Aws).unwrap();
        assert_eq!(info.usable_addresses, 3);
        assert_eq!(info.first_usable_ip, Some(ip("10.0.0.4")));
        assert_eq!(info.last_usable_ip, Some(ip("10.0.0.6")));
    }

    #[test]
    fn test_usable_formula_all_prefixes() {
        let base: Ipv4Addr = ip("10.0.0.0");
        for mode in Mode::ALL {
            for prefix in 0..=IPV4_BITS {
                let n = IpNetwork::from_parts(base.into(), prefix);
                let info = compute(&n, mode).unwrap();
                let total: u64 = 1u64 << (32 - prefix);
                let reserved: u64 = mode.reserved_count(prefix) as u64;
                assert_eq!(info.total_addresses, total);
                assert_eq!(info.usable_addresses, total.saturating_sub(reserved), "/{prefix} {mode}");

                if let (Some(first), Some(last)) = (info.first_usable_ip, info.last_usable_ip) {
                    let span: u64 = (u32::from(last) - u32::from(first)) as u64 + 1;
                    assert_eq!(span, info.usable_addresses, "/{prefix} {mode}");
                } else {
                    assert_eq!(info.usable_addresses, 0);
                }
            }
        }
    }

    #[test]
    fn test_oversized_prefix_is_clamped() {
        let mut n = net(NET_32);
        n.prefix = 40;
        assert_eq!(compute(&n, Mode::Azure).unwrap(), compute(&net(NET_32), Mode::Azure).unwrap());

        let mut n6 = net("2001:db8::1/128");
        n6.prefix = 200;
        let info = compute_v6(&n6).unwrap();
        assert_eq!(info.prefix_length, 128);
        assert_eq!(info.total_addresses, "1");
    }

    #[test]
    fn test_idempotent() {
        let n = net(NET_24);
        assert_eq!(compute(&n, Mode::Oci).unwrap(), compute(&n, Mode::Oci).unwrap());
    }

    #[test]
    fn test_ipv6_rejected() {
        let err = compute(&net(NET_V6), Mode::Azure).unwrap_err();
        assert!(matches!(err, CalcError::VersionUnsupported { expected: IpFam::V4, .. }));
    }

    #[test]
    fn test_compute_v6() {
        let info = compute_v6(&net(NET_V6)).unwrap();
        assert_eq!(info.network_address.to_string(), "2001:db8::");
        assert_eq!(info.prefix_length, 64);
        assert_eq!(info.total_addresses, "18446744073709551616");
        assert!(info.note.contains("IPv6 subnets do not have reserved"));

        assert_eq!(compute_v6(&net("::/0")).unwrap().total_addresses, V6_ALL_ADDRESSES);
        assert_eq!(compute_v6(&net("2001:db8::1/128")).unwrap().total_addresses, "1");
        assert!(compute_v6(&net(NET_24)).is_err());
    }
}
