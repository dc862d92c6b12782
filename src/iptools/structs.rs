// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    addresses::{parse, parse_address, parse_network},
    fam_bits, mask_u128,
    strings::*,
    CalcError, IPV6_BITS,
};
use ipnet::IpNet;
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

/// IP address family
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum IpFam {
    V4,
    V6,
}

impl IpFam {
    /// `4` or `6`
    pub fn version(&self) -> u8 {
        match self {
            IpFam::V4 => 4,
            IpFam::V6 => 6,
        }
    }
}

/* -------------------------------------------------------------------------- */

/// An IP address as its family plus the address integer.
/// For [IpFam::V4] the value always fits in 32 bits.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct IpAddress {
    pub fam: IpFam,
    pub value: u128,
}

impl IpAddress {
    pub fn version(&self) -> u8 {
        self.fam.version()
    }

    pub fn is_ipv4(&self) -> bool {
        self.fam == IpFam::V4
    }

    pub fn is_ipv6(&self) -> bool {
        self.fam == IpFam::V6
    }

    /// Convert back to a standard library [IpAddr].
    #[inline]
    pub fn to_ip(&self) -> IpAddr {
        match self.fam {
            IpFam::V4 => IpAddr::V4(Ipv4Addr::from(self.value as u32)),
            IpFam::V6 => IpAddr::V6(Ipv6Addr::from(self.value)),
        }
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(ip: Ipv4Addr) -> Self {
        IpAddress {
            fam: IpFam::V4,
            value: u32::from(ip) as u128,
        }
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(ip: Ipv6Addr) -> Self {
        IpAddress {
            fam: IpFam::V6,
            value: u128::from(ip),
        }
    }
}

impl From<IpAddr> for IpAddress {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<IpAddress> for IpAddr {
    fn from(addr: IpAddress) -> Self {
        addr.to_ip()
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ip())
    }
}

impl FromStr for IpAddress {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

/* -------------------------------------------------------------------------- */

/**
A CIDR network. `addr` is always the normalized network address (host bits
cleared); `host` keeps the address exactly as it was given, which differs
from `addr` only for non-aligned input such as `192.168.1.77/24`.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct IpNetwork {
    /// network address
    pub addr: IpAddress,
    /// address as written by the caller
    pub host: IpAddress,
    /// **v4**: `0..=32`, **v6**: `0..=128`
    pub prefix: u8,
}

impl IpNetwork {
    /// Build a network from an address and prefix length, validating the prefix.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, CalcError> {
        let addr: IpAddress = addr.into();
        if prefix > fam_bits(addr.fam) {
            return Err(CalcError::InvalidPrefixLength {
                prefix: prefix.to_string(),
                fam: Some(addr.fam),
            });
        }
        Ok(Self::from_parts(addr, prefix))
    }

    /// Single host network (/32 or /128).
    pub fn host(addr: IpAddress) -> Self {
        Self::from_parts(addr, fam_bits(addr.fam))
    }

    /// Caller guarantees `prefix` is in range for the family; clamped otherwise.
    pub(crate) fn from_parts(host: IpAddress, prefix: u8) -> Self {
        let prefix: u8 = prefix.min(fam_bits(host.fam));
        let mask: u128 = mask_u128(fam_bits(host.fam), prefix);
        IpNetwork {
            addr: IpAddress {
                fam: host.fam,
                value: host.value & mask,
            },
            host,
            prefix,
        }
    }

    pub fn fam(&self) -> IpFam {
        self.addr.fam
    }

    pub fn version(&self) -> u8 {
        self.addr.version()
    }

    pub fn is_ipv4(&self) -> bool {
        self.addr.is_ipv4()
    }

    pub fn is_ipv6(&self) -> bool {
        self.addr.is_ipv6()
    }

    /// True if the input had no host bits set.
    pub fn is_aligned(&self) -> bool {
        self.addr == self.host
    }

    pub fn network_address(&self) -> IpAddr {
        self.addr.to_ip()
    }

    pub fn mask(&self) -> u128 {
        mask_u128(fam_bits(self.fam()), self.prefix)
    }

    pub fn netmask(&self) -> IpAddr {
        IpAddress {
            fam: self.fam(),
            value: self.mask(),
        }
        .to_ip()
    }

    pub fn hostmask(&self) -> IpAddr {
        let all: u128 = mask_u128(fam_bits(self.fam()), fam_bits(self.fam()));
        IpAddress {
            fam: self.fam(),
            value: all & !self.mask(),
        }
        .to_ip()
    }

    /// Number of IP addresses contained by this network.
    /// Cannot be an [usize] due to IPv6. Saturating.
    pub fn len(&self) -> u128 {
        let host_bits: u8 = fam_bits(self.fam()).saturating_sub(self.prefix);

        // 2^128 does not fit in u128
        if host_bits == IPV6_BITS {
            return u128::MAX;
        }

        1u128 << host_bits
    }

    /// Exact number of addresses as a decimal string, `::/0` included.
    pub fn num_addresses(&self) -> String {
        match fam_bits(self.fam()).saturating_sub(self.prefix) {
            IPV6_BITS => V6_ALL_ADDRESSES.to_string(),
            _ => self.len().to_string(),
        }
    }

    /// Exact prefix containment of a single address.
    #[inline]
    pub fn contains(&self, ip: &IpAddress) -> bool {
        ip.fam == self.fam() && ip.value & self.mask() == self.addr.value
    }

    /// `self` lies entirely within `other`.
    pub fn is_subnet_of(&self, other: &IpNetwork) -> bool {
        self.fam() == other.fam() && self.prefix >= other.prefix && other.contains(&self.addr)
    }

    /// `self` covers all of `other`.
    pub fn is_supernet_of(&self, other: &IpNetwork) -> bool {
        other.is_subnet_of(self)
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SLASH}{}", self.addr, self.prefix)
    }
}

impl FromStr for IpNetwork {
    type Err = CalcError;

    /// Bare addresses are accepted as host networks.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_network(s)
    }
}

impl From<IpNet> for IpNetwork {
    fn from(net: IpNet) -> Self {
        Self::from_parts(net.addr().into(), net.prefix_len())
    }
}

/* -------------------------------------------------------------------------- */

/// Outcome of parsing caller text: a bare address or a CIDR network.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Parsed {
    Address(IpAddress),
    Network(IpNetwork),
}

impl Parsed {
    pub fn fam(&self) -> IpFam {
        match self {
            Parsed::Address(a) => a.fam,
            Parsed::Network(n) => n.fam(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Parsed::Network(_))
    }

    /// View as a network; addresses become host networks.
    pub fn as_network(&self) -> IpNetwork {
        match self {
            Parsed::Address(a) => IpNetwork::host(*a),
            Parsed::Network(n) => *n,
        }
    }
}

impl FromStr for Parsed {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/* -------------------------------------------------------------------------- */
