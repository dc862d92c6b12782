// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    fam_bits,
    strings::*,
    structs::{IpAddress, IpFam, IpNetwork, Parsed},
    CalcError,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr};
use tracing::trace;

lazy_static! {
    static ref PREFIX_LEN: Regex = Regex::new(r"^[0-9]+$").expect("prefix regex");
    static ref DOTTED_MASK: Regex =
        Regex::new(r"^[0-9]{1,3}(\.[0-9]{1,3}){3}$").expect("dotted mask regex");
}

/**
Parse an IP address or a CIDR network, depending on the presence of `/`.

Supported formats:
- IPv4 address: 10.10.10.1 (no leading zeros in octets)
- IPv6 address: 2001:db8::1, ::ffff:10.0.0.1
- CIDR: 10.10.10.0/28, 2001:db8::/32
- IPv4 CIDR with a mask: 10.10.10.0/255.255.255.240 or 10.10.10.0/0.0.0.15

Surrounding whitespace is ignored. Host bits in a CIDR are allowed; see
[IpNetwork] for how the original and normalized addresses are exposed.
*/
pub fn parse(text: impl AsRef<str>) -> Result<Parsed, CalcError> {
    let text: &str = text.as_ref().trim();
    let parsed: Parsed = if text.contains(SLASH) {
        Parsed::Network(parse_network(text)?)
    } else {
        Parsed::Address(parse_address(text)?)
    };
    trace!(input = text, ?parsed, "parsed");
    Ok(parsed)
}

/// Parse a bare IPv4 or IPv6 address.
pub fn parse_address(text: impl AsRef<str>) -> Result<IpAddress, CalcError> {
    let text: &str = text.as_ref().trim();
    if text.is_empty() {
        return Err(CalcError::InvalidAddressFormat(String::new()));
    }
    text.parse::<IpAddr>()
        .map(IpAddress::from)
        .map_err(|_| CalcError::InvalidAddressFormat(text.into()))
}

/**
Parse a CIDR network. A bare address is accepted as a host network
(/32 or /128).
*/
pub fn parse_network(text: impl AsRef<str>) -> Result<IpNetwork, CalcError> {
    let text: &str = text.as_ref().trim();
    if !text.contains(SLASH) {
        return parse_address(text).map(IpNetwork::host);
    }

    let parts: Vec<&str> = text.split(SLASH).collect();
    if parts.len() != 2 {
        return Err(CalcError::InvalidAddressFormat(text.into()));
    }

    let addr: IpAddress = parse_address(parts[0])?;
    let prefix: u8 = parse_prefix(addr.fam, parts[1].trim())?;

    Ok(IpNetwork::from_parts(addr, prefix))
}

/// Prefix length as decimal digits, or (IPv4 only) a dotted netmask/hostmask.
fn parse_prefix(fam: IpFam, prefix: &str) -> Result<u8, CalcError> {
    if PREFIX_LEN.is_match(prefix) {
        return match prefix.parse::<u32>() {
            Ok(len) if len <= fam_bits(fam) as u32 => Ok(len as u8),
            _ => Err(CalcError::InvalidPrefixLength {
                prefix: prefix.into(),
                fam: Some(fam),
            }),
        };
    }

    if fam == IpFam::V4 && DOTTED_MASK.is_match(prefix) {
        return mask_to_prefix(prefix);
    }

    Err(CalcError::InvalidPrefixLength {
        prefix: prefix.into(),
        fam: None,
    })
}

/**
Convert a dotted IPv4 mask to a prefix length. A netmask (ones, then zeros)
is tried first, then a hostmask (zeros, then ones), so `0.0.0.0` is `/0`
and `255.255.255.255` is `/32`.
*/
fn mask_to_prefix(mask: &str) -> Result<u8, CalcError> {
    let invalid = || CalcError::InvalidPrefixLength {
        prefix: format!("{ERR_CIDR_INV_MASK} {mask}"),
        fam: None,
    };
    let bits: u32 = u32::from(mask.parse::<Ipv4Addr>().map_err(|_| invalid())?);

    if bits.leading_ones() + bits.trailing_zeros() == 32 {
        return Ok(bits.leading_ones() as u8);
    }
    if bits.leading_zeros() + bits.trailing_ones() == 32 {
        return Ok(bits.leading_zeros() as u8);
    }
    Err(invalid())
}

/* -------------------------------------------------------------------------- */
