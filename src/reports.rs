// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request/response shapes for callers which speak JSON (HTTP handlers, the CLI).

use crate::iptools::{
    classify_parsed, compute, compute_v6, parse, parse_network, CalcError, Classification, IpFam,
    Ipv6SubnetInfo, Mode, Parsed, RangeGroup, RangeTable, SubnetInfo, CLOUDFLARE_RANGES,
    PRIVATE_RANGES,
};
use serde::{ser, Deserialize, Serialize, Serializer};
use serde_json::Number;
use std::net::IpAddr;
use tracing::debug;

/// `{address}`
#[derive(Clone, Debug, Deserialize)]
pub struct AddressRequest {
    pub address: String,
}

/// `{network, mode?}`, mode defaults to Azure.
#[derive(Clone, Debug, Deserialize)]
pub struct SubnetRequest {
    pub network: String,
    #[serde(default)]
    pub mode: Option<String>,
}

/// Error body, f.ex. `{"detail": "invalid IP address format: '1.2.3'"}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ErrorReport {
    pub detail: String,
}

impl From<&CalcError> for ErrorReport {
    fn from(err: &CalcError) -> Self {
        ErrorReport {
            detail: err.to_string(),
        }
    }
}

impl From<CalcError> for ErrorReport {
    fn from(err: CalcError) -> Self {
        ErrorReport::from(&err)
    }
}

/* ---------------------------------- */

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Validation {
    Address {
        valid: bool,
        /// canonical form
        address: String,
        is_ipv4: bool,
        is_ipv6: bool,
    },
    Network {
        valid: bool,
        /// as given
        address: String,
        network_address: IpAddr,
        netmask: IpAddr,
        prefix_length: u8,
        /// exact decimal count, written as a JSON integer (2^128 for ::/0)
        #[serde(serialize_with = "json_integer")]
        num_addresses: String,
        is_ipv4: bool,
        is_ipv6: bool,
    },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PrivateCheck {
    pub address: String,
    pub is_rfc1918: bool,
    pub is_rfc6598: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rfc1918_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rfc6598_range: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CloudflareCheck {
    pub address: String,
    pub is_cloudflare: bool,
    pub ip_version: u8,
    pub matched_ranges: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SubnetReport {
    /// as given
    pub network: String,
    #[serde(flatten)]
    pub info: SubnetInfo,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Ipv6SubnetReport {
    pub network: String,
    #[serde(flatten)]
    pub info: Ipv6SubnetInfo,
}

/// Write a decimal string as a JSON number of any size.
fn json_integer<S: Serializer>(digits: &str, serializer: S) -> Result<S::Ok, S::Error> {
    let n: Number = digits.parse().map_err(ser::Error::custom)?;
    n.serialize(serializer)
}

/* ---------------------------------- */

/// Validate an address or CIDR network.
pub fn validate(address: &str) -> Result<Validation, CalcError> {
    let report: Validation = match parse(address)? {
        Parsed::Address(a) => Validation::Address {
            valid: true,
            address: a.to_string(),
            is_ipv4: a.is_ipv4(),
            is_ipv6: a.is_ipv6(),
        },
        Parsed::Network(n) => Validation::Network {
            valid: true,
            address: address.to_string(),
            network_address: n.network_address(),
            netmask: n.netmask(),
            prefix_length: n.prefix,
            num_addresses: n.num_addresses(),
            is_ipv4: n.is_ipv4(),
            is_ipv6: n.is_ipv6(),
        },
    };
    Ok(report)
}

/// Check an IPv4 address or network against the RFC1918 and RFC6598 blocks.
pub fn check_private(address: &str) -> Result<PrivateCheck, CalcError> {
    let parsed: Parsed = parse(address)?;
    if parsed.fam() != IpFam::V4 {
        return Err(CalcError::VersionUnsupported {
            expected: IpFam::V4,
            input: address.to_string(),
        });
    }

    let c: Classification = classify_parsed(&parsed, &PRIVATE_RANGES);
    let rfc1918: Option<String> = c.first_in(RangeGroup::Rfc1918).map(|e| e.label.clone());
    let rfc6598: Option<String> = c.first_in(RangeGroup::Rfc6598).map(|e| e.label.clone());
    debug!(address, ?rfc1918, ?rfc6598, "private check");

    Ok(PrivateCheck {
        address: address.to_string(),
        is_rfc1918: rfc1918.is_some(),
        is_rfc6598: rfc6598.is_some(),
        matched_rfc1918_range: rfc1918,
        matched_rfc6598_range: rfc6598,
    })
}

/// Check an address or network against the built-in Cloudflare ranges.
pub fn check_cloudflare(address: &str) -> Result<CloudflareCheck, CalcError> {
    check_cloudflare_with(address, &CLOUDFLARE_RANGES)
}

/// Check an address or network against any table of Cloudflare ranges.
pub fn check_cloudflare_with(address: &str, table: &RangeTable) -> Result<CloudflareCheck, CalcError> {
    let parsed: Parsed = parse(address)?;
    let matched_ranges: Vec<String> = classify_parsed(&parsed, table).labels();
    debug!(address, matches = matched_ranges.len(), "cloudflare check");

    Ok(CloudflareCheck {
        address: address.to_string(),
        is_cloudflare: !matched_ranges.is_empty(),
        ip_version: parsed.fam().version(),
        matched_ranges,
    })
}

/**
IPv4 subnet information. `mode` is matched case-insensitively and defaults
to [Mode::Azure]; it is checked before the network is parsed.
*/
pub fn subnet_info(network: &str, mode: Option<&str>) -> Result<SubnetReport, CalcError> {
    let mode: Mode = match mode {
        Some(m) => m.parse()?,
        None => Mode::default(),
    };
    let info: SubnetInfo = compute(&parse_network(network)?, mode)?;
    Ok(SubnetReport {
        network: network.to_string(),
        info,
    })
}

/// IPv6 subnet information (no reservations apply).
pub fn subnet_info_v6(network: &str) -> Result<Ipv6SubnetReport, CalcError> {
    let info: Ipv6SubnetInfo = compute_v6(&parse_network(network)?)?;
    Ok(Ipv6SubnetReport {
        network: network.to_string(),
        info,
    })
}

impl AddressRequest {
    pub fn validate(&self) -> Result<Validation, CalcError> {
        validate(&self.address)
    }

    pub fn check_private(&self) -> Result<PrivateCheck, CalcError> {
        check_private(&self.address)
    }

    pub fn check_cloudflare(&self) -> Result<CloudflareCheck, CalcError> {
        check_cloudflare(&self.address)
    }
}

impl SubnetRequest {
    pub fn subnet_info(&self) -> Result<SubnetReport, CalcError> {
        subnet_info(&self.network, self.mode.as_deref())
    }
}

/* -------------------------------------------------------------------------- */
