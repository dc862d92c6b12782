// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IP address/CIDR parsing, named range classification and subnet arithmetic.

mod addresses;
mod classify;
mod ranges;
mod reservation;
mod strings;
mod structs;
mod subnet;

use std::{error, fmt};
use strings::*;

pub use addresses::*;
pub use classify::*;
pub use ranges::*;
pub use reservation::{reserved_count, Mode};
pub use structs::{IpAddress, IpFam, IpNetwork, Parsed};
pub use subnet::*;

pub(crate) const IPV4_BITS: u8 = 32;
pub(crate) const IPV6_BITS: u8 = 128;

#[rustfmt::skip]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CalcError {
    /// address part cannot be parsed (also: empty input, too many slashes)
    InvalidAddressFormat(String),
    /// prefix is non-numeric, empty or out of range for the IP family
    InvalidPrefixLength { prefix: String, fam: Option<IpFam> },
    /// mode text is not one of Azure, AWS, OCI, Standard
    UnsupportedMode(String),
    /// operation is defined for the `expected` family only
    VersionUnsupported { expected: IpFam, input: String },
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::InvalidAddressFormat(addr) if addr.is_empty() => {
                write!(f, "{ERR_INV_ADDR}: {ERR_EMPTY}")
            }
            CalcError::InvalidAddressFormat(addr) if addr.matches(SLASH).count() > 1 => {
                write!(f, "{ERR_CIDR_FMT}: '{addr}'")
            }
            CalcError::InvalidAddressFormat(addr) => {
                write!(f, "{ERR_INV_ADDR}: '{addr}'")
            }
            CalcError::InvalidPrefixLength { prefix, fam } => match fam {
                Some(IpFam::V4) => write!(f, "{ERR_CIDR_INV_V4} '{prefix}'"),
                Some(IpFam::V6) => write!(f, "{ERR_CIDR_INV_V6} '{prefix}'"),
                None => write!(f, "{ERR_CIDR_INV_PRE}: '{prefix}'"),
            },
            CalcError::UnsupportedMode(mode) => {
                write!(f, "{ERR_MODE} '{mode}', {ERR_MODE_HINT}")
            }
            CalcError::VersionUnsupported { expected, input } => match expected {
                IpFam::V4 => write!(f, "{ERR_ONLY_V4}: '{input}'"),
                IpFam::V6 => write!(f, "{ERR_ONLY_V6}: '{input}'"),
            },
        }
    }
}

impl error::Error for CalcError {}

/* ---------------------------------- */

/// Number of bits in an address of the given family.
#[inline]
pub(crate) fn fam_bits(fam: IpFam) -> u8 {
    match fam {
        IpFam::V4 => IPV4_BITS,
        IpFam::V6 => IPV6_BITS,
    }
}

/**
Returns a u128 with `prefix` high bits of a `bits` wide value set, remaining
low bits zero.

bits: 32 or 128, prefix: `0..=bits`
*/
#[inline]
pub(crate) fn mask_u128(bits: u8, prefix: u8) -> u128 {
    if prefix == 0 {
        return 0;
    }
    let all: u128 = if bits == IPV6_BITS {
        !0u128
    } else {
        (1u128 << bits) - 1
    };
    if prefix >= bits {
        return all;
    }
    let low: u8 = bits - prefix;
    all & (!((1u128 << low) - 1))
}

/// IPv4 netmask for a prefix length. Prefix 0 yields 0, anything >= 32 all ones.
#[inline]
pub fn netmask_v4(prefix: u8) -> u32 {
    mask_u128(IPV4_BITS, prefix) as u32
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_u128() {
        assert_eq!(mask_u128(IPV4_BITS, 0), 0);
        assert_eq!(mask_u128(IPV4_BITS, 24), 0xFFFF_FF00);
        assert_eq!(mask_u128(IPV4_BITS, 32), 0xFFFF_FFFF);
        assert_eq!(mask_u128(IPV6_BITS, 128), u128::MAX);
        assert_eq!(mask_u128(IPV6_BITS, 1), 1u128 << 127);
        assert_eq!(mask_u128(IPV6_BITS, 32), 0xFFFF_FFFFu128 << 96);
    }

    #[test]
    fn test_netmask_v4() {
        assert_eq!(netmask_v4(0), 0x0000_0000);
        assert_eq!(netmask_v4(8), 0xFF00_0000);
        assert_eq!(netmask_v4(16), 0xFFFF_0000);
        assert_eq!(netmask_v4(31), 0xFFFF_FFFE);
        assert_eq!(netmask_v4(32), 0xFFFF_FFFF);
    }

    #[test]
    fn test_error_display() {
        let err = CalcError::InvalidAddressFormat("300.1.1.1".into());
        assert_eq!(err.to_string(), "invalid IP address format: '300.1.1.1'");

        let err = CalcError::InvalidAddressFormat(String::new());
        assert_eq!(err.to_string(), "invalid IP address format: empty address");

        let err = CalcError::InvalidAddressFormat("10.0.0.0/8/8".into());
        assert!(err.to_string().contains("too many slashes"));

        let err = CalcError::InvalidPrefixLength { prefix: "33".into(), fam: Some(IpFam::V4) };
        assert!(err.to_string().contains("0..=32"));

        let err = CalcError::UnsupportedMode("GCP".into());
        assert_eq!(
            err.to_string(),
            "invalid mode 'GCP', must be one of: Azure, AWS, OCI, Standard"
        );

        let err = CalcError::VersionUnsupported { expected: IpFam::V4, input: "::/0".into() };
        assert!(err.to_string().contains("only supports IPv4"));
    }
}
