// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::CalcError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/**
Cloud provider address reservation mode.

Provider reservation counts include the broadcast address:
- Azure/AWS: `.0`, `.1`, `.2`, `.3` and broadcast (5)
- OCI: `.0`, `.1` and broadcast (3)
- Standard: `.0` and broadcast (2)

/31 (RFC 3021 point-to-point) and /32 (host route) reserve nothing.
*/
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Azure,
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "OCI")]
    Oci,
    Standard,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Azure, Mode::Aws, Mode::Oci, Mode::Standard];

    /// Canonical spelling, as used in requests and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Azure => "Azure",
            Mode::Aws => "AWS",
            Mode::Oci => "OCI",
            Mode::Standard => "Standard",
        }
    }

    /// Reserved addresses for subnets of /30 and larger, broadcast included.
    const fn base_reserved(&self) -> u32 {
        match self {
            Mode::Azure | Mode::Aws => 5,
            Mode::Oci => 3,
            Mode::Standard => 2,
        }
    }

    /// Addresses reserved at the start of the block (base count minus broadcast).
    pub fn leading_reserved(&self) -> u32 {
        self.base_reserved() - 1
    }

    /// Number of reserved addresses in an IPv4 subnet of the given prefix length.
    pub fn reserved_count(&self, prefix: u8) -> u32 {
        match prefix {
            31 | 32 => 0,
            _ => self.base_reserved(),
        }
    }
}

/// See [Mode::reserved_count].
pub fn reserved_count(mode: Mode, prefix: u8) -> u32 {
    mode.reserved_count(prefix)
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CalcError;

    /// Case-insensitive: "aws", "Aws" and "AWS" are all [Mode::Aws].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().to_ascii_lowercase();
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| CalcError::UnsupportedMode(s.into()))
    }
}

/* -------------------------------------------------------------------------- */
