// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) static SLASH: &str = "/";
pub(crate) static COMMENT: &str = "#";

// mod.rs
pub(crate) static ERR_INV_ADDR: &str = "invalid IP address format";
pub(crate) static ERR_EMPTY: &str = "empty address";
pub(crate) static ERR_CIDR_FMT: &str = "invalid IP network format (too many slashes)";
pub(crate) static ERR_CIDR_INV_PRE: &str = "invalid prefix length";
pub(crate) static ERR_CIDR_INV_V4: &str = "IPv4 prefix length must be 0..=32, got";
pub(crate) static ERR_CIDR_INV_V6: &str = "IPv6 prefix length must be 0..=128, got";
pub(crate) static ERR_CIDR_INV_MASK: &str = "invalid IPv4 netmask or hostmask";
pub(crate) static ERR_MODE: &str = "invalid mode";
pub(crate) static ERR_MODE_HINT: &str = "must be one of: Azure, AWS, OCI, Standard";
pub(crate) static ERR_ONLY_V4: &str = "this operation only supports IPv4";
pub(crate) static ERR_ONLY_V6: &str = "this operation only supports IPv6";

// subnet.rs
pub(crate) static NOTE_P2P: &str = "RFC 3021 point-to-point link (no broadcast)";
pub(crate) static NOTE_HOST: &str = "Single host address";
pub(crate) static NOTE_V6: &str = "IPv6 subnets do not have reserved addresses like IPv4";
pub(crate) static NOTE_NO_USABLE: &str = "No usable addresses after reservations for mode";

// 2^128, does not fit in a u128
pub(crate) static V6_ALL_ADDRESSES: &str = "340282366920938463463374607431768211456";
