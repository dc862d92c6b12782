// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
IP address and subnet analysis.

- parse and validate IPv4/IPv6 addresses and CIDR networks
- classify them against named ranges (RFC1918, RFC6598, Cloudflare)
- compute IPv4 subnet facts under Azure, AWS, OCI or standard reservations

Everything here is pure computation over immutable data; the range tables
are process-wide statics and may be used from any thread.

```
use subnetcalc::{compute, parse_network, Mode};

let net = parse_network("192.168.1.0/24").unwrap();
let info = compute(&net, Mode::Azure).unwrap();
assert_eq!(info.usable_addresses, 251);
assert_eq!(info.first_usable_ip.unwrap().to_string(), "192.168.1.4");
```
*/

mod iptools;
pub mod reports;

pub use iptools::*;
