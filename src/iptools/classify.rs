// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    ranges::{RangeEntry, RangeGroup, RangeTable},
    structs::{IpAddress, IpNetwork, Parsed},
};
use tracing::trace;

/// The entries of a [RangeTable] that matched an input, in table order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Classification<'t> {
    pub matches: Vec<&'t RangeEntry>,
}

impl<'t> Classification<'t> {
    /// True iff anything matched.
    pub fn matched(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.matches.iter().map(|e| e.label.clone()).collect()
    }

    /// First matching entry belonging to `group`.
    pub fn first_in(&self, group: RangeGroup) -> Option<&'t RangeEntry> {
        self.matches.iter().copied().find(|e| e.group == group)
    }

    pub fn in_group(&self, group: RangeGroup) -> bool {
        self.first_in(group).is_some()
    }
}

/**
Classify a single address against `table`.

An entry matches when the address masked to the entry's prefix equals the
entry's network address. Every matching entry is returned, so overlapping
tables are fine. Only entries of the address's own family are considered.
*/
pub fn classify<'t>(addr: &IpAddress, table: &'t RangeTable) -> Classification<'t> {
    let matches: Vec<&RangeEntry> = table
        .entries(addr.fam)
        .iter()
        .filter(|e| addr.value & e.network.mask() == e.network.addr.value)
        .collect();
    trace!(%addr, matches = matches.len(), "classified address");
    Classification { matches }
}

/**
Classify a network against `table`. An entry matches when the network is a
subnet of it or a supernet of it, so `10.0.0.0/7` matches `10.0.0.0/8`
as well as `10.1.0.0/16` does.
*/
pub fn classify_network<'t>(net: &IpNetwork, table: &'t RangeTable) -> Classification<'t> {
    let matches: Vec<&RangeEntry> = table
        .entries(net.fam())
        .iter()
        .filter(|e| net.is_subnet_of(&e.network) || net.is_supernet_of(&e.network))
        .collect();
    trace!(%net, matches = matches.len(), "classified network");
    Classification { matches }
}

/// Dispatch on the kind of parsed input.
pub fn classify_parsed<'t>(parsed: &Parsed, table: &'t RangeTable) -> Classification<'t> {
    match parsed {
        Parsed::Address(a) => classify(a, table),
        Parsed::Network(n) => classify_network(n, table),
    }
}

/* -------------------------------------------------------------------------- */
