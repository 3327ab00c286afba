//! Greedy Packer
//!
//! Single-pass greedy fill under a basket ceiling.

use rusty_money::iso::Currency;
use tracing::debug;

use crate::{
    packers::{Packer, Packing, fill, push_group},
    units::{Unit, sort_by_price_desc},
    vouchers::VoucherFamily,
};

/// Packs units, most expensive first, into groups no larger than `ceiling`.
///
/// An empty group always takes the next unit, so a unit priced above the
/// ceiling gets a group of its own instead of being starved.
#[derive(Debug, Clone, Copy)]
pub struct GreedyPacker {
    ceiling: i64,
}

impl GreedyPacker {
    /// Create a greedy packer with the given basket ceiling (minor units).
    pub const fn new(ceiling: i64) -> Self {
        Self { ceiling }
    }

    /// Basket ceiling.
    pub const fn ceiling(&self) -> i64 {
        self.ceiling
    }
}

impl Packer for GreedyPacker {
    fn pack<'a>(
        &self,
        mut units: Vec<Unit<'a>>,
        family: &VoucherFamily,
        currency: &'a Currency,
    ) -> Packing<'a> {
        sort_by_price_desc(&mut units);

        let mut groups = Vec::new();
        let mut remaining = units;

        while !remaining.is_empty() {
            let (basket, rest) = fill(remaining, self.ceiling, true);

            debug!(
                units = basket.len(),
                remaining = rest.len(),
                ceiling = self.ceiling,
                "closed greedy group"
            );

            push_group(&mut groups, basket, family, currency);
            remaining = rest;
        }

        Packing {
            groups,
            degraded: false,
        }
    }
}
