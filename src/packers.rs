//! Packers
//!
//! Packers partition expanded units into voucher groups. Every group is priced
//! with the category's voucher family as soon as it is formed.

use rusty_money::iso::Currency;
use smallvec::SmallVec;

use crate::{
    groups::{Group, GroupId},
    units::Unit,
    vouchers::VoucherFamily,
};

pub mod band;
pub mod greedy;

pub use band::BandPacker;
pub use greedy::GreedyPacker;

/// Groups produced by a packer.
#[derive(Debug, Clone)]
pub struct Packing<'a> {
    /// Groups in formation order
    pub groups: Vec<Group<'a>>,

    /// The packer hit its loop guard and dumped the leftovers into one group.
    ///
    /// Every unit is still placed, but the economics of the last group are
    /// not to be trusted.
    pub degraded: bool,
}

/// Trait for partitioning units into groups
pub trait Packer {
    /// Pack `units` into groups priced with `family`.
    ///
    /// Every unit ends up in exactly one group and the call always returns.
    fn pack<'a>(
        &self,
        units: Vec<Unit<'a>>,
        family: &VoucherFamily,
        currency: &'a Currency,
    ) -> Packing<'a>;
}

/// Running state of a single basket during a descending-price greedy fill.
#[derive(Debug, Clone, Copy)]
struct Fill {
    total: i64,
    taken: usize,
    limit: i64,
    accept_first: bool,
}

impl Fill {
    const fn new(limit: i64, accept_first: bool) -> Self {
        Self {
            total: 0,
            taken: 0,
            limit,
            accept_first,
        }
    }

    fn accepts(&mut self, price: i64) -> bool {
        let next = self.total.saturating_add(price);

        if next <= self.limit || (self.accept_first && self.taken == 0) {
            self.total = next;
            self.taken += 1;

            true
        } else {
            false
        }
    }
}

/// Total a greedy fill capped at `limit` would reach, without moving any unit.
pub(crate) fn fill_total(units: &[Unit<'_>], limit: i64, accept_first: bool) -> i64 {
    let mut fill = Fill::new(limit, accept_first);

    for unit in units {
        fill.accepts(unit.minor());
    }

    fill.total
}

/// Greedy fill capped at `limit`, splitting `units` into the basket and the rest.
///
/// With `accept_first`, an empty basket takes its first candidate regardless of
/// the limit. Both halves keep the input order.
pub(crate) fn fill(
    units: Vec<Unit<'_>>,
    limit: i64,
    accept_first: bool,
) -> (SmallVec<[Unit<'_>; 10]>, Vec<Unit<'_>>) {
    let mut basket = SmallVec::new();
    let mut rest = Vec::with_capacity(units.len());
    let mut fill = Fill::new(limit, accept_first);

    for unit in units {
        if fill.accepts(unit.minor()) {
            basket.push(unit);
        } else {
            rest.push(unit);
        }
    }

    (basket, rest)
}

/// Appends a priced group, numbered after the groups already formed.
pub(crate) fn push_group<'a>(
    groups: &mut Vec<Group<'a>>,
    units: SmallVec<[Unit<'a>; 10]>,
    family: &VoucherFamily,
    currency: &'a Currency,
) {
    let id = GroupId::from_index(groups.len());

    groups.push(Group::priced(id, units, family, currency));
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::IDR};

    use super::*;

    fn units<'a>(prices: &[i64]) -> Vec<Unit<'a>> {
        prices
            .iter()
            .map(|&price| Unit::new("unit", Money::from_minor(price, IDR)))
            .collect()
    }

    #[test]
    fn fill_skips_units_that_would_overflow() {
        let (basket, rest) = fill(units(&[40, 30, 20, 10]), 65, false);

        let taken: Vec<i64> = basket.iter().map(Unit::minor).collect();
        let left: Vec<i64> = rest.iter().map(Unit::minor).collect();

        assert_eq!(taken, vec![40, 20]);
        assert_eq!(left, vec![30, 10]);
    }

    #[test]
    fn fill_accepts_oversized_first_unit_when_seeded() {
        let (basket, rest) = fill(units(&[100, 10]), 50, true);

        assert_eq!(basket.len(), 1);
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn strict_fill_rejects_oversized_units() {
        let (basket, rest) = fill(units(&[100]), 50, false);

        assert!(basket.is_empty());
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn fill_total_matches_fill() {
        let input = units(&[40, 30, 20, 10]);
        let planned = fill_total(&input, 65, false);
        let (basket, _) = fill(input, 65, false);

        assert_eq!(planned, basket.iter().map(Unit::minor).sum::<i64>());
    }
}
