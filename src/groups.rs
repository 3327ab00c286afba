//! Voucher Groups

use std::fmt;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    units::{Unit, total_minor},
    vouchers::{VoucherClaim, VoucherFamily, VoucherKind},
};

/// Sequential group identifier, assigned in formation order starting at 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(usize);

impl GroupId {
    /// Identifier for the group at `index` (zero-based) in formation order.
    pub const fn from_index(index: usize) -> Self {
        GroupId(index + 1)
    }

    /// One-based sequence number.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A set of units paid for together under one voucher.
#[derive(Clone, Debug)]
pub struct Group<'a> {
    id: GroupId,
    units: SmallVec<[Unit<'a>; 10]>,
    total: i64,
    voucher: VoucherKind,
    discount: i64,
    currency: &'a Currency,
}

impl<'a> Group<'a> {
    /// Create a group and price it with `family`.
    pub fn priced(
        id: GroupId,
        units: SmallVec<[Unit<'a>; 10]>,
        family: &VoucherFamily,
        currency: &'a Currency,
    ) -> Self {
        let total = total_minor(&units);
        let VoucherClaim { voucher, discount } = family.claim(total);

        Group {
            id,
            units,
            total,
            voucher,
            discount,
            currency,
        }
    }

    /// Move every unit of `other` into this group and re-price it.
    pub fn absorb(&mut self, other: Group<'a>, family: &VoucherFamily) {
        self.units.extend(other.units);
        self.total = self.total.saturating_add(other.total);

        let VoucherClaim { voucher, discount } = family.claim(self.total);

        self.voucher = voucher;
        self.discount = discount;
    }

    pub(crate) fn renumber(&mut self, id: GroupId) {
        self.id = id;
    }

    /// Group identifier.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Iterate over the units in the group.
    pub fn iter(&self) -> impl Iterator<Item = &Unit<'a>> {
        self.units.iter()
    }

    /// Units in formation order.
    pub fn units(&self) -> &[Unit<'a>] {
        &self.units
    }

    /// Sum of unit prices.
    pub fn total(&self) -> Money<'a, Currency> {
        Money::from_minor(self.total, self.currency)
    }

    /// Sum of unit prices in minor units.
    pub fn total_minor(&self) -> i64 {
        self.total
    }

    /// Claimed voucher kind.
    pub fn voucher(&self) -> VoucherKind {
        self.voucher
    }

    /// Discount earned by the claimed voucher.
    pub fn discount(&self) -> Money<'a, Currency> {
        Money::from_minor(self.discount, self.currency)
    }

    /// Discount in minor units.
    pub fn discount_minor(&self) -> i64 {
        self.discount
    }

    /// Currency of the group amounts.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Get the number of units in the group.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the group has no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
