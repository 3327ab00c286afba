//! Optimisation Results

use rusty_money::{Money, iso::Currency};

use crate::{categories::AccountPolicy, groups::Group, vouchers::VoucherKind};

/// Final groups and totals for one optimisation run.
///
/// `total_bill` is the sum of group totals, `total_discount` the sum of group
/// discounts, and `final_price = total_bill - total_discount + total_admin_cost`.
#[derive(Debug, Clone)]
pub struct OptimisationResult<'a> {
    groups: Vec<Group<'a>>,
    total_bill: i64,
    total_discount: i64,
    total_admin_cost: i64,
    final_price: i64,
    accounts_needed: usize,
    degraded: bool,
    currency: &'a Currency,
}

impl<'a> OptimisationResult<'a> {
    /// The all-zero result of an empty cart.
    pub fn empty(currency: &'a Currency) -> Self {
        Self {
            groups: Vec::new(),
            total_bill: 0,
            total_discount: 0,
            total_admin_cost: 0,
            final_price: 0,
            accounts_needed: 0,
            degraded: false,
            currency,
        }
    }

    /// Fold final groups into a result.
    pub fn from_groups(
        groups: Vec<Group<'a>>,
        admin_cost: i64,
        account_policy: AccountPolicy,
        degraded: bool,
        currency: &'a Currency,
    ) -> Self {
        let total_bill = groups
            .iter()
            .map(Group::total_minor)
            .fold(0_i64, i64::saturating_add);

        let total_discount = groups
            .iter()
            .map(Group::discount_minor)
            .fold(0_i64, i64::saturating_add);

        let accounts_needed = accounts_needed(&groups, account_policy);
        let total_admin_cost = i64::try_from(accounts_needed)
            .unwrap_or(i64::MAX)
            .saturating_mul(admin_cost);

        let final_price = total_bill
            .saturating_sub(total_discount)
            .saturating_add(total_admin_cost);

        Self {
            groups,
            total_bill,
            total_discount,
            total_admin_cost,
            final_price,
            accounts_needed,
            degraded,
            currency,
        }
    }

    /// Final groups, numbered in order.
    pub fn groups(&self) -> &[Group<'a>] {
        &self.groups
    }

    /// Sum of every group total.
    pub fn total_bill(&self) -> Money<'a, Currency> {
        Money::from_minor(self.total_bill, self.currency)
    }

    /// Sum of every group discount.
    pub fn total_discount(&self) -> Money<'a, Currency> {
        Money::from_minor(self.total_discount, self.currency)
    }

    /// Admin cost of every account used.
    pub fn total_admin_cost(&self) -> Money<'a, Currency> {
        Money::from_minor(self.total_admin_cost, self.currency)
    }

    /// Bill after discounts, plus admin costs.
    pub fn final_price(&self) -> Money<'a, Currency> {
        Money::from_minor(self.final_price, self.currency)
    }

    /// Sum of every group total, in minor units.
    pub fn total_bill_minor(&self) -> i64 {
        self.total_bill
    }

    /// Sum of every group discount, in minor units.
    pub fn total_discount_minor(&self) -> i64 {
        self.total_discount
    }

    /// Admin cost of every account used, in minor units.
    pub fn total_admin_cost_minor(&self) -> i64 {
        self.total_admin_cost
    }

    /// Final price, in minor units.
    pub fn final_price_minor(&self) -> i64 {
        self.final_price
    }

    /// Number of voucher-bearing accounts required.
    pub fn accounts_needed(&self) -> usize {
        self.accounts_needed
    }

    /// Whether packing hit its loop guard.
    ///
    /// A degraded result still places every unit and keeps every total
    /// consistent, but its grouping should not be trusted blindly.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

fn accounts_needed(groups: &[Group<'_>], account_policy: AccountPolicy) -> usize {
    match account_policy {
        AccountPolicy::PerGroup => groups.len(),
        AccountPolicy::Combo => {
            let min_50k = groups
                .iter()
                .filter(|group| group.voucher() == VoucherKind::Min50k)
                .count();

            min_50k.max(groups.len() - min_50k)
        }
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::iso::IDR;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        groups::GroupId,
        units::Unit,
        vouchers::{VoucherFamily, VoucherSpec},
    };

    use super::*;

    fn dual_family() -> TestResult<VoucherFamily> {
        Ok(VoucherFamily::dual(
            VoucherSpec::new(0, 37_000, Percentage::from(0.5))?,
            VoucherSpec::new(50_000, 30_000, Percentage::from(0.5))?,
            60_000,
        )?)
    }

    fn groups<'a>(totals: &[i64], family: &VoucherFamily) -> Vec<Group<'a>> {
        totals
            .iter()
            .enumerate()
            .map(|(index, &total)| {
                Group::priced(
                    GroupId::from_index(index),
                    smallvec![Unit::new("unit", Money::from_minor(total, IDR))],
                    family,
                    IDR,
                )
            })
            .collect()
    }

    #[test]
    fn empty_result_is_all_zero() {
        let result = OptimisationResult::empty(IDR);

        assert!(result.groups().is_empty());
        assert_eq!(result.total_bill_minor(), 0);
        assert_eq!(result.total_discount_minor(), 0);
        assert_eq!(result.total_admin_cost_minor(), 0);
        assert_eq!(result.final_price_minor(), 0);
        assert_eq!(result.accounts_needed(), 0);
        assert!(!result.is_degraded());
    }

    #[test]
    fn per_group_policy_charges_every_group() -> TestResult {
        let family = dual_family()?;
        let result = OptimisationResult::from_groups(
            groups(&[55_000, 70_000, 20_000], &family),
            5_000,
            AccountPolicy::PerGroup,
            false,
            IDR,
        );

        // 27500 + 35000 + 10000
        assert_eq!(result.total_bill_minor(), 145_000);
        assert_eq!(result.total_discount_minor(), 72_500);
        assert_eq!(result.accounts_needed(), 3);
        assert_eq!(result.total_admin_cost_minor(), 15_000);
        assert_eq!(result.final_price_minor(), 145_000 - 72_500 + 15_000);

        Ok(())
    }

    #[test]
    fn combo_policy_counts_the_larger_kind() -> TestResult {
        let family = dual_family()?;
        let result = OptimisationResult::from_groups(
            groups(&[55_000, 70_000, 20_000], &family),
            5_000,
            AccountPolicy::Combo,
            false,
            IDR,
        );

        // one Min50k group, two NoMinimum groups
        assert_eq!(result.accounts_needed(), 2);
        assert_eq!(result.total_admin_cost(), Money::from_minor(10_000, IDR));
        assert_eq!(result.final_price_minor(), 145_000 - 72_500 + 10_000);

        Ok(())
    }

    #[test]
    fn degraded_flag_is_carried() -> TestResult {
        let family = dual_family()?;
        let result = OptimisationResult::from_groups(
            groups(&[10_000], &family),
            5_000,
            AccountPolicy::PerGroup,
            true,
            IDR,
        );

        assert!(result.is_degraded());

        Ok(())
    }
}
