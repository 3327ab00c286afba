//! Optimiser
//!
//! Runs the full pipeline for one cart: expand, pack, merge, aggregate.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::Cart,
    categories::{Category, PackingStrategy},
    merger::merge_groups,
    packers::{BandPacker, GreedyPacker, Packer, Packing},
    result::OptimisationResult,
    units::expand,
};

/// Admin cost per account when none is given, in minor units.
pub const DEFAULT_ADMIN_COST: i64 = 5_000;

/// Optimiser configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum OptimiserError {
    /// The admin cost must be a positive amount.
    #[error("admin cost must be positive, got {0}")]
    NonPositiveAdminCost(i64),
}

/// Allocates carts into voucher groups for one category.
///
/// Holds no state between calls, so one optimiser can be shared freely.
#[derive(Debug, Clone, Copy)]
pub struct Optimiser<'c> {
    category: &'c Category,
    admin_cost: i64,
}

impl<'c> Optimiser<'c> {
    /// Create an optimiser with the default admin cost.
    pub const fn new(category: &'c Category) -> Self {
        Self {
            category,
            admin_cost: DEFAULT_ADMIN_COST,
        }
    }

    /// Set the admin cost per account, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`OptimiserError::NonPositiveAdminCost`] if `admin_cost` is zero or negative.
    pub fn with_admin_cost(mut self, admin_cost: i64) -> Result<Self, OptimiserError> {
        if admin_cost <= 0 {
            return Err(OptimiserError::NonPositiveAdminCost(admin_cost));
        }

        self.admin_cost = admin_cost;

        Ok(self)
    }

    /// Category being optimised for.
    pub const fn category(&self) -> &'c Category {
        self.category
    }

    /// Admin cost per account, in minor units.
    pub const fn admin_cost(&self) -> i64 {
        self.admin_cost
    }

    /// Allocate the cart into voucher groups.
    ///
    /// Packs with the category's strategy. Never fails for a well-formed cart.
    pub fn optimise<'a>(&self, cart: &'a Cart<'a>) -> OptimisationResult<'a> {
        let ceiling = self.category.ceiling();

        match self.category.strategy() {
            PackingStrategy::Greedy => self.optimise_with(cart, &GreedyPacker::new(ceiling)),
            PackingStrategy::Band => {
                let fill_ceiling = self.category.fill_ceiling().unwrap_or(ceiling);

                self.optimise_with(cart, &BandPacker::new(ceiling, fill_ceiling))
            }
        }
    }

    /// Allocate the cart with an explicit packer instead of the category's strategy.
    ///
    /// An empty cart short-circuits to an all-zero result without packing.
    #[tracing::instrument(
        name = "optimiser.optimise",
        skip_all,
        fields(category = %self.category.name(), lines = cart.len())
    )]
    pub fn optimise_with<'a>(
        &self,
        cart: &'a Cart<'a>,
        packer: &impl Packer,
    ) -> OptimisationResult<'a> {
        let units = expand(cart);

        if units.is_empty() {
            debug!("cart has no units");

            return OptimisationResult::empty(cart.currency());
        }

        let family = self.category.family();
        let Packing { groups, degraded } = packer.pack(units, family, cart.currency());
        let packed = groups.len();

        let groups = merge_groups(groups, family, self.admin_cost);

        if degraded {
            warn!(
                groups = groups.len(),
                "packing hit its loop guard; result is degraded"
            );
        }

        debug!(packed, merged = groups.len(), "optimised cart");

        OptimisationResult::from_groups(
            groups,
            self.admin_cost,
            self.category.account_policy(),
            degraded,
            cart.currency(),
        )
    }
}
