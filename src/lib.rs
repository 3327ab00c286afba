//! Voucher Packer
//!
//! Voucher Packer splits a cart into voucher groups, choosing for each group the
//! discount voucher it can claim, so that total discount net of a fixed
//! per-account admin cost is as large as possible.
//!
//! The pipeline is pure and synchronous: carts are expanded into units, packed
//! into groups under a basket ceiling, merged where one admin fee beats two,
//! and folded into an [`result::OptimisationResult`].

pub mod cart;
pub mod categories;
pub mod fixtures;
pub mod groups;
pub mod merger;
pub mod optimiser;
pub mod packers;
pub mod prelude;
pub mod receipt;
pub mod result;
pub mod units;
pub mod utils;
pub mod vouchers;
