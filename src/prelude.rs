//! Voucher Packer prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine},
    categories::{
        AccountPolicy, Catalogue, CatalogueError, Category, CategoryKey, PackingStrategy,
    },
    groups::{Group, GroupId},
    merger::merge_groups,
    optimiser::{DEFAULT_ADMIN_COST, Optimiser, OptimiserError},
    packers::{BandPacker, GreedyPacker, Packer, Packing},
    receipt::{Receipt, ReceiptError},
    result::OptimisationResult,
    units::{Unit, expand},
    vouchers::{Band, VoucherClaim, VoucherError, VoucherFamily, VoucherKind, VoucherSpec},
};
