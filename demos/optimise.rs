//! Optimise Example
//!
//! Loads a cart fixture and the default catalogue, optimises the cart for a
//! category and prints the voucher groups.
//!
//! Use `-f` to pick the cart fixture by name
//! Use `-c` to pick the category
//! Use `-n` to limit the number of cart lines
//! Use `-a` to override the admin cost per account

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};

use voucher_packer::{
    fixtures::Fixture,
    optimiser::Optimiser,
    receipt::Receipt,
    utils::{ExampleOptimiseArgs, init_logging},
};

/// Optimise Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleOptimiseArgs::parse();

    init_logging(&args.log_level, args.log_format)?;

    let fixture = Fixture::from_set(&args.fixture)?;
    let cart = fixture.cart(args.n)?;
    let category = fixture.catalogue()?.category(&args.category)?;

    let optimiser = match args.admin_cost {
        Some(admin_cost) => Optimiser::new(category).with_admin_cost(admin_cost)?,
        None => Optimiser::new(category),
    };

    let start = Instant::now();
    let result = optimiser.optimise(&cart);
    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let handle = stdout.lock();

    Receipt::new(&result, category.name()).write_to(handle)?;

    println!("Solution: {}", elapsed.human(Truncate::Nano));

    Ok(())
}
