//! Receipt
//!
//! Terminal rendering of an optimisation result: one row per voucher group,
//! followed by a summary of bill, discount, admin cost and final price.

use std::{fmt::Write, io};

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{groups::Group, result::OptimisationResult, vouchers::VoucherKind};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Printable view of an optimisation result.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'r, 'a> {
    result: &'r OptimisationResult<'a>,
    category: &'r str,
}

impl<'r, 'a> Receipt<'r, 'a> {
    /// Create a receipt for `result`, labelled with the category name.
    pub fn new(result: &'r OptimisationResult<'a>, category: &'r str) -> Self {
        Self { result, category }
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        writeln!(out, "\n \x1b[1m{}\x1b[0m", self.category).map_err(|_err| ReceiptError::IO)?;

        if self.result.groups().is_empty() {
            writeln!(out, " Cart is empty.").map_err(|_err| ReceiptError::IO)?;
        } else {
            write_group_table(&mut out, self.result.groups())?;
        }

        write_summary(&mut out, self.result)
    }
}

fn write_group_table(out: &mut impl io::Write, groups: &[Group<'_>]) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Items", "Voucher", "Total", "Discount"]);

    for group in groups {
        let items = group
            .iter()
            .map(|unit| format!("{} ({})", unit.name(), unit.price()))
            .collect::<Vec<_>>()
            .join("\n");

        let discount = if group.discount_minor() == 0 {
            String::new()
        } else {
            format!("-{}", group.discount())
        };

        builder.push_record([
            format!("{:<4}", group.id().to_string()),
            items,
            group.voucher().to_string(),
            format!("{}", group.total()),
            discount,
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();

    for row in 1..=groups.len() {
        theme.insert_horizontal_line(row, separator);
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..5), Alignment::right());
    table.modify(Columns::new(4..5), Color::FG_GREEN);

    for (row, group) in groups.iter().enumerate() {
        if group.voucher() == VoucherKind::Min50k {
            table.modify((row + 1, 2), Color::FG_CYAN);
        }
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_summary(
    out: &mut impl io::Write,
    result: &OptimisationResult<'_>,
) -> Result<(), ReceiptError> {
    let lines = [
        (" Bill:".to_string(), format!("{}  ", result.total_bill())),
        (
            " Discount:".to_string(),
            format!("-{}  ", result.total_discount()),
        ),
        (
            format!(" Admin ({} accounts):", result.accounts_needed()),
            format!("{}  ", result.total_admin_cost()),
        ),
        (
            " \x1b[1mFinal:\x1b[0m".to_string(),
            format!("\x1b[1m{}\x1b[0m  ", result.final_price()),
        ),
    ];

    let label_width = lines
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or(0);

    let value_width = lines
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or(0);

    for (label, value) in &lines {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    if result.is_degraded() {
        writeln!(
            out,
            "\n \x1b[33mWarning:\x1b[0m packing hit its loop guard, check the last group."
        )
        .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Drops ANSI escape sequences, keeping the visible text.
fn strip_ansi(s: &str) -> String {
    let mut in_escape = false;

    s.chars()
        .filter(|&ch| {
            if in_escape {
                in_escape = !ch.is_ascii_alphabetic();
                false
            } else if ch == '\x1b' {
                in_escape = true;
                false
            } else {
                true
            }
        })
        .collect()
}

/// Visible width of a string once escape sequences are dropped.
fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}
