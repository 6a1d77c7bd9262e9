// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for the REPL

use curation_core::ops;
use curation_core::Item;
use std::fmt::Write;

const HEADERS: [&str; 5] = ["ID", "Name", "Category", "Quantity", "Time"];

/// Render items as a bordered grid table
pub fn render_table(items: &[Item]) -> String {
    let rows: Vec<[String; 5]> = items
        .iter()
        .map(|item| {
            [
                item.id.clone(),
                item.name.clone(),
                item.category.clone(),
                item.quantity.to_string(),
                item.time.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&border(&widths, '-'));
    out.push_str(&line(&widths, &HEADERS.map(String::from)));
    out.push_str(&border(&widths, '='));
    for row in &rows {
        out.push_str(&line(&widths, row));
        out.push_str(&border(&widths, '-'));
    }
    out
}

fn border(widths: &[usize; 5], fill: char) -> String {
    let mut out = String::from("+");
    for width in widths {
        out.extend(std::iter::repeat(fill).take(width + 2));
        out.push('+');
    }
    out.push('\n');
    out
}

fn line(widths: &[usize; 5], cells: &[String; 5]) -> String {
    let mut out = String::from("|");
    for (i, (width, cell)) in widths.iter().zip(cells).enumerate() {
        let pad = width - cell.chars().count();
        // quantity column is right-aligned
        let (left, right) = if i == 3 { (pad, 0) } else { (0, pad) };
        let _ = write!(out, " {}{}{} |", " ".repeat(left), cell, " ".repeat(right));
    }
    out.push('\n');
    out
}

/// Totals by category and month, record counts, and the oldest/newest items
pub fn render_summary(items: &[Item]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total items: {}", items.len());
    if items.is_empty() {
        return out;
    }

    let _ = writeln!(out, "Quantity by category:");
    for (category, quantity) in ops::category_distribution(items) {
        let _ = writeln!(out, "    {category}: {quantity}");
    }

    let months = ops::time_distribution(items);
    let _ = writeln!(out, "Quantity by month:");
    for (month, quantity) in &months.buckets {
        let _ = writeln!(out, "    {month}: {quantity}");
    }
    if months.skipped > 0 {
        let _ = writeln!(out, "    ({} item(s) with unreadable times skipped)", months.skipped);
    }

    let _ = writeln!(out, "Items per category:");
    for (category, count) in ops::items_per_category(items) {
        let _ = writeln!(out, "    {category}: {count}");
    }

    match ops::oldest_newest(items) {
        Some((oldest, newest)) => {
            let _ = writeln!(out, "Oldest item: {} ({})", oldest.name, oldest.time);
            let _ = writeln!(out, "Newest item: {} ({})", newest.name, newest.time);
        }
        None => {
            let _ = writeln!(out, "No valid timestamps found on items.");
        }
    }
    out
}
