// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure item operations: mutations, search, filters, and aggregates
//!
//! Nothing here does I/O. Mutations take `&mut Vec<Item>` so hosts run them
//! inside [`Collection::update`](crate::Collection::update).

use crate::clock::Clock;
use crate::id::{unused_id, IdGen};
use crate::item::Item;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Period format used by [`time_distribution`]
pub const MONTH_FORMAT: &str = "%Y-%m";

/// Result of [`add_or_increment`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// An existing name+category match was topped up
    Incremented { id: String, quantity: u64 },
    Created(Item),
}

/// Result of [`remove_quantity`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Decremented { id: String, remaining: u64 },
    /// The whole record was dropped
    Removed(Item),
}

/// Quantity totals per month, plus how many records had an unparsable time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeDistribution {
    pub buckets: BTreeMap<String, u64>,
    pub skipped: usize,
}

/// Append a new item stamped with a fresh ID and the clock's current time
pub fn create_item(
    items: &mut Vec<Item>,
    name: &str,
    category: &str,
    quantity: u64,
    clock: &impl Clock,
    ids: &impl IdGen,
) -> Item {
    let item = Item::new(unused_id(ids, items), name, category, quantity, clock.now());
    items.push(item.clone());
    item
}

pub fn increment_quantity(item: &mut Item, quantity: u64) {
    item.quantity = item.quantity.saturating_add(quantity);
}

/// Top up the first item matching both name and category, or create one
pub fn add_or_increment(
    items: &mut Vec<Item>,
    name: &str,
    category: &str,
    quantity: u64,
    clock: &impl Clock,
    ids: &impl IdGen,
) -> AddOutcome {
    if let Some(existing) = items
        .iter_mut()
        .find(|item| item.has_name(name) && item.in_category(category))
    {
        increment_quantity(existing, quantity);
        return AddOutcome::Incremented {
            id: existing.id.clone(),
            quantity: existing.quantity,
        };
    }
    AddOutcome::Created(create_item(items, name, category, quantity, clock, ids))
}

/// Take `quantity` away from the first item named `name`.
///
/// Removes the record entirely when its quantity would not stay above zero.
/// Returns `None` when no item matches.
pub fn remove_quantity(items: &mut Vec<Item>, name: &str, quantity: u64) -> Option<RemoveOutcome> {
    let index = items.iter().position(|item| item.has_name(name))?;
    let item = &mut items[index];
    if item.quantity > quantity {
        item.quantity -= quantity;
        return Some(RemoveOutcome::Decremented {
            id: item.id.clone(),
            remaining: item.quantity,
        });
    }
    Some(RemoveOutcome::Removed(items.remove(index)))
}

/// Re-categorize the first item named `name`. Returns false if none matched.
pub fn edit_category(items: &mut [Item], name: &str, category: &str) -> bool {
    match items.iter_mut().find(|item| item.has_name(name)) {
        Some(item) => {
            item.category = category.to_string();
            true
        }
        None => false,
    }
}

/// Items in `category` (case-insensitive). An empty category matches everything.
pub fn filter_by_category(items: &[Item], category: &str) -> Vec<Item> {
    if category.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.in_category(category))
        .cloned()
        .collect()
}

/// Items whose name contains `keyword` (case-insensitive). Empty matches all.
pub fn search_by_keyword(items: &[Item], keyword: &str) -> Vec<Item> {
    let keyword = keyword.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&keyword))
        .cloned()
        .collect()
}

/// Total quantity per category
pub fn category_distribution(items: &[Item]) -> BTreeMap<String, u64> {
    let mut dist = BTreeMap::new();
    for item in items {
        let total = dist.entry(item.category.clone()).or_insert(0u64);
        *total = total.saturating_add(item.quantity);
    }
    dist
}

/// Record count per category, most common first (ties by name)
pub fn items_per_category(items: &[Item]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item.category.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(category, count)| (category.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Total quantity per month of creation
pub fn time_distribution(items: &[Item]) -> TimeDistribution {
    let mut dist = TimeDistribution::default();
    for item in items {
        match item.created_at() {
            Some(created) => {
                let period = created.format(MONTH_FORMAT).to_string();
                let total = dist.buckets.entry(period).or_insert(0u64);
                *total = total.saturating_add(item.quantity);
            }
            None => dist.skipped += 1,
        }
    }
    dist
}

/// Oldest and newest items by creation time, ignoring unparsable times.
///
/// Ties keep the earliest record in collection order.
pub fn oldest_newest(items: &[Item]) -> Option<(&Item, &Item)> {
    let dated: Vec<(NaiveDateTime, &Item)> = items
        .iter()
        .filter_map(|item| item.created_at().map(|at| (at, item)))
        .collect();

    let mut iter = dated.iter();
    let first = iter.next()?;
    let (mut oldest, mut newest) = (first, first);
    for entry in iter {
        if entry.0 < oldest.0 {
            oldest = entry;
        }
        if entry.0 > newest.0 {
            newest = entry;
        }
    }
    Some((oldest.1, newest.1))
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
