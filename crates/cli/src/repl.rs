// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Menu-driven interactive loop over one session

use crate::output;
use crate::prompt::{Interrupt, Prompter};
use curation_core::ops::{self, AddOutcome, RemoveOutcome};
use curation_core::{Clock, IdGen};
use curation_engine::{Persist, Session};

const MENU: &str = "
=== Curation ===
1) Add Item
2) Remove Item
3) Edit Category
4) View Items
5) Save Collection
6) Summary
7) Filter by Category
8) Search by Keyword
9) Quit
";

/// How the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Interrupted(Interrupt),
}

pub struct Repl<'a, P: Persist, C: Clock, G: IdGen> {
    session: &'a Session<P>,
    clock: C,
    ids: G,
}

impl<'a, P: Persist, C: Clock, G: IdGen> Repl<'a, P, C, G> {
    pub fn new(session: &'a Session<P>, clock: C, ids: G) -> Self {
        Self {
            session,
            clock,
            ids,
        }
    }

    /// Run until the user quits, input ends, or Ctrl-C
    pub async fn run(&self, prompter: &mut Prompter) -> Exit {
        loop {
            println!("{MENU}");
            let step = match prompter.nonempty("Select an option (1-9): ").await {
                Ok(choice) => self.dispatch(&choice, prompter).await,
                Err(interrupt) => Err(interrupt),
            };
            match step {
                Ok(true) => continue,
                Ok(false) => return Exit::Quit,
                Err(interrupt) => return Exit::Interrupted(interrupt),
            }
        }
    }

    /// Handle one menu choice. `Ok(false)` means quit.
    async fn dispatch(
        &self,
        choice: &str,
        prompter: &mut Prompter,
    ) -> Result<bool, Interrupt> {
        match choice {
            "1" => self.add(prompter).await?,
            "2" => self.remove(prompter).await?,
            "3" => self.edit_category(prompter).await?,
            "4" => self.view(),
            "5" => self.save().await,
            "6" => self.summary(),
            "7" => self.filter(prompter).await?,
            "8" => self.search(prompter).await?,
            "9" => return Ok(false),
            _ => println!("Please choose input from menu above (1-9)"),
        }
        Ok(true)
    }

    async fn add(&self, prompter: &mut Prompter) -> Result<(), Interrupt> {
        let name = prompter.nonempty("Enter new item name: ").await?;
        let category = prompter.nonempty("Enter item category: ").await?;
        let quantity = prompter.positive_int("Quantity to add: ").await?;

        let outcome = self.session.collection().update(|items| {
            ops::add_or_increment(items, &name, &category, quantity, &self.clock, &self.ids)
        });
        match outcome {
            AddOutcome::Incremented { quantity: total, .. } => {
                println!("{quantity} added to '{name}'. New total: {total}");
            }
            AddOutcome::Created(_) => println!("Created new item '{name}' x {quantity}."),
        }
        Ok(())
    }

    async fn remove(
        &self,
        prompter: &mut Prompter,
    ) -> Result<(), Interrupt> {
        let target = prompter.nonempty("Enter name of item to remove: ").await?;
        let quantity = prompter.positive_int("Quantity to remove: ").await?;

        let outcome = self
            .session
            .collection()
            .update(|items| ops::remove_quantity(items, &target, quantity));
        match outcome {
            Some(RemoveOutcome::Decremented { remaining, .. }) => {
                println!("Removed {quantity} x {target}. {remaining} left.");
            }
            Some(RemoveOutcome::Removed(item)) => {
                println!("Removed {target} (all {}).", item.quantity);
            }
            None => println!("Couldn't remove {target}: no item with that name."),
        }
        Ok(())
    }

    async fn edit_category(
        &self,
        prompter: &mut Prompter,
    ) -> Result<(), Interrupt> {
        let target = prompter
            .nonempty("Enter name of item to re-categorize: ")
            .await?;
        let exists = self
            .session
            .collection()
            .read(|items| items.iter().any(|item| item.has_name(&target)));
        if !exists {
            println!("{target}'s category wasn't changed: no item with that name.");
            return Ok(());
        }

        let category = prompter
            .nonempty(&format!("Enter new category for {target}: "))
            .await?;
        let changed = self
            .session
            .collection()
            .update(|items| ops::edit_category(items, &target, &category));
        if changed {
            println!("{target}'s category changed successfully.");
        } else {
            println!("{target}'s category wasn't changed.");
        }
        Ok(())
    }

    fn view(&self) {
        let items = self.session.collection().snapshot();
        if items.is_empty() {
            println!("No items in collection.");
        } else {
            print!("{}", output::render_table(&items));
        }
    }

    async fn save(&self) {
        let name = self.session.name();
        match self.session.save().await {
            Ok(report) if report.is_complete() => {
                println!("Collection saved to {name} and backed up successfully.");
            }
            Ok(report) => {
                println!(
                    "Collection saved to {name}, but {} old backup(s) could not be pruned.",
                    report.rotation.failures.len()
                );
            }
            Err(e) => println!("Save failed: {e}"),
        }
    }

    fn summary(&self) {
        let items = self.session.collection().snapshot();
        print!("{}", output::render_summary(&items));
    }

    async fn filter(
        &self,
        prompter: &mut Prompter,
    ) -> Result<(), Interrupt> {
        let category = prompter.nonempty("Enter category to filter: ").await?;
        let results = self
            .session
            .collection()
            .read(|items| ops::filter_by_category(items, &category));
        if results.is_empty() {
            println!("No items found in '{category}'.");
        } else {
            print!("{}", output::render_table(&results));
        }
        Ok(())
    }

    async fn search(
        &self,
        prompter: &mut Prompter,
    ) -> Result<(), Interrupt> {
        let keyword = prompter.nonempty("Enter search keyword: ").await?;
        let results = self
            .session
            .collection()
            .read(|items| ops::search_by_keyword(items, &keyword));
        if results.is_empty() {
            println!("Keyword not in collection.");
        } else {
            print!("{}", output::render_table(&results));
        }
        Ok(())
    }
}
