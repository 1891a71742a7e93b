// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::ledger::Ledger;
use crate::models::Child;
use crate::sheets::TabularStore;
use crate::stats::Summary;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

use super::resolve_child;

pub fn handle<S: KeyValueStore, T: TabularStore>(
    ledger: &Ledger<S, T>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct SummaryRow {
    pub child_id: String,
    pub child: String,
    #[serde(flatten)]
    pub totals: Summary,
}

/// One row per child, or only `--child` when given.
pub fn summary_rows<S: KeyValueStore, T: TabularStore>(
    ledger: &Ledger<S, T>,
    sub: &clap::ArgMatches,
) -> Result<Vec<SummaryRow>> {
    let children: Vec<&Child> = match sub.get_one::<String>("child") {
        Some(key) => vec![resolve_child(ledger, key)?],
        None => ledger.children().iter().collect(),
    };
    children
        .into_iter()
        .map(|c| {
            Ok(SummaryRow {
                child_id: c.id.clone(),
                child: c.name.clone(),
                totals: ledger.summary(&c.id)?,
            })
        })
        .collect()
}

fn summary<S: KeyValueStore, T: TabularStore>(
    ledger: &Ledger<S, T>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let data = summary_rows(ledger, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.child.clone(),
                    fmt_money(&r.totals.income),
                    fmt_money(&r.totals.expense),
                    fmt_money(&r.totals.investment),
                    fmt_money(&r.totals.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Child", "Income", "Expense", "Investment", "Balance"],
                rows
            )
        );
    }
    Ok(())
}
