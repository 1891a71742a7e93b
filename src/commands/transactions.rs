// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::ledger::Ledger;
use crate::models::{Transaction, TransactionType};
use crate::sheets::TabularStore;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table, today};
use anyhow::{Context, Result};
use serde::Serialize;

use super::resolve_child;

pub fn handle<S: KeyValueStore, T: TabularStore>(
    ledger: &mut Ledger<S, T>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").context("id is required")?;
            let removed = ledger.delete_transaction(id.trim())?;
            println!(
                "Removed {} {} on {} ({})",
                removed.r#type,
                fmt_money(&removed.amount),
                removed.date,
                removed.id
            );
        }
        _ => {}
    }
    Ok(())
}

fn add<S: KeyValueStore, T: TabularStore>(
    ledger: &mut Ledger<S, T>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let child_key = sub.get_one::<String>("child").context("--child is required")?;
    let child = resolve_child(ledger, child_key)?;
    let (child_id, child_name) = (child.id.clone(), child.name.clone());
    let r#type: TransactionType = sub
        .get_one::<String>("type")
        .context("--type is required")?
        .parse()?;
    let amount = parse_amount(sub.get_one::<String>("amount").context("--amount is required")?)?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d.trim())?.to_string(),
        None => today(),
    };
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "General".to_string());
    let description = sub
        .get_one::<String>("desc")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let t = Transaction {
        id: ledger.next_id(),
        child_id,
        date,
        r#type,
        category,
        amount,
        description,
    };
    let id = t.id.clone();
    ledger.add_transaction(t)?;
    println!(
        "Recorded {} {} for {} ({})",
        r#type,
        fmt_money(&amount),
        child_name,
        id
    );
    Ok(())
}

fn edit<S: KeyValueStore, T: TabularStore>(
    ledger: &mut Ledger<S, T>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = sub.get_one::<String>("id").context("id is required")?.trim();
    let mut t = ledger
        .transaction(id)
        .cloned()
        .with_context(|| format!("Transaction '{}' not found", id))?;

    if let Some(d) = sub.get_one::<String>("date") {
        t.date = parse_date(d.trim())?.to_string();
    }
    if let Some(ty) = sub.get_one::<String>("type") {
        t.r#type = ty.parse()?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        t.category = c.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        t.amount = parse_amount(a)?;
    }
    if let Some(d) = sub.get_one::<String>("desc") {
        t.description = d.trim().to_string();
    }
    if let Some(c) = sub.get_one::<String>("child") {
        t.child_id = resolve_child(ledger, c)?.id.clone();
    }
    ledger.update_transaction(t)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn list<S: KeyValueStore, T: TabularStore>(
    ledger: &Ledger<S, T>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.child.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Child", "Type", "Category", "Amount", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub child: String,
    pub r#type: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

/// Newest first, optionally filtered by `--child` and capped by `--limit`.
pub fn query_rows<S: KeyValueStore, T: TabularStore>(
    ledger: &Ledger<S, T>,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let child_id = match sub.get_one::<String>("child") {
        Some(key) => Some(resolve_child(ledger, key)?.id.clone()),
        None => None,
    };
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let mut matching: Vec<&Transaction> = ledger
        .transactions()
        .iter()
        .filter(|t| child_id.as_deref().is_none_or(|c| t.child_id == c))
        .collect();
    // Stable sort keeps insertion order (newest first) within a day.
    matching.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(matching
        .into_iter()
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.clone(),
            child: ledger.child_name(&t.child_id).to_string(),
            r#type: t.r#type.to_string(),
            category: t.category.clone(),
            amount: fmt_money(&t.amount),
            description: t.description.clone(),
        })
        .collect())
}
