// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::ledger::Ledger;
use crate::models::{Investment, TradeAction};
use crate::sheets::TabularStore;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table, today};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use super::resolve_child;

pub fn handle<S: KeyValueStore, T: TabularStore>(
    ledger: &mut Ledger<S, T>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("buy", sub)) => record_trade(ledger, sub, TradeAction::Buy)?,
        Some(("sell", sub)) => record_trade(ledger, sub, TradeAction::Sell)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").context("id is required")?;
            let removed = ledger.delete_investment(id.trim())?;
            println!(
                "Removed {} {} x {} ({})",
                removed.action, removed.quantity, removed.symbol, removed.id
            );
        }
        _ => {}
    }
    Ok(())
}

fn trade_total(quantity: Decimal, price: Decimal) -> Result<Decimal> {
    quantity
        .checked_mul(price)
        .with_context(|| format!("Total of {} x {} is out of range", quantity, price))
}

fn record_trade<S: KeyValueStore, T: TabularStore>(
    ledger: &mut Ledger<S, T>,
    sub: &clap::ArgMatches,
    action: TradeAction,
) -> Result<()> {
    let child_key = sub.get_one::<String>("child").context("--child is required")?;
    let child_id = resolve_child(ledger, child_key)?.id.clone();
    let symbol = sub
        .get_one::<String>("symbol")
        .context("--symbol is required")?
        .trim()
        .to_uppercase();
    let company_name = sub
        .get_one::<String>("name")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| symbol.clone());
    let quantity =
        parse_amount(sub.get_one::<String>("quantity").context("--quantity is required")?)?;
    let price = parse_amount(sub.get_one::<String>("price").context("--price is required")?)?;
    // Defaults to quantity x price; an explicit total covers fees.
    let total_amount = match sub.get_one::<String>("total") {
        Some(raw) => parse_amount(raw)?,
        None => trade_total(quantity, price)?,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d.trim())?.to_string(),
        None => today(),
    };

    let inv = Investment {
        id: ledger.next_id(),
        child_id,
        date,
        symbol,
        company_name,
        quantity,
        price,
        total_amount,
        action,
    };
    let summary = format!(
        "{} {} x {} @ {} (total {})",
        action,
        quantity,
        inv.symbol,
        price,
        fmt_money(&total_amount)
    );
    ledger.add_investment(inv)?;
    println!("Recorded {}", summary);
    Ok(())
}

fn edit<S: KeyValueStore, T: TabularStore>(
    ledger: &mut Ledger<S, T>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = sub.get_one::<String>("id").context("id is required")?.trim();
    let mut inv = ledger
        .investment(id)
        .cloned()
        .with_context(|| format!("Investment '{}' not found", id))?;

    if let Some(s) = sub.get_one::<String>("symbol") {
        inv.symbol = s.trim().to_uppercase();
    }
    if let Some(n) = sub.get_one::<String>("name") {
        inv.company_name = n.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("action") {
        inv.action = a.parse()?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        inv.date = parse_date(d.trim())?.to_string();
    }
    let quantity = sub.get_one::<String>("quantity").map(|q| parse_amount(q)).transpose()?;
    let price = sub.get_one::<String>("price").map(|p| parse_amount(p)).transpose()?;
    if let Some(q) = quantity {
        inv.quantity = q;
    }
    if let Some(p) = price {
        inv.price = p;
    }
    // Changing quantity or price recomputes the total unless one is given.
    match sub.get_one::<String>("total") {
        Some(raw) => inv.total_amount = parse_amount(raw)?,
        None if quantity.is_some() || price.is_some() => {
            inv.total_amount = trade_total(inv.quantity, inv.price)?
        }
        None => {}
    }
    ledger.update_investment(inv)?;
    println!("Updated investment {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct InvestmentRow {
    pub id: String,
    pub date: String,
    pub child: String,
    pub action: String,
    pub symbol: String,
    pub company_name: String,
    pub quantity: String,
    pub price: String,
    pub total_amount: String,
}

pub fn query_rows<S: KeyValueStore, T: TabularStore>(
    ledger: &Ledger<S, T>,
    sub: &clap::ArgMatches,
) -> Result<Vec<InvestmentRow>> {
    let child_id = match sub.get_one::<String>("child") {
        Some(key) => Some(resolve_child(ledger, key)?.id.clone()),
        None => None,
    };
    let mut matching: Vec<&Investment> = ledger
        .investments()
        .iter()
        .filter(|i| child_id.as_deref().is_none_or(|c| i.child_id == c))
        .collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(matching
        .into_iter()
        .map(|i| InvestmentRow {
            id: i.id.clone(),
            date: i.date.clone(),
            child: ledger.child_name(&i.child_id).to_string(),
            action: i.action.to_string(),
            symbol: i.symbol.clone(),
            company_name: i.company_name.clone(),
            quantity: i.quantity.normalize().to_string(),
            price: fmt_money(&i.price),
            total_amount: fmt_money(&i.total_amount),
        })
        .collect())
}

fn list<S: KeyValueStore, T: TabularStore>(
    ledger: &Ledger<S, T>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id,
                    r.date,
                    r.child,
                    r.action,
                    r.symbol,
                    r.quantity,
                    r.price,
                    r.total_amount,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Child", "Action", "Symbol", "Qty", "Price", "Total"],
                rows
            )
        );
    }
    Ok(())
}
