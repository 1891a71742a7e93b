// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::ledger::Ledger;
use crate::sheets::TabularStore;
use anyhow::{Result, bail};
use serde::Serialize;

const HEADERS: [&str; 9] = [
    "kind", "child", "date", "type", "symbol", "description", "quantity", "price", "amount",
];

/// One line of the report: either a ledger entry or a stock trade.
#[derive(Debug, Serialize)]
pub struct ExportRow {
    pub kind: &'static str,
    pub child: String,
    pub date: String,
    pub r#type: String,
    pub symbol: String,
    pub description: String,
    pub quantity: String,
    pub price: String,
    pub amount: String,
}

impl ExportRow {
    fn record(self) -> [String; 9] {
        [
            self.kind.to_string(),
            self.child,
            self.date,
            self.r#type,
            self.symbol,
            self.description,
            self.quantity,
            self.price,
            self.amount,
        ]
    }
}

pub fn handle<S: KeyValueStore, T: TabularStore>(
    ledger: &Ledger<S, T>,
    m: &clap::ArgMatches,
) -> Result<()> {
    let fmt = m
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let Some(out) = m.get_one::<String>("out") else {
        bail!("--out is required");
    };
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let rows = export_rows(ledger);
    let count = rows.len();
    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(HEADERS)?;
        for row in rows {
            wtr.write_record(row.record())?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
    }
    println!("Exported {} rows to {}", count, out);
    Ok(())
}

/// Transactions first, then trades, each in ledger order. Orphaned records
/// carry the `unknown` child name.
pub fn export_rows<S: KeyValueStore, T: TabularStore>(ledger: &Ledger<S, T>) -> Vec<ExportRow> {
    let mut rows = Vec::with_capacity(ledger.transactions().len() + ledger.investments().len());
    for t in ledger.transactions() {
        rows.push(ExportRow {
            kind: "ledger",
            child: ledger.child_name(&t.child_id).to_string(),
            date: t.date.clone(),
            r#type: t.r#type.to_string(),
            symbol: String::new(),
            description: t.description.clone(),
            quantity: String::new(),
            price: String::new(),
            amount: t.amount.normalize().to_string(),
        });
    }
    for i in ledger.investments() {
        rows.push(ExportRow {
            kind: "stock",
            child: ledger.child_name(&i.child_id).to_string(),
            date: i.date.clone(),
            r#type: i.action.to_string(),
            symbol: i.symbol.clone(),
            description: i.company_name.clone(),
            quantity: i.quantity.normalize().to_string(),
            price: i.price.normalize().to_string(),
            amount: i.total_amount.normalize().to_string(),
        });
    }
    rows
}
