// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppSettings;
use crate::db::KeyValueStore;
use crate::utils::pretty_table;
use anyhow::{Context, Result};

pub fn handle(kv: &impl KeyValueStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-sheet", sub)) => {
            let id = sub
                .get_one::<String>("sheet_id")
                .context("sheet id is required")?
                .trim()
                .to_string();
            let mut settings = AppSettings::load(kv)?;
            settings.google_sheet_id = id;
            settings.save(kv)?;
            println!("Google Sheet id set to '{}'", settings.google_sheet_id);
        }
        Some(("show", _)) => {
            let settings = AppSettings::load(kv)?;
            let sheet = if settings.google_sheet_id.is_empty() {
                "(not set)".to_string()
            } else {
                settings.google_sheet_id
            };
            println!(
                "{}",
                pretty_table(&["Setting", "Value"], vec![vec!["google_sheet_id".into(), sheet]])
            );
        }
        Some(("clear", _)) => {
            AppSettings::clear(kv)?;
            println!("Settings cleared");
        }
        _ => {}
    }
    Ok(())
}
