// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::ledger::Ledger;
use crate::sheets::TabularStore;
use crate::utils::{fmt_money, pretty_table};
use anyhow::{Context, Result};

use super::resolve_child;

pub fn handle<S: KeyValueStore, T: TabularStore>(
    ledger: &mut Ledger<S, T>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").context("name is required")?;
            let avatar = sub.get_one::<String>("avatar").map(String::as_str);
            let child = ledger.add_child(name, avatar)?;
            println!("Added child '{}' ({})", child.name, child.id);
        }
        Some(("list", _)) => {
            let rows = ledger
                .children()
                .iter()
                .map(|c| {
                    Ok(vec![
                        c.id.clone(),
                        c.name.clone(),
                        fmt_money(&ledger.summary(&c.id)?.balance),
                        c.avatar.clone(),
                    ])
                })
                .collect::<Result<Vec<_>>>()?;
            println!(
                "{}",
                pretty_table(&["ID", "Name", "Balance", "Avatar"], rows)
            );
        }
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("child").context("child is required")?;
            let id = resolve_child(ledger, key)?.id.clone();
            let removed = ledger.remove_child(&id)?;
            println!("Removed child '{}' ({})", removed.name, removed.id);
        }
        _ => {}
    }
    Ok(())
}
