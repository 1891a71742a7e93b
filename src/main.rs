// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use kidsledger::config::{self, AppSettings};
use kidsledger::db::{self, SqliteKv};
use kidsledger::ledger::Ledger;
use kidsledger::{cli, commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::build_cli().get_matches();

    let path = match matches.get_one::<String>("db") {
        Some(p) => PathBuf::from(p),
        None => db::db_path()?,
    };
    let kv = SqliteKv::new(db::open_at(&path)?);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", path.display());
            return Ok(());
        }
        Some(("settings", sub)) => return commands::settings::handle(&kv, sub),
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
        _ => {}
    }

    let settings = AppSettings::load(&kv)?;
    let token = matches.get_one::<String>("token").map(String::as_str);
    let remote = config::remote_client(&settings, token)?;
    let remote_backed = remote.is_some();
    let mut ledger = Ledger::open(kv, remote)?;

    match matches.subcommand() {
        Some(("child", sub)) => commands::children::handle(&mut ledger, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, sub)?,
        Some(("invest", sub)) => commands::investments::handle(&mut ledger, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ledger, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub)?,
        Some(("sync", sub)) => commands::sync::handle(&ledger, sub)?,
        _ => {}
    }

    if remote_backed {
        eprintln!("[{}]", ledger.sync_status());
    }
    Ok(())
}
