// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn child_filter() -> Arg {
    Arg::new("child")
        .long("child")
        .help("Child id or name")
}

fn trade(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(child_filter().required(true))
        .arg(Arg::new("symbol").long("symbol").required(true))
        .arg(Arg::new("quantity").long("quantity").required(true))
        .arg(Arg::new("price").long("price").required(true))
        .arg(
            Arg::new("total")
                .long("total")
                .help("Total amount; defaults to quantity x price"),
        )
        .arg(Arg::new("name").long("name").help("Company name"))
        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
}

pub fn build_cli() -> Command {
    Command::new("kidsledger")
        .about("Allowance, expense and stock-trade ledger for children")
        .version(clap::crate_version!())
        .arg(
            Arg::new("token")
                .long("token")
                .env("KIDSLEDGER_TOKEN")
                .global(true)
                .hide_env_values(true)
                .help("Google OAuth access token; without one the ledger stays local"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Path to the local SQLite store"),
        )
        .subcommand(Command::new("init").about("Create the local store"))
        .subcommand(
            Command::new("child")
                .about("Manage children")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("avatar").long("avatar").help("Avatar URL")),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rm").arg(Arg::new("child").required(true).help("Id or name")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Income, expense and investment entries")
                .subcommand(
                    Command::new("add")
                        .arg(child_filter().required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expense", "investment"])
                                .ignore_case(true),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("desc").long("desc")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(child_filter()).arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").required(true))
                        .arg(child_filter())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expense", "investment"])
                                .ignore_case(true),
                        )
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("desc").long("desc")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("invest")
                .about("Stock trades")
                .subcommand(trade("buy", "Record a purchase"))
                .subcommand(trade("sell", "Record a sale"))
                .subcommand(json_flags(Command::new("list").arg(child_filter())))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("symbol").long("symbol"))
                        .arg(Arg::new("name").long("name"))
                        .arg(
                            Arg::new("action")
                                .long("action")
                                .value_parser(["buy", "sell"])
                                .ignore_case(true),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("quantity").long("quantity"))
                        .arg(Arg::new("price").long("price"))
                        .arg(Arg::new("total").long("total")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("report")
                .about("Per-child totals")
                .subcommand(json_flags(Command::new("summary").arg(child_filter()))),
        )
        .subcommand(
            Command::new("export")
                .about("Write transactions and trades to a file")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("settings")
                .about("Remote sheet configuration")
                .subcommand(
                    Command::new("set-sheet").arg(Arg::new("sheet_id").required(true)),
                )
                .subcommand(Command::new("show"))
                .subcommand(Command::new("clear")),
        )
        .subcommand(
            Command::new("sync")
                .about("Remote sync state")
                .subcommand(Command::new("status")),
        )
}
