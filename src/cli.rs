// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

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
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("postledger")
        .about("Double-entry ledger, posting engine, and budget reporting")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the ledger database"))
        .subcommand(
            Command::new("config")
                .about("Ledger configuration")
                .subcommand(
                    Command::new("set-currency")
                        .about("Set the base currency")
                        .arg(Arg::new("currency").required(true)),
                )
                .subcommand(Command::new("show").about("Show configuration")),
        )
        .subcommand(
            Command::new("account")
                .about("Chart of accounts")
                .subcommand(
                    Command::new("add")
                        .about("Create an account")
                        .arg(Arg::new("code").required(true))
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser([
                                    "asset",
                                    "liability",
                                    "equity",
                                    "revenue",
                                    "expense",
                                ]),
                        )
                        .arg(Arg::new("parent").long("parent"))
                        .arg(
                            Arg::new("cash")
                                .long("cash")
                                .action(ArgAction::SetTrue)
                                .help("Flag as a cash/bank account (assets only)"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List all accounts")))
                .subcommand(
                    Command::new("children")
                        .about("List direct children of an account")
                        .arg(Arg::new("code").required(true)),
                )
                .subcommand(
                    Command::new("set-parent")
                        .about("Re-parent an account")
                        .arg(Arg::new("code").required(true))
                        .arg(Arg::new("parent").long("parent")),
                )
                .subcommand(
                    Command::new("deactivate")
                        .about("Block future postings to an account")
                        .arg(Arg::new("code").required(true)),
                ),
        )
        .subcommand(
            Command::new("entry")
                .about("Manual journal entries")
                .subcommand(
                    Command::new("add")
                        .about("Create a balanced journal entry")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("description").long("desc").required(true))
                        .arg(Arg::new("reference").long("reference"))
                        .arg(
                            Arg::new("line")
                                .long("line")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("CODE:debit|credit:AMOUNT (repeat, at least twice)"),
                        ),
                )
                .subcommand(
                    Command::new("reverse")
                        .about("Reverse an entry")
                        .arg(Arg::new("number").required(true).value_parser(clap::value_parser!(i64))),
                )
                .subcommand(
                    Command::new("show")
                        .about("Show one entry with its lines")
                        .arg(Arg::new("number").required(true).value_parser(clap::value_parser!(i64))),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List entries")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM")),
                )),
        )
        .subcommand(
            Command::new("post")
                .about("Post business events to the journal")
                .subcommand(
                    Command::new("payment")
                        .about("Debit cash, credit revenue")
                        .arg(Arg::new("id").long("id").required(true).help("Stable source event id"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("revenue").long("revenue").required(true))
                        .arg(Arg::new("cash").long("cash").required(true))
                        .arg(Arg::new("date").long("date").required(true)),
                )
                .subcommand(
                    Command::new("expense")
                        .about("Debit expense, credit payable")
                        .arg(Arg::new("id").long("id").required(true).help("Stable source event id"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("expense").long("expense").required(true))
                        .arg(Arg::new("payable").long("payable").required(true))
                        .arg(Arg::new("date").long("date").required(true)),
                ),
        )
        .subcommand(document_cmd("invoice", "settle"))
        .subcommand(document_cmd("expense-doc", "pay"))
        .subcommand(
            Command::new("budget")
                .about("Period budgets and variance")
                .subcommand(
                    Command::new("create")
                        .about("Create a budget with per-account allocations")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end").required(true))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(
                            Arg::new("line")
                                .long("line")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("CODE:AMOUNT (repeat)"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List budgets")))
                .subcommand(json_flags(
                    Command::new("variance")
                        .about("Allocated vs actual per line")
                        .arg(Arg::new("name").required(true)),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Derived financial reports")
                .subcommand(json_flags(
                    Command::new("trial-balance")
                        .about("Per-account debit/credit totals")
                        .arg(Arg::new("as-of").long("as-of")),
                ))
                .subcommand(json_flags(
                    Command::new("pnl")
                        .about("Profit & loss over a period")
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Cash in/out over a period")
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end").required(true)),
                ))
                .subcommand(
                    Command::new("balance")
                        .about("Balance of one account")
                        .arg(Arg::new("code").required(true))
                        .arg(Arg::new("as-of").long("as-of")),
                ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("journal")
                    .about("Export the journal to CSV")
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
}

fn document_cmd(name: &'static str, settle_verb: &'static str) -> Command {
    Command::new(name)
        .about(match name {
            "invoice" => "Invoice workflow (draft -> pending -> approved -> posted)",
            _ => "Expense document workflow (draft -> pending -> approved -> posted)",
        })
        .subcommand(
            Command::new("create")
                .arg(Arg::new("number").required(true))
                .arg(Arg::new("total").long("total").required(true)),
        )
        .subcommand(Command::new("submit").arg(Arg::new("number").required(true)))
        .subcommand(Command::new("approve").arg(Arg::new("number").required(true)))
        .subcommand(Command::new("reject").arg(Arg::new("number").required(true)))
        .subcommand(
            Command::new(settle_verb)
                .about("Post the approved document to the journal (idempotent)")
                .arg(Arg::new("number").required(true))
                .arg(Arg::new("debit").long("debit").required(true))
                .arg(Arg::new("credit").long("credit").required(true))
                .arg(Arg::new("date").long("date").required(true)),
        )
        .subcommand(json_flags(Command::new("list")))
}
