// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::ledger::{set_base_currency, Config};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-currency", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap();
            set_base_currency(conn, ccy)?;
            println!("Base currency set to {}", ccy.to_uppercase());
        }
        Some(("show", _)) => {
            let config = Config::load(conn)?;
            println!("base_currency = {}", config.base_currency);
        }
        _ => {}
    }
    Ok(())
}
