// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use spendwise::models::TransactionKind;
use spendwise::{cli, commands, config::Config, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    logging::init(matches.get_flag("verbose"));
    let config = Config::from_env().with_api_url(matches.get_one::<String>("api-url"));
    tracing::debug!(api = %config.api_base_url, "configuration loaded");

    let mut conn = db::open_or_init(&config)?;

    match matches.subcommand() {
        Some(("login", sub)) => commands::auth::login(&conn, &config, sub)?,
        Some(("register", sub)) => commands::auth::register(&conn, &config, sub)?,
        Some(("logout", _)) => commands::auth::logout(&conn)?,
        Some(("whoami", _)) => commands::auth::whoami(&conn)?,
        Some(("expense", sub)) => {
            commands::ledger::handle(&mut conn, &config, TransactionKind::Expense, sub)?
        }
        Some(("income", sub)) => {
            commands::ledger::handle(&mut conn, &config, TransactionKind::Income, sub)?
        }
        Some(("dashboard", sub)) => commands::dashboard::handle(&mut conn, &config, sub)?,
        Some(("sync", _)) => commands::sync::handle(&mut conn, &config)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
