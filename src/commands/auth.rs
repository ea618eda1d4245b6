// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use std::io::BufRead;

use crate::config::Config;
use crate::validation::{self, ValidationError};
use crate::{db, utils::pretty_table};

pub fn login(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let email = validation::email(sub.get_one::<String>("email").unwrap())?;
    let password = match sub.get_one::<String>("password") {
        Some(p) => p.clone(),
        None => read_password_line()?,
    };
    validation::password(&password, 6)?;

    let session = super::client(conn, config)?
        .login(&email, &password)
        .context("Login failed")?;
    db::save_session(conn, &session)?;
    tracing::info!(email = %session.user.email, "logged in");
    println!("Welcome back, {}!", display_name(&session.user.full_name, &session.user.email));
    Ok(())
}

fn read_password_line() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn display_name<'a>(full_name: &'a str, email: &'a str) -> &'a str {
    if full_name.trim().is_empty() { email } else { full_name }
}

pub fn register(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let full_name = validation::full_name(sub.get_one::<String>("name").unwrap())?;
    let email = validation::email(sub.get_one::<String>("email").unwrap())?;
    let password = sub.get_one::<String>("password").unwrap();
    let confirm = sub.get_one::<String>("confirm").unwrap();
    validation::password(password, 4)?;
    if password != confirm {
        bail!(ValidationError::PasswordMismatch);
    }
    let avatar = sub.get_one::<String>("avatar").map(|s| s.as_str());

    super::client(conn, config)?
        .register(&full_name, &email, password, avatar)
        .context("Registration failed")?;
    tracing::info!(%email, "registered account");
    println!("Account created for {}. Log in with `spendwise login --email {}`.", full_name, email);
    Ok(())
}

pub fn logout(conn: &Connection) -> Result<()> {
    let had_session = db::load_session(conn)?.is_some();
    db::clear_session(conn)?;
    if had_session {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub fn whoami(conn: &Connection) -> Result<()> {
    match db::load_session(conn)? {
        Some(s) => {
            let synced = db::synced_at(conn)?
                .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "never".into());
            let rows = vec![
                vec!["Name".to_string(), s.user.full_name],
                vec!["Email".to_string(), s.user.email],
                vec!["Avatar".to_string(), s.user.profile_image_url.unwrap_or_default()],
                vec!["Last sync".to_string(), synced],
            ];
            println!("{}", pretty_table(&["Field", "Value"], rows));
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
