// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, value_parser};

fn output_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print JSON").action(ArgAction::SetTrue))
        .arg(
            arg!(--jsonl "Print one JSON object per line")
                .action(ArgAction::SetTrue)
                .conflicts_with("json"),
        )
}

fn ledger_command(
    name: &'static str,
    label_flag: &'static str,
    label_value: &'static str,
    about: &'static str,
) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(output_flags(
            Command::new("list")
                .about("List records stored on the server")
                .arg(arg!(--limit <N> "Show at most N rows").value_parser(value_parser!(usize)))
                .arg(
                    arg!(--offline "Read the local snapshot instead of the API")
                        .action(ArgAction::SetTrue),
                ),
        ))
        .subcommand(
            Command::new("add")
                .about("Record a new entry")
                .arg(arg!(--icon <ICON> "Icon name").required(true))
                .arg(
                    Arg::new("label")
                        .long(label_flag)
                        .value_name(label_value)
                        .required(true),
                )
                .arg(arg!(--amount <AMOUNT> "Positive amount").required(true))
                .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete an entry by id")
                .arg(arg!(--id <ID>).required(true))
                .arg(arg!(-y --yes "Skip the confirmation prompt").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("download")
                .about("Download all entries as an Excel workbook")
                .arg(arg!(--out <PATH> "Destination file")),
        )
}

pub fn build_cli() -> Command {
    Command::new("spendwise")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track income and expenses against a Spendwise server")
        .arg(arg!(--"api-url" <URL> "API base URL (overrides SPENDWISE_API_URL)").global(true))
        .arg(arg!(-v --verbose "Debug logging").action(ArgAction::SetTrue).global(true))
        .subcommand(
            Command::new("login")
                .about("Log in and store the session")
                .arg(arg!(--email <EMAIL>).required(true))
                .arg(arg!(--password <PASSWORD> "Read from stdin when omitted")),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account")
                .arg(arg!(--name <NAME> "Full name").required(true))
                .arg(arg!(--email <EMAIL>).required(true))
                .arg(arg!(--password <PASSWORD>).required(true))
                .arg(arg!(--confirm <PASSWORD> "Repeat the password").required(true))
                .arg(arg!(--avatar <URL> "Profile image URL")),
        )
        .subcommand(Command::new("logout").about("Forget the session and local snapshot"))
        .subcommand(Command::new("whoami").about("Show the logged-in user"))
        .subcommand(ledger_command("expense", "category", "CATEGORY", "Manage expenses"))
        .subcommand(ledger_command("income", "source", "SOURCE", "Manage income"))
        .subcommand(
            Command::new("dashboard")
                .about("Show totals, recent activity and category breakdowns")
                .arg(arg!(--offline "Use the local snapshot only").action(ArgAction::SetTrue))
                .arg(arg!(--json "Print JSON").action(ArgAction::SetTrue)),
        )
        .subcommand(Command::new("sync").about("Refresh the local snapshot from the API"))
        .subcommand(
            Command::new("export")
                .about("Write the local snapshot to a file")
                .arg(
                    arg!(--format <FMT> "csv or json")
                        .required(false)
                        .default_value("csv"),
                )
                .arg(arg!(--out <PATH>).required(true))
                .arg(arg!(--kind <KIND> "expense or income; both when omitted")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn income_add_takes_source() {
        let m = build_cli()
            .try_get_matches_from([
                "spendwise", "income", "add", "--icon", "Salary", "--source", "Acme", "--amount",
                "10",
            ])
            .unwrap();
        let (_, inc) = m.subcommand().unwrap();
        let (_, add) = inc.subcommand().unwrap();
        assert_eq!(add.get_one::<String>("label").unwrap(), "Acme");
    }

    #[test]
    fn list_offline_is_a_flag() {
        let m = build_cli()
            .try_get_matches_from(["spendwise", "expense", "list", "--offline"])
            .unwrap();
        let (_, exp) = m.subcommand().unwrap();
        let (_, list) = exp.subcommand().unwrap();
        assert!(list.get_flag("offline"));
    }
}
