//! Command-line argument dispatch.
//!
//! This module maps validated CLI matches to the action for the chosen
//! subcommand, carrying the shared API settings along.

use crate::cli::actions::Action;
use crate::cli::commands::{
    api,
    users::{ARG_AGE, ARG_ID, ARG_NAME, CMD_ADD, CMD_DELETE, CMD_LIST, CMD_UPDATE},
};
use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;

fn required_string(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn required_id(matches: &ArgMatches) -> Result<i64> {
    matches
        .get_one::<i64>(ARG_ID)
        .copied()
        .with_context(|| format!("missing required argument: --{ARG_ID}"))
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or no subcommand was given.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let api_opts = api::Options::parse(matches)?;

    let mut globals = GlobalArgs::new(api_opts.url);
    globals.set_timeouts(api_opts.timeout_seconds, api_opts.connect_timeout_seconds);

    match matches.subcommand() {
        Some((CMD_LIST, _)) => Ok(Action::List { globals }),
        Some((CMD_ADD, sub_m)) => Ok(Action::Add {
            globals,
            name: required_string(sub_m, ARG_NAME)?,
            age: required_string(sub_m, ARG_AGE)?,
        }),
        Some((CMD_UPDATE, sub_m)) => Ok(Action::Update {
            globals,
            id: required_id(sub_m)?,
            name: sub_m.get_one::<String>(ARG_NAME).cloned(),
            age: sub_m.get_one::<String>(ARG_AGE).cloned(),
        }),
        Some((CMD_DELETE, sub_m)) => Ok(Action::Delete {
            globals,
            id: required_id(sub_m)?,
        }),
        Some((other, _)) => Err(anyhow!("unknown subcommand: {other}")),
        None => Err(anyhow!("missing subcommand")),
    }
}
