use clap::{Arg, ArgGroup, Command};

pub const CMD_LIST: &str = "list";
pub const CMD_ADD: &str = "add";
pub const CMD_UPDATE: &str = "update";
pub const CMD_DELETE: &str = "delete";

pub const ARG_ID: &str = "id";
pub const ARG_NAME: &str = "name";
pub const ARG_AGE: &str = "age";

fn id_arg() -> Arg {
    Arg::new(ARG_ID)
        .long(ARG_ID)
        .help("User id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

fn name_arg() -> Arg {
    Arg::new(ARG_NAME)
        .short('n')
        .long(ARG_NAME)
        .help("User name (2 to 50 characters)")
}

// Kept as text so the form validator reports bad ages instead of clap.
fn age_arg() -> Arg {
    Arg::new(ARG_AGE)
        .short('a')
        .long(ARG_AGE)
        .help("User age in whole years (0 to 150)")
        .allow_hyphen_values(true)
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(Command::new(CMD_LIST).about("Show all users"))
        .subcommand(
            Command::new(CMD_ADD)
                .about("Create a user")
                .arg(name_arg().required(true))
                .arg(age_arg().required(true)),
        )
        .subcommand(
            Command::new(CMD_UPDATE)
                .about("Change the name and/or age of a user")
                .arg(id_arg())
                .arg(name_arg())
                .arg(age_arg())
                .group(
                    ArgGroup::new("changes")
                        .args([ARG_NAME, ARG_AGE])
                        .required(true)
                        .multiple(true),
                ),
        )
        .subcommand(
            Command::new(CMD_DELETE)
                .about("Delete a user")
                .arg(id_arg()),
        )
}
