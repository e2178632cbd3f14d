use crate::api::config::{
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECONDS, DEFAULT_TIMEOUT_SECONDS,
};
use clap::{Arg, ArgMatches, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_CONNECT_TIMEOUT: &str = "connect-timeout";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub url: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl Options {
    /// Parse API connection arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the URL is blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let url = matches
            .get_one::<String>(ARG_API_URL)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_API_URL}"))?;

        Ok(Self {
            url,
            timeout_seconds: matches
                .get_one::<u64>(ARG_TIMEOUT)
                .copied()
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            connect_timeout_seconds: matches
                .get_one::<u64>(ARG_CONNECT_TIMEOUT)
                .copied()
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECONDS),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the users API")
                .env("ROSTER_API_URL")
                .default_value(DEFAULT_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .env("ROSTER_TIMEOUT")
                .default_value("10")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_CONNECT_TIMEOUT)
                .long(ARG_CONNECT_TIMEOUT)
                .help("Connect timeout in seconds")
                .env("ROSTER_CONNECT_TIMEOUT")
                .default_value("5")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
