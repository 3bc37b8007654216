//! Command-line surface: `-i`, `-s`, `-t`, `-d`, `-h`/`--help`.
//!
//! Each flag may appear at most once; duplicates, a missing `-i`, a
//! non-positive/non-integer `-t`, and unknown flags are `clap` usage
//! errors, which `clap` itself reports as a single-line message on
//! stderr plus usage, exit code 2 — `main` normalizes any parse failure
//! to this crate's exit code 1 contract.
//!
//! Built on the builder API rather than `#[derive(Parser)]`: clap's
//! default `ArgAction::Set` silently keeps the last occurrence of a
//! repeated flag, which does not satisfy "each flag may appear at most
//! once; duplicates are errors" (spec §6, enforced in the original's
//! `argument_parser.cpp` via `iface_set`/`sort_key_set`/... booleans
//! that throw on a second sighting). `ArgAction::Append` plus an
//! occurrence-count check after parsing gives the same guarantee.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::DEFAULT_REFRESH_SECS;
use crate::flowtable::SortKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKeyArg {
    Bytes,
    Packets,
}

impl std::str::FromStr for SortKeyArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "b" => Ok(SortKeyArg::Bytes),
            "p" => Ok(SortKeyArg::Packets),
            other => Err(format!("invalid sort key {other:?}, expected \"b\" or \"p\"")),
        }
    }
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::Bytes => SortKey::Bytes,
            SortKeyArg::Packets => SortKey::Packets,
        }
    }
}

/// Live terminal-based network bandwidth monitor.
#[derive(Debug, Clone)]
pub struct Cli {
    pub interface: String,
    pub sort_key: SortKeyArg,
    pub refresh_secs: u64,
    pub snapshot_dir: Option<PathBuf>,
}

impl Cli {
    /// Parse `std::env::args_os()`, printing usage/help and exiting (per
    /// `clap`'s own convention) on any parse failure.
    pub fn parse() -> Self {
        match Self::try_parse_from(std::env::args_os()) {
            Ok(cli) => cli,
            Err(e) => e.exit(),
        }
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let command = Self::command();
        let matches = command.clone().try_get_matches_from(args)?;
        Self::from_matches(&command, &matches)
    }

    fn command() -> Command {
        Command::new("netbwtop")
            .about("Live terminal-based network bandwidth monitor.")
            .arg(
                Arg::new("interface")
                    .short('i')
                    .value_name("IFACE")
                    .action(ArgAction::Append)
                    .required(true)
                    .help("Interface to capture on."),
            )
            .arg(
                Arg::new("sort_key")
                    .short('s')
                    .value_name("b|p")
                    .action(ArgAction::Append)
                    .default_value("b")
                    .help("Sort key: bytes or packets."),
            )
            .arg(
                Arg::new("refresh_secs")
                    .short('t')
                    .value_name("SECS")
                    .action(ArgAction::Append)
                    .help("Sample interval in seconds."),
            )
            .arg(
                Arg::new("snapshot_dir")
                    .short('d')
                    .value_name("PATH")
                    .action(ArgAction::Append)
                    .help("Directory in which to snapshot rendered frames."),
            )
    }

    fn from_matches(command: &Command, matches: &ArgMatches) -> Result<Self, clap::Error> {
        let interface = single_value(command, matches, "interface", 'i')?
            .expect("clap enforces `interface` as required");
        let sort_key_raw = single_value(command, matches, "sort_key", 's')?
            .unwrap_or_else(|| "b".to_string());
        let sort_key = sort_key_raw
            .parse::<SortKeyArg>()
            .map_err(|msg| command.clone().error(ErrorKind::InvalidValue, msg))?;

        let refresh_raw = single_value(command, matches, "refresh_secs", 't')?
            .unwrap_or_else(|| DEFAULT_REFRESH_SECS.to_string());
        let refresh_secs = refresh_raw
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                command.clone().error(
                    ErrorKind::ValueValidation,
                    format!("invalid sample interval {refresh_raw:?}: must be a positive integer"),
                )
            })?;

        let snapshot_dir = single_value(command, matches, "snapshot_dir", 'd')?.map(PathBuf::from);

        Ok(Self {
            interface,
            sort_key,
            refresh_secs,
            snapshot_dir,
        })
    }
}

/// Return the single value supplied for `id`, or `None` if it was never
/// given. Errors if the flag was repeated — `ArgAction::Append` records
/// one occurrence per sighting (including the implicit one from a
/// `default_value`), so more than one means the user passed `-<short>`
/// more than once.
fn single_value(
    command: &Command,
    matches: &ArgMatches,
    id: &str,
    short: char,
) -> Result<Option<String>, clap::Error> {
    let mut values = matches
        .get_many::<String>(id)
        .map(|v| v.collect::<Vec<_>>())
        .unwrap_or_default();

    match values.len() {
        0 => Ok(None),
        1 => Ok(Some(values.remove(0).clone())),
        _ => Err(command.clone().error(
            ErrorKind::ArgumentConflict,
            format!("the argument '-{short}' cannot be used multiple times"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_interface() {
        let result = Cli::try_parse_from(["netbwtop"]);
        assert!(result.is_err());
    }

    #[test]
    fn defaults_to_bytes_sort_and_one_second_interval() {
        let cli = Cli::try_parse_from(["netbwtop", "-i", "eth0"]).unwrap();
        assert_eq!(cli.interface, "eth0");
        assert_eq!(cli.sort_key, SortKeyArg::Bytes);
        assert_eq!(cli.refresh_secs, DEFAULT_REFRESH_SECS);
        assert!(cli.snapshot_dir.is_none());
    }

    #[test]
    fn parses_all_flags() {
        let cli =
            Cli::try_parse_from(["netbwtop", "-i", "wlan0", "-s", "p", "-t", "5", "-d", "/tmp/out"])
                .unwrap();
        assert_eq!(cli.interface, "wlan0");
        assert_eq!(cli.sort_key, SortKeyArg::Packets);
        assert_eq!(cli.refresh_secs, 5);
        assert_eq!(cli.snapshot_dir.unwrap(), std::path::PathBuf::from("/tmp/out"));
    }

    #[test]
    fn rejects_non_positive_interval() {
        assert!(Cli::try_parse_from(["netbwtop", "-i", "eth0", "-t", "0"]).is_err());
    }

    #[test]
    fn rejects_unknown_sort_key() {
        assert!(Cli::try_parse_from(["netbwtop", "-i", "eth0", "-s", "x"]).is_err());
    }

    #[test]
    fn rejects_duplicate_interface_flag() {
        let result = Cli::try_parse_from(["netbwtop", "-i", "eth0", "-i", "eth1"]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_duplicate_sort_key_interval_and_snapshot_dir_flags() {
        assert!(Cli::try_parse_from(["netbwtop", "-i", "eth0", "-s", "b", "-s", "p"]).is_err());
        assert!(Cli::try_parse_from(["netbwtop", "-i", "eth0", "-t", "1", "-t", "2"]).is_err());
        assert!(Cli::try_parse_from([
            "netbwtop", "-i", "eth0", "-d", "/tmp/a", "-d", "/tmp/b"
        ])
        .is_err());
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["netbwtop", "-i", "eth0", "--bogus"]).is_err());
    }

    #[test]
    fn help_flag_is_accepted() {
        let result = Cli::try_parse_from(["netbwtop", "--help"]);
        assert!(result.is_err()); // clap signals help via a "DisplayHelp" error kind
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
