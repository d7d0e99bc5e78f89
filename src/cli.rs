use crate::suites::Suite;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

pub fn parse() -> Args {
    Args::parse()
}

/// Integration-test driver for the es API client
#[derive(Parser)]
#[clap(bin_name = "escheck")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run test suites against the API
    Run {
        /// Suites to run: ping, accounts, task, vm, all
        #[arg(required = true)]
        suites: Vec<Suite>,

        /// Path to a config file (defaults to escheck.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate a test case from piped `es -d` output
    New {
        /// Name for the generated test (derived from the command when omitted)
        #[arg(long)]
        name: Option<String>,
    },
}

impl FromStr for Suite {
    type Err = &'static str;

    fn from_str(suite: &str) -> Result<Self, Self::Err> {
        match suite {
            "ping" => Ok(Self::Ping),
            "accounts" => Ok(Self::Accounts),
            "task" => Ok(Self::Task),
            "vm" => Ok(Self::Vm),
            "all" => Ok(Self::All),
            _ => Err("Invalid suite name"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_names_parse() {
        assert!("ping".parse::<Suite>().unwrap() == Suite::Ping);
        assert!("accounts".parse::<Suite>().unwrap() == Suite::Accounts);
        assert!("task".parse::<Suite>().unwrap() == Suite::Task);
        assert!("vm".parse::<Suite>().unwrap() == Suite::Vm);
        assert!("all".parse::<Suite>().unwrap() == Suite::All);
    }

    #[test]
    fn test_unknown_suite_is_rejected() {
        assert!("nodes".parse::<Suite>().is_err());
    }
}
