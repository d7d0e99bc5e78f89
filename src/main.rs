use escheck::cli::{self, Command};
use escheck::config::Config;
use escheck::gencase;
use escheck::harness::Harness;
use escheck::report;
use escheck::suites::{self, Suite};
use std::path::Path;
use std::process;

// Startup failure that no test run can begin from.
const EXIT_MISSING_CLIENT: i32 = 100;

fn main() {
    let args = cli::parse();

    match args.command {
        Command::Run { suites, config } => run_suites(&suites, config.as_deref()),
        Command::New { name } => generate_case(name.as_deref()),
    }
}

fn run_suites(suites: &[Suite], config_file: Option<&Path>) -> ! {
    let config = match Config::load(config_file) {
        Ok(config) => config,
        Err(err) => report::fatal(&err.to_string()),
    };

    let mut harness = match Harness::new(config) {
        Ok(harness) => harness,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            process::exit(EXIT_MISSING_CLIENT);
        }
    };

    for suite in suites {
        suites::run(&mut harness, *suite);
    }

    harness.print_summary();
    process::exit(harness.exit_code());
}

fn generate_case(name: Option<&str>) -> ! {
    match gencase::generate_from_stdin(name) {
        Ok(snippet) => {
            println!("{}", snippet);
            process::exit(0);
        }
        Err(err) => report::fatal(&err.to_string()),
    }
}
