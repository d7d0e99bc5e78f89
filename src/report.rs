use crate::client::ClientOutput;
use colored::Colorize;
use std::io::{self, Write};
use std::process;

/// Per-run counters, threaded through the harness instead of living in
/// process globals so independent runs stay isolated.
#[derive(Default)]
pub struct Tallies {
    pub run: u32,
    pub failed: u32,
    pub warned: u32,
}

impl Tallies {
    pub fn successful(&self) -> u32 {
        self.run.saturating_sub(self.failed + self.warned)
    }
}

pub fn test_ok(name: &str) {
    println!("{}", format!("Test {} succeeded", name).green());
}

pub fn test_failed(name: &str, reason: &str, output: Option<&ClientOutput>) {
    println!("{}", format!("Test {} failed: {}", name, reason).red());
    if let Some(output) = output {
        print_captured(output);
    }
}

pub fn test_warning(name: &str, reason: &str, output: Option<&ClientOutput>) {
    println!("{}", format!("Test {} warning: {}", name, reason).yellow());
    if let Some(output) = output {
        print_captured(output);
    }
}

// Full captured output, for diagnosing what the client actually said.
fn print_captured(output: &ClientOutput) {
    print!("{}", output.stdout);
    if !output.stdout.ends_with('\n') {
        println!();
    }
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
        if !output.stderr.ends_with('\n') {
            eprintln!();
        }
    }
}

pub fn throttle_banner(seconds: u64) {
    println!(
        "{}",
        format!(
            "\n***\n* Taking a {} seconds break to avoid API throttling.\n***",
            seconds
        )
        .cyan()
    );
}

pub fn throttle_tick() {
    print!(".");
    let _ = io::stdout().flush();
}

pub fn throttle_done() {
    println!("\n");
}

pub fn print_summary(tallies: &Tallies) {
    println!(
        "\n\n*** Test summary ***\n    \
         Total:      {}\n    \
         Failed:     {}\n    \
         Warning:    {}\n    \
         Successful: {}\n",
        tallies.run,
        tallies.failed.to_string().red(),
        tallies.warned.to_string().yellow(),
        tallies.successful().to_string().green(),
    );
}

/// Abort the whole run. Used for conditions no later test can recover from.
pub fn fatal(message: &str) -> ! {
    eprintln!("{}", message.red());
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_excludes_failures_and_warnings() {
        let tallies = Tallies {
            run: 10,
            failed: 2,
            warned: 1,
        };

        assert_eq!(tallies.successful(), 7);
    }

    #[test]
    fn test_fresh_tallies_are_zero() {
        let tallies = Tallies::default();

        assert_eq!(tallies.run, 0);
        assert_eq!(tallies.failed, 0);
        assert_eq!(tallies.warned, 0);
        assert_eq!(tallies.successful(), 0);
    }
}
