use regex::Regex;
use std::sync::OnceLock;

// A task ID ends in a fixed 24-character routing suffix; everything before it
// encodes user ID, task type and owner ID as digit runs separated by letters.
const SUFFIX_LEN: usize = 24;

// Tail of the five-part prefix pattern, used to pad short prefixes.
const PREFIX_TAIL: [&str; 4] = ["e", "1", "d", "1"];

fn alpha_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("[a-zA-Z]+").expect("alpha-run pattern is valid"))
}

/// Derive the ownership/type prefix from an opaque task ID.
///
/// The prefix is reused by later tests to construct task IDs that belong to
/// the same user, or to another user for permission checks.
pub fn task_prefix_of(task_id: &str) -> String {
    let head_len = task_id.chars().count().saturating_sub(SUFFIX_LEN);
    let head: String = task_id.chars().take(head_len).collect();

    let mut parts = split_keeping_alpha_runs(&head);
    for position in parts.len()..5 {
        parts.push(PREFIX_TAIL[position - 1].to_owned());
    }

    parts.concat()
}

// Split on alphabetic runs, keeping the runs themselves and the (possibly
// empty) segments between them.
fn split_keeping_alpha_runs(input: &str) -> Vec<String> {
    let mut parts = vec![];
    let mut tail_start = 0;

    for run in alpha_runs().find_iter(input) {
        parts.push(input[tail_start..run.start()].to_owned());
        parts.push(run.as_str().to_owned());
        tail_start = run.end();
    }
    parts.push(input[tail_start..].to_owned());

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_prefix_round_trips() {
        assert_eq!(task_prefix_of("1e1d1-6f75849b-c9ca-42b1-968e"), "1e1d1");
        assert_eq!(task_prefix_of("23e4d5-6f75849b-c9ca-42b1-968e"), "23e4d5");
    }

    #[test]
    fn test_short_prefix_is_padded() {
        // Only the user ID present; task type and owner fall back to defaults.
        assert_eq!(task_prefix_of("23-6f75849b-c9ca-42b1-968e"), "23e1d1");
    }

    #[test]
    fn test_prefix_starting_with_a_letter() {
        assert_eq!(task_prefix_of("e1-6f75849b-c9ca-42b1-968e"), "e1d1");
    }

    #[test]
    fn test_short_task_id_degrades_to_defaults() {
        assert_eq!(task_prefix_of(""), "e1d1");
        assert_eq!(task_prefix_of("-c9ca-42b1-968e"), "e1d1");
    }

    #[test]
    fn test_split_keeps_empty_segments() {
        assert_eq!(split_keeping_alpha_runs("1e1d1"), vec!["1", "e", "1", "d", "1"]);
        assert_eq!(split_keeping_alpha_runs("e1"), vec!["", "e", "1"]);
        assert_eq!(split_keeping_alpha_runs("1e"), vec!["1", "e", ""]);
        assert_eq!(split_keeping_alpha_runs(""), vec![""]);
    }
}
