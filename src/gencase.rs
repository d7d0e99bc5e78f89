use serde::Deserialize;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::io::{self, IsTerminal, Read};

// Statuses the client exits 0 for; everything else exits 1.
const STATUS_CODES_OK: [i64; 2] = [200, 201];

/// One `es -d` invocation as dumped by the client: the command that ran, the
/// reply payload and the status code.
#[derive(Deserialize)]
struct ClientDump {
    command: String,
    text: Value,
    status: i64,
}

#[derive(Debug)]
pub enum GenError {
    NoInput,
    InputNotParsed,
    DumpNotParsed,
    CannotDeriveName,
}

impl Display for GenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInput => write!(f, "no stdin (pipe the output of an es -d command)"),
            Self::InputNotParsed => write!(f, "stdin json not parsed"),
            Self::DumpNotParsed => write!(f, "client output not parsed (missing -d option?)"),
            Self::CannotDeriveName => write!(f, "could not generate test name"),
        }
    }
}

/// Read a piped client dump from stdin and return a paste-ready test
/// function for a suite module.
pub fn generate_from_stdin(name: Option<&str>) -> Result<String, GenError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(GenError::NoInput);
    }

    let mut input = String::new();
    stdin
        .lock()
        .read_to_string(&mut input)
        .map_err(|_| GenError::NoInput)?;

    generate(name, &input)
}

pub fn generate(name: Option<&str>, input: &str) -> Result<String, GenError> {
    let trimmed: Vec<&str> = input.lines().map(str::trim).collect();
    if trimmed.iter().all(|line| line.is_empty()) {
        return Err(GenError::NoInput);
    }

    let value: Value =
        serde_json::from_str(&trimmed.join("\n")).map_err(|_| GenError::InputNotParsed)?;
    let mut dump: ClientDump =
        serde_json::from_value(value).map_err(|_| GenError::DumpNotParsed)?;

    // Task IDs are unique per invocation and would never match again.
    if let Some(entries) = dump.text.as_object_mut() {
        entries.remove("task_id");
    }

    let name = match name {
        Some(name) => name.to_owned(),
        None => derive_name(&dump.command, dump.status).ok_or(GenError::CannotDeriveName)?,
    };

    let exit_code = i32::from(!STATUS_CODES_OK.contains(&dump.status));

    Ok(render(&name, &dump, exit_code))
}

// Name a test after what it did: `<module><_sub-resource>_<method>_<status>`,
// e.g. `create /vm/test99.example.com/define/disk/1` with status 400 becomes
// `vm_define_disk_1_create_400`.
fn derive_name(command: &str, status: i64) -> Option<String> {
    let mut tokens = command.split_whitespace();
    let method = tokens.next()?;
    let resource = tokens.next()?.get(1..)?;

    let mut segments = resource.split('/');
    let module = segments.next()?;
    let sub_resource: Vec<&str> = segments.skip(1).collect();

    Some(format!(
        "{}_{}_{}_{}",
        module,
        sub_resource.join("_"),
        method,
        status
    ))
}

fn render(name: &str, dump: &ClientDump, exit_code: i32) -> String {
    let expected = serde_json::to_string_pretty(&dump.text)
        .unwrap_or_else(|_| String::from("null"));

    format!(
        "fn {name}(h: &mut Harness) {{\n    \
         let exp = fragment(json!({expected}));\n    \
         h.run(TestCase::new(\"{name}\", \"{command}\", exp).status({status}).exit_code({exit_code}));\n\
         }}\n",
        name = name,
        expected = expected,
        command = dump.command,
        status = dump.status,
        exit_code = exit_code,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_generates_a_full_test_function() {
        let input = indoc! {r#"
            {
                "command": "get /ping",
                "text": "pong",
                "status": 200
            }
        "#};

        let expected = indoc! {r#"
            fn ping__get_200(h: &mut Harness) {
                let exp = fragment(json!("pong"));
                h.run(TestCase::new("ping__get_200", "get /ping", exp).status(200).exit_code(0));
            }
        "#};

        assert_eq!(generate(None, input).unwrap(), expected);
    }

    #[test]
    fn test_error_statuses_expect_exit_code_one() {
        let input = r#"{"command": "get /vm/x.example.com", "text": {"detail": "VM not found"}, "status": 404}"#;

        let generated = generate(None, input).unwrap();
        assert!(generated.contains("fn vm__get_404("));
        assert!(generated.contains(".status(404).exit_code(1)"));
    }

    #[test]
    fn test_task_id_is_stripped_from_the_expectation() {
        let input = r#"{
            "command": "get /vm/define",
            "text": {"status": "SUCCESS", "result": [], "task_id": "1e1d1-6f75849b-c9ca-42b1-968e"},
            "status": 200
        }"#;

        let generated = generate(None, input).unwrap();
        assert!(!generated.contains("task_id"));
        assert!(generated.contains(r#""status": "SUCCESS""#));
    }

    #[test]
    fn test_sub_resource_segments_name_the_test() {
        let input = r#"{
            "command": "create /vm/test99.example.com/define/disk/1",
            "text": {"status": "FAILURE"},
            "status": 400
        }"#;

        let generated = generate(None, input).unwrap();
        assert!(generated.contains("fn vm_define_disk_1_create_400("));
    }

    #[test]
    fn test_explicit_name_wins_over_derivation() {
        let input = r#"{"command": "get /ping", "text": "pong", "status": 200}"#;

        let generated = generate(Some("my_ping"), input).unwrap();
        assert!(generated.contains("fn my_ping("));
    }

    #[test]
    fn test_empty_stdin_is_fatal() {
        assert!(matches!(generate(None, "\n  \n"), Err(GenError::NoInput)));
    }

    #[test]
    fn test_non_json_stdin_is_fatal() {
        assert!(matches!(
            generate(None, "not json"),
            Err(GenError::InputNotParsed)
        ));
    }

    #[test]
    fn test_plain_reply_without_command_is_fatal() {
        // Dump taken without -d: just the reply, no command/status wrapper.
        assert!(matches!(
            generate(None, r#"{"detail": "Bye."}"#),
            Err(GenError::DumpNotParsed)
        ));
    }

    #[test]
    fn test_unnameable_command_is_fatal() {
        assert!(matches!(
            generate(None, r#"{"command": "login", "text": "x", "status": 200}"#),
            Err(GenError::CannotDeriveName)
        ));
    }
}
