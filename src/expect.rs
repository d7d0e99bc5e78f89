use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// Declares what a test expects to find in the `text` part of a client reply.
///
/// `Fragment` uses containment semantics at the top level: a string may be a
/// substring of the actual value and mappings/sequences only need to cover the
/// expected keys/indexes. Descending into a mapping or sequence always switches
/// to exact equality for scalar children. `Exact` requires equality from the
/// top.
#[derive(Clone, Debug, PartialEq)]
pub enum Expect {
    Fragment(Value),
    Exact(Value),
}

pub fn fragment(value: Value) -> Expect {
    Expect::Fragment(value)
}

pub fn exact(value: Value) -> Expect {
    Expect::Exact(value)
}

impl Expect {
    pub fn verify(&self, actual: &Value) -> Result<(), Mismatch> {
        match self {
            Self::Fragment(expected) => verify_value(&Path::root(), expected, actual, false),
            Self::Exact(expected) => verify_value(&Path::root(), expected, actual, true),
        }
    }

    pub fn matches(&self, actual: &Value) -> bool {
        self.verify(actual).is_ok()
    }
}

pub struct Mismatch {
    pub path: String,
    pub kind: MismatchKind,
}

pub enum MismatchKind {
    MissingKey(String),
    ShortSequence { expected_len: usize, actual_len: usize },
    WrongType { expected: &'static str },
    NotEqual { expected: Value, actual: Value },
    NotContained { expected: Value, actual: Value },
}

impl Display for Mismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let location = if self.path.is_empty() {
            String::new()
        } else {
            format!(" at {}", self.path)
        };

        match &self.kind {
            MismatchKind::MissingKey(key) => {
                write!(f, "missing key '{}'{}", key, location)
            }
            MismatchKind::ShortSequence {
                expected_len,
                actual_len,
            } => write!(
                f,
                "sequence has {} elements, expected at least {}{}",
                actual_len, expected_len, location
            ),
            MismatchKind::WrongType { expected } => {
                write!(f, "expected {}{}", expected, location)
            }
            MismatchKind::NotEqual { expected, actual } => {
                write!(f, "expected {}, got {}{}", expected, actual, location)
            }
            MismatchKind::NotContained { expected, actual } => {
                write!(f, "{} not contained in {}{}", expected, actual, location)
            }
        }
    }
}

// Dotted/indexed location of a mismatch, e.g. `result.node[0]`.
struct Path(String);

impl Path {
    fn root() -> Path {
        Path(String::new())
    }

    fn key(&self, key: &str) -> Path {
        if self.0.is_empty() {
            Path(key.to_owned())
        } else {
            Path(format!("{}.{}", self.0, key))
        }
    }

    fn index(&self, index: usize) -> Path {
        Path(format!("{}[{}]", self.0, index))
    }

    fn mismatch(&self, kind: MismatchKind) -> Mismatch {
        Mismatch {
            path: self.0.clone(),
            kind,
        }
    }
}

fn verify_value(path: &Path, expected: &Value, actual: &Value, strict: bool) -> Result<(), Mismatch> {
    match expected {
        Value::Object(expected_entries) => {
            let actual_entries = actual.as_object().ok_or_else(|| {
                path.mismatch(MismatchKind::WrongType {
                    expected: "an object",
                })
            })?;

            for (key, expected_value) in expected_entries {
                let actual_value = actual_entries.get(key).ok_or_else(|| {
                    path.mismatch(MismatchKind::MissingKey(key.clone()))
                })?;
                verify_value(&path.key(key), expected_value, actual_value, true)?;
            }

            Ok(())
        }
        Value::Array(expected_elements) => {
            let actual_elements = actual.as_array().ok_or_else(|| {
                path.mismatch(MismatchKind::WrongType {
                    expected: "an array",
                })
            })?;

            if actual_elements.len() < expected_elements.len() {
                return Err(path.mismatch(MismatchKind::ShortSequence {
                    expected_len: expected_elements.len(),
                    actual_len: actual_elements.len(),
                }));
            }

            for (index, expected_element) in expected_elements.iter().enumerate() {
                verify_value(
                    &path.index(index),
                    expected_element,
                    &actual_elements[index],
                    true,
                )?;
            }

            Ok(())
        }
        _ if strict => {
            if expected == actual {
                Ok(())
            } else {
                Err(path.mismatch(MismatchKind::NotEqual {
                    expected: expected.clone(),
                    actual: actual.clone(),
                }))
            }
        }
        _ => verify_contained(path, expected, actual),
    }
}

// Top-level containment: substring for strings, membership when the actual
// value is an array. Other pairings do not contain each other, equal scalars
// included.
fn verify_contained(path: &Path, expected: &Value, actual: &Value) -> Result<(), Mismatch> {
    let contained = match (expected, actual) {
        (Value::String(needle), Value::String(haystack)) => haystack.contains(needle.as_str()),
        (_, Value::Array(elements)) => elements.contains(expected),
        _ => false,
    };

    if contained {
        Ok(())
    } else {
        Err(path.mismatch(MismatchKind::NotContained {
            expected: expected.clone(),
            actual: actual.clone(),
        }))
    }
}
