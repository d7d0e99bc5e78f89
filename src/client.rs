use crate::config::Config;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const CLIENT_BINARY: &str = "es";
pub const DEFAULT_INSTALL_ROOT: &str = "/opt/erigones";

/// Handle to the external `es` binary.
///
/// Commands are passed around as single strings, the way they are typed
/// against the client, and split on whitespace at invocation time. Every
/// invocation targets the configured virtual datacenter.
pub struct EsClient {
    binary: PathBuf,
    datacenter: String,
    session_file: PathBuf,
}

pub struct ClientOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

#[derive(Debug)]
pub enum LocateError {
    MissingBinary(PathBuf),
    NotOnPath,
}

impl Display for LocateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBinary(path) => write!(f, "{} does not exist", path.display()),
            Self::NotOnPath => write!(
                f,
                "the '{}' client was not found (set ERIGONES_HOME or put it on PATH)",
                CLIENT_BINARY
            ),
        }
    }
}

#[derive(Debug)]
pub enum ClientError {
    FailedToDecodeUtf8,
    MissingExitCode,
    IOError(io::Error),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailedToDecodeUtf8 => write!(f, "client output is not valid UTF-8"),
            Self::MissingExitCode => write!(f, "client was terminated by a signal"),
            Self::IOError(err) => write!(f, "failed to run client: {}", err),
        }
    }
}

impl EsClient {
    /// Find the client binary.
    ///
    /// An explicitly configured install root must contain `bin/es`. Without
    /// one, the default install root is tried first and then `PATH`.
    pub fn locate(config: &Config) -> Result<EsClient, LocateError> {
        let binary = match &config.install_root {
            Some(root) => {
                let path = binary_in_root(root);
                if !path.is_file() {
                    return Err(LocateError::MissingBinary(path));
                }
                path
            }
            None => {
                let default = binary_in_root(Path::new(DEFAULT_INSTALL_ROOT));
                if default.is_file() {
                    default
                } else {
                    which::which(CLIENT_BINARY).map_err(|_| LocateError::NotOnPath)?
                }
            }
        };

        Ok(EsClient {
            binary,
            datacenter: config.datacenter.clone(),
            session_file: config.session_file.clone(),
        })
    }

    pub fn run(&self, command: &str) -> Result<ClientOutput, ClientError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(command.split_whitespace());
        cmd.args(["-dc", self.datacenter.as_str()]);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(ClientError::IOError)?;

        let stdout = read_pipe_to_string(
            &mut child
                .stdout
                .take()
                .expect("Stdout should be configured to pipe"),
        )?;
        let stderr = read_pipe_to_string(
            &mut child
                .stderr
                .take()
                .expect("Stderr should be configured to pipe"),
        )?;

        let exit_status = child.wait().map_err(ClientError::IOError)?;
        let exit_code = exit_status
            .code()
            .map_or(Err(ClientError::MissingExitCode), Ok)?;

        Ok(ClientOutput {
            stdout,
            stderr,
            exit_code,
        })
    }

    /// Delete the cached session-token file, forcing the next invocation to
    /// run unauthenticated. Missing files are fine.
    pub fn remove_session(&self) {
        let _ = fs::remove_file(&self.session_file);
    }
}

fn binary_in_root(root: &Path) -> PathBuf {
    root.join("bin").join(CLIENT_BINARY)
}

fn read_pipe_to_string<T>(pipe: &mut T) -> Result<String, ClientError>
where
    T: Read,
{
    let mut buf: Vec<u8> = vec![];
    pipe.read_to_end(&mut buf).map_err(ClientError::IOError)?;
    String::from_utf8(buf).map_or(Err(ClientError::FailedToDecodeUtf8), Ok)
}
