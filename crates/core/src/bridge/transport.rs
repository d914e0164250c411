use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::Error;

use super::ENTITLEMENTS_ARG;

/// One bridge call: an operation plus ordered `--flag value` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeRequest {
    operation: String,
    args: Vec<(String, String)>,
}

impl BridgeRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, flag: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.push((flag.into(), value.into()));
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn args(&self) -> &[(String, String)] {
        &self.args
    }

    pub fn value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(f, _)| f == flag)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_command_args(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(2 + self.args.len() * 2);
        out.push("--subcommand".to_string());
        out.push(self.operation.clone());
        for (flag, value) in &self.args {
            out.push(flag.clone());
            out.push(value.clone());
        }
        out
    }

    // Entitlement payloads can be large, only their size is logged.
    pub(crate) fn redacted(&self) -> Vec<(String, String)> {
        self.args
            .iter()
            .map(|(flag, value)| {
                if flag == ENTITLEMENTS_ARG {
                    (flag.clone(), format!("<{} bytes>", value.len()))
                } else {
                    (flag.clone(), value.clone())
                }
            })
            .collect()
    }
}

/// Runs a bridge request and returns its raw output.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: &BridgeRequest) -> Result<String, Error>;
}

/// Runs the bridge as a subprocess:
/// `program [args…] --subcommand <operation> [--flag value]…`.
#[derive(Debug, Clone)]
pub struct BridgeCommand {
    program: PathBuf,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
}

impl BridgeCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }
}

impl Transport for BridgeCommand {
    async fn send(&self, request: &BridgeRequest) -> Result<String, Error> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .args(request.to_command_args())
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }

        if !output.status.success() {
            return Err(Error::CommandFailed {
                operation: request.operation().to_string(),
                status: output.status.to_string(),
                output: text.trim().to_string(),
            });
        }

        Ok(text)
    }
}
