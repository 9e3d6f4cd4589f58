//! Process runner for the cf CLI.
//!
//! Every invocation runs to completion (or its timeout) before the next one
//! starts. The calling context's home directory is exported as `CF_HOME`.

use crate::error::{PerfError, Result};
use crate::user::UserContext;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Subcommands whose third argument is a password.
const SECRET_SUBCOMMANDS: [&str; 2] = ["auth", "create-user"];

/// Captured result of one CLI invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code; `None` if the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Handle to the cf executable.
#[derive(Debug, Clone)]
pub struct CfCli {
    binary: PathBuf,
}

impl Default for CfCli {
    fn default() -> Self {
        Self::new("cf")
    }
}

impl CfCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Runs `cf <args>` as `ctx`, waiting at most `timeout`.
    ///
    /// A timed out child is killed. Non-zero exits are returned, not raised.
    pub async fn run(
        &self,
        ctx: &UserContext,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput> {
        let command = self.describe(args);
        tracing::debug!("Running {} as {}", command, ctx.username());

        let child = Command::new(&self.binary)
            .args(args)
            .env("CF_HOME", ctx.home())
            .env("CF_COLOR", "false")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PerfError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                tracing::warn!("{} timed out after {:?}", command, timeout);
                return Err(PerfError::Timeout { command, timeout });
            }
        };

        let output = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!("{} exited with {:?}", command, output.code);
        Ok(output)
    }

    /// Like [`CfCli::run`], but a non-zero exit is an error.
    pub async fn run_checked(
        &self,
        ctx: &UserContext,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput> {
        let output = self.run(ctx, args, timeout).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(PerfError::CommandFailed {
                command: self.describe(args),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }

    /// Runs `cf curl --fail <args>` and requires exit code 0.
    pub async fn curl(
        &self,
        ctx: &UserContext,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput> {
        self.run_checked(ctx, &curl_args(args), timeout).await
    }

    /// Runs `cf curl --fail <args>` and returns the elapsed time of the
    /// successful call.
    pub async fn time_curl(
        &self,
        ctx: &UserContext,
        timeout: Duration,
        args: &[&str],
    ) -> Result<Duration> {
        let start = Instant::now();
        self.curl(ctx, args, timeout).await?;
        Ok(start.elapsed())
    }

    /// Whether `cf curl --fail <path>` currently exits 0.
    pub async fn curl_succeeds(
        &self,
        ctx: &UserContext,
        path: &str,
        timeout: Duration,
    ) -> Result<bool> {
        let output = self.run(ctx, &curl_args(&[path]), timeout).await?;
        Ok(output.success())
    }

    /// Printable command line with passwords masked.
    pub fn describe(&self, args: &[&str]) -> String {
        let secret = args
            .first()
            .is_some_and(|sub| SECRET_SUBCOMMANDS.contains(sub));

        let mut parts = vec![self.binary.display().to_string()];
        for (i, arg) in args.iter().enumerate() {
            if secret && i == 2 {
                parts.push("********".to_string());
            } else {
                parts.push(arg.to_string());
            }
        }
        parts.join(" ")
    }
}

fn curl_args<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut full = Vec::with_capacity(args.len() + 2);
    full.push("curl");
    full.push("--fail");
    full.extend_from_slice(args);
    full
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_masks_passwords() {
        let cli = CfCli::default();
        assert_eq!(cli.describe(&["auth", "admin", "hunter2"]), "cf auth admin ********");
        assert_eq!(
            cli.describe(&["create-user", "bob", "pw"]),
            "cf create-user bob ********"
        );
        assert_eq!(
            cli.describe(&["curl", "--fail", "/v3/domains"]),
            "cf curl --fail /v3/domains"
        );
    }

    #[test]
    fn test_curl_args_prefix() {
        assert_eq!(
            curl_args(&["-X", "DELETE", "/v3/domains/abc"]),
            vec!["curl", "--fail", "-X", "DELETE", "/v3/domains/abc"]
        );
    }

    #[test]
    fn test_command_output_success() {
        let ok = CommandOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        };
        let killed = CommandOutput {
            code: None,
            ..ok.clone()
        };
        assert!(ok.success());
        assert!(!killed.success());
    }
}
