//! External process execution.
//!
//! The pipeline only ever needs two things from an external program: run it
//! to completion with the operator's terminal attached, or run an
//! environment activation script and read back the environment it produced.
//! [`ProcessRunner`] is that seam; [`SystemRunner`] is the real one.

use crate::error::{ReleaseError, Result};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// A program invocation with its environment overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Variables set on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the argument list as lossy strings.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

/// Quotes `s` for display when it contains whitespace.
fn quote(s: &str) -> String {
    if s.contains(char::is_whitespace) {
        format!("\"{s}\"")
    } else {
        s.to_string()
    }
}

/// Executes external programs for the pipeline.
#[allow(async_fn_in_trait)]
pub trait ProcessRunner {
    /// Runs `command` to completion with inherited standard streams.
    ///
    /// Fails with [`ReleaseError::ExternalProcess`] if the program cannot be
    /// started or exits unsuccessfully.
    async fn run(&self, command: &CommandSpec) -> Result<()>;

    /// Runs the activation `script` with `args` and returns the environment
    /// it leaves behind as `(name, value)` pairs.
    async fn capture_environment(&self, script: &Path, args: &[String])
    -> Result<Vec<(String, String)>>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> Result<()> {
        let status = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ReleaseError::ExternalProcess {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(ReleaseError::ExternalProcess {
                command: command.to_string(),
                reason: format!("process exited with {status}"),
            });
        }

        Ok(())
    }

    async fn capture_environment(
        &self,
        script: &Path,
        args: &[String],
    ) -> Result<Vec<(String, String)>> {
        let mut cmd = activation_command(script, args);
        let description = format!("{} {}", script.display(), args.join(" "));

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| ReleaseError::ExternalProcess {
                command: description.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ReleaseError::ExternalProcess {
                command: description,
                reason: format!("environment activation exited with {}", output.status),
            });
        }

        Ok(parse_environment(
            &String::from_utf8_lossy(&output.stdout),
            ENV_SEPARATOR,
        ))
    }
}

/// Separator between entries of the environment dump.
///
/// `cmd`'s `set` can only print one entry per line, so a value spanning
/// several lines is cut at its first line break and any following line of
/// the form `NAME=...` is read as its own entry. `env -0` has no such
/// ambiguity.
#[cfg(windows)]
const ENV_SEPARATOR: char = '\n';
#[cfg(not(windows))]
const ENV_SEPARATOR: char = '\0';

/// Shell invocation that sources `script` and then dumps the environment.
#[cfg(windows)]
fn activation_command(script: &Path, args: &[String]) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("cmd");
    // cmd.exe does its own quote parsing; hand it the line verbatim
    cmd.raw_arg(format!(
        "/d /s /c \"call \"{}\" {} >nul && set\"",
        script.display(),
        args.join(" ")
    ));
    cmd
}

/// Shell invocation that sources `script` and then dumps the environment.
#[cfg(not(windows))]
fn activation_command(script: &Path, args: &[String]) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("sh");
    cmd.arg("-c")
        .arg(r#"script="$1"; shift; . "$script" >/dev/null && env -0"#)
        .arg("sh")
        .arg(script)
        .args(args);
    cmd
}

/// Parses `NAME=value` entries split on `separator`, ignoring anything else.
fn parse_environment(dump: &str, separator: char) -> Vec<(String, String)> {
    dump.split(separator)
        .filter_map(|entry| entry.trim_end_matches('\r').split_once('='))
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = CommandSpec::new("C:/Program Files/7-Zip/7z.exe")
            .arg("a")
            .arg("-mx=9")
            .arg("C:/my release/out.7z");
        assert_eq!(
            cmd.to_string(),
            "\"C:/Program Files/7-Zip/7z.exe\" a -mx=9 \"C:/my release/out.7z\""
        );
    }

    #[test]
    fn parse_environment_splits_on_first_equals() {
        let env = parse_environment(
            "PATH=C:\\bin;D:\\x\r\nINCLUDE=a=b\nnoise line\n=C:=C:\\\n",
            '\n',
        );
        assert_eq!(
            env,
            vec![
                ("PATH".to_string(), "C:\\bin;D:\\x".to_string()),
                ("INCLUDE".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_reports_nonzero_exit() {
        let ok = CommandSpec::new("sh").args(["-c", "exit 0"]);
        SystemRunner.run(&ok).await.unwrap();

        let failing = CommandSpec::new("sh").args(["-c", "exit 3"]);
        let err = SystemRunner.run(&failing).await.unwrap_err();
        assert!(matches!(err, ReleaseError::ExternalProcess { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_applies_env_overlay() {
        let mut cmd = CommandSpec::new("sh").args(["-c", r#"test "$RELEASE_OVERLAY" = yes"#]);
        cmd.env.push(("RELEASE_OVERLAY".into(), "yes".into()));
        SystemRunner.run(&cmd).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_missing_program_is_process_error() {
        let cmd = CommandSpec::new("/definitely/not/a/real/program");
        let err = SystemRunner.run(&cmd).await.unwrap_err();
        assert!(matches!(err, ReleaseError::ExternalProcess { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn capture_environment_sources_script() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("devshell.sh");
        std::fs::write(
            &script,
            "echo noisy\nexport DEVSHELL_MARKER=ready\nexport DEVSHELL_ARG=\"$1\"\n",
        )
        .unwrap();

        let env = SystemRunner
            .capture_environment(&script, &["-arch=x64".to_string()])
            .await
            .unwrap();

        assert!(env.contains(&("DEVSHELL_MARKER".to_string(), "ready".to_string())));
        assert!(env.contains(&("DEVSHELL_ARG".to_string(), "-arch=x64".to_string())));
    }

    #[test]
    fn nul_separated_values_keep_their_line_breaks() {
        let env = parse_environment("NOTES=first\nFAKE=1\0PATH=/bin\0", '\0');
        assert_eq!(
            env,
            vec![
                ("NOTES".to_string(), "first\nFAKE=1".to_string()),
                ("PATH".to_string(), "/bin".to_string()),
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn capture_environment_keeps_multiline_values_whole() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("devshell.sh");
        std::fs::write(&script, "export DEVSHELL_NOTES='first\nDEVSHELL_FAKE=1'\n").unwrap();

        let env = SystemRunner.capture_environment(&script, &[]).await.unwrap();

        assert!(env.contains(&(
            "DEVSHELL_NOTES".to_string(),
            "first\nDEVSHELL_FAKE=1".to_string()
        )));
        assert!(env.iter().all(|(name, _)| name != "DEVSHELL_FAKE"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn capture_environment_fails_on_broken_script() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("devshell.sh");
        std::fs::write(&script, "return 4\n").unwrap();

        let err = SystemRunner.capture_environment(&script, &[]).await.unwrap_err();
        assert!(matches!(err, ReleaseError::ExternalProcess { .. }));
    }
}
