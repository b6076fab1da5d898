//! Ordered build steps and their execution.

use crate::error::Result;
use crate::release::process::{CommandSpec, ProcessRunner};
use std::fmt;
use std::path::PathBuf;

/// One step of a native build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildStep {
    /// Source an environment script; its resulting environment applies to every later step.
    Activate { script: PathBuf, args: Vec<String> },
    /// Add a variable to the environment of every later step.
    SetEnv { key: String, value: String },
    /// Run a program with the accumulated environment.
    Run(CommandSpec),
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStep::Activate { script, args } => {
                write!(f, "call \"{}\" {}", script.display(), args.join(" "))
            }
            BuildStep::SetEnv { key, value } => write!(f, "set {key}={value}"),
            BuildStep::Run(command) => write!(f, "{command}"),
        }
    }
}

/// Steps run strictly in order; the first failure stops the plan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildPlan {
    pub steps: Vec<BuildStep>,
}

impl BuildPlan {
    /// Every `Run` command, in order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.steps.iter().filter_map(|step| match step {
            BuildStep::Run(command) => Some(command),
            _ => None,
        })
    }
}

impl fmt::Display for BuildPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.steps.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(" && "))
    }
}

/// Executes `plan` through `runner`, chaining environment changes from
/// `Activate` and `SetEnv` steps into every later `Run`.
pub async fn execute_plan<R: ProcessRunner>(runner: &R, plan: &BuildPlan) -> Result<()> {
    let mut overlay: Vec<(String, String)> = Vec::new();

    for step in &plan.steps {
        match step {
            BuildStep::Activate { script, args } => {
                log::info!("Activating environment: {step}");
                let captured = runner.capture_environment(script, args).await?;
                log::debug!("Captured {} environment variables", captured.len());
                merge(&mut overlay, captured);
            }
            BuildStep::SetEnv { key, value } => {
                log::info!("Setting {key}={value}");
                merge(&mut overlay, [(key.clone(), value.clone())]);
            }
            BuildStep::Run(command) => {
                log::info!("Running: {command}");
                let mut command = command.clone();
                let own = std::mem::take(&mut command.env);
                command.env = overlay.clone();
                merge(&mut command.env, own);
                runner.run(&command).await?;
            }
        }
    }

    Ok(())
}

/// Inserts or replaces each variable of `vars` in `overlay`.
///
/// Names compare case-insensitively on Windows, where the environment does.
fn merge(overlay: &mut Vec<(String, String)>, vars: impl IntoIterator<Item = (String, String)>) {
    for (key, value) in vars {
        match overlay.iter_mut().find(|(k, _)| same_var(k, &key)) {
            Some(existing) => existing.1 = value,
            None => overlay.push((key, value)),
        }
    }
}

fn same_var(a: &str, b: &str) -> bool {
    if cfg!(windows) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use std::cell::RefCell;
    use std::path::Path;

    #[derive(Default)]
    struct Recorder {
        ran: RefCell<Vec<CommandSpec>>,
        fail_program: Option<&'static str>,
    }

    impl ProcessRunner for Recorder {
        async fn run(&self, command: &CommandSpec) -> Result<()> {
            self.ran.borrow_mut().push(command.clone());
            if Some(command.program.to_string_lossy().as_ref()) == self.fail_program {
                return Err(ReleaseError::ExternalProcess {
                    command: command.to_string(),
                    reason: "exit code 1".into(),
                });
            }
            Ok(())
        }

        async fn capture_environment(
            &self,
            _script: &Path,
            args: &[String],
        ) -> Result<Vec<(String, String)>> {
            Ok(vec![("DEVSHELL_ARGS".into(), args.join(" "))])
        }
    }

    fn plan() -> BuildPlan {
        BuildPlan {
            steps: vec![
                BuildStep::Activate {
                    script: "VsDevCmd.bat".into(),
                    args: vec!["-arch=x64".into()],
                },
                BuildStep::SetEnv {
                    key: "VCPKG_VISUAL_STUDIO_PATH".into(),
                    value: "C:/VS".into(),
                },
                BuildStep::Run(CommandSpec::new("configure")),
                BuildStep::Run(CommandSpec::new("build")),
            ],
        }
    }

    #[tokio::test]
    async fn run_steps_inherit_accumulated_environment() {
        let runner = Recorder::default();
        execute_plan(&runner, &plan()).await.unwrap();

        let ran = runner.ran.borrow();
        assert_eq!(ran.len(), 2);
        for command in ran.iter() {
            assert!(command.env.contains(&("DEVSHELL_ARGS".into(), "-arch=x64".into())));
            assert!(command.env.contains(&("VCPKG_VISUAL_STUDIO_PATH".into(), "C:/VS".into())));
        }
    }

    #[tokio::test]
    async fn failure_stops_remaining_steps() {
        let runner = Recorder {
            fail_program: Some("configure"),
            ..Default::default()
        };
        let err = execute_plan(&runner, &plan()).await.unwrap_err();

        assert!(matches!(err, ReleaseError::ExternalProcess { .. }));
        let ran = runner.ran.borrow();
        assert_eq!(ran.len(), 1);
        assert_eq!(ran[0].program, PathBuf::from("configure"));
    }

    #[test]
    fn plan_renders_as_chained_command_line() {
        assert_eq!(
            plan().to_string(),
            "call \"VsDevCmd.bat\" -arch=x64 && set VCPKG_VISUAL_STUDIO_PATH=C:/VS && configure && build"
        );
    }
}
