//! Native application build.
//!
//! Runs the configure and build commands inside the Visual Studio developer
//! environment for the target architecture.
//!
//! # Module Organization
//!
//! - `toolchain` - developer shell and toolchain file lookup
//! - `plan` - ordered build steps and their execution

mod plan;
mod toolchain;

pub use plan::{BuildPlan, BuildStep, execute_plan};
pub use toolchain::{Toolchain, locate};

use crate::error::Result;
use crate::release::process::{CommandSpec, ProcessRunner};
use crate::release::settings::ReleaseSettings;

/// Builds the native application for one [`BuildTarget`](crate::release::BuildTarget).
#[derive(Debug)]
pub struct BuildInvoker<'a> {
    settings: &'a ReleaseSettings,
    toolchain: Toolchain,
}

impl<'a> BuildInvoker<'a> {
    /// Checks build prerequisites.
    ///
    /// Fails with [`MissingPrerequisite`](crate::ReleaseError::MissingPrerequisite)
    /// naming the expected location when the developer shell or the toolchain
    /// file is absent. Nothing is spawned here.
    pub fn new(settings: &'a ReleaseSettings) -> Result<Self> {
        let toolchain = locate(settings)?;
        Ok(Self {
            settings,
            toolchain,
        })
    }

    /// Composes the ordered build plan:
    /// activate the developer shell, point vcpkg at the installation,
    /// configure, build.
    pub fn plan(&self) -> BuildPlan {
        let settings = self.settings;
        let target = settings.target();
        let config = &settings.config().toolchain;
        let build_dir = settings.paths().build_dir();

        let configure = CommandSpec::new(&config.cmake)
            .arg("-S")
            .arg(settings.root())
            .arg("-B")
            .arg(build_dir)
            .arg(format!("-DCMAKE_BUILD_TYPE={}", target.build_config))
            .arg(format!(
                "-DCMAKE_TOOLCHAIN_FILE={}",
                self.toolchain.toolchain_file.display()
            ))
            .arg(format!("-DVCPKG_TARGET_TRIPLET={}", target.arch.vcpkg_triplet()));

        let build = CommandSpec::new(&config.cmake)
            .arg("--build")
            .arg(build_dir)
            .arg("--config")
            .arg(&target.build_config);

        BuildPlan {
            steps: vec![
                BuildStep::Activate {
                    script: self.toolchain.dev_shell.clone(),
                    args: vec![format!("-arch={}", target.arch)],
                },
                BuildStep::SetEnv {
                    key: config.install_env_var.clone(),
                    value: self.toolchain.installation.display().to_string(),
                },
                BuildStep::Run(configure),
                BuildStep::Run(build),
            ],
        }
    }

    /// Runs the build plan. A failing step is fatal and is not retried.
    pub async fn run<R: ProcessRunner>(&self, runner: &R) -> Result<()> {
        let plan = self.plan();
        log::info!("Executing build command:\n{plan}\n");
        execute_plan(runner, &plan).await
    }
}
