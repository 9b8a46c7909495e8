use config::Config;
use error::{Error, Result};
use log::{debug, info};
use std::path::Path;
use utils::{HelmBinary, HelmRunner};

pub mod config;
pub mod error;
pub mod helm_command;
pub mod helm_repositories;
pub mod kubeconfig;
pub mod utils;

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

/// Runs the whole plugin: kubeconfig, `helm init`, repositories, dependencies,
/// fetched values, then the configured helm command.
///
/// Stops at the first step that fails. Nothing done by earlier steps is undone.
pub fn exec(config: &Config, runner: &impl HelmRunner, kubeconfig_path: &Path) -> Result<()> {
    if config.kube_config.is_empty() {
        kubeconfig::render_kubeconfig(
            Path::new(config.kube_config_template.as_str()),
            kubeconfig_path,
            config,
        )
        .map_err(|err| Error::step("kubeconfig", err))?;
    }

    info!("Initializing helm client...");
    runner
        .run(&to_args(&["init", "--client-only"]))
        .map_err(|err| Error::step("init", err))?;

    helm_repositories::add_helm_repositories(&config.helm_repos, runner)?;

    if config.update_dependencies {
        info!("Updating chart dependencies...");
        runner
            .run(&to_args(&["dependency", "update", config.chart.as_str()]))
            .map_err(|err| Error::step("dependency update", err))?;
    }

    if config.get_values {
        info!(
            "Fetching values of release {} into {}...",
            config.release,
            helm_command::STAGED_VALUES_FILE
        );
        runner
            .run_to_file(
                &to_args(&["get", "values", config.release.as_str()]),
                Path::new(helm_command::STAGED_VALUES_FILE),
            )
            .map_err(|err| Error::step("get values", err))?;
    }

    let args = helm_command::build_helm_args(config);
    info!("Running helm {}...", config.helm_command);
    debug!("Helm arguments: {:?}", args);
    runner
        .run(&args)
        .map_err(|err| Error::step(config.helm_command.to_string(), err))?;

    Ok(())
}

/// [`exec`] against the configured helm binary, with the kubeconfig in its default location.
pub fn exec_default(config: &Config) -> Result<()> {
    let runner = HelmBinary {
        program: config.helm_binary.clone(),
        kubeconfig: if config.kube_config.is_empty() {
            None
        } else {
            Some(config.kube_config.clone())
        },
    };

    let kubeconfig_path = if config.kube_config.is_empty() {
        kubeconfig::default_kubeconfig_path()?
    } else {
        config.kube_config.clone().into()
    };

    exec(config, &runner, kubeconfig_path.as_path())
}
