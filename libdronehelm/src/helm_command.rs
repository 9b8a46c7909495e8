use crate::config::{Config, HelmCommand};
use crate::utils::unquote_or_raw;

/// Where `get values` stages the values of the deployed release.
pub const STAGED_VALUES_FILE: &str = "/tmp/values.yaml";

/// Optional helm flags, each emitted only when its config field is set.
#[derive(Debug, PartialEq, Clone, Copy)]
enum Flag {
    Name,
    Version,
    Set,
    SetString,
    Values,
    StagedValues,
    Namespace,
    TillerNamespace,
    DryRun,
    Debug,
    Wait,
    RecreatePods,
    ReuseValues,
    Timeout,
    Force,
    Purge,
}

const INSTALL_FLAGS: &[Flag] = &[
    Flag::Name,
    Flag::Version,
    Flag::Set,
    Flag::SetString,
    Flag::Values,
    Flag::Namespace,
    Flag::TillerNamespace,
    Flag::DryRun,
    Flag::Debug,
    Flag::Wait,
    Flag::RecreatePods,
    Flag::ReuseValues,
    Flag::Timeout,
    Flag::Force,
];

const UPGRADE_FLAGS: &[Flag] = &[
    Flag::Version,
    Flag::Set,
    Flag::SetString,
    Flag::Values,
    Flag::StagedValues,
    Flag::Namespace,
    Flag::TillerNamespace,
    Flag::DryRun,
    Flag::Debug,
    Flag::Wait,
    Flag::RecreatePods,
    Flag::ReuseValues,
    Flag::Timeout,
    Flag::Force,
];

const DELETE_FLAGS: &[Flag] = &[Flag::TillerNamespace, Flag::DryRun, Flag::Purge];

const LINT_FLAGS: &[Flag] = &[
    Flag::Set,
    Flag::SetString,
    Flag::Values,
    Flag::Namespace,
    Flag::TillerNamespace,
    Flag::Debug,
];

fn positional_args(config: &Config) -> Vec<String> {
    let command = config.helm_command.to_string();
    match config.helm_command {
        HelmCommand::Install | HelmCommand::Lint => vec![command, config.chart.clone()],
        HelmCommand::Upgrade => vec![
            command,
            "--install".to_string(),
            config.release.clone(),
            config.chart.clone(),
        ],
        HelmCommand::Delete => vec![command, config.release.clone()],
    }
}

fn flags(helm_command: HelmCommand) -> &'static [Flag] {
    match helm_command {
        HelmCommand::Install => INSTALL_FLAGS,
        HelmCommand::Upgrade => UPGRADE_FLAGS,
        HelmCommand::Delete => DELETE_FLAGS,
        HelmCommand::Lint => LINT_FLAGS,
    }
}

fn push_value(args: &mut Vec<String>, name: &str, value: &str) {
    if !value.is_empty() {
        args.push(name.to_string());
        args.push(value.to_string());
    }
}

fn push_unquoted(args: &mut Vec<String>, name: &str, value: &str) {
    if !value.is_empty() {
        args.push(name.to_string());
        args.push(unquote_or_raw(value));
    }
}

fn push_switch(args: &mut Vec<String>, name: &str, enabled: bool) {
    if enabled {
        args.push(name.to_string());
    }
}

fn push_flag(args: &mut Vec<String>, flag: Flag, config: &Config) {
    match flag {
        Flag::Name => push_value(args, "--name", &config.release),
        Flag::Version => push_value(args, "--version", &config.chart_version),
        Flag::Set => push_unquoted(args, "--set", &config.set),
        Flag::SetString => push_unquoted(args, "--set-string", &config.set_string),
        Flag::Values => {
            for values_file in config.values_files() {
                push_value(args, "--values", values_file);
            }
        }
        Flag::StagedValues => {
            if config.get_values {
                push_value(args, "--values", STAGED_VALUES_FILE);
            }
        }
        Flag::Namespace => push_value(args, "--namespace", &config.namespace),
        Flag::TillerNamespace => push_value(args, "--tiller-namespace", &config.tiller_namespace),
        Flag::DryRun => push_switch(args, "--dry-run", config.dry_run),
        Flag::Debug => push_switch(args, "--debug", config.debug),
        Flag::Wait => push_switch(args, "--wait", config.wait),
        Flag::RecreatePods => push_switch(args, "--recreate-pods", config.recreate_pods),
        Flag::ReuseValues => push_switch(args, "--reuse-values", config.reuse_values),
        Flag::Timeout => push_value(args, "--timeout", &config.timeout),
        Flag::Force => push_switch(args, "--force", config.force),
        Flag::Purge => push_switch(args, "--purge", config.purge),
    }
}

/// Builds the arguments of the final helm invocation for `config.helm_command`.
///
/// Positional arguments come first, then every set flag in a fixed order that
/// depends only on the command, never on how the config was built.
pub fn build_helm_args(config: &Config) -> Vec<String> {
    let mut args = positional_args(config);
    for flag in flags(config.helm_command) {
        push_flag(&mut args, *flag, config);
    }
    args
}

#[test]
fn test_only_upgrade_stages_fetched_values() {
    assert!(UPGRADE_FLAGS.contains(&Flag::StagedValues));
    for helm_command in [HelmCommand::Install, HelmCommand::Delete, HelmCommand::Lint] {
        assert!(!flags(helm_command).contains(&Flag::StagedValues));
    }
}

#[test]
fn test_only_delete_knows_purge() {
    for helm_command in [HelmCommand::Install, HelmCommand::Upgrade, HelmCommand::Lint] {
        assert!(!flags(helm_command).contains(&Flag::Purge));
    }
}

#[test]
fn test_quoted_empty_set_is_still_emitted() {
    let config = Config {
        chart: "test".to_string(),
        set: "\"\"".to_string(),
        ..Config::new(HelmCommand::Lint)
    };
    assert_eq!(vec!["lint", "test", "--set", ""], build_helm_args(&config));
}
