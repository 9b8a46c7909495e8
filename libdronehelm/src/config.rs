use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HELM_BINARY: &str = "/usr/bin/helm";
pub const DEFAULT_KUBE_CONFIG_TEMPLATE: &str = "/opt/config";
pub const DEFAULT_API_SERVER: &str = "https://kubernetes.default";

/// Helm subcommand the plugin ends with.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum HelmCommand {
    Install,
    Upgrade,
    Delete,
    Lint,
}

impl HelmCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            HelmCommand::Install => "install",
            HelmCommand::Upgrade => "upgrade",
            HelmCommand::Delete => "delete",
            HelmCommand::Lint => "lint",
        }
    }
}

impl fmt::Display for HelmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HelmCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "install" => Ok(HelmCommand::Install),
            "upgrade" => Ok(HelmCommand::Upgrade),
            "delete" => Ok(HelmCommand::Delete),
            "lint" => Ok(HelmCommand::Lint),
            other => Err(Error::UnsupportedCommand(other.to_string())),
        }
    }
}

/// Everything the plugin was configured with, as read from flags and `PLUGIN_*` variables.
///
/// Empty strings and `false` mean "unset": such fields never show up in helm arguments.
/// The whole record is also the context of the kubeconfig template.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Config {
    pub helm_binary: String,
    pub kube_config_template: String,
    pub api_server: String,
    pub token: String,
    pub certificate: String,
    pub service_account: String,
    pub kube_config: String,
    pub helm_command: HelmCommand,
    pub namespace: String,
    pub tls_verify: bool,
    pub set: String,
    pub set_string: String,
    pub values: String,
    pub get_values: bool,
    pub release: String,
    pub helm_repos: Vec<String>,
    pub chart: String,
    pub chart_version: String,
    pub debug: bool,
    pub dry_run: bool,
    pub tiller_namespace: String,
    pub wait: bool,
    pub recreate_pods: bool,
    pub reuse_values: bool,
    pub timeout: String,
    pub force: bool,
    pub update_dependencies: bool,
    pub purge: bool,
}

impl Config {
    pub fn new(helm_command: HelmCommand) -> Self {
        Config {
            helm_binary: DEFAULT_HELM_BINARY.to_string(),
            kube_config_template: DEFAULT_KUBE_CONFIG_TEMPLATE.to_string(),
            api_server: DEFAULT_API_SERVER.to_string(),
            token: String::new(),
            certificate: String::new(),
            service_account: String::new(),
            kube_config: String::new(),
            helm_command,
            namespace: String::new(),
            tls_verify: false,
            set: String::new(),
            set_string: String::new(),
            values: String::new(),
            get_values: false,
            release: String::new(),
            helm_repos: Vec::new(),
            chart: String::new(),
            chart_version: String::new(),
            debug: false,
            dry_run: false,
            tiller_namespace: String::new(),
            wait: false,
            recreate_pods: false,
            reuse_values: false,
            timeout: String::new(),
            force: false,
            update_dependencies: false,
            purge: false,
        }
    }

    /// Paths from `values`, in order, skipping empty segments.
    pub fn values_files(&self) -> Vec<&str> {
        self.values
            .split(',')
            .filter(|values_file| !values_file.is_empty())
            .collect()
    }
}

#[test]
fn test_helm_command_from_str_accepts_the_four_commands() {
    for name in ["install", "upgrade", "delete", "lint"] {
        assert_eq!(name, HelmCommand::from_str(name).unwrap().to_string());
    }
}

#[test]
fn test_helm_command_from_str_rejects_anything_else() {
    match HelmCommand::from_str("rollback") {
        Err(Error::UnsupportedCommand(name)) => assert_eq!("rollback", name),
        other => panic!("Expected Error::UnsupportedCommand, got {:?}", other),
    }
}

#[test]
fn test_values_files_skips_empty_segments() {
    let config = Config {
        values: "/tmp/1.yml,,/tmp/2.yml,".to_string(),
        ..Config::new(HelmCommand::Install)
    };
    assert_eq!(vec!["/tmp/1.yml", "/tmp/2.yml"], config.values_files());
    assert!(Config::new(HelmCommand::Install).values_files().is_empty());
}
