use clap::Parser;
use libdronehelm::config::{
    Config, HelmCommand, DEFAULT_API_SERVER, DEFAULT_HELM_BINARY, DEFAULT_KUBE_CONFIG_TEMPLATE,
};
use libdronehelm::error::Result;
use log::debug;
use std::str::FromStr;

pub mod utils;

#[derive(Parser, Debug)]
#[command(about = "Drone plugin running helm install, upgrade, delete or lint", long_about = None)]
struct Cli {
    /// Absolute path of the helm binary
    #[arg(long, env = "PLUGIN_HELM_BINARY", default_value = DEFAULT_HELM_BINARY)]
    helm_binary: String,
    /// Absolute path of the kube config template
    #[arg(long, env = "PLUGIN_KUBE_CONFIG_TEMPLATE", default_value = DEFAULT_KUBE_CONFIG_TEMPLATE)]
    kube_config_template: String,
    /// Set api server address
    #[arg(long, env = "PLUGIN_API_SERVER", default_value = DEFAULT_API_SERVER)]
    api_server: String,
    /// Set client token
    #[arg(long, env = "PLUGIN_TOKEN")]
    token: String,
    /// Set server certificate
    #[arg(long, env = "PLUGIN_CERTIFICATE")]
    certificate: String,
    /// Set service account name
    #[arg(long, env = "PLUGIN_SERVICE_ACCOUNT")]
    service_account: String,
    /// Absolute path of the kubeconfig file to be used instead of the rendered template
    #[arg(long, env = "PLUGIN_KUBE_CONFIG")]
    kube_config: Option<String>,
    /// The command helm has to execute
    #[arg(long, env = "PLUGIN_HELM_COMMAND", value_parser = parse_helm_command)]
    helm_command: HelmCommand,
    /// Namespace to install the release into
    #[arg(long, env = "PLUGIN_NAMESPACE")]
    namespace: Option<String>,
    /// Enable TLS for request and verify remote
    #[arg(long, env = "PLUGIN_TLS_VERIFY")]
    tls_verify: bool,
    /// Set values on the command line
    #[arg(long, env = "PLUGIN_SET")]
    set: Option<String>,
    /// Set STRING values on the command line
    #[arg(long, env = "PLUGIN_SET_STRING")]
    set_string: Option<String>,
    /// Comma separated values files or URLs
    #[arg(long, env = "PLUGIN_VALUES")]
    values: Option<String>,
    /// Download the values of the release and pass them to the upgrade
    #[arg(long, env = "PLUGIN_GET_VALUES")]
    get_values: bool,
    /// The release name
    #[arg(long, env = "PLUGIN_RELEASE")]
    release: Option<String>,
    /// Add a chart repository, as NAME=URL
    ///
    /// Values are also split on commas, so URLs containing a comma are not supported.
    #[arg(long, env = "PLUGIN_HELM_REPOS", value_delimiter = ',')]
    helm_repos: Vec<String>,
    /// Chart reference
    #[arg(long, env = "PLUGIN_CHART")]
    chart: String,
    /// Specify the exact chart version to install
    #[arg(long, env = "PLUGIN_CHART_VERSION")]
    chart_version: Option<String>,
    /// Enable verbose helm output
    #[arg(long, env = "PLUGIN_DEBUG")]
    debug: bool,
    /// Simulate the helm command
    #[arg(long, env = "PLUGIN_DRY_RUN")]
    dry_run: bool,
    /// Namespace of Tiller
    #[arg(long, env = "PLUGIN_TILLER_NAMESPACE")]
    tiller_namespace: Option<String>,
    /// Wait until all resources of the release are ready
    #[arg(long, env = "PLUGIN_WAIT")]
    wait: bool,
    /// Restart pods of the release if applicable
    #[arg(long, env = "PLUGIN_RECREATE_PODS")]
    recreate_pods: bool,
    /// Reuse the values of the last release and merge in overrides
    #[arg(long, env = "PLUGIN_REUSE_VALUES")]
    reuse_values: bool,
    /// Time to wait for any individual Kubernetes operation
    #[arg(long, env = "PLUGIN_TIMEOUT")]
    timeout: Option<String>,
    /// Force resource updates through delete/recreate if needed
    #[arg(long, env = "PLUGIN_FORCE")]
    force: bool,
    /// Update chart dependencies before running the helm command
    #[arg(long, env = "PLUGIN_UPDATE_DEPENDENCIES")]
    update_dependencies: bool,
    /// Remove the release from the store and free its name
    #[arg(long, env = "PLUGIN_PURGE")]
    purge: bool,
    /// Show verbose plugin logs
    #[arg(short, long, env = "PLUGIN_VERBOSE")]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            helm_binary: self.helm_binary,
            kube_config_template: self.kube_config_template,
            api_server: self.api_server,
            token: self.token,
            certificate: self.certificate,
            service_account: self.service_account,
            kube_config: self.kube_config.unwrap_or_default(),
            helm_command: self.helm_command,
            namespace: self.namespace.unwrap_or_default(),
            tls_verify: self.tls_verify,
            set: self.set.unwrap_or_default(),
            set_string: self.set_string.unwrap_or_default(),
            values: self.values.unwrap_or_default(),
            get_values: self.get_values,
            release: self.release.unwrap_or_default(),
            helm_repos: self.helm_repos,
            chart: self.chart,
            chart_version: self.chart_version.unwrap_or_default(),
            debug: self.debug,
            dry_run: self.dry_run,
            tiller_namespace: self.tiller_namespace.unwrap_or_default(),
            wait: self.wait,
            recreate_pods: self.recreate_pods,
            reuse_values: self.reuse_values,
            timeout: self.timeout.unwrap_or_default(),
            force: self.force,
            update_dependencies: self.update_dependencies,
            purge: self.purge,
        }
    }
}

fn parse_helm_command(value: &str) -> std::result::Result<HelmCommand, String> {
    HelmCommand::from_str(value).map_err(|err| err.to_string())
}

pub fn main_with_args(args: Vec<&str>, logging: bool) -> Result<()> {
    let args = Cli::parse_from(args);

    if logging {
        utils::init_logging(args.verbose);
    }
    eprintln!("{}", utils::banner());

    let config = args.into_config();
    debug!(
        "Running helm {} for chart {:?}, release {:?}",
        config.helm_command, config.chart, config.release
    );

    libdronehelm::exec_default(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 11] = [
        "drone-helm",
        "--token",
        "t0k3n",
        "--certificate",
        "cert",
        "--service-account",
        "deployer",
        "--chart",
        "stable/app",
        "--helm-command",
        "upgrade",
    ];

    fn parse(extra: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(REQUIRED.iter().chain(extra.iter()).copied())
    }

    #[test]
    fn test_cli_applies_defaults() {
        let config = parse(&[]).unwrap().into_config();
        assert_eq!("/usr/bin/helm", config.helm_binary);
        assert_eq!("/opt/config", config.kube_config_template);
        assert_eq!("https://kubernetes.default", config.api_server);
        assert_eq!(HelmCommand::Upgrade, config.helm_command);
        assert_eq!("", config.kube_config);
        assert_eq!("", config.release);
        assert!(!config.get_values);
        assert!(config.helm_repos.is_empty());
    }

    #[test]
    fn test_cli_maps_flags_onto_config() {
        let config = parse(&[
            "--release",
            "app",
            "--values",
            "/tmp/1.yml,/tmp/2.yml",
            "--set",
            "\"a=b\"",
            "--helm-repos",
            "a=https://a.example.com,b=https://b.example.com",
            "--helm-repos",
            "c=https://c.example.com",
            "--get-values",
            "--wait",
            "--timeout",
            "300",
        ])
        .unwrap()
        .into_config();

        assert_eq!("app", config.release);
        assert_eq!("/tmp/1.yml,/tmp/2.yml", config.values);
        assert_eq!("\"a=b\"", config.set);
        assert_eq!(
            vec![
                "a=https://a.example.com",
                "b=https://b.example.com",
                "c=https://c.example.com"
            ],
            config.helm_repos
        );
        assert!(config.get_values);
        assert!(config.wait);
        assert!(!config.force);
        assert_eq!("300", config.timeout);
    }

    #[test]
    fn test_cli_rejects_unknown_helm_command() {
        let mut args = REQUIRED.to_vec();
        args[10] = "rollback";
        let err = Cli::try_parse_from(args).unwrap_err();
        assert_eq!(clap::error::ErrorKind::ValueValidation, err.kind());
        assert!(err.to_string().contains("Unsupported helm command \"rollback\""));
    }

    #[test]
    fn test_cli_requires_chart() {
        let err = Cli::try_parse_from([
            "drone-helm",
            "--token",
            "t0k3n",
            "--certificate",
            "cert",
            "--service-account",
            "deployer",
            "--helm-command",
            "lint",
        ])
        .unwrap_err();
        assert_eq!(clap::error::ErrorKind::MissingRequiredArgument, err.kind());
    }
}
