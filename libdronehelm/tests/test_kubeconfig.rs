use libdronehelm::config::{Config, HelmCommand};
use libdronehelm::error::Error;
use libdronehelm::kubeconfig::{default_kubeconfig_path, render_kubeconfig};
use std::fs;

fn config() -> Config {
    Config {
        api_server: "https://10.0.0.1:6443".to_string(),
        token: "secret-token".to_string(),
        certificate: "LS0tLS1CRUdJTg==".to_string(),
        service_account: "deployer".to_string(),
        namespace: "apps".to_string(),
        tls_verify: true,
        ..Config::new(HelmCommand::Upgrade)
    }
}

#[test]
fn test_render_kubeconfig_fills_template_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let template_path = dir.path().join("kubeconfig.tpl");
    fs::write(&template_path, include_str!("kubeconfig.tpl")).unwrap();
    let output_path = dir.path().join("home").join(".kube").join("config");

    render_kubeconfig(&template_path, &output_path, &config()).unwrap();

    let kubeconfig: serde_yaml::Value =
        serde_yaml::from_str(fs::read_to_string(&output_path).unwrap().as_str()).unwrap();
    assert_eq!(
        "https://10.0.0.1:6443",
        kubeconfig["clusters"][0]["cluster"]["server"].as_str().unwrap()
    );
    assert_eq!(
        "LS0tLS1CRUdJTg==",
        kubeconfig["clusters"][0]["cluster"]["certificate-authority-data"]
            .as_str()
            .unwrap()
    );
    assert_eq!(
        "apps",
        kubeconfig["contexts"][0]["context"]["namespace"].as_str().unwrap()
    );
    assert_eq!(
        "secret-token",
        kubeconfig["users"][0]["user"]["token"].as_str().unwrap()
    );
}

#[test]
fn test_render_kubeconfig_skips_certificate_without_tls_verify() {
    let dir = tempfile::tempdir().unwrap();
    let template_path = dir.path().join("kubeconfig.tpl");
    fs::write(&template_path, include_str!("kubeconfig.tpl")).unwrap();
    let output_path = dir.path().join("config");

    let config = Config {
        tls_verify: false,
        ..config()
    };
    render_kubeconfig(&template_path, &output_path, &config).unwrap();

    let kubeconfig: serde_yaml::Value =
        serde_yaml::from_str(fs::read_to_string(&output_path).unwrap().as_str()).unwrap();
    assert_eq!(
        Some(true),
        kubeconfig["clusters"][0]["cluster"]["insecure-skip-tls-verify"].as_bool()
    );
    assert!(kubeconfig["clusters"][0]["cluster"]
        .get("certificate-authority-data")
        .is_none());
}

#[test]
fn test_render_kubeconfig_rejects_unknown_variables() {
    let dir = tempfile::tempdir().unwrap();
    let template_path = dir.path().join("kubeconfig.tpl");
    fs::write(&template_path, "token: {{ no_such_field }}\n").unwrap();
    let output_path = dir.path().join("config");

    match render_kubeconfig(&template_path, &output_path, &config()) {
        Err(Error::Template(_)) => {}
        other => panic!("Expected Error::Template, got {:?}", other),
    }
    assert!(!output_path.exists());
}

#[test]
fn test_render_kubeconfig_fails_on_missing_template() {
    let dir = tempfile::tempdir().unwrap();

    match render_kubeconfig(
        &dir.path().join("missing.tpl"),
        &dir.path().join("config"),
        &config(),
    ) {
        Err(Error::Io(err)) => assert_eq!(std::io::ErrorKind::NotFound, err.kind()),
        other => panic!("Expected Error::Io, got {:?}", other),
    }
}

#[test]
fn test_default_kubeconfig_path_is_in_home_directory() {
    let path = default_kubeconfig_path().unwrap();
    assert!(path.ends_with(".kube/config"));
}
