use libdronehelm::helm_repositories::add_helm_repositories;
use libdronehelm::utils::HelmBinary;

#[test]
fn test_add_helm_repositories_runs_helm_for_each_repository() {
    let runner = HelmBinary {
        program: "true".to_string(),
        kubeconfig: None,
    };
    add_helm_repositories(
        &[
            "a=https://a.example.com".to_string(),
            "b=https://b.example.com".to_string(),
        ],
        &runner,
    )
    .unwrap();
}

#[test]
fn test_add_helm_repositories_fails_when_helm_fails() {
    let runner = HelmBinary {
        program: "false".to_string(),
        kubeconfig: None,
    };
    let err = add_helm_repositories(&["a=https://a.example.com".to_string()], &runner).unwrap_err();
    assert!(err.to_string().contains("repo add a=https://a.example.com"));
}

#[test]
fn test_add_helm_repositories_fails_when_helm_is_missing() {
    let runner = HelmBinary {
        program: "/nonexistent/helm".to_string(),
        kubeconfig: None,
    };
    let err = add_helm_repositories(&["a=https://a.example.com".to_string()], &runner).unwrap_err();
    assert!(err.to_string().contains("Failed to execute /nonexistent/helm"));
}

#[test]
fn test_add_helm_repositories_does_nothing_without_repositories() {
    let runner = HelmBinary {
        program: "/nonexistent/helm".to_string(),
        kubeconfig: None,
    };
    add_helm_repositories(&[], &runner).unwrap();
}
