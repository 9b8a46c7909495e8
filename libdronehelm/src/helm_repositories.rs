use crate::error::{Error, Result};
use crate::utils::HelmRunner;
use log::{debug, info};

/// Arguments of `helm repo add` for one repository.
///
/// `name=url` is split into its two parts, anything else is passed through as is.
pub fn repo_add_args(repository: &str) -> Vec<String> {
    let mut args = vec!["repo".to_string(), "add".to_string()];
    match repository.split_once('=') {
        Some((name, url)) if !name.is_empty() && !url.is_empty() => {
            args.push(name.to_string());
            args.push(url.to_string());
        }
        _ => args.push(repository.to_string()),
    }
    args
}

pub fn add_helm_repositories(helm_repositories: &[String], runner: &impl HelmRunner) -> Result<()> {
    info!("Adding Helm repositories...");

    for repository in helm_repositories {
        runner
            .run(&repo_add_args(repository))
            .map_err(|err| Error::step(format!("repo add {}", repository), err))?;

        debug!("Repository {} added", repository);
    }

    Ok(())
}

#[test]
fn test_repo_add_args_splits_name_and_url() {
    assert_eq!(
        vec!["repo", "add", "stable", "https://charts.example.com/stable"],
        repo_add_args("stable=https://charts.example.com/stable")
    );
}

#[test]
fn test_repo_add_args_passes_other_specs_through() {
    assert_eq!(vec!["repo", "add", "stable"], repo_add_args("stable"));
    assert_eq!(vec!["repo", "add", "=https://x"], repo_add_args("=https://x"));
}
