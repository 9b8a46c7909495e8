use crate::config::Config;
use crate::error::{Error, Result};
use log::{debug, info};
use minijinja::{Environment, UndefinedBehavior};
use std::fs;
use std::path::{Path, PathBuf};

/// `~/.kube/config`, where helm looks for cluster credentials by default.
pub fn default_kubeconfig_path() -> Result<PathBuf> {
    let mut path = dirs::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
    path.push(".kube");
    path.push("config");
    Ok(path)
}

/// Renders the template at `template_path` with `config` as context and writes the result
/// to `output_path`, creating missing parent directories.
pub fn render_kubeconfig(template_path: &Path, output_path: &Path, config: &Config) -> Result<()> {
    info!(
        "Writing kubeconfig {} from template {}...",
        output_path.display(),
        template_path.display()
    );

    let template = fs::read_to_string(template_path).map_err(|err| {
        Error::Io(std::io::Error::new(
            err.kind(),
            format!(
                "Unable to read kubeconfig template {}: {}",
                template_path.display(),
                err
            ),
        ))
    })?;

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    let rendered = env.render_str(template.as_str(), config)?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, rendered)?;

    debug!("Kubeconfig {} written", output_path.display());
    Ok(())
}
