use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Unable to determine the home directory of the current user")]
    HomeDirectoryNotFound,

    #[error("Unsupported helm command \"{0}\", expected one of install, upgrade, delete, lint")]
    UnsupportedCommand(String),

    #[error("Step \"{step}\" failed: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn step(step: impl Into<String>, source: impl Into<Error>) -> Self {
        Self::Step {
            step: step.into(),
            source: Box::new(source.into()),
        }
    }
}
