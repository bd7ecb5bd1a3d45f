use std::io;

use thiserror::Error;

/// Exit code for errors raised by docker-here itself.
pub const EXIT_USAGE: i32 = 1;
/// Exit code when the container runtime could not be started.
pub const EXIT_RUNTIME_UNAVAILABLE: i32 = 127;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("missing image, see --help")]
    MissingImage,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathResolutionError {
    #[error("empty path given for {0}")]
    Empty(&'static str),

    #[error("path for {0} contains a NUL byte")]
    Nul(&'static str),

    #[error("working directory {0} is not absolute")]
    RelativeCwd(String),
}

#[derive(Error, Debug)]
#[error("failed to start {program}: {source}")]
pub struct RuntimeInvocationError {
    pub program: String,
    #[source]
    pub source: io::Error,
}

/// Maps an error chain to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.chain().any(|e| e.is::<RuntimeInvocationError>()) {
        return EXIT_RUNTIME_UNAVAILABLE;
    }
    EXIT_USAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_option_message() {
        let err = ParseError::UnknownOption("--src".to_string());
        assert_eq!(err.to_string(), "Unknown option: --src");
    }

    #[test]
    fn exit_codes() {
        let err = anyhow::Error::new(ParseError::MissingImage);
        assert_eq!(exit_code(&err), EXIT_USAGE);

        let err = anyhow::Error::new(RuntimeInvocationError {
            program: "docker".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        })
        .context("check");
        assert_eq!(exit_code(&err), EXIT_RUNTIME_UNAVAILABLE);
    }
}
