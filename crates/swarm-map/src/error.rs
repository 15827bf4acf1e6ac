//! Error types for the map host binary.
//!
//! [`MapError`] wraps every failure that can abort the host so `main` can
//! propagate with `?`. Feed problems never do: the feed controller logs
//! them and leaves the layer empty. [`CommandError`] rejects a console
//! line and is only ever logged.

/// Top-level error for the map host.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: swarm_hypocenters::config::ConfigError,
    },

    /// Waiting for the shutdown signal failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// A console line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,

    /// The first word names no command.
    #[error("unknown command '{command}'")]
    Unknown {
        /// The unrecognized word.
        command: String,
    },

    /// The command needs an argument that was not given.
    #[error("'{command}' needs an argument")]
    MissingArgument {
        /// The command missing its argument.
        command: &'static str,
    },

    /// The argument is not one the command accepts.
    #[error("'{command}' does not accept '{value}'")]
    InvalidArgument {
        /// The command that rejected the argument.
        command: &'static str,
        /// The rejected argument.
        value: String,
    },
}
