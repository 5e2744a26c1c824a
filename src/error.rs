//! Error handling for stenciler.
//! Defines the error taxonomy shared by every stage of `init` and `update`.

use std::io;
use thiserror::Error;

/// Errors raised while reading, resolving or applying a template.
///
/// Every variant is fatal: the engine never retries and never rolls back
/// files that were already written.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Missing, unparseable or semantically invalid configuration document
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Configuration error: {0}.")]
    Yaml(#[from] serde_yaml::Error),

    /// One or more referenced hooks are missing or not executable.
    /// All violations are collected before this is returned.
    #[error("Validation error: {}.", .violations.join("\n"))]
    HookValidationError { violations: Vec<String> },

    /// A validation hook rejected (or failed to process) a parameter value
    #[error("Resolution error: parameter '{name}': {reason}.")]
    ResolutionError { name: String, reason: String },

    /// A file could not be read from the template or written to the destination
    #[error("Synchronization error: '{path}': {reason}.")]
    SyncError { path: String, reason: String },

    /// A templated file could not be rendered, e.g. an unresolved placeholder
    #[error("Template error: '{path}': {reason}.")]
    TemplateError { path: String, reason: String },

    /// A pre or post hook exited with a non-zero status
    #[error("Hook execution error: '{hook}' failed with {status}.")]
    HookExecutionError { hook: String, status: String },

    #[error("Prompt error: {0}.")]
    PromptError(String),

    #[error("Git error: {0}.")]
    Git2Error(#[from] git2::Error),

    #[error("Glob error: {0}.")]
    GlobError(#[from] globset::Error),

    #[error("Directory walk error: {0}.")]
    WalkError(#[from] walkdir::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
