//! stenciler bootstraps a repository from a template repository and keeps it
//! in sync with later changes to that template.
//! It provides the template model, the merge of upstream and local template
//! definitions, file classification and synchronization, parameter
//! resolution and hook execution.

/// Glob based classification of template files
pub mod classify;

/// Command-line interface module for the stenciler application
pub mod cli;

/// Param, Template and Config model and the `.stenciler.yaml` file
pub mod config;

/// `init` and `update` orchestration
pub mod engine;

/// Error types and handling for the stenciler application
pub mod error;

/// Hook validation and execution
pub mod hooks;

/// Access to the template repository, cloned or local
pub mod loader;

/// Logger setup driven by `-v` and `STENCILER_LOG_LEVEL`
pub mod logger;

/// Merge of the upstream template with the locally persisted one
pub mod merge;

/// User input and interaction handling
pub mod prompt;

/// Template rendering of templated files
pub mod renderer;

/// Parameter resolution
pub mod resolve;

/// Copying and rendering files into the working repository
pub mod sync;
