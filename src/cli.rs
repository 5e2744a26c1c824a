//! Command-line interface implementation for stenciler.
//! Provides argument parsing and help text formatting using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::Options;
use crate::resolve::parse_param_override;

/// Command-line arguments structure for stenciler.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "stenciler: repository templates made easy",
    long_about = "stenciler supports both initial templating of a repository and keeping \
                  that repository up to date with changes from the template repository."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Local directory to use as the template repository instead of cloning
    #[arg(short = 'r', long, global = true, value_name = "DIR", conflicts_with = "auth_token")]
    pub template_repo_dir: Option<PathBuf>,

    /// Authentication token for private remote repositories
    #[arg(short = 't', long, global = true, env = "STENCILER_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Template directory to use when the template repository defines several
    #[arg(short = 'd', long, global = true, value_name = "NAME")]
    pub directory: Option<String>,

    /// Parameter value to use instead of prompting, may be repeated
    #[arg(short = 'p', long = "param", global = true, value_name = "NAME=VALUE", value_parser = parse_param_override)]
    pub params: Vec<(String, String)>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Initialize the current directory with the template at REPO_URL
    Init {
        /// URL of the template repository
        #[arg(value_name = "REPO_URL")]
        repo_url: String,
    },
    /// Update the current directory from the template it was initialized with
    Update,
}

impl Args {
    /// Engine options for a run operating on `work_dir`.
    pub fn options(&self, work_dir: PathBuf) -> Options {
        Options {
            work_dir,
            template_repo_dir: self.template_repo_dir.clone(),
            auth_token: self.auth_token.clone(),
            directory: self.directory.clone(),
            params: self.params.clone(),
        }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for argument errors
pub fn get_args() -> Args {
    Args::parse()
}
