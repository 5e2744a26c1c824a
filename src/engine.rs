//! `init` and `update` orchestration.
//!
//! Both commands follow the same flow once a template is chosen: check the
//! template directory and patterns, validate hooks, resolve params, persist the template locally, run the pre hooks,
//! synchronize files and run the post hooks. Any failure stops the run.

use std::path::{Path, PathBuf};

use log::info;
use url::Url;

use crate::classify::check_sources;
use crate::config::{select_template, Config, Template, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::hooks::{run_hooks, validate_hooks, HookClass};
use crate::loader::load_template_repo;
use crate::merge::merge;
use crate::prompt::Prompter;
use crate::renderer::MiniJinjaRenderer;
use crate::resolve::{apply_overrides, resolve_all};
use crate::sync::{synchronize, SyncReport};

/// Everything the engine needs from the command line.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Repository being initialized or updated. The binary always sets this
    /// to the current working directory.
    pub work_dir: PathBuf,
    /// Local checkout of the template repository, used instead of cloning.
    pub template_repo_dir: Option<PathBuf>,
    /// Token for cloning private repositories over HTTPS.
    pub auth_token: Option<String>,
    /// Directory name of the upstream template to use.
    pub directory: Option<String>,
    /// Param values supplied up front, as `(name, value)`.
    pub params: Vec<(String, String)>,
}

/// Stamps the template found at `repo_url` into `options.work_dir`.
///
/// # Errors
/// * `Error::ConfigError` if the URL is invalid, the working directory already
///   holds a stenciler config, or the upstream config is unusable
/// * Any error of the validation, resolution, hook or synchronization stages
pub fn init(options: &Options, repo_url: &str, prompt: &mut dyn Prompter) -> Result<SyncReport> {
    Url::parse(repo_url)
        .map_err(|e| Error::ConfigError(format!("repository URL '{repo_url}' is invalid: {e}")))?;

    if options.work_dir.join(CONFIG_FILE).exists() {
        return Err(Error::ConfigError(format!(
            "{} already exists, use update instead",
            CONFIG_FILE
        )));
    }

    let repo = load_template_repo(
        repo_url,
        options.template_repo_dir.as_deref(),
        options.auth_token.as_deref(),
    )?;
    let config = Config::load(repo.path())?;
    let mut template = select_template(&config, options.directory.as_deref(), prompt)?;
    if template.repository.is_empty() {
        template.repository = repo_url.to_string();
    }
    template.is_update = false;

    info!("Initializing from template '{}' of {}", template.directory, template.repository);
    apply(options, repo.path(), template, prompt, HookClass::PreInit, HookClass::PostInit)
}

/// Re-applies the upstream template recorded in `options.work_dir`.
///
/// The upstream template is merged with the persisted one so that answers
/// given previously are kept, and init-only files are left alone.
///
/// # Errors
/// * `Error::ConfigError` if the local or upstream config is missing or unusable
/// * Any error of the validation, resolution, hook or synchronization stages
pub fn update(options: &Options, prompt: &mut dyn Prompter) -> Result<SyncReport> {
    let local = Config::load_local(&options.work_dir)?;
    let repo = load_template_repo(
        &local.repository,
        options.template_repo_dir.as_deref(),
        options.auth_token.as_deref(),
    )?;
    let config = Config::load(repo.path())?;
    let directory = options.directory.as_deref().unwrap_or(&local.directory);
    let upstream = select_template(&config, Some(directory), prompt)?;

    let mut template = merge(&upstream, &local);
    template.is_update = true;

    info!("Updating from template '{}' of {}", template.directory, template.repository);
    apply(options, repo.path(), template, prompt, HookClass::PreUpdate, HookClass::PostUpdate)
}

fn apply(
    options: &Options,
    repo_dir: &Path,
    mut template: Template,
    prompt: &mut dyn Prompter,
    pre: HookClass,
    post: HookClass,
) -> Result<SyncReport> {
    template.check_persisted()?;
    check_sources(repo_dir, &template)?;
    validate_hooks(&template, repo_dir)?;

    apply_overrides(&mut template, &options.params)?;
    resolve_all(&mut template, repo_dir, prompt)?;
    Config::save_local(&template, &options.work_dir)?;

    run_hooks(&template, repo_dir, pre)?;
    let report = synchronize(repo_dir, &template, &options.work_dir, &MiniJinjaRenderer::new())?;
    run_hooks(&template, repo_dir, post)?;
    Ok(report)
}
