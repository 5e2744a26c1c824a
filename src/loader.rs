//! Template repository loading for stenciler.
//! Either uses a local checkout as-is or clones the remote repository into a
//! temporary directory that is removed once the run is over.
use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A template repository available on the local filesystem.
#[derive(Debug)]
pub struct TemplateRepo {
    path: PathBuf,
    /// Keeps a cloned repository alive until the repo is dropped
    _clone_dir: Option<TempDir>,
}

impl TemplateRepo {
    /// Root directory of the repository.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Trait for loading template repositories from different sources.
pub trait TemplateLoader {
    /// Makes the template repository available locally.
    ///
    /// # Returns
    /// * `Result<TemplateRepo>` - Handle to the local copy of the repository
    fn load(&self) -> Result<TemplateRepo>;
}

/// Loader for a template repository that is already checked out locally.
pub struct LocalLoader<P: AsRef<Path>> {
    path: P,
}

impl<P: AsRef<Path>> LocalLoader<P> {
    /// Creates a new LocalLoader instance.
    pub fn new(path: P) -> Self {
        Self { path }
    }
}

impl<P: AsRef<Path>> TemplateLoader for LocalLoader<P> {
    /// # Errors
    /// * `Error::ConfigError` if the path is not a directory
    fn load(&self) -> Result<TemplateRepo> {
        let path = self.path.as_ref();
        if !path.is_dir() {
            return Err(Error::ConfigError(format!(
                "{} is not a template repository directory",
                path.display()
            )));
        }
        debug!("Using local template repository '{}'.", path.display());
        Ok(TemplateRepo { path: path.to_path_buf(), _clone_dir: None })
    }
}

/// Loader for templates from git repositories.
pub struct GitLoader<'a> {
    repo: &'a str,
    auth_token: Option<&'a str>,
}

impl<'a> GitLoader<'a> {
    /// Creates a new GitLoader instance.
    pub fn new(repo: &'a str, auth_token: Option<&'a str>) -> Self {
        Self { repo, auth_token }
    }
}

impl TemplateLoader for GitLoader<'_> {
    /// Clones the repository into a fresh temporary directory.
    ///
    /// With an auth token, HTTPS basic authentication is used with the user
    /// name `token` and the token as password.
    ///
    /// # Errors
    /// * `Error::Git2Error` if the clone fails
    fn load(&self) -> Result<TemplateRepo> {
        let clone_dir = tempfile::Builder::new().prefix("stenciler-clone-").tempdir()?;
        debug!("Cloning repository '{}' to '{}'.", self.repo, clone_dir.path().display());

        let mut callbacks = git2::RemoteCallbacks::new();
        if let Some(token) = self.auth_token {
            callbacks.credentials(move |_url, _username_from_url, _allowed_types| {
                git2::Cred::userpass_plaintext("token", token)
            });
        }

        let mut fetch_opts = git2::FetchOptions::new();
        fetch_opts.remote_callbacks(callbacks);

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_opts);
        builder.clone(self.repo, clone_dir.path())?;

        Ok(TemplateRepo { path: clone_dir.path().to_path_buf(), _clone_dir: Some(clone_dir) })
    }
}

/// Returns the template repository, preferring a local override over cloning `repository`.
pub fn load_template_repo(
    repository: &str,
    local_override: Option<&Path>,
    auth_token: Option<&str>,
) -> Result<TemplateRepo> {
    let loader: Box<dyn TemplateLoader + '_> = match local_override {
        Some(path) => Box::new(LocalLoader::new(path)),
        None => Box::new(GitLoader::new(repository, auth_token)),
    };
    loader.load()
}
