//! Configuration handling for stenciler templates.
//! This module provides the `Param`, `Template` and `Config` model, its YAML
//! representation and the selection of one template out of an upstream config.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hooks::gather_hook_paths;
use crate::prompt::Prompter;

/// Name of the configuration file, both in the template repository and in the
/// working repository.
pub const CONFIG_FILE: &str = ".stenciler.yaml";

/// Number of times an unrecognized template directory may be entered before giving up.
pub const MAX_SELECT_ATTEMPTS: usize = 3;

/// A single named value usable in templated files and hook environments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Unique name of the parameter within its template.
    pub name: String,

    /// Text shown to the user. Empty means the parameter is internal only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prompt: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,

    /// Script run to normalize or reject the value, relative to the repository root.
    #[serde(rename = "validation-hook", default, skip_serializing_if = "String::is_empty")]
    pub validation_hook: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl Param {
    pub fn is_internal(&self) -> bool {
        self.prompt.is_empty()
    }
}

/// The definition of a repository-stamping payload.
///
/// Glob patterns are relative to `directory`; hook paths are relative to the
/// root of the template repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Template {
    #[serde(default)]
    pub repository: String,

    pub directory: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,

    #[serde(rename = "init-only", default, skip_serializing_if = "Vec::is_empty")]
    pub init_only_globs: Vec<String>,

    #[serde(rename = "raw-copy", default, skip_serializing_if = "Vec::is_empty")]
    pub raw_copy_globs: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_init_hooks: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_init_hooks: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_update_hooks: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_update_hooks: Vec<String>,

    /// Set for a re-run; init-only files are then never written.
    #[serde(skip)]
    pub is_update: bool,
}

impl Template {
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn param_mut(&mut self, name: &str) -> Option<&mut Param> {
        self.params.iter_mut().find(|p| p.name == name)
    }

    /// Flat mapping of every param name to its resolved value, used as the
    /// rendering context for templated files.
    pub fn context(&self) -> serde_json::Value {
        let values = self
            .params
            .iter()
            .map(|p| (p.name.clone(), serde_json::Value::String(p.value.clone())))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(values)
    }

    /// Checks the structural invariants of a template.
    ///
    /// # Errors
    /// * `Error::ConfigError` if `directory` is empty, a param name is empty or
    ///   repeated, or a hook path is absolute
    pub fn check(&self) -> Result<()> {
        if self.directory.trim().is_empty() {
            return Err(Error::ConfigError("template directory must not be empty".into()));
        }
        let absolute = gather_hook_paths(self).into_iter().find(|h| Path::new(h).is_absolute());
        if let Some(hook) = absolute {
            return Err(Error::ConfigError(format!(
                "template '{}' references hook {} outside the repository",
                self.directory, hook
            )));
        }
        let mut seen = HashSet::new();
        for param in &self.params {
            if param.name.is_empty() {
                return Err(Error::ConfigError(format!(
                    "template '{}' has a parameter without a name",
                    self.directory
                )));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(Error::ConfigError(format!(
                    "template '{}' defines parameter '{}' more than once",
                    self.directory, param.name
                )));
            }
        }
        Ok(())
    }

    /// Like [`Template::check`], additionally requiring a repository URL.
    pub fn check_persisted(&self) -> Result<()> {
        if self.repository.trim().is_empty() {
            return Err(Error::ConfigError(format!(
                "template '{}' has no repository",
                self.directory
            )));
        }
        self.check()
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<Template>,
}

impl Config {
    /// Parses a configuration document.
    ///
    /// # Errors
    /// * `Error::Yaml` if the content is not a valid document
    /// * `Error::ConfigError` if it holds no templates or a template is malformed
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        if config.templates.is_empty() {
            return Err(Error::ConfigError("no templates found in config".into()));
        }
        for template in &config.templates {
            template.check()?;
        }
        Ok(config)
    }

    /// Loads the configuration file from the root of `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let config_path = dir.as_ref().join(CONFIG_FILE);
        debug!("Loading configuration from {}", config_path.display());
        let content = fs::read_to_string(&config_path).map_err(|e| {
            Error::ConfigError(format!("unable to read {}: {}", config_path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn to_yaml(&self) -> Result<String> {
        if self.templates.is_empty() {
            return Err(Error::ConfigError("unable to write empty config".into()));
        }
        Ok(serde_yaml::to_string(self)?)
    }

    /// Writes the configuration file into the root of `dir`.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let config_path = dir.as_ref().join(CONFIG_FILE);
        let content = self.to_yaml()?;
        debug!("Writing configuration to {}", config_path.display());
        fs::write(&config_path, content).map_err(Error::IoError)
    }

    /// Reads the single template persisted in a working repository.
    pub fn load_local<P: AsRef<Path>>(dir: P) -> Result<Template> {
        let config = Self::load(dir)?;
        if config.templates.len() > 1 {
            log::warn!(
                "Local configuration lists {} templates, using the first one",
                config.templates.len()
            );
        }
        let template = config.templates.into_iter().next().ok_or_else(|| {
            Error::ConfigError("no templates found in local config".into())
        })?;
        template.check_persisted()?;
        Ok(template)
    }

    /// Persists `template` as the only template of a working repository.
    pub fn save_local<P: AsRef<Path>>(template: &Template, dir: P) -> Result<()> {
        Config { templates: vec![template.clone()] }.save(dir)
    }

    /// Sorted directory names of all templates.
    pub fn directories(&self) -> Vec<String> {
        let mut dirs: Vec<String> =
            self.templates.iter().map(|t| t.directory.clone()).collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }

    fn find(&self, directory: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.directory == directory)
    }
}

/// Picks the template to operate on.
///
/// With `directory` set, the template with that directory is returned. A config
/// with a single template needs no choice. Otherwise the user is asked, up to
/// [`MAX_SELECT_ATTEMPTS`] times.
///
/// # Errors
/// * `Error::ConfigError` if the directory is unknown or no valid choice was made
pub fn select_template(
    config: &Config,
    directory: Option<&str>,
    prompt: &mut dyn Prompter,
) -> Result<Template> {
    if let Some(directory) = directory {
        return config.find(directory).cloned().ok_or_else(|| {
            Error::ConfigError(format!("template directory '{directory}' not found in config"))
        });
    }

    match config.templates.as_slice() {
        [] => Err(Error::ConfigError("no templates found in config".into())),
        [only] => Ok(only.clone()),
        _ => {
            let choices = config.directories();
            for _ in 0..MAX_SELECT_ATTEMPTS {
                let answer = prompt.choose("Please specify the template directory to use", &choices)?;
                if let Some(template) = config.find(answer.trim()) {
                    return Ok(template.clone());
                }
                log::warn!("'{}' is not one of the available templates", answer.trim());
            }
            Err(Error::ConfigError(format!(
                "no template selected after {MAX_SELECT_ATTEMPTS} attempts"
            )))
        }
    }
}
