//! Hook scripts: existence checks, validation hooks and pre/post hooks.
//! Every hook is run as `sh <script> [args...]` with its path relative to the
//! root of the template repository.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Stdio};

use cruet::Inflector;
use log::{debug, info};

use crate::config::{Param, Template};
use crate::error::{Error, Result};

/// Prefix of the environment variables exposing param values to hooks.
pub const ENV_PREFIX: &str = "STENCILER_";

/// The four lifecycle points at which hook lists run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookClass {
    PreInit,
    PostInit,
    PreUpdate,
    PostUpdate,
}

impl std::fmt::Display for HookClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HookClass::PreInit => "pre-init",
            HookClass::PostInit => "post-init",
            HookClass::PreUpdate => "pre-update",
            HookClass::PostUpdate => "post-update",
        };
        f.write_str(name)
    }
}

impl HookClass {
    pub const ALL: [HookClass; 4] =
        [HookClass::PreInit, HookClass::PostInit, HookClass::PreUpdate, HookClass::PostUpdate];

    /// The ordered hook list of `template` for this class.
    pub fn hooks<'a>(&self, template: &'a Template) -> &'a [String] {
        match self {
            HookClass::PreInit => &template.pre_init_hooks,
            HookClass::PostInit => &template.post_init_hooks,
            HookClass::PreUpdate => &template.pre_update_hooks,
            HookClass::PostUpdate => &template.post_update_hooks,
        }
    }
}

/// Every hook path referenced by `template`: validation hooks first, then
/// pre-init, post-init, pre-update and post-update hooks.
pub fn gather_hook_paths(template: &Template) -> Vec<&str> {
    template
        .params
        .iter()
        .filter(|p| !p.validation_hook.is_empty())
        .map(|p| p.validation_hook.as_str())
        .chain(
            HookClass::ALL
                .iter()
                .flat_map(|class| class.hooks(template).iter().map(String::as_str)),
        )
        .collect()
}

fn check_hook(repo_dir: &Path, hook: &str) -> Option<String> {
    let path = repo_dir.join(hook);
    let Ok(metadata) = fs::metadata(&path) else {
        return Some(format!("hook {hook} does not exist"));
    };
    if !metadata.is_file() || metadata.permissions().mode() & 0o111 == 0 {
        return Some(format!("hook {hook} is not executable"));
    }
    None
}

/// Confirms that every hook referenced by `template` exists below `repo_dir`,
/// is a regular file and has an executable bit set.
///
/// # Errors
/// * `Error::HookValidationError` listing every violation found
pub fn validate_hooks<P: AsRef<Path>>(template: &Template, repo_dir: P) -> Result<()> {
    let repo_dir = repo_dir.as_ref();
    let violations: Vec<String> = gather_hook_paths(template)
        .into_iter()
        .filter_map(|hook| check_hook(repo_dir, hook))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::HookValidationError { violations })
    }
}

/// Name of the environment variable carrying the value of `param_name`,
/// e.g. `project-name` becomes `STENCILER_PROJECT_NAME`.
pub fn env_var_name(param_name: &str) -> String {
    format!("{}{}", ENV_PREFIX, param_name.to_screaming_snake_case())
}

/// Runs the validation hook of `param` and returns the value it prints.
///
/// The hook gets the param name and current value as arguments. Its stdout,
/// with trailing whitespace removed, becomes the new value; stderr is passed
/// through. A param without a validation hook keeps its value.
///
/// # Errors
/// * `Error::ResolutionError` if the hook cannot be started or exits non-zero
pub fn run_validation_hook<P: AsRef<Path>>(param: &Param, repo_dir: P) -> Result<String> {
    if param.validation_hook.is_empty() {
        return Ok(param.value.clone());
    }

    let hook = repo_dir.as_ref().join(&param.validation_hook);
    debug!("Running validation hook {} for '{}'", hook.display(), param.name);
    let output = Command::new("sh")
        .arg(&hook)
        .arg(&param.name)
        .arg(&param.value)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| Error::ResolutionError {
            name: param.name.clone(),
            reason: format!("failed to execute validation hook {}: {}", param.validation_hook, e),
        })?;

    if !output.status.success() {
        return Err(Error::ResolutionError {
            name: param.name.clone(),
            reason: format!(
                "validation hook {} rejected value '{}' ({})",
                param.validation_hook, param.value, output.status
            ),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// Runs the hooks of `class` in order, stopping at the first failure.
///
/// Each hook inherits the current environment and working directory, plus
/// one `STENCILER_<NAME>` variable per param.
///
/// # Errors
/// * `Error::HookExecutionError` for the first hook that cannot run or exits non-zero
pub fn run_hooks<P: AsRef<Path>>(template: &Template, repo_dir: P, class: HookClass) -> Result<()> {
    let hooks = class.hooks(template);
    if hooks.is_empty() {
        return Ok(());
    }

    let envs: Vec<(String, &str)> = template
        .params
        .iter()
        .map(|p| (env_var_name(&p.name), p.value.as_str()))
        .collect();

    info!("Running {} {} hook(s)", hooks.len(), class);
    for hook in hooks {
        let path = repo_dir.as_ref().join(hook);
        debug!("Running {} hook {}", class, path.display());
        let status = Command::new("sh")
            .arg(&path)
            .envs(envs.iter().map(|(k, v)| (k.as_str(), *v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::HookExecutionError { hook: hook.clone(), status: e.to_string() })?;

        if !status.success() {
            return Err(Error::HookExecutionError { hook: hook.clone(), status: status.to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("name"), "STENCILER_NAME");
        assert_eq!(env_var_name("projectName"), "STENCILER_PROJECT_NAME");
        assert_eq!(env_var_name("project-name"), "STENCILER_PROJECT_NAME");
    }

    #[test]
    fn test_hook_class_display() {
        assert_eq!(HookClass::PreInit.to_string(), "pre-init");
        assert_eq!(HookClass::PostUpdate.to_string(), "post-update");
    }
}
