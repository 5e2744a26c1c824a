//! Parameter resolution: pre-supplied overrides, prompting and validation hooks.

use std::path::Path;

use log::debug;

use crate::config::{Param, Template};
use crate::error::{Error, Result};
use crate::hooks::run_validation_hook;
use crate::prompt::Prompter;

/// Parses a `name=value` pair as given on the command line.
pub fn parse_param_override(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

/// Sets the value of each named param before resolution.
///
/// # Errors
/// * `Error::ConfigError` if a name is not a param of `template` or names an
///   internal param
pub fn apply_overrides(template: &mut Template, overrides: &[(String, String)]) -> Result<()> {
    for (name, value) in overrides {
        let directory = template.directory.clone();
        let param = template.param_mut(name).ok_or_else(|| {
            Error::ConfigError(format!("template '{directory}' has no parameter '{name}'"))
        })?;
        if param.is_internal() {
            return Err(Error::ConfigError(format!(
                "parameter '{name}' of template '{directory}' is internal and cannot be set"
            )));
        }
        debug!("Setting '{}' from override", name);
        param.value = value.clone();
    }
    Ok(())
}

/// Resolves one param in place. Internal params are left untouched.
///
/// A param without a value is prompted for; a blank answer takes the default.
/// The settled value is then passed through the validation hook, if any.
pub fn resolve_param<P: AsRef<Path>>(
    param: &mut Param,
    repo_dir: P,
    prompt: &mut dyn Prompter,
) -> Result<()> {
    if param.is_internal() {
        return Ok(());
    }

    if param.value.is_empty() {
        param.value = prompt.input(&param.prompt, &param.default)?;
    }

    param.value = run_validation_hook(param, repo_dir)?;
    Ok(())
}

/// Resolves every param of `template` in list order, stopping at the first failure.
///
/// # Errors
/// * `Error::PromptError` if an answer cannot be read
/// * `Error::ResolutionError` if a validation hook rejects a value
pub fn resolve_all<P: AsRef<Path>>(
    template: &mut Template,
    repo_dir: P,
    prompt: &mut dyn Prompter,
) -> Result<()> {
    for param in template.params.iter_mut() {
        resolve_param(param, repo_dir.as_ref(), prompt)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_override() {
        assert_eq!(
            parse_param_override("name=acme"),
            Ok(("name".to_string(), "acme".to_string()))
        );
        assert_eq!(
            parse_param_override("url=https://x?a=b"),
            Ok(("url".to_string(), "https://x?a=b".to_string()))
        );
        assert_eq!(parse_param_override("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_param_override("novalue").is_err());
        assert!(parse_param_override("=value").is_err());
    }
}
