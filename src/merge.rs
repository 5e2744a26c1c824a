//! Combining the upstream template definition with the locally persisted one.

use std::collections::HashMap;

use crate::config::{Param, Template};

/// Merges the repository template with the local template.
///
/// Structure and automation (directory, globs, hooks, the param list itself)
/// come from `repo`. The repository URL comes from `local`. A param keeps the
/// value stored locally only when that local param was prompted for; internal
/// values are always taken from `repo`.
pub fn merge(repo: &Template, local: &Template) -> Template {
    Template {
        repository: local.repository.clone(),
        directory: repo.directory.clone(),
        params: merge_params(&repo.params, &local.params),
        init_only_globs: repo.init_only_globs.clone(),
        raw_copy_globs: repo.raw_copy_globs.clone(),
        pre_init_hooks: repo.pre_init_hooks.clone(),
        post_init_hooks: repo.post_init_hooks.clone(),
        pre_update_hooks: repo.pre_update_hooks.clone(),
        post_update_hooks: repo.post_update_hooks.clone(),
        is_update: false,
    }
}

fn merge_params(repo_params: &[Param], local_params: &[Param]) -> Vec<Param> {
    // only values the user was asked for are carried forward
    let answered: HashMap<&str, &str> = local_params
        .iter()
        .filter(|p| !p.is_internal())
        .map(|p| (p.name.as_str(), p.value.as_str()))
        .collect();

    repo_params
        .iter()
        .map(|p| {
            let mut param = p.clone();
            if let Some(value) = answered.get(p.name.as_str()) {
                param.value = (*value).to_string();
            }
            param
        })
        .collect()
}
