use stenciler::config::{select_template, Config, Param, Template, CONFIG_FILE};
use stenciler::error::Error;
use stenciler::prompt::LinePrompter;
use std::io::Cursor;
use tempfile::TempDir;

const UPSTREAM: &str = r#"
templates:
  - repository: https://github.com/owner/templates.git
    directory: service
    params:
      - name: name
        prompt: Project name
        default: acme
        validation-hook: hooks/validate-name.sh
      - name: year
        value: "2024"
    init-only:
      - VERSION
    raw-copy:
      - "**/*.png"
    pre-init-hooks:
      - hooks/pre-init.sh
    post-init-hooks:
      - hooks/post-init.sh
    pre-update-hooks:
      - hooks/pre-update.sh
    post-update-hooks:
      - hooks/post-update.sh
  - directory: library
"#;

fn prompter(input: &str) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
    LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

#[test]
fn test_parse_all_keys() {
    let config = Config::parse(UPSTREAM).unwrap();
    assert_eq!(config.templates.len(), 2);

    let service = &config.templates[0];
    assert_eq!(service.repository, "https://github.com/owner/templates.git");
    assert_eq!(service.directory, "service");
    assert_eq!(
        service.params[0],
        Param {
            name: "name".into(),
            prompt: "Project name".into(),
            default: "acme".into(),
            validation_hook: "hooks/validate-name.sh".into(),
            value: String::new(),
        }
    );
    assert_eq!(service.params[1].value, "2024");
    assert!(service.params[1].is_internal());
    assert_eq!(service.init_only_globs, vec!["VERSION"]);
    assert_eq!(service.raw_copy_globs, vec!["**/*.png"]);
    assert_eq!(service.pre_init_hooks, vec!["hooks/pre-init.sh"]);
    assert_eq!(service.post_init_hooks, vec!["hooks/post-init.sh"]);
    assert_eq!(service.pre_update_hooks, vec!["hooks/pre-update.sh"]);
    assert_eq!(service.post_update_hooks, vec!["hooks/post-update.sh"]);
    assert!(!service.is_update);

    let library = &config.templates[1];
    assert!(library.repository.is_empty());
    assert!(library.params.is_empty());
}

#[test]
fn test_parse_rejects_empty_template_list() {
    assert!(matches!(Config::parse("templates: []\n"), Err(Error::ConfigError(_))));
    assert!(matches!(Config::parse("{}\n"), Err(Error::ConfigError(_))));
}

#[test]
fn test_parse_rejects_invalid_yaml() {
    assert!(matches!(Config::parse("templates: [: :"), Err(Error::Yaml(_))));
}

#[test]
fn test_parse_rejects_duplicate_params() {
    let content = r#"
templates:
  - directory: root
    params:
      - name: foo
      - name: foo
"#;
    let err = Config::parse(content).unwrap_err();
    assert!(err.to_string().contains("'foo' more than once"));
}

#[test]
fn test_parse_rejects_empty_directory() {
    let content = "templates:\n  - repository: https://example.com/t.git\n    directory: \"\"\n";
    assert!(matches!(Config::parse(content), Err(Error::ConfigError(_))));
}

#[test]
fn test_write_empty_config_fails() {
    let err = Config::default().to_yaml().unwrap_err();
    assert!(err.to_string().contains("unable to write empty config"));
}

#[test]
fn test_save_and_load_local() {
    let temp_dir = TempDir::new().unwrap();
    let template = Template {
        repository: "https://github.com/owner/templates.git".into(),
        directory: "service".into(),
        params: vec![Param {
            name: "name".into(),
            prompt: "Project name".into(),
            value: "acme".into(),
            ..Default::default()
        }],
        init_only_globs: vec!["VERSION".into()],
        ..Default::default()
    };

    Config::save_local(&template, temp_dir.path()).unwrap();
    assert!(temp_dir.path().join(CONFIG_FILE).is_file());

    let loaded = Config::load_local(temp_dir.path()).unwrap();
    assert_eq!(loaded, template);

    let written = std::fs::read_to_string(temp_dir.path().join(CONFIG_FILE)).unwrap();
    assert!(written.contains("init-only"));
    assert!(!written.contains("raw-copy"));
}

#[test]
fn test_load_local_requires_repository() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(CONFIG_FILE), "templates:\n  - directory: root\n").unwrap();
    let err = Config::load_local(temp_dir.path()).unwrap_err();
    assert!(err.to_string().contains("has no repository"));
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    assert!(matches!(Config::load(temp_dir.path()), Err(Error::ConfigError(_))));
}

#[test]
fn test_select_by_directory() {
    let config = Config::parse(UPSTREAM).unwrap();
    let mut prompt = prompter("");
    let template = select_template(&config, Some("library"), &mut prompt).unwrap();
    assert_eq!(template.directory, "library");

    let err = select_template(&config, Some("missing"), &mut prompt).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_select_single_template_without_prompt() {
    let config = Config::parse("templates:\n  - directory: only\n").unwrap();
    let mut prompt = prompter("");
    let template = select_template(&config, None, &mut prompt).unwrap();
    assert_eq!(template.directory, "only");
    assert!(prompt.into_writer().is_empty());
}

#[test]
fn test_select_prompts_until_valid() {
    let config = Config::parse(UPSTREAM).unwrap();
    let mut prompt = prompter("nope\nservice\n");
    let template = select_template(&config, None, &mut prompt).unwrap();
    assert_eq!(template.directory, "service");

    let out = String::from_utf8(prompt.into_writer()).unwrap();
    assert_eq!(out.matches("Available templates:").count(), 2);
    assert!(out.contains(">  library\n>  service\n"));
}

#[test]
fn test_select_gives_up_after_bounded_attempts() {
    let config = Config::parse(UPSTREAM).unwrap();
    let mut prompt = prompter("a\nb\nc\nservice\n");
    let err = select_template(&config, None, &mut prompt).unwrap_err();
    assert!(err.to_string().contains("no template selected"));
}

#[test]
fn test_parse_rejects_absolute_hook_path() {
    let yaml = "templates:\n  - directory: root\n    post-init-hooks:\n      - /tmp/outside.sh\n";
    let err = Config::parse(yaml).unwrap_err();
    assert!(matches!(err, Error::ConfigError(ref msg) if msg.contains("/tmp/outside.sh")));

    let yaml = "templates:\n  - directory: root\n    params:\n      - name: a\n        prompt: A\n        validation-hook: /bin/check.sh\n";
    assert!(matches!(Config::parse(yaml), Err(Error::ConfigError(_))));
}
