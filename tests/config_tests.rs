use std::collections::HashMap;

use safesheet::config::Config;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.llm.provider.is_none());
    assert!(config.llm.deepseek_api_key.is_none());
    assert_eq!(config.llm.ollama_url.as_deref(), Some("http://localhost:11434"));
    assert!(config.llm.request_timeout_secs.is_none());
    assert!(config.analysis.include_rollback);
    assert!(config.analysis.include_dry_run);
}

#[test]
fn test_from_toml() {
    let config = Config::from_toml(
        r#"
        [llm]
        provider = "anthropic"
        anthropic_api_key = "sk-ant"
        request_timeout_secs = 30

        [analysis]
        include_dry_run = false
        "#
    )
    .unwrap();

    assert_eq!(config.llm.provider.as_deref(), Some("anthropic"));
    assert_eq!(config.llm.request_timeout_secs, Some(30));
    assert!(config.analysis.include_rollback);
    assert!(!config.analysis.include_dry_run);
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config.llm.ollama_url.as_deref(), Some("http://localhost:11434"));
    assert!(config.analysis.include_rollback);
}

#[test]
fn test_invalid_toml() {
    assert!(Config::from_toml("[llm\nprovider =").is_err());
}

#[test]
fn test_env_overrides_file() {
    let mut config = Config::from_toml("[llm]\nopenai_api_key = \"from-file\"").unwrap();
    config.apply_env(env(&[
        ("OPENAI_API_KEY", "from-env"),
        ("DEEPSEEK_API_KEY", "sk-ds"),
        ("DEEPSEEK_MODEL", "deepseek-reasoner"),
        ("LLM_PROVIDER", "deepseek")
    ]));

    assert_eq!(config.llm.openai_api_key.as_deref(), Some("from-env"));
    assert_eq!(config.llm.deepseek_api_key.as_deref(), Some("sk-ds"));
    assert_eq!(config.llm.deepseek_model.as_deref(), Some("deepseek-reasoner"));
    assert_eq!(config.llm.provider.as_deref(), Some("deepseek"));
}

#[test]
fn test_blank_env_values_ignored() {
    let mut config = Config::from_toml("[llm]\nanthropic_api_key = \"sk-ant\"").unwrap();
    config.apply_env(env(&[("ANTHROPIC_API_KEY", "  ")]));
    assert_eq!(config.llm.anthropic_api_key.as_deref(), Some("sk-ant"));
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[llm]\nmodel = \"gpt-4o-mini\"\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.llm.model.as_deref(), Some("gpt-4o-mini"));
    assert!(Config::from_file(&dir.path().join("missing.toml")).is_err());
}
