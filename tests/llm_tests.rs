use safesheet::{
    config::LlmConfig,
    error::SafetyError,
    llm::{
        LlmProvider, MISSING_CREDENTIALS, ModelSelection, ProviderKind, candidate_providers,
        resolve_provider
    }
};

fn config() -> LlmConfig {
    LlmConfig::default()
}

#[test]
fn test_fallback_order() {
    let cfg = LlmConfig {
        anthropic_api_key: Some("sk-ant".into()),
        openai_api_key: Some("sk-oa".into()),
        deepseek_api_key: Some("sk-ds".into()),
        ..config()
    };

    let kinds: Vec<_> = candidate_providers(&cfg).iter().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![ProviderKind::DeepSeek, ProviderKind::Anthropic, ProviderKind::OpenAI]
    );
    assert_eq!(resolve_provider(&cfg).unwrap().kind(), ProviderKind::DeepSeek);
}

#[test]
fn test_first_available_wins() {
    let cfg = LlmConfig {
        openai_api_key: Some("sk-oa".into()),
        ..config()
    };
    let provider = resolve_provider(&cfg).unwrap();
    assert_eq!(provider.kind(), ProviderKind::OpenAI);
    assert_eq!(provider.model(), "gpt-4o");
}

#[test]
fn test_pinned_provider() {
    let cfg = LlmConfig {
        provider: Some("anthropic".into()),
        deepseek_api_key: Some("sk-ds".into()),
        anthropic_api_key: Some("sk-ant".into()),
        ..config()
    };
    assert_eq!(resolve_provider(&cfg).unwrap().kind(), ProviderKind::Anthropic);
}

#[test]
fn test_pinned_provider_without_key() {
    let cfg = LlmConfig {
        provider: Some("openai".into()),
        deepseek_api_key: Some("sk-ds".into()),
        ..config()
    };
    let err = resolve_provider(&cfg).unwrap_err();
    assert!(matches!(err, SafetyError::Configuration(_)));
    assert!(err.to_string().contains("OPENAI_API_KEY"));
}

#[test]
fn test_unknown_pinned_provider() {
    let cfg = LlmConfig {
        provider: Some("gemini".into()),
        ..config()
    };
    assert_eq!(resolve_provider(&cfg).unwrap_err().code(), "CONFIGURATION_ERROR");
}

#[test]
fn test_ollama_only_when_pinned() {
    assert!(candidate_providers(&config()).is_empty());

    let cfg = LlmConfig {
        provider: Some("ollama".into()),
        ..config()
    };
    let provider = resolve_provider(&cfg).unwrap();
    assert_eq!(
        provider,
        LlmProvider::Ollama {
            base_url: "http://localhost:11434".into(),
            model:    "llama3.2".into()
        }
    );
}

#[test]
fn test_missing_credentials() {
    let err = resolve_provider(&config()).unwrap_err();
    assert_eq!(err, SafetyError::Configuration(MISSING_CREDENTIALS.to_string()));
}

#[test]
fn test_deepseek_model_precedence() {
    let mut cfg = LlmConfig {
        deepseek_api_key: Some("sk-ds".into()),
        ..config()
    };
    assert_eq!(resolve_provider(&cfg).unwrap().model(), "deepseek-chat");

    cfg.deepseek_model = Some("deepseek-reasoner".into());
    assert_eq!(resolve_provider(&cfg).unwrap().model(), "deepseek-reasoner");

    cfg.model = Some("deepseek-v3".into());
    assert_eq!(resolve_provider(&cfg).unwrap().model(), "deepseek-v3");
}

#[test]
fn test_debug_hides_keys() {
    let cfg = LlmConfig {
        anthropic_api_key: Some("sk-ant-secret".into()),
        ..config()
    };
    let provider = resolve_provider(&cfg).unwrap();
    assert!(!format!("{:?}", provider).contains("sk-ant-secret"));
}

#[test]
fn test_selection_is_resolved_once() {
    let selection = ModelSelection::from_config(&config());
    assert!(!selection.is_ready());
    assert!(matches!(selection.model(), Err(SafetyError::Configuration(_))));

    let cfg = LlmConfig {
        deepseek_api_key: Some("sk-ds".into()),
        ..config()
    };
    let selection = ModelSelection::from_config(&cfg);
    assert!(selection.is_ready());
    assert_eq!(selection.model().unwrap().name(), "deepseek");
}

#[test]
fn test_provider_kind_metadata() {
    assert_eq!(ProviderKind::OpenAI.to_string(), "openai");
    assert_eq!(ProviderKind::Anthropic.key_variable(), Some("ANTHROPIC_API_KEY"));
    assert_eq!(ProviderKind::Ollama.key_variable(), None);
    assert_eq!("claude".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
}
