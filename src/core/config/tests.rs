use super::*;
use crate::core::document::Document;
use std::fs;
use tempfile::tempdir;

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_from_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.provider_id(), "anthropic");
    assert_eq!(config.max_tokens(), 8000);
    assert_eq!(config.temperature(), 1.0);
    assert_eq!(config.request_timeout_secs(), 120);
}

#[test]
fn documents_and_commands_parse_from_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
provider = "openai"
model = "gpt-4o"
system_prompt = "Be brief."

[[documents]]
id = "notes.md"
content = "Meeting notes"

[[commands]]
name = "eli5"
help = "Explain simply"
template = "Explain like I'm five: {arg}"
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.provider_id(), "openai");
    assert_eq!(config.model.as_deref(), Some("gpt-4o"));
    assert_eq!(config.system_prompt.as_deref(), Some("Be brief."));
    assert_eq!(
        config.documents,
        vec![Document::new("notes.md", "Meeting notes")]
    );
    assert_eq!(config.commands.len(), 1);
    assert_eq!(config.commands[0].help.as_deref(), Some("Explain simply"));
}

#[test]
fn invalid_custom_command_fails_at_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[[commands]]
name = "shout"
template = "SHOUT THIS"
"#,
    )
    .unwrap();

    match Config::load_from_path(&path) {
        Err(ConfigError::InvalidCommand { name, .. }) => assert_eq!(name, "shout"),
        other => panic!("expected invalid command, got {:?}", other),
    }

    fs::write(
        &path,
        "[[commands]]\nname = \"format\"\ntemplate = \"{arg}\"\n",
    )
    .unwrap();
    assert!(matches!(
        Config::load_from_path(&path),
        Err(ConfigError::InvalidCommand { .. })
    ));
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "model = [unterminated").unwrap();

    match Config::load_from_path(&path) {
        Err(err @ ConfigError::Parse { .. }) => {
            assert!(err.to_string().starts_with("Failed to parse config at "));
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn save_round_trips_through_nested_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set_value("model", "claude-sonnet".to_string()).unwrap();
    config.set_value("max-tokens", "1024".to_string()).unwrap();
    config.save_to_path(&path).unwrap();

    let loaded = Config::load_from_path(&path).unwrap();
    assert_eq!(loaded.model.as_deref(), Some("claude-sonnet"));
    assert_eq!(loaded.max_tokens(), 1024);
}

#[test]
fn set_value_validates_numbers_and_rejects_unknown_keys() {
    let mut config = Config::default();
    assert!(config.set_value("temperature", "warm".to_string()).is_err());
    assert_eq!(config.set_value("colour", "blue".to_string()), Ok(false));
    assert_eq!(config.set_value("temperature", "0.2".to_string()), Ok(true));
    assert_eq!(config.temperature(), 0.2);

    assert!(config.unset_value("temperature"));
    assert!(config.temperature.is_none());
    assert!(!config.unset_value("colour"));
}

#[test]
fn every_settable_key_can_be_set_and_unset() {
    let mut config = Config::default();
    for key in data::SETTABLE_KEYS {
        assert_eq!(config.set_value(key, "5".to_string()), Ok(true), "{key}");
        assert!(config.unset_value(key), "{key}");
    }
    assert_eq!(config, Config::default());
}
