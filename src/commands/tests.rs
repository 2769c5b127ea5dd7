use super::*;
use crate::core::config::data::CommandConfig;
use crate::core::config::io::ConfigError;

fn custom(name: &str, template: &str) -> CommandConfig {
    CommandConfig {
        name: name.to_string(),
        help: None,
        template: template.to_string(),
    }
}

#[test]
fn plain_text_is_processed_as_message() {
    let registry = CommandRegistry::builtin();
    let input = "how tall is the condenser tower?";
    assert_eq!(
        process_input(&registry, input).unwrap(),
        CommandResult::ProcessAsMessage(input.to_string())
    );
}

#[test]
fn format_command_renders_argument() {
    let registry = CommandRegistry::builtin();
    match process_input(&registry, "/format hello").unwrap() {
        CommandResult::Prompt {
            name,
            text,
            document_id,
        } => {
            assert_eq!(name, "format");
            assert!(text.contains("hello"));
            assert_eq!(document_id.as_deref(), Some("hello"));
        }
        other => panic!("expected prompt, got {:?}", other),
    }
}

#[test]
fn command_names_match_case_insensitively() {
    let registry = CommandRegistry::builtin();
    assert!(matches!(
        process_input(&registry, "/SUMMARIZE plan.md").unwrap(),
        CommandResult::Prompt { ref name, .. } if name == "summarize"
    ));
}

#[test]
fn unknown_command_is_rejected() {
    let registry = CommandRegistry::builtin();
    match process_input(&registry, "/unknown anything") {
        Err(ChatError::UnknownCommand { name, suggestions }) => {
            assert_eq!(name, "unknown");
            assert!(suggestions.is_empty());
        }
        other => panic!("expected unknown command, got {:?}", other),
    }
}

#[test]
fn bare_slash_is_a_validation_error() {
    let registry = CommandRegistry::builtin();
    for input in ["/", "/   ", "  / format x"] {
        assert!(
            matches!(process_input(&registry, input), Err(ChatError::Validation(_))),
            "input {:?} should fail validation",
            input
        );
    }
}

#[test]
fn argument_is_the_trimmed_rest_of_the_line() {
    let invocation = parse_invocation("  /log   my log.txt  ").unwrap().unwrap();
    assert_eq!(invocation.name, "log");
    assert_eq!(invocation.args, "my log.txt");
    assert_eq!(invocation.input, "/log   my log.txt");
}

#[test]
fn mention_prefix_is_stripped_from_document_argument() {
    let registry = CommandRegistry::builtin();
    match process_input(&registry, "/summarize @plan.md").unwrap() {
        CommandResult::Prompt {
            document_id, text, ..
        } => {
            assert_eq!(document_id.as_deref(), Some("plan.md"));
            assert!(!text.contains("@plan.md"));
        }
        other => panic!("expected prompt, got {:?}", other),
    }
}

#[test]
fn local_commands_carry_their_arguments() {
    let registry = CommandRegistry::builtin();
    assert_eq!(
        process_input(&registry, "/log chat.txt").unwrap(),
        CommandResult::Local {
            command: LocalCommand::Log,
            args: "chat.txt".to_string()
        }
    );
    assert_eq!(
        process_input(&registry, "/docs").unwrap(),
        CommandResult::Local {
            command: LocalCommand::Docs,
            args: String::new()
        }
    );
}

#[test]
fn custom_commands_are_registered_and_rendered() {
    let registry =
        CommandRegistry::with_custom(&[custom("eli5", "Explain like I'm five: {arg}")]).unwrap();
    match process_input(&registry, "/eli5 black holes").unwrap() {
        CommandResult::Prompt {
            text, document_id, ..
        } => {
            assert_eq!(text, "Explain like I'm five: black holes");
            assert!(document_id.is_none());
        }
        other => panic!("expected prompt, got {:?}", other),
    }
}

#[test]
fn custom_commands_without_placeholder_fail_at_load() {
    match CommandRegistry::with_custom(&[custom("broken", "no slot")]) {
        Err(ConfigError::InvalidCommand { name, reason }) => {
            assert_eq!(name, "broken");
            assert!(reason.contains("{arg}"));
        }
        other => panic!("expected invalid command, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn custom_commands_cannot_shadow_builtins() {
    assert!(matches!(
        CommandRegistry::with_custom(&[custom("Format", "{arg}")]),
        Err(ConfigError::InvalidCommand { .. })
    ));
    assert!(matches!(
        CommandRegistry::with_custom(&[custom("two words", "{arg}")]),
        Err(ConfigError::InvalidCommand { .. })
    ));
}

#[test]
fn matching_commands_filters_by_prefix() {
    let registry = CommandRegistry::builtin();
    let names: Vec<&str> = registry
        .matching("s")
        .into_iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["summarize"]);
}

#[test]
fn unknown_prefix_suggests_matching_commands() {
    let registry = CommandRegistry::builtin();
    let err = process_input(&registry, "/sum plan.md").unwrap_err();
    assert!(matches!(
        err,
        ChatError::UnknownCommand { ref suggestions, .. } if suggestions == &["summarize"]
    ));
    assert_eq!(
        err.to_string(),
        "Unknown command: /sum. Did you mean /summarize?"
    );
}

#[test]
fn help_text_lists_every_command() {
    let registry = CommandRegistry::builtin();
    let help = registry.help_text();
    for name in ["help", "docs", "clear", "log", "format", "summarize"] {
        let command = registry.find(name).unwrap();
        assert!(help.contains(&command.usage()));
    }
    assert!(help.contains("/format <doc_id>"));
    assert!(help.contains("/log [filename]"));
}
