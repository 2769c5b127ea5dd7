//! Interactive line-oriented chat

use std::error::Error;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::auth::AuthManager;
use crate::core::app::{self, AppInitConfig};
use crate::core::config::Config;
use crate::core::session::{ChatSession, TurnOutcome};

const PROMPT: &str = "> ";

pub async fn run_chat(init: AppInitConfig, config: &Config) -> Result<(), Box<dyn Error>> {
    let auth_manager = AuthManager::new();
    let app = app::new_with_auth(init, config, &auth_manager)?;
    let mut session = app.new_session()?;

    println!("docchat: mention documents with @id, type /help for commands, /quit to leave.");
    if session.logging_status() != "disabled" {
        println!("Logging: {}", session.logging_status());
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    run_loop(&mut session, stdin, &mut out).await
}

/// Reads lines until EOF or `/quit`, printing each outcome to `out`.
pub async fn run_loop<R, W>(
    session: &mut ChatSession,
    input: R,
    out: &mut W,
) -> Result<(), Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        session.await_input();
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_quit(line) {
            break;
        }

        match session.handle_input(line).await {
            Ok(outcome) => print_outcome(out, &outcome)?,
            Err(err) => {
                debug!(error = %err, "Turn failed");
                print_warnings(out, &session.take_warnings())?;
                writeln!(out, "❌ {err}")?;
                if err.is_upstream() {
                    writeln!(out, "   Your message was kept in the conversation.")?;
                }
            }
        }
    }
    Ok(())
}

fn is_quit(line: &str) -> bool {
    line.eq_ignore_ascii_case("/quit") || line.eq_ignore_ascii_case("/exit")
}

pub fn print_warnings<W: Write>(out: &mut W, warnings: &[String]) -> std::io::Result<()> {
    for warning in warnings {
        writeln!(out, "⚠️  {warning}")?;
    }
    Ok(())
}

pub fn print_outcome<W: Write>(out: &mut W, outcome: &TurnOutcome) -> std::io::Result<()> {
    match outcome {
        TurnOutcome::Reply { reply, warnings } => {
            print_warnings(out, warnings)?;
            writeln!(out, "{}", reply.text.trim_end())?;
            if !reply.tool_calls.is_empty() {
                writeln!(
                    out,
                    "(model requested {} tool call(s); tool use is not supported)",
                    reply.tool_calls.len()
                )?;
            }
        }
        TurnOutcome::Local(text) => writeln!(out, "{}", text.trim_end())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_test_session, ScriptedClient};

    async fn drive(client: std::sync::Arc<ScriptedClient>, input: &str) -> (String, ChatSession) {
        let mut session = create_test_session(client);
        let mut out = Vec::new();
        run_loop(&mut session, input.as_bytes(), &mut out)
            .await
            .unwrap();
        (String::from_utf8(out).unwrap(), session)
    }

    #[tokio::test]
    async fn replies_are_printed_and_history_grows() {
        let client = ScriptedClient::replying(["Hello back", "Second"]);
        let (out, session) = drive(client.clone(), "hi\nagain\n").await;
        assert!(out.contains("Hello back"));
        assert!(out.contains("Second"));
        assert_eq!(session.turns().len(), 4);
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn quit_stops_before_later_lines() {
        let client = ScriptedClient::replying(["unused"]);
        let (_, session) = drive(client.clone(), "/quit\nhello\n").await;
        assert!(client.calls().is_empty());
        assert!(session.turns().is_empty());
    }

    #[tokio::test]
    async fn quit_ignores_case() {
        let client = ScriptedClient::replying(["unused"]);
        let (out, _) = drive(client.clone(), "/QUIT\nhello\n").await;
        assert!(client.calls().is_empty());
        assert!(!out.contains('❌'));

        drive(client.clone(), "/Exit\n").await;
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_turn_still_shows_mention_warnings() {
        let client = ScriptedClient::failing("API Error: boom");
        let (out, _) = drive(client, "read @ghost\n").await;
        let warning = out.find("⚠️  Unknown document reference: @ghost").unwrap();
        let error = out.find("❌ API Error: boom").unwrap();
        assert!(warning < error);
        assert!(out.contains("Your message was kept in the conversation."));
    }

    #[tokio::test]
    async fn errors_are_reported_and_the_loop_continues() {
        let client = ScriptedClient::replying(["after"]);
        let (out, _) = drive(client, "/nope\nok\n").await;
        assert!(out.contains("❌ Unknown command: /nope."));
        assert!(out.contains("after"));
    }

    #[tokio::test]
    async fn unknown_mentions_are_warned_about() {
        let client = ScriptedClient::replying(["fine"]);
        let (out, _) = drive(client, "read @ghost\n").await;
        assert!(out.contains("⚠️  Unknown document reference: @ghost"));
        assert!(out.contains("fine"));
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let client = ScriptedClient::replying(Vec::<String>::new());
        let (out, _) = drive(client.clone(), "\n   \n").await;
        assert!(client.calls().is_empty());
        assert!(!out.contains('❌'));
    }
}
