use std::io::{self, IsTerminal, Write};

use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

use medchat::chat::Role;
use medchat::controller::{ConversationController, SendOutcome};
use medchat::{ChatTransport, HttpChatClient};

use crate::args::CliArgs;
use crate::ui::PlainSink;

use super::drive::drive;

/// Question from `--prompt`, the positional argument, or piped stdin.
pub(super) async fn resolve_question(args: &CliArgs) -> anyhow::Result<Option<String>> {
    if let Some(question) = args.one_shot_question() {
        return Ok(Some(question));
    }
    if io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

pub(super) async fn ask_streaming(client: HttpChatClient, question: &str) -> anyhow::Result<()> {
    let mut sink = PlainSink::new(io::stdout());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = ConversationController::new(client).with_events(tx);
    let result = drive(controller.send_message(question), &mut rx, &mut sink).await?;
    sink.finish()?;
    match result {
        Ok(SendOutcome::Completed { assistant_id }) => {
            log::info!("reply {assistant_id} complete");
            Ok(())
        }
        Ok(SendOutcome::Ignored) => anyhow::bail!("question is empty"),
        Err(rollback) => anyhow::bail!("{}", rollback.error),
    }
}

/// Uses the endpoint that returns the whole updated history.
pub(super) async fn ask_once(client: HttpChatClient, question: &str) -> anyhow::Result<()> {
    let messages = client
        .send_message(question)
        .await
        .map_err(|err| anyhow::anyhow!("{}", err.describe_or("An error occurred")))?;
    let reply = messages
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
        .ok_or_else(|| anyhow::anyhow!("response contained no assistant reply"))?;
    let mut out = io::stdout();
    writeln!(out, "{}", reply.content)?;
    out.flush()?;
    Ok(())
}
