use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::stream;
use tokio::sync::mpsc;

use super::{ConversationController, ConversationEvent, SendOutcome};
use crate::chat::{Message, MessageId, Role, ServerMessage, TextStream};
use crate::client::ChatTransport;
use crate::error::ChatError;

/// Transport that replays scripted responses and records what it was asked.
#[derive(Default)]
struct ScriptedTransport {
    history: Vec<Message>,
    history_error: Option<String>,
    request_error: Option<String>,
    fragments: Vec<Result<String, String>>,
    clear_error: Option<String>,
    questions: Arc<Mutex<Vec<String>>>,
    clears: Arc<Mutex<usize>>,
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn get_messages(&self) -> Result<Vec<Message>, ChatError> {
        match &self.history_error {
            Some(err) => Err(ChatError::Generic(err.clone())),
            None => Ok(self.history.clone()),
        }
    }

    async fn send_message_stream(&self, question: &str) -> Result<TextStream, ChatError> {
        self.questions.lock().unwrap().push(question.to_string());
        if let Some(err) = &self.request_error {
            return Err(ChatError::Generic(err.clone()));
        }
        let items: Vec<Result<String, ChatError>> = self
            .fragments
            .iter()
            .cloned()
            .map(|item| item.map_err(ChatError::HttpError))
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }

    async fn clear_chat(&self) -> Result<(), ChatError> {
        *self.clears.lock().unwrap() += 1;
        match &self.clear_error {
            Some(err) => Err(ChatError::Generic(err.clone())),
            None => Ok(()),
        }
    }
}

fn fragments(parts: &[&str]) -> Vec<Result<String, String>> {
    parts.iter().map(|p| Ok(p.to_string())).collect()
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ConversationEvent>) -> Vec<ConversationEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_initial_load_populates_messages() {
    let record = ServerMessage {
        role: "user".into(),
        content: "Hi".into(),
        timestamp: Some("2024-01-01T00:00:00Z".into()),
        ..Default::default()
    };
    let transport = ScriptedTransport {
        history: vec![record.normalize().unwrap()],
        ..Default::default()
    };

    let controller = ConversationController::new(transport).start().await;

    let state = controller.state();
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].content, "Hi");
    assert_eq!(
        state.messages[0].timestamp,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert!(!state.is_loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_initial_load_failure_sets_error() {
    let transport = ScriptedTransport {
        history_error: Some("Failed to fetch messages".into()),
        ..Default::default()
    };

    let controller = ConversationController::new(transport).start().await;

    let state = controller.state();
    assert!(state.messages.is_empty());
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("Failed to fetch messages"));
}

#[tokio::test]
async fn test_initial_load_failure_without_description_uses_fallback() {
    let transport = ScriptedTransport {
        history_error: Some(String::new()),
        ..Default::default()
    };

    let controller = ConversationController::new(transport).start().await;

    assert_eq!(
        controller.state().error.as_deref(),
        Some("Failed to load messages")
    );
}

#[tokio::test]
async fn test_send_streams_reply_into_placeholder() {
    let transport = ScriptedTransport {
        fragments: fragments(&["Metformin ", "is a ", "biguanide."]),
        ..Default::default()
    };
    let questions = transport.questions.clone();
    let mut controller = ConversationController::new(transport).start().await;

    let outcome = controller.send_message("What is metformin?").await.unwrap();

    let state = controller.state();
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[0].role, Role::User);
    assert_eq!(state.messages[0].content, "What is metformin?");
    assert_eq!(state.messages[1].role, Role::Assistant);
    assert_eq!(state.messages[1].content, "Metformin is a biguanide.");
    assert!(!state.is_loading);
    assert!(state.error.is_none());
    assert_eq!(
        outcome,
        SendOutcome::Completed {
            assistant_id: state.messages[1].id.clone()
        }
    );
    assert_eq!(*questions.lock().unwrap(), vec!["What is metformin?"]);
}

#[tokio::test]
async fn test_send_appends_after_existing_history() {
    let transport = ScriptedTransport {
        history: vec![Message::user("earlier"), Message::new(Role::Assistant, "reply")],
        fragments: fragments(&["ok"]),
        ..Default::default()
    };
    let mut controller = ConversationController::new(transport).start().await;

    controller.send_message("next").await.unwrap();

    let contents: Vec<&str> = controller
        .state()
        .messages
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(contents, vec!["earlier", "reply", "next", "ok"]);
}

#[tokio::test]
async fn test_whitespace_input_is_ignored() {
    let transport = ScriptedTransport::default();
    let questions = transport.questions.clone();
    let mut controller = ConversationController::new(transport).start().await;

    for input in ["", "   ", "\n\t "] {
        let outcome = controller.send_message(input).await.unwrap();
        assert_eq!(outcome, SendOutcome::Ignored);
    }

    assert!(controller.state().messages.is_empty());
    assert!(!controller.state().is_loading);
    assert!(questions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_failure_rolls_back_placeholder() {
    let transport = ScriptedTransport {
        request_error: Some("upstream timeout".into()),
        ..Default::default()
    };
    let mut controller = ConversationController::new(transport).start().await;
    let before = controller.state().messages.len();

    let rollback = controller.send_message("x").await.unwrap_err();

    let state = controller.state();
    assert_eq!(state.messages.len(), before + 1);
    assert_eq!(state.messages[0].role, Role::User);
    assert_eq!(state.messages[0].content, "x");
    assert_eq!(state.error.as_deref(), Some("upstream timeout"));
    assert!(!state.is_loading);
    assert_eq!(rollback.error, "upstream timeout");
    assert_eq!(rollback.placeholder.unwrap().role, Role::Assistant);
}

#[tokio::test]
async fn test_mid_stream_failure_discards_partial_reply() {
    let transport = ScriptedTransport {
        fragments: vec![Ok("Partial ".into()), Err("connection reset".into())],
        ..Default::default()
    };
    let mut controller = ConversationController::new(transport).start().await;

    let rollback = controller.send_message("Explain asthma").await.unwrap_err();

    let state = controller.state();
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].content, "Explain asthma");
    assert_eq!(state.error.as_deref(), Some("connection reset"));
    assert_eq!(rollback.placeholder.unwrap().content, "Partial ");
}

#[tokio::test]
async fn test_failure_without_description_uses_fallback() {
    let transport = ScriptedTransport {
        request_error: Some("  ".into()),
        ..Default::default()
    };
    let mut controller = ConversationController::new(transport).start().await;

    let rollback = controller.send_message("x").await.unwrap_err();

    assert_eq!(rollback.error, "An error occurred");
    assert_eq!(controller.state().error.as_deref(), Some("An error occurred"));
}

#[tokio::test]
async fn test_next_send_clears_previous_error() {
    let transport = ScriptedTransport {
        history_error: Some("down".into()),
        fragments: fragments(&["fine"]),
        ..Default::default()
    };
    let mut controller = ConversationController::new(transport).start().await;
    assert!(controller.state().error.is_some());

    controller.send_message("retry").await.unwrap();

    assert!(controller.state().error.is_none());
}

#[tokio::test]
async fn test_clear_empties_messages() {
    let transport = ScriptedTransport {
        history: vec![Message::user("a"), Message::new(Role::Assistant, "b")],
        ..Default::default()
    };
    let clears = transport.clears.clone();
    let mut controller = ConversationController::new(transport).start().await;

    controller.clear_messages().await.unwrap();

    let state = controller.state();
    assert!(state.messages.is_empty());
    assert!(!state.is_loading);
    assert!(state.error.is_none());
    assert_eq!(*clears.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_clear_failure_keeps_messages() {
    let transport = ScriptedTransport {
        history: vec![Message::user("a")],
        clear_error: Some(String::new()),
        ..Default::default()
    };
    let mut controller = ConversationController::new(transport).start().await;

    let err = controller.clear_messages().await.unwrap_err();

    assert_eq!(err, "Failed to clear chat");
    let state = controller.state();
    assert_eq!(state.messages.len(), 1);
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("Failed to clear chat"));
}

#[tokio::test]
async fn test_events_follow_optimistic_then_fill_order() {
    let transport = ScriptedTransport {
        fragments: fragments(&["a", "b"]),
        ..Default::default()
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = ConversationController::new(transport)
        .with_events(tx)
        .start()
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![
            ConversationEvent::LoadingChanged(true),
            ConversationEvent::HistoryLoaded(Vec::new()),
            ConversationEvent::LoadingChanged(false),
        ]
    );

    controller.send_message("q").await.unwrap();

    let events = drain(&mut rx);
    let reply_id: MessageId = controller.state().messages[1].id.clone();
    assert_eq!(events.len(), 6);
    assert!(matches!(&events[0], ConversationEvent::MessageAdded(m) if m.role == Role::User));
    assert!(matches!(&events[1], ConversationEvent::MessageAdded(m) if m.id == reply_id));
    assert_eq!(events[2], ConversationEvent::LoadingChanged(true));
    assert_eq!(
        events[3],
        ConversationEvent::ChunkAppended {
            id: reply_id.clone(),
            fragment: "a".into()
        }
    );
    assert_eq!(
        events[4],
        ConversationEvent::ChunkAppended {
            id: reply_id,
            fragment: "b".into()
        }
    );
    assert_eq!(events[5], ConversationEvent::LoadingChanged(false));
}

#[tokio::test]
async fn test_events_on_rollback() {
    let transport = ScriptedTransport {
        request_error: Some("boom".into()),
        ..Default::default()
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = ConversationController::new(transport)
        .with_events(tx)
        .start()
        .await;
    drain(&mut rx);

    let rollback = controller.send_message("q").await.unwrap_err();

    let events = drain(&mut rx);
    let removed = rollback.placeholder.unwrap().id;
    assert_eq!(
        &events[3..],
        &[
            ConversationEvent::MessageRemoved(removed),
            ConversationEvent::LoadingChanged(false),
            ConversationEvent::Failed("boom".into()),
        ]
    );
}

#[tokio::test]
async fn test_dropped_event_receiver_is_harmless() {
    let transport = ScriptedTransport {
        fragments: fragments(&["still works"]),
        ..Default::default()
    };
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let mut controller = ConversationController::new(transport)
        .with_events(tx)
        .start()
        .await;

    controller.send_message("q").await.unwrap();

    assert_eq!(controller.state().messages[1].content, "still works");
}

#[tokio::test]
async fn test_long_reply_completes_before_events_are_drained() {
    let parts: Vec<String> = (0..500).map(|i| format!("chunk {i} ")).collect();
    let transport = ScriptedTransport {
        fragments: parts.iter().cloned().map(Ok).collect(),
        ..Default::default()
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = ConversationController::new(transport).with_events(tx);

    let outcome = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        controller.send_message("Summarize the guideline"),
    )
    .await
    .expect("send stalled on undrained events")
    .unwrap();

    let SendOutcome::Completed { assistant_id } = outcome else {
        panic!("expected a completed send");
    };
    let reply = controller.state().message(&assistant_id).unwrap();
    assert_eq!(reply.content, parts.concat());
    assert_eq!(controller.state().last_message(), Some(reply));
    let appended = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, ConversationEvent::ChunkAppended { .. }))
        .count();
    assert_eq!(appended, parts.len());
}

mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn final_reply_is_concatenation_of_fragments(parts in proptest::collection::vec("\\PC{0,12}", 0..8)) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let transport = ScriptedTransport {
                fragments: parts.iter().cloned().map(Ok).collect(),
                ..Default::default()
            };
            let content = runtime.block_on(async {
                let mut controller = ConversationController::new(transport).start().await;
                controller.send_message("q").await.unwrap();
                controller.state().messages[1].content.clone()
            });
            prop_assert_eq!(content, parts.concat());
        }
    }
}
