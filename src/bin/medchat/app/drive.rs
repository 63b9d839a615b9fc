use std::future::Future;

use tokio::sync::mpsc;

use medchat::controller::ConversationEvent;

use crate::ui::EventSink;

/// Runs a controller operation while forwarding its events to `sink`.
///
/// Both sides share one task, so the event channel is drained while the
/// operation is pending and once more after it resolves.
pub(super) async fn drive<F, S>(
    operation: F,
    events: &mut mpsc::UnboundedReceiver<ConversationEvent>,
    sink: &mut S,
) -> anyhow::Result<F::Output>
where
    F: Future,
    S: EventSink,
{
    tokio::pin!(operation);
    let output = loop {
        tokio::select! {
            output = &mut operation => break output,
            Some(event) = events.recv() => sink.apply(&event)?,
        }
    };
    while let Ok(event) = events.try_recv() {
        sink.apply(&event)?;
    }
    Ok(output)
}
