//! Driving a single chat turn against a provider.

use futures::StreamExt;

use chatline_sse::Preview;
use chatline_types::{
    AccumulatedResponse, Assembled, ChatMessage, ChatRequest, Provider, RenderSink, StreamEvent,
    StreamIssue, Termination, TurnError,
};

use crate::store::ConversationStore;

/// Result of a streamed turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// The assistant message appended to the conversation.
    pub message: ChatMessage,
    /// The stream ended without a `[DONE]` sentinel.
    pub terminated_early: bool,
    /// Transport failure reported mid-stream, if any.
    pub interrupted: Option<String>,
    /// Content problems the assembler skipped over.
    pub issues: Vec<StreamIssue>,
}

/// Append the prompt and build the request for the full history.
fn begin_turn(
    store: &mut ConversationStore,
    id: &str,
    prompt: &str,
) -> Result<ChatRequest, TurnError> {
    let conversation = store.get_mut(id)?;
    conversation.push(ChatMessage::user(prompt));
    Ok(ChatRequest::new(conversation.messages.clone()))
}

/// Run one streamed turn in conversation `id`.
///
/// The user message is appended first and stays even if the request fails.
/// On a provider error nothing else is appended and the error is returned.
/// Otherwise `sink` receives a live render after every fragment and a final
/// render without the cursor, and the assistant reply, partial if the
/// stream was cut short, is appended and returned.
pub async fn send_streaming<P, K>(
    provider: &P,
    store: &mut ConversationStore,
    id: &str,
    prompt: &str,
    preview: &Preview,
    sink: &mut K,
) -> Result<TurnOutcome, TurnError>
where
    P: Provider,
    K: RenderSink + ?Sized,
{
    let request = begin_turn(store, id, prompt)?;
    tracing::debug!(conversation = id, messages = request.messages.len(), "starting streamed turn");

    let handle = provider.complete_stream(request).await?;
    let mut receiver = handle.receiver;

    let mut shown = AccumulatedResponse::default();
    let mut interrupted = None;
    let mut assembled: Option<Assembled> = None;

    while let Some(event) = receiver.next().await {
        match event {
            StreamEvent::Fragment(fragment) => {
                shown.apply(&fragment);
                sink.render(&preview.live(&shown));
            }
            StreamEvent::Error(message) => {
                tracing::warn!(conversation = id, error = %message, "stream interrupted");
                interrupted = Some(message);
            }
            StreamEvent::Complete(result) => {
                assembled = Some(result);
                break;
            }
        }
    }
    drop(receiver);

    // A provider that ends without `Complete` still leaves what was shown
    let assembled = assembled.unwrap_or_else(|| Assembled {
        response: shown,
        termination: Termination::EndOfInput,
        issues: Vec::new(),
    });

    sink.render(&preview.finished(&assembled.response));

    let message = assembled.to_message();
    store.get_mut(id)?.push(message.clone());

    if assembled.terminated_early() {
        tracing::info!(conversation = id, "kept partial reply from unfinished stream");
    }

    Ok(TurnOutcome {
        message,
        terminated_early: assembled.terminated_early(),
        interrupted,
        issues: assembled.issues,
    })
}

/// Run one non-streamed turn in conversation `id`.
///
/// Same bookkeeping as [`send_streaming`] without rendering.
pub async fn send<P>(
    provider: &P,
    store: &mut ConversationStore,
    id: &str,
    prompt: &str,
) -> Result<ChatMessage, TurnError>
where
    P: Provider,
{
    let request = begin_turn(store, id, prompt)?;
    tracing::debug!(conversation = id, messages = request.messages.len(), "starting turn");

    let response = provider.complete(request).await?;
    store.get_mut(id)?.push(response.message.clone());
    Ok(response.message)
}
