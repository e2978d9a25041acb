//! End-to-end submission flow against mock completion collaborators.

use std::sync::Mutex;

use futures_util::future::BoxFuture;
use gridchat_core::completion::{
    CompletionClient, CompletionError, CompletionRequest, CompletionResult,
};
use gridchat_core::core::column::{ColumnPatch, ColumnStatus, Role};
use gridchat_core::core::columns::ColumnSet;
use gridchat_core::core::submit::{self, SubmissionOutcome, SubmitError};
use gridchat_core::core::sync_input::SyncInput;

/// Replies with a fixed text, tagged with the requested model.
struct CannedClient {
    reply: &'static str,
}

impl CompletionClient for CannedClient {
    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, CompletionResult<String>> {
        let reply = format!("{} ({})", self.reply, request.model);
        Box::pin(async move { Ok(reply) })
    }
}

/// Always fails with the configured error.
struct FailingClient {
    error: CompletionError,
}

impl CompletionClient for FailingClient {
    fn complete(&self, _request: CompletionRequest) -> BoxFuture<'_, CompletionResult<String>> {
        let error = self.error.clone();
        Box::pin(async move { Err(error) })
    }
}

/// Records every request it receives and echoes the last user turn.
#[derive(Default)]
struct RecordingClient {
    requests: Mutex<Vec<CompletionRequest>>,
}

impl CompletionClient for RecordingClient {
    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, CompletionResult<String>> {
        let echo = request
            .history
            .last()
            .map(|message| format!("echo: {}", message.content))
            .unwrap_or_default();
        self.requests.lock().unwrap().push(request);
        Box::pin(async move { Ok(echo) })
    }
}

#[tokio::test]
async fn test_submit_round_trip() {
    let mut set = ColumnSet::new();
    let id = set.add_column("gpt-3.5-turbo");
    let mut inputs = SyncInput::new();
    let mut local = String::new();
    let client = CannedClient { reply: "hello!" };

    inputs.set_shared("hi there");
    let outcome = submit::submit(&mut set, &mut inputs, &client, id, &mut local)
        .await
        .unwrap();
    assert_eq!(outcome, SubmissionOutcome::Completed);

    let column = set.find(id).unwrap();
    assert_eq!(column.status(), ColumnStatus::Idle);
    assert_eq!(column.messages().len(), 2);
    assert_eq!(column.messages()[0].role, Role::User);
    assert_eq!(column.messages()[0].content, "hi there");
    assert_eq!(column.messages()[1].role, Role::Assistant);
    assert_eq!(column.messages()[1].content, "hello! (gpt-3.5-turbo)");
    // The consumed shared draft is cleared for every synced column.
    assert_eq!(inputs.shared(), "");
}

#[tokio::test]
async fn test_submit_works_through_dyn_client() {
    let mut set = ColumnSet::new();
    let id = set.add_column("gpt-4");
    let mut inputs = SyncInput::new();
    let mut local = String::new();
    let client: Box<dyn CompletionClient> = Box::new(CannedClient { reply: "boxed" });

    inputs.set_shared("hi");
    let outcome = submit::submit(&mut set, &mut inputs, client.as_ref(), id, &mut local)
        .await
        .unwrap();
    assert_eq!(outcome, SubmissionOutcome::Completed);
}

#[tokio::test]
async fn test_submit_failure_surfaces_error_and_column_recovers() {
    let mut set = ColumnSet::new();
    let id = set.add_column("gpt-3.5-turbo");
    let mut inputs = SyncInput::new();
    let mut local = String::new();

    inputs.set_shared("first try");
    let failing = FailingClient {
        error: CompletionError::Timeout,
    };
    let outcome = submit::submit(&mut set, &mut inputs, &failing, id, &mut local)
        .await
        .unwrap();
    assert_eq!(outcome, SubmissionOutcome::Failed(CompletionError::Timeout));

    // No assistant turn was appended, but the user turn stands and the
    // column is ready for another attempt (no automatic retry happened).
    let column = set.find(id).unwrap();
    assert_eq!(column.status(), ColumnStatus::Idle);
    assert_eq!(column.messages().len(), 1);

    inputs.set_shared("second try");
    let working = CannedClient { reply: "recovered" };
    let outcome = submit::submit(&mut set, &mut inputs, &working, id, &mut local)
        .await
        .unwrap();
    assert_eq!(outcome, SubmissionOutcome::Completed);
    assert_eq!(set.find(id).unwrap().messages().len(), 3);
}

#[tokio::test]
async fn test_submit_empty_input_leaves_everything_unchanged() {
    let mut set = ColumnSet::new();
    let id = set.add_column("gpt-3.5-turbo");
    let mut inputs = SyncInput::new();
    let mut local = String::new();
    let client = CannedClient { reply: "unused" };

    let result = submit::submit(&mut set, &mut inputs, &client, id, &mut local).await;
    assert_eq!(result, Err(SubmitError::EmptyMessage));
    assert!(set.find(id).unwrap().messages().is_empty());
}

#[tokio::test]
async fn test_shared_reset_skips_unsynced_columns() {
    let mut set = ColumnSet::new();
    let synced_a = set.add_column("gpt-3.5-turbo");
    let synced_b = set.add_column("claude-3-opus");
    let unsynced = set.add_column("gemini-pro");
    set.update_column(
        unsynced,
        ColumnPatch {
            sync_inputs: Some(false),
            ..ColumnPatch::default()
        },
    );

    let mut inputs = SyncInput::new();
    inputs.set_shared("same draft everywhere");
    let mut local_a = String::new();
    let mut local_unsynced = String::from("my own words");
    let client = CannedClient { reply: "ok" };

    let outcome = submit::submit(&mut set, &mut inputs, &client, synced_a, &mut local_a)
        .await
        .unwrap();
    assert_eq!(outcome, SubmissionOutcome::Completed);

    // Every synced column observes the cleared shared value...
    assert_eq!(inputs.shared(), "");
    let column_b = set.find(synced_b).unwrap();
    assert_eq!(inputs.resolve_for(column_b, "unused"), "");
    // ...while the unsynced column's local draft is untouched.
    let column_u = set.find(unsynced).unwrap();
    assert_eq!(inputs.resolve_for(column_u, &local_unsynced), "my own words");

    let outcome = submit::submit(&mut set, &mut inputs, &client, unsynced, &mut local_unsynced)
        .await
        .unwrap();
    assert_eq!(outcome, SubmissionOutcome::Completed);
    assert_eq!(local_unsynced, "");
    assert_eq!(
        set.find(unsynced).unwrap().messages()[0].content,
        "my own words"
    );
}

#[tokio::test]
async fn test_effective_request_reaches_the_collaborator() {
    let mut set = ColumnSet::new();
    let id = set.add_column("claude-3-opus");
    set.update_column(
        id,
        ColumnPatch {
            api_key: Some("sk-test-key".to_string()),
            system_prompt: Some("Answer briefly.".to_string()),
            temperature: Some(0.3),
            ..ColumnPatch::default()
        },
    );

    let mut inputs = SyncInput::new();
    let mut local = String::new();
    let client = RecordingClient::default();

    inputs.set_shared("first question");
    submit::submit(&mut set, &mut inputs, &client, id, &mut local)
        .await
        .unwrap();
    inputs.set_shared("second question");
    submit::submit(&mut set, &mut inputs, &client, id, &mut local)
        .await
        .unwrap();

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);

    let first = &requests[0];
    assert_eq!(first.model, "claude-3-opus");
    assert_eq!(first.api_key, "sk-test-key");
    assert_eq!(first.system_prompt.as_deref(), Some("Answer briefly."));
    assert_eq!(first.temperature, Some(0.3));
    // Claude accepts no penalties; they are absent, not zeroed.
    assert_eq!(first.frequency_penalty, None);
    assert_eq!(first.presence_penalty, None);
    assert_eq!(first.history.len(), 1);

    // The second request carries the full history: user, assistant, user.
    let second = &requests[1];
    assert_eq!(second.history.len(), 3);
    assert_eq!(second.history[0].content, "first question");
    assert_eq!(second.history[1].content, "echo: first question");
    assert_eq!(second.history[2].content, "second question");
}

#[tokio::test]
async fn test_in_flight_requests_on_two_columns_finish_out_of_order() {
    let mut set = ColumnSet::new();
    let a = set.add_column("gpt-3.5-turbo");
    let b = set.add_column("claude-3-opus");
    let mut inputs = SyncInput::new();
    let mut local = String::new();
    let client = CannedClient { reply: "done" };

    inputs.set_shared("for a");
    let pending_a = submit::begin_submission(&mut set, &mut inputs, a, &mut local)
        .unwrap()
        .unwrap();
    inputs.set_shared("for b");
    let pending_b = submit::begin_submission(&mut set, &mut inputs, b, &mut local)
        .unwrap()
        .unwrap();

    // Both columns are awaiting a response at once.
    assert_eq!(set.find(a).unwrap().status(), ColumnStatus::AwaitingResponse);
    assert_eq!(set.find(b).unwrap().status(), ColumnStatus::AwaitingResponse);

    let (result_a, result_b) = futures_util::join!(
        client.complete(pending_a.request),
        client.complete(pending_b.request)
    );

    // Apply b's result first; each column settles independently.
    submit::finish_submission(&mut set, b, result_b);
    assert_eq!(set.find(b).unwrap().status(), ColumnStatus::Idle);
    assert_eq!(set.find(a).unwrap().status(), ColumnStatus::AwaitingResponse);

    submit::finish_submission(&mut set, a, result_a);
    assert_eq!(
        set.find(a).unwrap().messages()[1].content,
        "done (gpt-3.5-turbo)"
    );
    assert_eq!(
        set.find(b).unwrap().messages()[1].content,
        "done (claude-3-opus)"
    );
}

#[tokio::test]
async fn test_late_response_for_removed_column_is_discarded() {
    let mut set = ColumnSet::new();
    let id = set.add_column("gpt-3.5-turbo");
    let mut inputs = SyncInput::new();
    let mut local = String::new();
    let client = CannedClient { reply: "too late" };

    inputs.set_shared("hello?");
    let pending = submit::begin_submission(&mut set, &mut inputs, id, &mut local)
        .unwrap()
        .unwrap();

    // The column goes away while the request is in flight. There is no
    // cancellation: the future still resolves.
    set.remove_column(id);
    let result = client.complete(pending.request).await;

    let outcome = submit::finish_submission(&mut set, id, result);
    assert_eq!(outcome, SubmissionOutcome::Discarded);
    assert!(set.is_empty());
}
