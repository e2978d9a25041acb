//! Submission orchestration.
//!
//! Drives the per-column submission state machine:
//!
//! ```text
//! Idle -> (validate input) -> AwaitingResponse -> Idle  [+ assistant turn]
//!                             AwaitingResponse -> Idle  [error surfaced]
//! ```
//!
//! Submissions on different columns may be in flight concurrently while every
//! mutation stays a plain `&mut` borrow, so the controller is a sync
//! begin/finish pair around the one suspension point (the completion call),
//! with [`submit`] as the async convenience wrapper for sequential callers.
//! There is no cancellation primitive: removing a column or resetting its
//! history does not abort an in-flight request, and a late response for a
//! removed column is discarded silently.

use std::fmt;

use crate::completion::{CompletionClient, CompletionError, CompletionRequest};
use crate::core::column::ColumnId;
use crate::core::columns::ColumnSet;
use crate::core::sync_input::SyncInput;

/// User-recoverable submission failures. Neither changes any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The resolved input is empty or whitespace-only.
    EmptyMessage,
    /// A response is already pending for this column; submissions are not
    /// queued.
    Busy,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyMessage => write!(f, "message is empty"),
            SubmitError::Busy => write!(f, "a response is already pending for this column"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// A submission whose user turn has been appended and whose completion call
/// is still to be awaited.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub column_id: ColumnId,
    pub request: CompletionRequest,
}

/// Terminal state of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The assistant turn was appended; the column is `Idle` again.
    Completed,
    /// The completion failed; the column is `Idle` again with nothing
    /// appended. The error is surfaced for display, never retried here.
    Failed(CompletionError),
    /// The column did not resolve in the set: it was absent at begin time,
    /// or removed while the request was in flight.
    Discarded,
}

/// Validates and opens a submission for one column.
///
/// Resolves the effective input (shared or local per the column's sync
/// flag), appends the user turn, transitions the column to
/// `AwaitingResponse`, and clears whichever draft was consumed. On
/// `EmptyMessage` or `Busy` nothing changes. An absent column id yields
/// `Ok(None)`.
pub fn begin_submission(
    set: &mut ColumnSet,
    inputs: &mut SyncInput,
    id: ColumnId,
    local_draft: &mut String,
) -> Result<Option<PendingSubmission>, SubmitError> {
    let Some(column) = set.find_mut(id) else {
        tracing::debug!(%id, "submission for unknown column ignored");
        return Ok(None);
    };

    let synced = column.sync_inputs();
    let text = inputs.resolve_for(&*column, local_draft).to_string();
    column.append_user_turn(&text)?;

    // Clear the consumed draft, matching the sync flag.
    if synced {
        inputs.consume_shared();
    } else {
        local_draft.clear();
    }

    let request = column.completion_request();
    tracing::debug!(%id, model = %request.model, "submission started");
    Ok(Some(PendingSubmission {
        column_id: id,
        request,
    }))
}

/// Closes a submission with the completion result.
///
/// On success the assistant turn is appended; on failure nothing is appended
/// and the error is surfaced in the outcome. Either way the column returns
/// to `Idle`. A response for a column that no longer resolves is discarded
/// silently.
pub fn finish_submission(
    set: &mut ColumnSet,
    id: ColumnId,
    result: Result<String, CompletionError>,
) -> SubmissionOutcome {
    let Some(column) = set.find_mut(id) else {
        tracing::warn!(%id, "late completion for removed column discarded");
        return SubmissionOutcome::Discarded;
    };

    match result {
        Ok(text) => {
            column.append_assistant_turn(text);
            tracing::debug!(%id, "submission completed");
            SubmissionOutcome::Completed
        }
        Err(error) => {
            column.mark_failed();
            tracing::debug!(%id, %error, "submission failed");
            SubmissionOutcome::Failed(error)
        }
    }
}

/// Runs one full submission: begin, await the completion collaborator,
/// finish.
///
/// Sequential convenience over [`begin_submission`]/[`finish_submission`];
/// callers juggling several in-flight columns drive the pair directly.
pub async fn submit<C>(
    set: &mut ColumnSet,
    inputs: &mut SyncInput,
    client: &C,
    id: ColumnId,
    local_draft: &mut String,
) -> Result<SubmissionOutcome, SubmitError>
where
    C: CompletionClient + ?Sized,
{
    let Some(pending) = begin_submission(set, inputs, id, local_draft)? else {
        return Ok(SubmissionOutcome::Discarded);
    };
    let result = client.complete(pending.request).await;
    Ok(finish_submission(set, id, result))
}
