//! Column state: one independent chat session.
//!
//! A column binds a model configuration to an append-only message history and
//! a request lifecycle status. All mutation goes through the methods here so
//! the invariants hold: parameter values are clamped on assignment, history
//! only grows (outside an explicit reset), and status transitions follow
//! `Idle -> AwaitingResponse -> Idle`.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capabilities::{self, GenParam, GenerationParams};
use crate::completion::CompletionRequest;
use crate::core::submit::SubmitError;

/// Unique identity of a column.
///
/// Assigned at creation and never reused; removal shifts positions, so
/// columns are always addressed by id, never by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId(Uuid);

impl ColumnId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a column's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request lifecycle state for a column.
///
/// `AwaitingResponse` is the sole signal that a completion is pending; a
/// column in that state rejects new submissions until it returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnStatus {
    #[default]
    Idle,
    AwaitingResponse,
}

/// Partial update to a column's configuration.
///
/// Only fields that are `Some` are merged; everything else keeps its current
/// value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnPatch {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub system_prompt: Option<String>,
    pub sync_inputs: Option<bool>,
}

impl ColumnPatch {
    /// Returns the numeric parameter overrides carried by this patch.
    fn param_overrides(&self) -> [(GenParam, Option<f64>); 5] {
        [
            (GenParam::Temperature, self.temperature),
            (GenParam::MaxTokens, self.max_tokens.map(f64::from)),
            (GenParam::TopP, self.top_p),
            (GenParam::FrequencyPenalty, self.frequency_penalty),
            (GenParam::PresencePenalty, self.presence_penalty),
        ]
    }
}

/// One independent chat session.
#[derive(Clone, Serialize)]
pub struct Column {
    id: ColumnId,
    model: String,
    #[serde(skip_serializing)]
    api_key: String,
    #[serde(flatten)]
    params: GenerationParams,
    system_prompt: String,
    sync_inputs: bool,
    messages: Vec<Message>,
    status: ColumnStatus,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("params", &self.params)
            .field("system_prompt", &self.system_prompt)
            .field("sync_inputs", &self.sync_inputs)
            .field("messages", &self.messages)
            .field("status", &self.status)
            .finish()
    }
}

impl Column {
    /// Creates a column bound to `model` with a fresh id, the model's default
    /// parameter values, an empty history, and input sync enabled.
    pub fn new(model: impl Into<String>) -> Self {
        let model = model.into();
        let params = capabilities::defaults_for(&model);
        Self {
            id: ColumnId::generate(),
            model,
            api_key: String::new(),
            params,
            system_prompt: String::new(),
            sync_inputs: true,
            messages: Vec::new(),
            status: ColumnStatus::Idle,
        }
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn sync_inputs(&self) -> bool {
        self.sync_inputs
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn status(&self) -> ColumnStatus {
        self.status
    }

    /// Stores a parameter value, clamped to the current model's declared
    /// range. A parameter the model does not accept is left untouched.
    pub fn set_param(&mut self, param: GenParam, value: f64) {
        if let Some(range) = capabilities::spec_for(&self.model).param(param) {
            self.params.set(param, range.clamp(value));
        }
    }

    /// Merges a partial update into this column.
    ///
    /// When the patch switches the model, parameters newly supported by the
    /// new model pick up that model's defaults unless the same patch sets
    /// them explicitly; parameters the new model no longer accepts keep
    /// their stored value but drop out of effective requests. Numeric
    /// values are clamped against whichever model is selected after the
    /// switch.
    pub fn apply_patch(&mut self, patch: ColumnPatch) {
        let overrides = patch.param_overrides();

        if let Some(new_model) = patch.model {
            let old_spec = capabilities::spec_for(&self.model);
            let new_spec = capabilities::spec_for(&new_model);
            for param in GenParam::all() {
                let newly_supported = new_spec.supports(*param) && !old_spec.supports(*param);
                let patched_explicitly = overrides
                    .iter()
                    .any(|(p, value)| p == param && value.is_some());
                if newly_supported && !patched_explicitly {
                    if let Some(range) = new_spec.param(*param) {
                        self.params.set(*param, range.default);
                    }
                }
            }
            self.model = new_model;
        }

        for (param, value) in overrides {
            if let Some(value) = value {
                self.set_param(param, value);
            }
        }

        if let Some(api_key) = patch.api_key {
            self.api_key = api_key;
        }
        if let Some(system_prompt) = patch.system_prompt {
            self.system_prompt = system_prompt;
        }
        if let Some(sync_inputs) = patch.sync_inputs {
            self.sync_inputs = sync_inputs;
        }
    }

    /// Appends a user turn and transitions to `AwaitingResponse`.
    ///
    /// The content is trimmed before it is stored. Fails with `EmptyMessage`
    /// when nothing remains after trimming, and with `Busy` while a response
    /// is already pending; neither failure changes any state.
    pub fn append_user_turn(&mut self, content: &str) -> Result<(), SubmitError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(SubmitError::EmptyMessage);
        }
        if self.status == ColumnStatus::AwaitingResponse {
            return Err(SubmitError::Busy);
        }
        self.messages.push(Message::user(content));
        self.status = ColumnStatus::AwaitingResponse;
        Ok(())
    }

    /// Appends the assistant's reply and returns to `Idle`.
    pub fn append_assistant_turn(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
        self.status = ColumnStatus::Idle;
    }

    /// Returns to `Idle` after a failed completion. Nothing is appended.
    pub fn mark_failed(&mut self) {
        self.status = ColumnStatus::Idle;
    }

    /// Clears the message history.
    ///
    /// Allowed at any status. An in-flight request is not canceled; its
    /// response will still be appended when it arrives.
    pub fn reset_history(&mut self) {
        self.messages.clear();
    }

    /// Builds the effective request snapshot for this column.
    ///
    /// Only parameters the selected model accepts are present; the system
    /// prompt is included only when the model supports one and it is
    /// non-empty.
    pub fn completion_request(&self) -> CompletionRequest {
        let spec = capabilities::spec_for(&self.model);
        let system_prompt = (spec.supports_system_prompt && !self.system_prompt.is_empty())
            .then(|| self.system_prompt.clone());
        CompletionRequest {
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            system_prompt,
            temperature: spec
                .supports(GenParam::Temperature)
                .then_some(self.params.temperature),
            max_tokens: spec
                .supports(GenParam::MaxTokens)
                .then_some(self.params.max_tokens),
            top_p: spec.supports(GenParam::TopP).then_some(self.params.top_p),
            frequency_penalty: spec
                .supports(GenParam::FrequencyPenalty)
                .then_some(self.params.frequency_penalty),
            presence_penalty: spec
                .supports(GenParam::PresencePenalty)
                .then_some(self.params.presence_penalty),
            history: self.messages.clone(),
        }
    }

    /// Formats the column's history in a human-readable transcript form.
    pub fn format_transcript(&self) -> String {
        let mut output = String::new();
        for message in &self.messages {
            let role_label = match message.role {
                Role::User => "You",
                Role::Assistant => "Assistant",
            };
            output.push_str(&format!("### {role_label}\n"));
            output.push_str(&message.content);
            output.push_str("\n\n");
        }
        output.trim_end().to_string()
    }
}
