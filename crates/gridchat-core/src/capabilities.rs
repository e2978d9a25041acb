//! Model capability registry.
//!
//! Static catalog mapping model identifiers to the generation parameters they
//! accept, with valid ranges and defaults. A parameter absent from a model's
//! entry is not accepted by that model at all; callers check applicability by
//! presence, never by probing values at runtime.
//!
//! Unknown model identifiers are not an error anywhere in this module: lookups
//! fall back to a conservative spec with no tunable parameters.

use serde::{Deserialize, Serialize};

/// Valid range and default value for one generation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ParamSpec {
    const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// Clamps a value into this parameter's valid range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Generation parameters a model may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenParam {
    Temperature,
    MaxTokens,
    TopP,
    FrequencyPenalty,
    PresencePenalty,
}

impl GenParam {
    /// Returns all generation parameters.
    pub fn all() -> &'static [GenParam] {
        &[
            GenParam::Temperature,
            GenParam::MaxTokens,
            GenParam::TopP,
            GenParam::FrequencyPenalty,
            GenParam::PresencePenalty,
        ]
    }

    /// Returns the string identifier used in requests and config files.
    pub fn id(&self) -> &'static str {
        match self {
            GenParam::Temperature => "temperature",
            GenParam::MaxTokens => "max_tokens",
            GenParam::TopP => "top_p",
            GenParam::FrequencyPenalty => "frequency_penalty",
            GenParam::PresencePenalty => "presence_penalty",
        }
    }
}

/// Capability record for one model.
///
/// `None` means the model does not accept that parameter; such parameters are
/// excluded from effective requests rather than sent with a neutral value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapabilitySpec {
    pub supports_system_prompt: bool,
    pub temperature: Option<ParamSpec>,
    pub max_tokens: Option<ParamSpec>,
    pub top_p: Option<ParamSpec>,
    pub frequency_penalty: Option<ParamSpec>,
    pub presence_penalty: Option<ParamSpec>,
}

impl CapabilitySpec {
    /// Returns the range spec for a parameter, if this model accepts it.
    pub fn param(&self, param: GenParam) -> Option<ParamSpec> {
        match param {
            GenParam::Temperature => self.temperature,
            GenParam::MaxTokens => self.max_tokens,
            GenParam::TopP => self.top_p,
            GenParam::FrequencyPenalty => self.frequency_penalty,
            GenParam::PresencePenalty => self.presence_penalty,
        }
    }

    /// Returns true if this model accepts the parameter.
    pub fn supports(&self, param: GenParam) -> bool {
        self.param(param).is_some()
    }
}

/// Stored generation parameter values for a column.
///
/// All five values are always stored; the capability spec of the currently
/// selected model decides which of them are effective in a request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

impl GenerationParams {
    /// Returns the stored value for a parameter as f64.
    pub fn get(&self, param: GenParam) -> f64 {
        match param {
            GenParam::Temperature => self.temperature,
            GenParam::MaxTokens => f64::from(self.max_tokens),
            GenParam::TopP => self.top_p,
            GenParam::FrequencyPenalty => self.frequency_penalty,
            GenParam::PresencePenalty => self.presence_penalty,
        }
    }

    /// Stores a value for a parameter. `MaxTokens` is rounded to whole tokens.
    pub fn set(&mut self, param: GenParam, value: f64) {
        match param {
            GenParam::Temperature => self.temperature = value,
            GenParam::MaxTokens => self.max_tokens = value.round().max(0.0) as u32,
            GenParam::TopP => self.top_p = value,
            GenParam::FrequencyPenalty => self.frequency_penalty = value,
            GenParam::PresencePenalty => self.presence_penalty = value,
        }
    }
}

// Shared range specs. OpenAI chat models share one parameter surface; the
// other families differ mostly in temperature ceiling and penalty support.
const OPENAI_TEMPERATURE: ParamSpec = ParamSpec::new(0.0, 2.0, 0.7);
const UNIT_TEMPERATURE: ParamSpec = ParamSpec::new(0.0, 1.0, 0.7);
const COHERE_TEMPERATURE: ParamSpec = ParamSpec::new(0.0, 5.0, 0.7);
const UNIT_TOP_P: ParamSpec = ParamSpec::new(0.0, 1.0, 1.0);
const PENALTY: ParamSpec = ParamSpec::new(-2.0, 2.0, 0.0);
const TOKENS_4K: ParamSpec = ParamSpec::new(1.0, 4096.0, 1000.0);
const TOKENS_8K: ParamSpec = ParamSpec::new(1.0, 8192.0, 1000.0);
const TOKENS_2K: ParamSpec = ParamSpec::new(1.0, 2048.0, 1000.0);

const OPENAI_CHAT: CapabilitySpec = CapabilitySpec {
    supports_system_prompt: true,
    temperature: Some(OPENAI_TEMPERATURE),
    max_tokens: Some(TOKENS_4K),
    top_p: Some(UNIT_TOP_P),
    frequency_penalty: Some(PENALTY),
    presence_penalty: Some(PENALTY),
};

// gpt-4 proper has the larger completion window.
const OPENAI_CHAT_8K: CapabilitySpec = CapabilitySpec {
    supports_system_prompt: true,
    temperature: Some(OPENAI_TEMPERATURE),
    max_tokens: Some(TOKENS_8K),
    top_p: Some(UNIT_TOP_P),
    frequency_penalty: Some(PENALTY),
    presence_penalty: Some(PENALTY),
};

const CLAUDE: CapabilitySpec = CapabilitySpec {
    supports_system_prompt: true,
    temperature: Some(UNIT_TEMPERATURE),
    max_tokens: Some(TOKENS_4K),
    top_p: Some(UNIT_TOP_P),
    frequency_penalty: None,
    presence_penalty: None,
};

const GEMINI: CapabilitySpec = CapabilitySpec {
    supports_system_prompt: false,
    temperature: Some(UNIT_TEMPERATURE),
    max_tokens: Some(TOKENS_2K),
    top_p: Some(UNIT_TOP_P),
    frequency_penalty: None,
    presence_penalty: None,
};

const MISTRAL: CapabilitySpec = CapabilitySpec {
    supports_system_prompt: true,
    temperature: Some(UNIT_TEMPERATURE),
    max_tokens: Some(TOKENS_4K),
    top_p: Some(UNIT_TOP_P),
    frequency_penalty: None,
    presence_penalty: None,
};

const LLAMA: CapabilitySpec = CapabilitySpec {
    supports_system_prompt: true,
    temperature: Some(UNIT_TEMPERATURE),
    max_tokens: Some(TOKENS_4K),
    top_p: Some(UNIT_TOP_P),
    frequency_penalty: None,
    presence_penalty: None,
};

const COHERE_COMMAND: CapabilitySpec = CapabilitySpec {
    supports_system_prompt: false,
    temperature: Some(COHERE_TEMPERATURE),
    max_tokens: Some(TOKENS_4K),
    top_p: None,
    frequency_penalty: None,
    presence_penalty: None,
};

/// Conservative spec for unrecognized models: no tunable parameters.
const FALLBACK: CapabilitySpec = CapabilitySpec {
    supports_system_prompt: false,
    temperature: None,
    max_tokens: None,
    top_p: None,
    frequency_penalty: None,
    presence_penalty: None,
};

/// The model catalog, in picker/display order.
static MODEL_CATALOG: &[(&str, CapabilitySpec)] = &[
    // OpenAI
    ("gpt-4-turbo-preview", OPENAI_CHAT),
    ("gpt-4", OPENAI_CHAT_8K),
    ("gpt-3.5-turbo", OPENAI_CHAT),
    // Anthropic
    ("claude-3-opus", CLAUDE),
    ("claude-3-sonnet", CLAUDE),
    ("claude-2.1", CLAUDE),
    ("claude-2", CLAUDE),
    ("claude-instant", CLAUDE),
    // Google
    ("gemini-pro", GEMINI),
    ("gemini-pro-vision", GEMINI),
    // Mistral
    ("mistral-tiny", MISTRAL),
    ("mistral-small", MISTRAL),
    ("mistral-medium", MISTRAL),
    // Meta
    ("llama-2-70b", LLAMA),
    ("llama-2-13b", LLAMA),
    ("llama-2-7b", LLAMA),
    // Cohere
    ("command", COHERE_COMMAND),
    ("command-light", COHERE_COMMAND),
    ("command-nightly", COHERE_COMMAND),
];

/// Looks up the capability spec for a model identifier.
pub fn lookup(model: &str) -> Option<&'static CapabilitySpec> {
    MODEL_CATALOG
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, spec)| spec)
}

/// Returns the capability spec for a model, falling back to a conservative
/// spec (no tunable parameters, no system prompt) for unrecognized models.
pub fn spec_for(model: &str) -> &'static CapabilitySpec {
    lookup(model).unwrap_or(&FALLBACK)
}

/// Clamps a parameter value to the model's declared range.
///
/// Returns the value unchanged when the model does not accept the parameter
/// (or is unknown); the caller decides separately whether to apply it.
pub fn clamp(model: &str, param: GenParam, value: f64) -> f64 {
    match spec_for(model).param(param) {
        Some(range) => range.clamp(value),
        None => value,
    }
}

/// Returns the default parameter values for a model.
///
/// Parameters the model accepts take their declared defaults; the rest keep
/// the catalog-wide baseline values.
pub fn defaults_for(model: &str) -> GenerationParams {
    let spec = spec_for(model);
    let mut params = GenerationParams::default();
    for param in GenParam::all() {
        if let Some(range) = spec.param(*param) {
            params.set(*param, range.default);
        }
    }
    params
}

/// Returns all registered model identifiers in catalog order.
pub fn models() -> Vec<&'static str> {
    MODEL_CATALOG.iter().map(|(name, _)| *name).collect()
}
