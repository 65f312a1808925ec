//! Purpose: Construction-time configuration that crosses the native boundary.
//! Exports: `ModelVariant`, `CreateSignature`, `EngineConfig`, `SessionConfig`.
//! Invariants: Variant integers are a stable native contract; never reordered.
//! Invariants: Model paths cross the boundary separator-terminated, exactly once.

use std::path::{self, PathBuf};

use serde::{Deserialize, Serialize};

/// Model family the native module should interpret the model path as.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    #[default]
    M2m,
    Bart,
    Nllb,
}

impl ModelVariant {
    /// Stable small-integer encoding passed to `create_metal_translate`.
    pub fn native_code(self) -> i32 {
        match self {
            ModelVariant::M2m => 1,
            ModelVariant::Bart => 2,
            ModelVariant::Nllb => 3,
        }
    }
}

/// Parameter list of the create entry point in the native module build.
///
/// The creation signature has grown across module revisions; the profile is
/// declared here and bound once, never guessed from arguments at a call site.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateSignature {
    /// `create_metal_translate(model_path)`
    Path,
    /// `create_metal_translate(model_path, model_variant)`
    PathVariant,
    /// `create_metal_translate(model_path, model_variant, max_tokens)`
    #[default]
    PathVariantTokens,
}

/// How to locate and bind the native module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Explicit module path; the platform locator table is used when unset.
    pub module_path: Option<PathBuf>,
    pub create_signature: CreateSignature,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.module_path = Some(path.into());
        self
    }

    pub fn with_create_signature(mut self, signature: CreateSignature) -> Self {
        self.create_signature = signature;
        self
    }
}

/// Per-session creation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub model_path: PathBuf,
    #[serde(default)]
    pub variant: ModelVariant,
    /// Token limit handed to the full-arity create call; `None` leaves the
    /// limit to the engine (encoded as 0 at the boundary).
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl SessionConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            variant: ModelVariant::default(),
            max_tokens: None,
        }
    }

    pub fn with_variant(mut self, variant: ModelVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Model path in the form the native module expects: terminated with the
    /// platform's separator, since the module concatenates file names onto it.
    pub fn normalized_model_path(&self) -> String {
        let mut rendered = self.model_path.to_string_lossy().into_owned();
        let terminated = rendered.chars().next_back().is_some_and(path::is_separator);
        if !terminated {
            rendered.push(path::MAIN_SEPARATOR);
        }
        rendered
    }
}
