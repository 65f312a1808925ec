//! Purpose: Safe session wrapper around the `libmetaltranslate` native engine.
//! Exports: `core` (platform resolution, native binding, sessions, errors).
//! Role: Library crate; loads the translation module at runtime and owns its sessions.
//! Invariants: All unsafe boundary code is confined to `core::engine`.
//! Invariants: A session handle is created and released at most once, in that order.
pub mod core;

pub use crate::core::config::{CreateSignature, EngineConfig, ModelVariant, SessionConfig};
pub use crate::core::engine::{Engine, SessionHandle, TranslateEngine, global_engine};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::platform::{ModuleReference, Platform, resolve, resolve_in};
pub use crate::core::translator::Translator;
