//! Purpose: Public session wrapper owning one native session handle.
//! Exports: `Translator`.
//! Role: Enforces the Uninitialized -> Active -> Released lifecycle.
//! Invariants: The native release entry point runs at most once per session.
//! Invariants: Outside the Active state, no boundary call is ever issued.
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::core::config::SessionConfig;
use crate::core::engine::{SessionHandle, TranslateEngine};
use crate::core::error::{Error, ErrorKind};

enum SessionState {
    Uninitialized,
    Active(SessionHandle),
    Released,
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Active(_) => "active",
            SessionState::Released => "released",
        }
    }
}

/// One translation session over a backend engine.
///
/// Owns exactly one session handle for its lifetime. Operations take
/// `&mut self`, so calls on a single instance cannot overlap; independent
/// instances own independent native resources and need no coordination.
pub struct Translator {
    engine: Arc<dyn TranslateEngine>,
    state: SessionState,
}

impl Translator {
    /// Open a session on `engine` for the configured model.
    ///
    /// On failure nothing is retained: the caller gets an error instead of
    /// an instance, so a dead session can never be used.
    pub fn create(engine: Arc<dyn TranslateEngine>, config: SessionConfig) -> Result<Self, Error> {
        let handle = engine.create_session(&config)?;
        Ok(Self {
            engine,
            state: SessionState::Active(handle),
        })
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn is_released(&self) -> bool {
        matches!(self.state, SessionState::Released)
    }

    /// Translate `text` from `source_lang` to `target_lang`.
    ///
    /// One synchronous boundary call; blocks the calling thread for its
    /// duration. The result is passed through verbatim, empty text included.
    pub fn translate(
        &mut self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, Error> {
        let session = match &self.state {
            SessionState::Active(session) => session,
            SessionState::Uninitialized => {
                return Err(Error::new(ErrorKind::InvalidState)
                    .with_message("no session was ever created"));
            }
            SessionState::Released => {
                return Err(Error::new(ErrorKind::UseAfterRelease)
                    .with_message("session already released"));
            }
        };
        self.engine.translate(session, text, source_lang, target_lang)
    }

    /// Release the native session.
    ///
    /// Only the first call on an Active instance reaches the native
    /// boundary; every later call (and a call on an instance that never
    /// became Active) is a no-op. The handle is invalidated even when the
    /// native release reports a failure.
    pub fn release(&mut self) -> Result<(), Error> {
        match std::mem::replace(&mut self.state, SessionState::Released) {
            SessionState::Active(session) => self.engine.release_session(session),
            SessionState::Uninitialized | SessionState::Released => Ok(()),
        }
    }
}

impl Drop for Translator {
    fn drop(&mut self) {
        if let SessionState::Active(session) =
            std::mem::replace(&mut self.state, SessionState::Released)
        {
            if let Err(err) = self.engine.release_session(session) {
                warn!(error = %err, "failed to release native session on drop");
            }
        }
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("state", &self.state.name())
            .finish()
    }
}
