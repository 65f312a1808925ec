use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The running platform has no native module build. Fatal at startup.
    UnsupportedPlatform,
    /// The resolved module could not be opened. Fatal for the engine.
    ModuleLoad,
    /// The module is missing a required entry point. Fatal for the engine.
    SymbolBinding,
    /// The create entry point produced no usable session handle.
    SessionCreation,
    /// Translate was called before a session handle existed.
    InvalidState,
    /// A substantive operation was attempted after release.
    UseAfterRelease,
    /// Opaque native-side failure surfaced through a boundary call.
    Native,
    /// Caller error on this side of the boundary (bad path, interior NUL).
    Usage,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    path: Option<PathBuf>,
    symbol: Option<String>,
    hint: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            path: None,
            symbol: None,
            hint: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(symbol) = &self.symbol {
            write!(f, " (symbol: {symbol})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn display_includes_optional_fields() {
        let err = Error::new(ErrorKind::SymbolBinding)
            .with_message("missing entry point")
            .with_path("/opt/engine/libmetaltranslate.so")
            .with_symbol("create_metal_translate");

        let rendered = err.to_string();
        assert_eq!(
            rendered,
            "SymbolBinding: missing entry point \
             (path: /opt/engine/libmetaltranslate.so) (symbol: create_metal_translate)"
        );
    }

    #[test]
    fn hint_is_carried_but_not_displayed() {
        let err = Error::new(ErrorKind::ModuleLoad)
            .with_message("failed to open module")
            .with_hint("Check that the native module is installed next to the binary.");

        assert!(err.hint().is_some());
        assert!(!err.to_string().contains("Check that"));
    }

    #[test]
    fn kind_and_accessors_round_trip() {
        let err = Error::new(ErrorKind::UseAfterRelease).with_message("session already released");
        assert_eq!(err.kind(), ErrorKind::UseAfterRelease);
        assert_eq!(err.message(), Some("session already released"));
        assert!(err.path().is_none());
        assert!(err.symbol().is_none());
    }
}
