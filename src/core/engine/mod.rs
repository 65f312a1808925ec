//! Purpose: Binding table and call marshalling for the native translation module.
//! Exports: `Engine`, `SessionHandle`, `TranslateEngine`, `global_engine`.
//! Role: Sole owner of the loaded module; all FFI interaction is confined to this module + `sys`.
//! Invariants: Symbols are bound once at load and never rebound.
//! Invariants: The module stays mapped for the engine's whole lifetime.
use std::ffi::{CStr, CString};
use std::os::raw::{c_int, c_void};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::{Arc, Mutex};

use libloading::Library;
use tracing::debug;

use crate::core::config::{CreateSignature, EngineConfig, SessionConfig};
use crate::core::error::{Error, ErrorKind};
use crate::core::platform::{self, Platform};

pub mod sys;

/// Opaque per-session resource minted by a backend's create call.
///
/// The value is meaningful only to the backend that produced it. It is
/// deliberately neither `Clone` nor `Copy`: a translator owns at most one
/// and surrenders it on release.
#[derive(Debug)]
pub struct SessionHandle(NonNull<c_void>);

// The handle is an address interpreted by the native module; moving it
// between threads is sound while calls stay serialized, which `Translator`
// enforces through `&mut self`.
unsafe impl Send for SessionHandle {}

impl SessionHandle {
    /// Wrap a raw pointer returned by a create entry point. Null means the
    /// backend failed to produce a session.
    pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_raw(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// The boundary seam: one synchronous native call per operation.
///
/// `Engine` implements this over the loaded module; test doubles implement
/// it in-process. Nothing in this layer retries or caches a call.
pub trait TranslateEngine: Send + Sync {
    /// Open one session for the configured model. A usable handle or an error.
    fn create_session(&self, config: &SessionConfig) -> Result<SessionHandle, Error>;

    /// Forward one translation call verbatim. The result is whatever the
    /// backend produced, including empty or unchanged text.
    fn translate(
        &self,
        session: &SessionHandle,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, Error>;

    /// Destroy the session. Consumes the handle; it cannot be used again.
    fn release_session(&self, session: SessionHandle) -> Result<(), Error>;
}

/// The create entry point bound at the arity declared in `EngineConfig`.
#[derive(Clone, Copy, Debug)]
enum CreateBinding {
    Path(sys::CreatePathFn),
    PathVariant(sys::CreatePathVariantFn),
    PathVariantTokens(sys::CreatePathVariantTokensFn),
}

/// Loaded native module plus its bound entry points.
///
/// Read-only after `load`; share freely behind an `Arc`. Each `Engine` owns
/// one module handle, closed when the engine drops.
#[derive(Debug)]
pub struct Engine {
    create: CreateBinding,
    translate: sys::TranslateFn,
    release: sys::ReleaseFn,
    free_result: Option<sys::FreeResultFn>,
    module_path: PathBuf,
    // Keeps the module mapped; the fn pointers above point into it.
    _module: Library,
}

impl Engine {
    /// Resolve, open, and bind the native module.
    ///
    /// Open or bind failures are fatal for this engine: no `Translator` can
    /// be constructed from the error path.
    pub fn load(config: &EngineConfig) -> Result<Self, Error> {
        let module_path = match &config.module_path {
            Some(path) => path.clone(),
            None => platform::resolve(Platform::current())?.path().to_path_buf(),
        };

        let module = unsafe { Library::new(&module_path) }.map_err(|err| {
            Error::new(ErrorKind::ModuleLoad)
                .with_message("failed to open native translation module")
                .with_path(&module_path)
                .with_source(err)
        })?;

        let create = match config.create_signature {
            CreateSignature::Path => {
                CreateBinding::Path(bind(&module, &module_path, sys::SYM_CREATE)?)
            }
            CreateSignature::PathVariant => {
                CreateBinding::PathVariant(bind(&module, &module_path, sys::SYM_CREATE)?)
            }
            CreateSignature::PathVariantTokens => {
                CreateBinding::PathVariantTokens(bind(&module, &module_path, sys::SYM_CREATE)?)
            }
        };
        let translate = bind::<sys::TranslateFn>(&module, &module_path, sys::SYM_TRANSLATE)?;
        let release = bind::<sys::ReleaseFn>(&module, &module_path, sys::SYM_RELEASE)?;
        // Optional: present in module builds that hand result ownership to us.
        let free_result = unsafe { module.get::<sys::FreeResultFn>(sys::SYM_FREE_RESULT) }
            .ok()
            .map(|symbol| *symbol);

        debug!(module = %module_path.display(), "bound native translation module");
        Ok(Self {
            create,
            translate,
            release,
            free_result,
            module_path,
            _module: module,
        })
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    /// Whether the loaded module exports `free_translated_string`.
    pub fn owns_result_buffers(&self) -> bool {
        self.free_result.is_some()
    }
}

impl TranslateEngine for Engine {
    fn create_session(&self, config: &SessionConfig) -> Result<SessionHandle, Error> {
        if config.model_path.as_os_str().is_empty() {
            return Err(Error::new(ErrorKind::Usage).with_message("model path is empty"));
        }
        let model_path = c_string(&config.normalized_model_path())?;
        let variant = config.variant.native_code() as c_int;
        let max_tokens = config.max_tokens.map(|value| value as c_int).unwrap_or(0);

        let raw = unsafe {
            match self.create {
                CreateBinding::Path(create) => create(model_path.as_ptr()),
                CreateBinding::PathVariant(create) => create(model_path.as_ptr(), variant),
                CreateBinding::PathVariantTokens(create) => {
                    create(model_path.as_ptr(), variant, max_tokens)
                }
            }
        };

        let handle = SessionHandle::from_raw(raw).ok_or_else(|| {
            Error::new(ErrorKind::SessionCreation)
                .with_message("native module returned no session")
                .with_path(&config.model_path)
        })?;
        debug!(model = %config.model_path.display(), variant = ?config.variant, "created native session");
        Ok(handle)
    }

    fn translate(
        &self,
        session: &SessionHandle,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, Error> {
        let text = c_string(text)?;
        let source_lang = c_string(source_lang)?;
        let target_lang = c_string(target_lang)?;

        let raw = unsafe {
            (self.translate)(
                session.as_raw(),
                text.as_ptr(),
                source_lang.as_ptr(),
                target_lang.as_ptr(),
            )
        };
        if raw.is_null() {
            return Err(Error::new(ErrorKind::Native).with_message("translate failed in native module"));
        }

        let result = unsafe { CStr::from_ptr(raw) }
            .to_str()
            .map(str::to_owned)
            .map_err(|err| {
                Error::new(ErrorKind::Native)
                    .with_message("translation result is not valid UTF-8")
                    .with_source(err)
            });

        // Copy first, then hand the buffer back when the module can take it.
        if let Some(free_result) = self.free_result {
            unsafe { free_result(raw) };
        }

        result
    }

    fn release_session(&self, session: SessionHandle) -> Result<(), Error> {
        unsafe { (self.release)(session.as_raw()) };
        debug!("released native session");
        Ok(())
    }
}

static GLOBAL_ENGINE: Mutex<Option<Arc<Engine>>> = Mutex::new(None);

/// Process-wide engine with explicit init-once semantics.
///
/// The first successful load is cached and returned to every later caller;
/// `config` is read only by the call that performs the load. A failed load
/// caches nothing, so a caller may correct the configuration and retry
/// without leaking a half-open module.
pub fn global_engine(config: &EngineConfig) -> Result<Arc<Engine>, Error> {
    let mut slot = GLOBAL_ENGINE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(engine) = slot.as_ref() {
        return Ok(Arc::clone(engine));
    }
    let engine = Arc::new(Engine::load(config)?);
    *slot = Some(Arc::clone(&engine));
    Ok(engine)
}

fn bind<T: Copy>(module: &Library, path: &Path, name: &[u8]) -> Result<T, Error> {
    let symbol = unsafe { module.get::<T>(name) }.map_err(|err| {
        Error::new(ErrorKind::SymbolBinding)
            .with_message("native module is missing a required entry point")
            .with_path(path)
            .with_symbol(String::from_utf8_lossy(name).into_owned())
            .with_source(err)
    })?;
    Ok(*symbol)
}

fn c_string(text: &str) -> Result<CString, Error> {
    CString::new(text).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("text contains interior NUL byte")
            .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use super::{SessionHandle, c_string};
    use crate::core::error::ErrorKind;
    use std::os::raw::c_void;

    #[test]
    fn interior_nul_is_a_usage_error() {
        let err = c_string("hel\0lo").expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(c_string("hello").is_ok());
    }

    #[test]
    fn null_create_result_yields_no_handle() {
        assert!(SessionHandle::from_raw(std::ptr::null_mut()).is_none());
        let handle = SessionHandle::from_raw(0x10 as *mut c_void).expect("non-null");
        assert_eq!(handle.as_raw(), 0x10 as *mut c_void);
    }
}
