//! Purpose: Map the running platform to the one loadable native module locator.
//! Exports: `Platform`, `ModuleReference`, `resolve`, `resolve_in`.
//! Role: First initialization step; nothing else runs on an unsupported platform.
//! Invariants: One locator per platform, no fallback search.
//! Invariants: A `ModuleReference` is immutable once resolved.

use std::env;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, ErrorKind};

pub const MODULE_LINUX: &str = "libmetaltranslate.so";
pub const MODULE_MACOS: &str = "libmetaltranslate.dylib";
pub const MODULE_WINDOWS: &str = "metaltranslate.dll";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Unsupported,
}

impl Platform {
    /// Read the execution platform once from the environment.
    pub fn current() -> Self {
        match env::consts::OS {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            _ => Platform::Unsupported,
        }
    }

    pub fn module_file(self) -> Option<&'static str> {
        match self {
            Platform::Linux => Some(MODULE_LINUX),
            Platform::MacOs => Some(MODULE_MACOS),
            Platform::Windows => Some(MODULE_WINDOWS),
            Platform::Unsupported => None,
        }
    }
}

/// A resolved, loadable module locator bound to exactly one platform.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModuleReference {
    platform: Platform,
    path: PathBuf,
}

impl ModuleReference {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolve the well-known module locator for `platform`.
///
/// Unix-like loaders search their library path, not the working directory,
/// so the locator carries an explicit `./` anchor. The Windows loader does
/// not search the working directory either; its locator is anchored at the
/// running executable's own directory.
pub fn resolve(platform: Platform) -> Result<ModuleReference, Error> {
    let file = module_file_or_fail(platform)?;
    let path = match platform {
        Platform::Windows => install_dir()?.join(file),
        _ => PathBuf::from(".").join(file),
    };
    Ok(ModuleReference { platform, path })
}

/// Resolve the module locator anchored at an explicit install directory.
pub fn resolve_in(platform: Platform, dir: &Path) -> Result<ModuleReference, Error> {
    let file = module_file_or_fail(platform)?;
    Ok(ModuleReference {
        platform,
        path: dir.join(file),
    })
}

fn module_file_or_fail(platform: Platform) -> Result<&'static str, Error> {
    platform.module_file().ok_or_else(|| {
        Error::new(ErrorKind::UnsupportedPlatform)
            .with_message(format!("no native module build for platform {}", env::consts::OS))
            .with_hint("MetalTranslate ships native modules for Linux, macOS, and Windows only.")
    })
}

fn install_dir() -> Result<PathBuf, Error> {
    let exe = env::current_exe().map_err(|err| {
        Error::new(ErrorKind::ModuleLoad)
            .with_message("cannot locate the component's install directory")
            .with_source(err)
    })?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        Error::new(ErrorKind::ModuleLoad)
            .with_message("executable path has no parent directory")
            .with_path(exe)
    })
}

#[cfg(test)]
mod tests {
    use super::{Platform, resolve, resolve_in};
    use crate::core::error::ErrorKind;
    use std::path::Path;

    #[test]
    fn unix_locators_match_documented_names() {
        let linux = resolve(Platform::Linux).expect("linux");
        assert_eq!(linux.path(), Path::new("./libmetaltranslate.so"));
        assert_eq!(linux.platform(), Platform::Linux);

        let macos = resolve(Platform::MacOs).expect("macos");
        assert_eq!(macos.path(), Path::new("./libmetaltranslate.dylib"));
    }

    #[test]
    fn windows_locator_is_anchored_at_install_dir() {
        let windows = resolve(Platform::Windows).expect("windows");
        assert!(windows.path().is_absolute());
        assert_eq!(
            windows.path().file_name().and_then(|name| name.to_str()),
            Some("metaltranslate.dll")
        );
    }

    #[test]
    fn unsupported_platform_fails_and_does_nothing_else() {
        let err = resolve(Platform::Unsupported).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::UnsupportedPlatform);

        let err = resolve_in(Platform::Unsupported, Path::new("/opt/engine")).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::UnsupportedPlatform);
    }

    #[test]
    fn resolve_in_anchors_at_the_given_directory() {
        let reference = resolve_in(Platform::Linux, Path::new("/opt/engine")).expect("resolve");
        assert_eq!(reference.path(), Path::new("/opt/engine/libmetaltranslate.so"));
    }

    #[test]
    fn current_platform_is_supported_on_tier_one_targets() {
        // The test suite itself only runs on platforms with a module build.
        let platform = Platform::current();
        assert_ne!(platform, Platform::Unsupported);
        assert_eq!(resolve(platform).expect("resolve").platform(), platform);
    }
}
