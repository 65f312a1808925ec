// Binding-table failure paths against real (absent or unsuitable) modules.
use std::fs;

use metaltranslate::{Engine, EngineConfig, ErrorKind, global_engine};

#[test]
fn missing_module_fails_with_module_load() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("libmetaltranslate.so");

    let config = EngineConfig::new().with_module_path(&path);
    let err = Engine::load(&config).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::ModuleLoad);
    assert_eq!(err.path(), Some(path.as_path()));
}

#[test]
fn non_module_file_fails_with_module_load() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("libmetaltranslate.so");
    fs::write(&path, b"not a shared object").expect("write");

    let config = EngineConfig::new().with_module_path(&path);
    let err = Engine::load(&config).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::ModuleLoad);
}

#[cfg(target_os = "linux")]
#[test]
fn module_without_entry_points_fails_with_symbol_binding() {
    // libc is loadable but exports none of the translation entry points.
    let config = EngineConfig::new().with_module_path("libc.so.6");
    let err = Engine::load(&config).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::SymbolBinding);
    assert_eq!(err.symbol(), Some("create_metal_translate"));
}

#[test]
fn failed_global_init_caches_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = EngineConfig::new().with_module_path(temp.path().join("absent.so"));

    let first = global_engine(&config).expect_err("first init should fail");
    assert_eq!(first.kind(), ErrorKind::ModuleLoad);

    // A failed init is not cached; the next attempt runs the load again and
    // reports the same failure rather than a poisoned half-state.
    let second = global_engine(&config).expect_err("second init should fail");
    assert_eq!(second.kind(), ErrorKind::ModuleLoad);
}
