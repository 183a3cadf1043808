#![allow(dead_code)]

use js2sh::{
    MemoryModuleProvider, ModuleTextProvider, TargetShell, TranslateOptions, TranspileError,
    transpile_source,
};
use std::fs;
use std::path::Path;
use std::process::Command;

pub fn options() -> TranslateOptions {
    TranslateOptions {
        shebang: false,
        ..TranslateOptions::default()
    }
}

pub fn posix() -> TranslateOptions {
    TranslateOptions {
        target: TargetShell::Posix,
        ..options()
    }
}

/// Translates `src` without a shebang and with no importable modules.
pub fn translate(src: &str) -> String {
    translate_with(src, &MemoryModuleProvider::default())
}

pub fn translate_with(src: &str, modules: &dyn ModuleTextProvider) -> String {
    transpile_source(src, options(), modules, None)
        .unwrap_or_else(|e| panic!("translation failed: {e}\nsource:\n{src}"))
}

pub fn translate_err(src: &str) -> TranspileError {
    translate_err_with(src, options())
}

pub fn translate_err_with(src: &str, opts: TranslateOptions) -> TranspileError {
    match transpile_source(src, opts, &MemoryModuleProvider::default(), None) {
        Ok(out) => panic!("expected translation of\n{src}\nto fail, got:\n{out}"),
        Err(e) => e,
    }
}

pub fn assert_translates(src: &str, expected: &str) {
    let out = translate(src);
    assert_eq!(out.trim_end(), expected.trim_end(), "translation of:\n{src}");
}

pub fn bash_available() -> bool {
    Command::new("bash")
        .arg("-c")
        .arg("true")
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Runs `script` with bash from a scratch directory, returning
/// (stdout, stderr, exit code).
pub fn run_bash_script(script: &str, args: &[&str]) -> (String, String, i32) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("script.sh");
    fs::write(&path, script).expect("Failed to write temp script");
    run_bash_file(&path, args)
}

pub fn run_bash_file(path: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("bash")
        .arg(path)
        .args(args)
        .output()
        .expect("Failed to execute bash");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}
