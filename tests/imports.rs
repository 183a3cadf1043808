mod common;
use common::*;

use js2sh::{FsModuleProvider, MemoryModuleProvider, TranspileError, transpile_source};
use std::fs;

#[test]
fn import_splices_module_text_in_place() {
    let modules = MemoryModuleProvider::new()
        .with_module("./util.js", "greet() {\n  echo \"hi\"\n}\n");
    let out = translate_with(
        "import { greet } from './util.js';\ngreet();",
        &modules,
    );
    assert_eq!(out, "greet() {\n  echo \"hi\"\n}\ngreet\n");
}

#[test]
fn side_effect_import_splices_too() {
    let modules = MemoryModuleProvider::new().with_module("./setup.js", "set -e");
    assert_eq!(translate_with("import './setup.js';", &modules), "set -e\n");
}

#[test]
fn missing_module_names_the_specifier() {
    let err = translate_err("import { x } from './nowhere.js';");
    match &err {
        TranspileError::ModuleNotFound { specifier, .. } => assert_eq!(specifier, "./nowhere.js"),
        other => panic!("expected ModuleNotFound, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn fs_provider_reads_generated_sibling() {
    let root = tempfile::tempdir().unwrap();
    let src_dir = root.path().join("javascript");
    let out_dir = root.path().join("shellscript");
    fs::create_dir_all(src_dir.join("lib")).unwrap();
    fs::create_dir_all(out_dir.join("lib")).unwrap();
    fs::write(out_dir.join("lib/math.sh"), "double() {\n  local n=$1\n}\n").unwrap();

    let main = root.path().join("main.js");
    let modules = FsModuleProvider::new(root.path());
    let out = transpile_source(
        "import { double } from './javascript/lib/math.js';\ndouble(2);",
        options(),
        &modules,
        Some(&main),
    )
    .unwrap();
    assert_eq!(out, "double() {\n  local n=$1\n}\ndouble 2\n");
}

#[test]
fn fs_provider_reports_missing_file_with_path() {
    let root = tempfile::tempdir().unwrap();
    let modules = FsModuleProvider::new(root.path());
    let err = transpile_source(
        "import './javascript/gone.js';",
        options(),
        &modules,
        Some(&root.path().join("main.js")),
    )
    .unwrap_err();
    match err {
        TranspileError::ModuleNotFound { path, .. } => {
            assert!(path.ends_with("shellscript/gone.sh"), "{}", path.display());
        }
        other => panic!("expected ModuleNotFound, got {other:?}"),
    }
}

#[test]
fn spliced_module_loses_its_shebang() {
    let modules = MemoryModuleProvider::new()
        .with_module("./lib.js", "#!/usr/bin/env bash\n\nhelper() {\n  :\n}\n");
    assert_eq!(
        translate_with("import './lib.js';\nhelper();", &modules),
        "helper() {\n  :\n}\nhelper\n"
    );
}
