use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn script(dir: &Path, name: &str, src: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, src).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn help_prints_usage_exit_0() {
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: js2sh"))
        .stderr("");
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg("--nope")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--nope"));
}

#[test]
fn missing_input_is_a_usage_error() {
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg("--target")
        .arg("posix")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: js2sh"));
}

#[test]
fn emits_script_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = script(dir.path(), "add.js", "function add(a, b) { return a + b }\n");
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg(&input)
        .assert()
        .success()
        .stdout("#!/usr/bin/env bash\n\nadd() {\n  local a=$1\n  local b=$2\n  echo $(( \"$a\" + \"$b\" ))\n}\n");
}

#[test]
fn posix_target_and_indent() {
    let dir = tempfile::tempdir().unwrap();
    let input = script(dir.path(), "f.js", "function f(x) { g(x); }");
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.args(["--target", "posix", "--indent", "4", &input])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/bin/sh\n"))
        .stdout(predicate::str::contains("    local x=$1\n"));
}

#[test]
fn invalid_target_is_rejected() {
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.args(["--target", "zsh", "x.js"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid target: zsh"));
}

#[test]
fn no_shebang() {
    let dir = tempfile::tempdir().unwrap();
    let input = script(dir.path(), "a.js", "let a = 1;");
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.args(["--no-shebang", &input])
        .assert()
        .success()
        .stdout("a=\"1\"\n");
}

#[test]
fn check_prints_ok() {
    let dir = tempfile::tempdir().unwrap();
    let input = script(dir.path(), "a.js", "f();");
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.args(["--check", &input]).assert().success().stdout("OK\n");
}

#[test]
fn check_conflicts_with_out() {
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.args(["--check", "--out", "x.sh", "x.js"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn emit_ast_prints_tree() {
    let dir = tempfile::tempdir().unwrap();
    let input = script(dir.path(), "a.js", "f(1);");
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.args(["--emit-ast", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("Call {"))
        .stdout(predicate::str::contains("Number(\n"));
}

#[test]
fn unsupported_construct_exit_2_with_caret() {
    let dir = tempfile::tempdir().unwrap();
    let input = script(dir.path(), "t.js", "const x = `hi`\n");
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg(&input)
        .assert()
        .failure()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains(
            "t.js:1:11: unsupported construct `TemplateLiteral`\nconst x = `hi`\n          ^~~~",
        ));
}

#[test]
fn syntax_error_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let input = script(dir.path(), "s.js", "if (x {\n");
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg(&input)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("s.js:1:"))
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn missing_file_exit_1() {
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg("definitely/not/here.js")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn out_writes_executable_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = script(dir.path(), "a.js", "console.log(\"hi\");");
    let out = dir.path().join("build/a.sh");
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout("");
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "#!/usr/bin/env bash\n\necho \"hi\"\n"
    );
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&out).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }
}

#[test]
fn no_chmod_x_leaves_file_plain() {
    let dir = tempfile::tempdir().unwrap();
    let input = script(dir.path(), "a.js", "f();");
    let out = dir.path().join("a.sh");
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--no-chmod-x")
        .assert()
        .success();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&out).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0);
    }
}

#[test]
fn chmod_flags_require_out() {
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.args(["--chmod-x", "x.js"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("require --out"));
}

#[test]
fn directory_input_builds_tree() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::create_dir_all(src.path().join("lib")).unwrap();
    script(src.path(), "lib/hello.js", "function hello() { console.log(\"hello\"); }");
    script(
        src.path(),
        "main.js",
        "import { hello } from './lib/hello.js';\nhello();",
    );
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg(src.path())
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("main.sh"));
    let main = fs::read_to_string(out.path().join("main.sh")).unwrap();
    assert!(main.contains("hello() {\n  echo \"hello\"\n}\nhello\n"), "{main}");
}

#[test]
fn directory_input_requires_out_dir() {
    let src = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.arg(src.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("requires --out-dir"));
}

#[test]
fn verbose_logs_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let input = script(dir.path(), "a.js", "f();");
    let mut cmd = Command::cargo_bin("js2sh").unwrap();
    cmd.args(["-v", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("f\n"))
        .stderr(predicate::str::contains("translate statement"));
}
