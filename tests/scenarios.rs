mod common;
use common::*;

use js2sh::ast::NodeKind;
use js2sh::parser::parse;
use js2sh::{MemoryModuleProvider, Transformer, TranspileError};

#[test]
fn function_returning_a_sum() {
    assert_translates(
        "function add(a, b) { return a + b }",
        r#"add() {
  local a=$1
  local b=$2
  echo $(( "$a" + "$b" ))
}"#,
    );
}

#[test]
fn if_else_with_strict_equality() {
    assert_translates(
        r#"if (x === 1) { console.log("yes") } else { console.log("no") }"#,
        r#"if [ "$x" = "1" ]; then
  echo "yes"
else
  echo "no"
fi"#,
    );
}

#[test]
fn template_literal_is_rejected() {
    let err = translate_err("const greeting = `hi`");
    match err {
        TranspileError::UnsupportedConstruct { kind, span, .. } => {
            assert_eq!(kind, NodeKind::TemplateLiteral);
            assert_eq!(span.map(|s| s.start), Some(17));
        }
        other => panic!("expected UnsupportedConstruct, got {other:?}"),
    }
}

#[test]
fn fresh_runs_are_identical() {
    let src = r#"
function check(n) {
  if (n > 1) {
    if (n > 2) {
      console.log("big");
    }
  }
  return n;
}
if (a) { b(); } else if (c) { d(); }
"#;
    let program = parse(src).unwrap();
    let modules = MemoryModuleProvider::default();
    let transformer = Transformer::new(options(), &modules);
    let first = transformer.run(&program).unwrap();
    let second = transformer.run(&program).unwrap();
    assert_eq!(first, second);
}

#[test]
fn one_chunk_per_top_level_statement() {
    let program = parse("let a = 1;\nfoo(a);\nfunction f() {}\n").unwrap();
    let modules = MemoryModuleProvider::default();
    let chunks = Transformer::new(options(), &modules).run(&program).unwrap();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0], r#"a="1""#);
    assert_eq!(chunks[1], r#"foo "$a""#);
}

#[test]
fn each_alternate_gets_one_branch() {
    let out = translate(
        "if (a) { f(); } else if (b) { g(); } else if (c) { h(); } else { i(); }",
    );
    let lines: Vec<&str> = out.lines().map(str::trim).collect();
    assert_eq!(lines.iter().filter(|l| l.starts_with("if ")).count(), 1);
    assert_eq!(lines.iter().filter(|l| **l == "fi").count(), 1);
    assert_eq!(lines.iter().filter(|l| l.starts_with("elif ")).count(), 2);
    assert_eq!(lines.iter().filter(|l| **l == "else").count(), 1);
}

#[test]
fn parameters_bind_in_order_before_body() {
    let out = translate("function f(first, second, third) { g(third); }");
    let lines: Vec<&str> = out.lines().map(str::trim).collect();
    assert_eq!(
        &lines[1..4],
        &["local first=$1", "local second=$2", "local third=$3"]
    );
    assert_eq!(lines[4], r#"g "$third""#);
}

#[test]
fn literals_appear_verbatim_in_quotes() {
    for lit in ["hello world", "a*b", "semi;colon", "a & b|c ~/x"] {
        let src = format!("const v = {lit:?};\nconsole.log({lit:?});");
        let out = translate(&src);
        let quoted = format!("\"{lit}\"");
        assert!(out.contains(&format!("v={quoted}")), "{out}");
        assert!(out.contains(&format!("echo {quoted}")), "{out}");
    }
}

#[test]
fn literals_without_a_verbatim_form_are_rejected() {
    for src in [
        r#"console.log("say \"hi\" $(whoami)");"#,
        r#"const home = "$HOME";"#,
        "const cmd = \"`id`\";",
        r#"const path = "C:\\tmp";"#,
        r#"function f() { console.log("a\n\n\nb"); }"#,
    ] {
        match translate_err(src) {
            TranspileError::UnsupportedConstruct { kind, span, .. } => {
                assert_eq!(kind, NodeKind::Literal, "{src}");
                assert!(span.is_some(), "{src}");
            }
            other => panic!("{src}: expected UnsupportedConstruct, got {other:?}"),
        }
    }
}

#[test]
fn identifiers_are_always_expanded() {
    let out = translate(
        "let total = count;\nlog(count);\nconsole.log(count);\nif (count === limit) {}\nfunction f() { return count; }",
    );
    for line in out.lines() {
        for word in line.split_whitespace() {
            assert_ne!(word, "count", "bare identifier in: {line}");
        }
    }
    assert_eq!(out.matches(r#""$count""#).count(), 5, "{out}");
}
