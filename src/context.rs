use crate::modules::ModuleTextProvider;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShell {
    Bash,
    Posix,
}

impl TargetShell {
    pub fn shebang(self) -> &'static str {
        match self {
            TargetShell::Bash => "#!/usr/bin/env bash",
            TargetShell::Posix => "#!/bin/sh",
        }
    }
}

impl fmt::Display for TargetShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetShell::Bash => write!(f, "bash"),
            TargetShell::Posix => write!(f, "posix"),
        }
    }
}

impl FromStr for TargetShell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(TargetShell::Bash),
            "posix" | "sh" => Ok(TargetShell::Posix),
            _ => Err(format!("invalid target: {s} (supported: bash, posix)")),
        }
    }
}

/// One level of indentation in the generated script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(u8),
    Tabs,
}

impl FromStr for Indent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "tab" || s == "tabs" {
            return Ok(Indent::Tabs);
        }
        match s.parse::<u8>() {
            Ok(n) if (1..=8).contains(&n) => Ok(Indent::Spaces(n)),
            _ => Err(format!("invalid indent: {s} (expected 1-8 or `tab`)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslateOptions {
    pub target: TargetShell,
    pub indent: Indent,
    pub shebang: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            target: TargetShell::Bash,
            indent: Indent::Spaces(2),
            shebang: true,
        }
    }
}

/// Mutable state of a single translation run. Built fresh by
/// [`crate::transform::Transformer::run`] and threaded through every
/// translator call; never shared between runs.
pub struct TranslationContext<'a> {
    if_depth: usize,
    function_depth: usize,
    switch_depth: usize,
    pub options: &'a TranslateOptions,
    pub modules: &'a dyn ModuleTextProvider,
    /// File being translated, when it has one; imports resolve against it.
    pub importer: Option<&'a Path>,
}

impl<'a> TranslationContext<'a> {
    pub fn new(
        options: &'a TranslateOptions,
        modules: &'a dyn ModuleTextProvider,
        importer: Option<&'a Path>,
    ) -> Self {
        Self {
            if_depth: 0,
            function_depth: 0,
            switch_depth: 0,
            options,
            modules,
            importer,
        }
    }

    pub fn if_depth(&self) -> usize {
        self.if_depth
    }

    pub fn function_depth(&self) -> usize {
        self.function_depth
    }

    pub fn switch_depth(&self) -> usize {
        self.switch_depth
    }

    /// Runs `f` one conditional level deeper; the level is popped again
    /// whether or not `f` succeeds.
    pub fn in_if<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.if_depth += 1;
        let out = f(self);
        self.if_depth -= 1;
        out
    }

    pub fn in_function<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.function_depth += 1;
        let out = f(self);
        self.function_depth -= 1;
        out
    }

    pub fn in_switch<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.switch_depth += 1;
        let out = f(self);
        self.switch_depth -= 1;
        out
    }
}
