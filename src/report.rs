use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analyzer::NAME;
use crate::ast::Pos;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Directory of the package the file belongs to
    pub package: PathBuf,
    pub path: PathBuf,
    pub pos: Pos,
    pub message: String,
}

impl Diagnostic {
    pub fn new(package: &Path, path: &Path, pos: Pos, message: String) -> Self {
        Diagnostic {
            package: package.to_path_buf(),
            path: path.to_path_buf(),
            pos,
            message,
        }
    }

    /// `file:line:col`
    pub fn posn(&self) -> String {
        format!("{}:{}", self.path.display(), self.pos)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.posn(), self.message)
    }
}

pub fn render_text(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        out.push_str(&diagnostic.to_string());
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    posn: String,
    message: &'a str,
}

/// Same layout as `go vet -json`: package, then analyzer, then diagnostics.
pub fn render_json(diagnostics: &[Diagnostic]) -> Result<String, serde_json::Error> {
    let mut by_package: BTreeMap<String, BTreeMap<&str, Vec<JsonDiagnostic<'_>>>> =
        BTreeMap::new();
    for diagnostic in diagnostics {
        by_package
            .entry(diagnostic.package.display().to_string())
            .or_default()
            .entry(NAME)
            .or_default()
            .push(JsonDiagnostic {
                posn: diagnostic.posn(),
                message: &diagnostic.message,
            });
    }
    serde_json::to_string_pretty(&by_package)
}
