//! Reports interface methods whose unnamed parameters have types that do not
//! say what the argument is for, e.g. `Apply(int, string)`.

use thiserror::Error;

use crate::ast::{FuncType, Ident, TypeExpr};
use crate::report::Diagnostic;
use crate::scope::Workspace;
use crate::source::Package;

mod classify;
mod locator;
mod method;

pub use classify::is_self_describing;
pub use locator::{interfaces, Interfaces, Located};
pub use method::{analyse_method, Issue};

pub const NAME: &str = "idescriptive";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--strict and --all-types cannot be combined: strict checks only the first parameter of each method, all-types checks every parameter")]
    ConflictingModes,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The syntax tree holds a shape that cannot appear in a parameter list.
    #[error("unexpected type shape in parameter list: {0}")]
    UnexpectedShape(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Unnamed parameters are fine when their type describes itself.
    Permissive,
    /// Checks the first parameter only.
    Strict,
    /// Every parameter needs a name.
    AllTypes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    strict: bool,
    require_all_types: bool,
}

impl Config {
    pub fn new(strict: bool, require_all_types: bool) -> Result<Self, ConfigError> {
        if strict && require_all_types {
            return Err(ConfigError::ConflictingModes);
        }
        Ok(Config {
            strict,
            require_all_types,
        })
    }

    pub fn mode(&self) -> Mode {
        if self.strict {
            Mode::Strict
        } else if self.require_all_types {
            Mode::AllTypes
        } else {
            Mode::Permissive
        }
    }
}

pub fn issue_message(ty: &TypeExpr, method: &Ident, sig: &FuncType) -> String {
    format!(
        "missing name for incoming parameter {} in method {}{}",
        ty,
        method,
        sig.signature()
    )
}

pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Analyzer { config }
    }

    /// Diagnostics for every package, sorted by file and position.
    pub fn run(&self, packages: &[Package]) -> Result<Vec<Diagnostic>, AnalysisError> {
        let workspace = Workspace::new(packages);
        let mut diagnostics = Vec::new();
        for (idx, package) in packages.iter().enumerate() {
            diagnostics.extend(self.run_package(&workspace, idx, package)?);
        }
        diagnostics.sort_by(|a, b| a.path.cmp(&b.path).then(a.pos.cmp(&b.pos)));
        Ok(diagnostics)
    }

    #[tracing::instrument(skip_all, fields(package = %package.name, dir = %package.dir.display()))]
    fn run_package(
        &self,
        workspace: &Workspace<'_>,
        idx: usize,
        package: &Package,
    ) -> Result<Vec<Diagnostic>, AnalysisError> {
        let mode = self.config.mode();
        let mut diagnostics = Vec::new();

        for file in &package.files {
            for found in interfaces(&file.ast) {
                let scope = found.scope(workspace, idx);
                for (name, sig) in found.methods() {
                    let issues = analyse_method(mode, sig, &scope)?;
                    tracing::debug!(method = %name, issues = issues.len(), "checked method");
                    diagnostics.extend(issues.into_iter().map(|issue| {
                        Diagnostic::new(
                            &package.dir,
                            &file.path,
                            issue.pos,
                            issue_message(issue.ty, name, sig),
                        )
                    }));
                }
            }
        }

        Ok(diagnostics)
    }
}
