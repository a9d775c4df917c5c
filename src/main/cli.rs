use std::path::PathBuf;

use clap::{ArgAction, Parser as ClapParser};

#[derive(ClapParser)]
#[command(
    name = "idescriptive",
    version,
    about = "Reports interface methods whose unnamed parameters hide what they are for"
)]
pub(super) struct Cli {
    /// Go files, package directories, or `dir/...` for a whole tree
    #[arg(required = true)]
    pub(super) paths: Vec<PathBuf>,
    /// Check only that the first parameter of every method is named
    #[arg(long)]
    pub(super) strict: bool,
    /// Require a name for every parameter, whatever its type
    #[arg(long = "all-types")]
    pub(super) all_types: bool,
    /// Print diagnostics as JSON grouped by package
    #[arg(long)]
    pub(super) json: bool,
    /// Also analyze `_test.go` files
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(super) test: bool,
}
