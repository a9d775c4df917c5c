use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::ast::SourceFile;
use crate::lexer::{Lexer, LexerError};
use crate::parser::{ParseError, Parser};

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexerError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot open file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },
    #[error("Cannot walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("{}: no Go files", .0.display())]
    NoGoFiles(PathBuf),
}

pub struct Parsed {
    pub ast: SourceFile,
    pub recovered: Vec<ParseError>,
}

pub fn parse_source(source: &str) -> Result<Parsed, SyntaxError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens);
    let ast = parser.parse()?;
    Ok(Parsed {
        ast,
        recovered: parser.take_errors(),
    })
}

#[derive(Debug)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub ast: SourceFile,
    pub recovered: Vec<ParseError>,
}

/// All files of one directory sharing a package clause.
#[derive(Debug)]
pub struct Package {
    pub dir: PathBuf,
    pub name: String,
    pub files: Vec<LoadedFile>,
}

impl Package {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>, files: Vec<LoadedFile>) -> Self {
        Package {
            dir: dir.into(),
            name: name.into(),
            files,
        }
    }

    /// Last path component of the directory, which is what import paths end with.
    pub fn dir_name(&self) -> &str {
        self.dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub include_tests: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            include_tests: true,
        }
    }
}

pub fn load_packages(paths: &[PathBuf], options: &LoadOptions) -> Result<Vec<Package>, SourceError> {
    let mut files = BTreeSet::new();
    for path in paths {
        collect_go_files(path, options, &mut files)?;
    }

    let mut grouped: BTreeMap<(PathBuf, String), Vec<LoadedFile>> = BTreeMap::new();
    for path in files {
        let file = load_file(&path)?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        grouped
            .entry((dir, file.ast.package.name.clone()))
            .or_default()
            .push(file);
    }

    Ok(grouped
        .into_iter()
        .map(|((dir, name), files)| Package::new(dir, name, files))
        .collect())
}

pub fn load_file(path: &Path) -> Result<LoadedFile, SourceError> {
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_source(&text).map_err(|source| SourceError::Syntax {
        path: path.to_path_buf(),
        source,
    })?;

    for err in &parsed.recovered {
        tracing::warn!(path = %path.display(), %err, "recovered from syntax error");
    }
    tracing::debug!(
        path = %path.display(),
        package = %parsed.ast.package.name,
        decls = parsed.ast.decls.len(),
        "parsed file"
    );

    Ok(LoadedFile {
        path: path.to_path_buf(),
        ast: parsed.ast,
        recovered: parsed.recovered,
    })
}

fn is_go_file(path: &Path, options: &LoadOptions) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    name.ends_with(".go") && (options.include_tests || !name.ends_with("_test.go"))
}

fn skip_dir(name: &str) -> bool {
    name == "testdata" || name == "vendor" || name.starts_with('.') || name.starts_with('_')
}

/// `dir/...` walks `dir` recursively, a directory contributes its own `.go`
/// files, and any other path is taken as a single file.
fn collect_go_files(
    path: &Path,
    options: &LoadOptions,
    files: &mut BTreeSet<PathBuf>,
) -> Result<(), SourceError> {
    let text = path.to_string_lossy();
    if let Some(root) = text.strip_suffix("...") {
        let root = match root.trim_end_matches('/') {
            "" => Path::new("."),
            trimmed => Path::new(trimmed),
        };
        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !skip_dir(&e.file_name().to_string_lossy())
            })
        {
            let entry = entry.map_err(|source| SourceError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_file() && is_go_file(entry.path(), options) {
                files.insert(entry.path().to_path_buf());
            }
        }
        return Ok(());
    }

    if path.is_dir() {
        let entries = fs::read_dir(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let before = files.len();
        for entry in entries {
            let entry = entry.map_err(|source| SourceError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let file = entry.path();
            if file.is_file() && is_go_file(&file, options) {
                files.insert(file);
            }
        }
        if files.len() == before {
            return Err(SourceError::NoGoFiles(path.to_path_buf()));
        }
        return Ok(());
    }

    files.insert(path.to_path_buf());
    Ok(())
}
