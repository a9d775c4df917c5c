/// Runs the analysis over the Go packages in `tests/testdata` and compares the
/// diagnostics with the `// want` annotations in those files.
///
/// An annotation holds one or more back-quoted regular expressions. Every
/// diagnostic on the annotated line must match a distinct expression, and
/// every expression must be matched.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use idescriptive::analyzer::{Analyzer, Config};
use idescriptive::source::{load_packages, LoadOptions};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn testdata(case: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(case)
}

type Expectations = BTreeMap<(PathBuf, usize), Vec<Regex>>;

fn expectations(root: &Path) -> Expectations {
    let want = Regex::new(r"// want (.*)$").unwrap();
    let pattern = Regex::new(r"`([^`]*)`").unwrap();

    let mut expected = Expectations::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.unwrap();
        if entry.path().extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        let text = fs::read_to_string(entry.path()).unwrap();
        for (idx, line) in text.lines().enumerate() {
            let Some(caps) = want.captures(line) else {
                continue;
            };
            let regexes = pattern
                .captures_iter(&caps[1])
                .map(|c| Regex::new(&c[1]).unwrap())
                .collect();
            expected.insert((entry.path().to_path_buf(), idx + 1), regexes);
        }
    }
    expected
}

/// Returns the problems found; empty when diagnostics and annotations agree.
fn check(root: PathBuf, paths: &[PathBuf], config: Config) -> Vec<String> {
    let mut expected = expectations(&root);
    let packages = load_packages(paths, &LoadOptions::default()).expect("load failed");
    let diagnostics = Analyzer::new(config)
        .run(&packages)
        .expect("analysis failed");

    let mut problems = Vec::new();
    for d in &diagnostics {
        let key = (d.path.clone(), d.pos.line);
        let matched = expected.get_mut(&key).and_then(|regexes| {
            let idx = regexes.iter().position(|re| re.is_match(&d.message))?;
            Some(regexes.remove(idx))
        });
        if matched.is_none() {
            problems.push(format!("unexpected diagnostic: {}", d));
        }
    }
    for ((path, line), regexes) in expected {
        for re in regexes {
            problems.push(format!(
                "{}:{}: no diagnostic matching `{}`",
                path.display(),
                line,
                re
            ));
        }
    }
    problems
}

fn assert_case(case: &str, config: Config) {
    let root = testdata(case);
    let problems = check(root.clone(), &[root], config);
    assert!(problems.is_empty(), "{}", problems.join("\n"));
}

// ---------------------------------------------------------------------------
// Cases
// ---------------------------------------------------------------------------

#[test]
fn permissive() {
    assert_case("permissive", Config::default());
}

#[test]
fn strict() {
    assert_case("strict", Config::new(true, false).unwrap());
}

#[test]
fn all_types() {
    assert_case("alltypes", Config::new(false, true).unwrap());
}

#[test]
fn alltypes_good_interfaces_pass_permissive_check() {
    let root = testdata("alltypes");
    let packages =
        load_packages(&[root.join("good_interface.go")], &LoadOptions::default()).unwrap();
    let diagnostics = Analyzer::new(Config::default()).run(&packages).unwrap();
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
}

#[test]
fn aliases_resolve_across_packages() {
    let root = testdata("crosspkg");
    let problems = check(root.clone(), &[root.join("...")], Config::default());
    assert!(problems.is_empty(), "{}", problems.join("\n"));
}

#[test]
fn versioned_and_renamed_imports_resolve() {
    let root = testdata("versioned");
    let problems = check(root.clone(), &[root.join("...")], Config::default());
    assert!(problems.is_empty(), "{}", problems.join("\n"));
}
