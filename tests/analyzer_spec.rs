/// Tests for the interface analysis.
///
/// Each test analyzes a single in-memory Go file and asserts the messages
/// reported for it, in position order.
use idescriptive::analyzer::{AnalysisError, Analyzer, Config, ConfigError, Mode};
use idescriptive::ast::{Decl, MethodEntry, TypeExpr, TypeSpec};
use idescriptive::report::Diagnostic;
use idescriptive::source::{parse_source, LoadedFile, Package};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn package(src: &str) -> Package {
    let parsed = parse_source(src).expect("parse failed");
    Package::new(
        "p",
        "p",
        vec![LoadedFile {
            path: "p/p.go".into(),
            ast: parsed.ast,
            recovered: parsed.recovered,
        }],
    )
}

fn run_with(config: Config, src: &str) -> Vec<Diagnostic> {
    Analyzer::new(config)
        .run(&[package(src)])
        .expect("analysis failed")
}

fn messages_with(config: Config, src: &str) -> Vec<String> {
    run_with(config, src)
        .into_iter()
        .map(|d| d.message)
        .collect()
}

/// Analyzes `type I interface { <methods> }` in permissive mode.
fn messages(methods: &str) -> Vec<String> {
    messages_with(Config::default(), &wrap(methods))
}

fn strict(methods: &str) -> Vec<String> {
    let config = Config::new(true, false).expect("valid config");
    messages_with(config, &wrap(methods))
}

fn all_types(methods: &str) -> Vec<String> {
    let config = Config::new(false, true).expect("valid config");
    messages_with(config, &wrap(methods))
}

fn wrap(methods: &str) -> String {
    format!(
        "package p\n\nimport \"io\"\n\ntype A interface{{ Do() }}\n\nvar _ io.Reader\n\ntype I interface {{\n{}\n}}\n",
        methods
    )
}

fn missing(ty: &str, method: &str) -> String {
    format!("missing name for incoming parameter {} in method {}", ty, method)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn default_config_is_permissive() {
    assert_eq!(Config::default().mode(), Mode::Permissive);
}

#[test]
fn strict_and_all_types_conflict() {
    assert_eq!(Config::new(true, true), Err(ConfigError::ConflictingModes));
}

#[test]
fn mode_follows_switches() {
    assert_eq!(Config::new(true, false).map(|c| c.mode()), Ok(Mode::Strict));
    assert_eq!(Config::new(false, true).map(|c| c.mode()), Ok(Mode::AllTypes));
}

// ---------------------------------------------------------------------------
// Signatures without parameters
// ---------------------------------------------------------------------------

#[test]
fn no_params_no_diagnostics_in_any_mode() {
    let methods = "NoReturn()\nSingle() error\nDouble() (x int, err error)";
    assert!(messages(methods).is_empty());
    assert!(strict(methods).is_empty());
    assert!(all_types(methods).is_empty());
}

// ---------------------------------------------------------------------------
// Permissive mode
// ---------------------------------------------------------------------------

#[test]
fn unnamed_scalar_is_reported() {
    assert_eq!(messages("Method(int)"), vec![missing("int", "Method(int)")]);
}

#[test]
fn named_scalar_is_fine() {
    assert!(messages("Method(x int)").is_empty());
}

#[test]
fn imported_contract_describes_itself() {
    assert!(messages("Method(io.Reader)").is_empty());
}

#[test]
fn empty_contract_is_reported() {
    assert_eq!(
        messages("Method(interface{})"),
        vec![missing("interface{}", "Method(interface{})")]
    );
}

#[test]
fn duplicate_contracts_are_both_reported() {
    assert_eq!(
        messages("Method(A, A)"),
        vec![missing("A", "Method(A, A)"), missing("A", "Method(A, A)")]
    );
    assert!(messages("Method(A)").is_empty());
}

#[test]
fn maps_need_both_halves_self_describing() {
    assert_eq!(
        messages("Method(map[string]int)"),
        vec![missing("map[string]int", "Method(map[string]int)")]
    );
    assert!(messages("Method(map[io.Reader]io.Writer)").is_empty());
}

#[test]
fn message_carries_results() {
    assert_eq!(
        messages("Get(string) (v []byte, err error)"),
        vec![missing("string", "Get(string) (v []byte, err error)")]
    );
}

#[test]
fn each_offending_parameter_reported_in_order() {
    let diagnostics = run_with(
        Config::default(),
        "package p\n\ntype I interface {\n\tPut(string, func(), bool)\n}\n",
    );
    let found: Vec<(usize, usize, String)> = diagnostics
        .into_iter()
        .map(|d| (d.pos.line, d.pos.col, d.message))
        .collect();
    assert_eq!(
        found,
        vec![
            (4, 6, missing("string", "Put(string, func(), bool)")),
            (4, 22, missing("bool", "Put(string, func(), bool)")),
        ]
    );
}

#[test]
fn embedded_entries_are_not_checked_again() {
    let src = "package p\n\ntype Base interface {\n\tDo(int)\n}\n\ntype Both interface {\n\tBase\n\tMore(x int)\n}\n";
    assert_eq!(
        messages_with(Config::default(), src),
        vec![missing("int", "Do(int)")]
    );
}

#[test]
fn interfaces_in_function_bodies_are_checked() {
    let src = "package p\n\nfunc f() {\n\ttype local interface{ Do(bool) }\n}\n";
    assert_eq!(
        messages_with(Config::default(), src),
        vec![missing("bool", "Do(bool)")]
    );
}

#[test]
fn type_parameters_describe_themselves() {
    let src = "package p\n\ntype Repo[T any] interface {\n\tSave(T) error\n}\n\nfunc g[K comparable]() {\n\ttype keyed interface{ Key(K) }\n}\n";
    assert!(messages_with(Config::default(), src).is_empty());
}

#[test]
fn alias_of_scalar_is_reported() {
    let src = "package p\n\ntype Seconds = int64\n\ntype Clock interface {\n\tSleep(Seconds)\n}\n";
    assert_eq!(
        messages_with(Config::default(), src),
        vec![missing("Seconds", "Sleep(Seconds)")]
    );
}

#[test]
fn incomplete_interface_is_skipped() {
    let src = "package p\n\ntype I interface {\n\tGood(int)\n\tBad(int int int)\n}\n";
    assert!(messages_with(Config::default(), src).is_empty());
}

#[test]
fn constraint_in_parameter_position_aborts() {
    // The parser never produces this; build it by hand.
    let mut pkg = package("package p\n\ntype I interface {\n\tDo(int)\n}\n");
    match &mut pkg.files[0].ast.decls[0] {
        Decl::Type(TypeSpec {
            ty: TypeExpr::Interface(iface),
            ..
        }) => match iface.methods.as_mut().map(|m| &mut m[0]) {
            Some(MethodEntry::Method { sig, .. }) => {
                let ty = std::mem::replace(&mut sig.params[0].ty, TypeExpr::Union(Vec::new()));
                sig.params[0].ty = TypeExpr::Tilde(Box::new(ty));
            }
            other => panic!("unexpected entry: {:?}", other),
        },
        other => panic!("unexpected decl: {:?}", other),
    }

    let err = Analyzer::new(Config::default())
        .run(&[pkg])
        .expect_err("expected abort");
    assert!(matches!(err, AnalysisError::UnexpectedShape(ref s) if s == "~int"));
}

// ---------------------------------------------------------------------------
// Strict mode
// ---------------------------------------------------------------------------

#[test]
fn strict_reports_first_parameter_only() {
    assert_eq!(
        strict("Method(int, string, bool)"),
        vec![missing("int", "Method(int, string, bool)")]
    );
}

#[test]
fn strict_ignores_self_describing_table() {
    assert_eq!(
        strict("Method(io.Reader)"),
        vec![missing("io.Reader", "Method(io.Reader)")]
    );
}

#[test]
fn strict_accepts_named_lists() {
    assert!(strict("Method(a, b int, s string) error").is_empty());
}

// ---------------------------------------------------------------------------
// All-types mode
// ---------------------------------------------------------------------------

#[test]
fn all_types_requires_every_name() {
    assert_eq!(
        all_types("Method(io.Reader, A)"),
        vec![
            missing("io.Reader", "Method(io.Reader, A)"),
            missing("A", "Method(io.Reader, A)"),
        ]
    );
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn repeated_runs_are_identical() {
    let src = wrap("Method(A, int, A)\nOther(map[string]A)\nThird(chan A)");
    let packages = [package(&src)];
    let analyzer = Analyzer::new(Config::default());
    let first = analyzer.run(&packages).expect("analysis failed");
    let second = analyzer.run(&packages).expect("analysis failed");
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
}
