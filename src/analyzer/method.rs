use std::collections::HashMap;

use crate::ast::{Field, FuncType, Pos, TypeExpr};
use crate::scope::Scope;

use super::classify::is_self_describing;
use super::{AnalysisError, Mode};

/// A parameter that needs a name and lacks one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Issue<'a> {
    pub pos: Pos,
    pub ty: &'a TypeExpr,
}

pub fn analyse_method<'a>(
    mode: Mode,
    sig: &'a FuncType,
    scope: &Scope<'_>,
) -> Result<Vec<Issue<'a>>, AnalysisError> {
    match mode {
        Mode::Strict => Ok(analyse_method_strict(sig)),
        Mode::AllTypes => Ok(sig.params.iter().filter_map(missing_name).collect()),
        Mode::Permissive => analyse_method_permissive(sig, scope),
    }
}

/// Parameters are either all named or all unnamed, so the first one speaks
/// for the whole list.
fn analyse_method_strict(sig: &FuncType) -> Vec<Issue<'_>> {
    sig.params.first().and_then(missing_name).into_iter().collect()
}

/// Occurrences of one self-describing type among unnamed parameters.
struct Seen<'a> {
    /// Issue of the first occurrence, held back until a second shows up.
    first: Option<Issue<'a>>,
    count: usize,
}

fn analyse_method_permissive<'a>(
    sig: &'a FuncType,
    scope: &Scope<'_>,
) -> Result<Vec<Issue<'a>>, AnalysisError> {
    let mut issues = Vec::new();
    let mut seen: HashMap<String, Seen<'a>> = HashMap::new();

    for param in &sig.params {
        let issue = match missing_name(param) {
            Some(issue) => issue,
            None => continue,
        };

        if !is_self_describing(&param.ty, scope)? {
            issues.push(issue);
            continue;
        }

        // Two parameters of the same type cannot be told apart at the call site.
        let entry = seen.entry(param.ty.to_string()).or_insert(Seen {
            first: None,
            count: 0,
        });
        entry.count += 1;
        if entry.count == 1 {
            entry.first = Some(issue);
        } else {
            issues.extend(entry.first.take());
            issues.push(issue);
        }
    }

    issues.sort_by_key(|issue| issue.pos);
    Ok(issues)
}

fn missing_name(param: &Field) -> Option<Issue<'_>> {
    if param.names.is_empty() {
        return Some(Issue {
            pos: param.pos,
            ty: &param.ty,
        });
    }
    // Empty names never come out of the parser.
    param
        .names
        .iter()
        .find(|name| name.name.is_empty())
        .map(|name| Issue {
            pos: name.pos,
            ty: &param.ty,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ident;
    use crate::scope::Workspace;
    use crate::source::Package;

    fn ident(name: &str, col: usize) -> Ident {
        Ident {
            name: name.to_string(),
            pos: Pos { line: 1, col },
        }
    }

    fn param(names: &[&str], ty: &str, col: usize) -> Field {
        Field {
            names: names.iter().map(|n| ident(n, col)).collect(),
            ty: TypeExpr::Name(ident(ty, col)),
            pos: Pos { line: 1, col },
        }
    }

    fn run(mode: Mode, params: Vec<Field>) -> Vec<(usize, String)> {
        let sig = FuncType {
            params,
            results: Vec::new(),
        };
        let packages: Vec<Package> = Vec::new();
        let workspace = Workspace::new(&packages);
        let scope = Scope::new(&workspace, 0, &[]);
        analyse_method(mode, &sig, &scope)
            .expect("analysis failed")
            .into_iter()
            .map(|issue| (issue.pos.col, issue.ty.to_string()))
            .collect()
    }

    #[test]
    fn no_params_no_issues_in_any_mode() {
        for mode in [Mode::Permissive, Mode::Strict, Mode::AllTypes] {
            assert!(run(mode, Vec::new()).is_empty());
        }
    }

    #[test]
    fn strict_reports_only_first_param() {
        let issues = run(
            Mode::Strict,
            vec![param(&[], "int", 1), param(&[], "string", 6)],
        );
        assert_eq!(issues, vec![(1, "int".to_string())]);
    }

    #[test]
    fn strict_ignores_named_first_param() {
        assert!(run(Mode::Strict, vec![param(&["a"], "int", 1)]).is_empty());
    }

    #[test]
    fn empty_name_is_reported_at_the_name() {
        let mut field = param(&["a", ""], "int", 3);
        field.names[1].pos = Pos { line: 1, col: 9 };
        assert_eq!(run(Mode::Strict, vec![field]), vec![(9, "int".to_string())]);
    }

    #[test]
    fn all_types_requires_every_name() {
        let issues = run(
            Mode::AllTypes,
            vec![param(&[], "Reader", 1), param(&[], "int", 9)],
        );
        assert_eq!(
            issues,
            vec![(1, "Reader".to_string()), (9, "int".to_string())]
        );
    }

    #[test]
    fn duplicate_self_describing_types_lose_exemption() {
        let issues = run(
            Mode::Permissive,
            vec![
                param(&[], "Reader", 1),
                param(&[], "int", 9),
                param(&[], "Reader", 14),
                param(&[], "Reader", 22),
            ],
        );
        assert_eq!(
            issues,
            vec![
                (1, "Reader".to_string()),
                (9, "int".to_string()),
                (14, "Reader".to_string()),
                (22, "Reader".to_string()),
            ]
        );
    }

    #[test]
    fn single_self_describing_type_is_exempt() {
        assert!(run(Mode::Permissive, vec![param(&[], "Reader", 1)]).is_empty());
    }

    #[test]
    fn named_params_never_count_as_duplicates() {
        let issues = run(
            Mode::Permissive,
            vec![param(&["r"], "Reader", 1), param(&[], "Reader", 12)],
        );
        assert!(issues.is_empty());
    }
}
