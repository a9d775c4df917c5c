use crate::ast::{ChanDir, TypeExpr};
use crate::scope::{Builtin, Lookup, Scope};

use super::AnalysisError;

/// Alias chains longer than this only arise from invalid cyclic aliases.
const MAX_ALIAS_DEPTH: usize = 32;

/// Whether a parameter of this type reads clearly at the call site without a
/// parameter name.
pub fn is_self_describing(ty: &TypeExpr, scope: &Scope<'_>) -> Result<bool, AnalysisError> {
    classify(ty, scope, 0)
}

fn classify(ty: &TypeExpr, scope: &Scope<'_>, depth: usize) -> Result<bool, AnalysisError> {
    let verdict = match ty {
        TypeExpr::Name(ident) => resolved(scope.lookup(&ident.name), depth)?,
        TypeExpr::Qualified { package, name } => {
            resolved(scope.lookup_qualified(&package.name, &name.name), depth)?
        }
        TypeExpr::Generic { base, .. } => classify(base, scope, depth)?,
        TypeExpr::Pointer(inner) | TypeExpr::Ellipsis(inner) | TypeExpr::Paren(inner) => {
            classify(inner, scope, depth)?
        }
        TypeExpr::Array { elem, .. } => classify(elem, scope, depth)?,
        TypeExpr::Map { key, value } => {
            classify(key, scope, depth)? && classify(value, scope, depth)?
        }
        TypeExpr::Chan { dir, value } => match dir {
            ChanDir::Send => classify(value, scope, depth)?,
            // Could be a done or cancel signal; only a name tells.
            ChanDir::Recv | ChanDir::Both => false,
        },
        TypeExpr::Func(_) => true,
        TypeExpr::Struct(_) => true,
        TypeExpr::Interface(iface) => iface.methods.as_ref().is_some_and(|m| !m.is_empty()),
        TypeExpr::Union(_) | TypeExpr::Tilde(_) => {
            return Err(AnalysisError::UnexpectedShape(ty.to_string()));
        }
    };
    tracing::trace!(ty = %ty, verdict, "classified parameter type");
    Ok(verdict)
}

fn resolved(lookup: Lookup<'_>, depth: usize) -> Result<bool, AnalysisError> {
    match lookup {
        Lookup::TypeParam | Lookup::Named | Lookup::Unresolved => Ok(true),
        Lookup::Universe(Builtin::Scalar | Builtin::Any) => Ok(false),
        Lookup::Universe(Builtin::Error | Builtin::Comparable) => Ok(true),
        Lookup::Alias { target, scope } => {
            if depth >= MAX_ALIAS_DEPTH {
                tracing::debug!(target = %target, "alias chain too deep");
                return Ok(false);
            }
            classify(target, &scope, depth + 1)
        }
    }
}
