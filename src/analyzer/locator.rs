use crate::ast::{
    BodyItem, Decl, Field, FuncDecl, FuncType, Ident, Import, InterfaceType, MethodEntry,
    SourceFile, TypeExpr, TypeSpec, ValueSpec,
};
use crate::scope::{Scope, Workspace};

/// Declarations enclosing a node, needed to resolve identifiers inside it.
#[derive(Clone, Copy, Default)]
struct Frame<'a> {
    func: Option<&'a FuncDecl>,
    spec: Option<&'a TypeSpec>,
}

#[derive(Clone, Copy)]
enum Node<'a> {
    Decl(&'a Decl),
    Spec(&'a TypeSpec),
    Func(&'a FuncDecl),
    Value(&'a ValueSpec),
    Item(&'a BodyItem),
    Type(&'a TypeExpr),
}

/// An interface type with a complete method set.
pub struct Located<'a> {
    pub iface: &'a InterfaceType,
    frame: Frame<'a>,
    imports: &'a [Import],
}

impl<'a> Located<'a> {
    pub fn scope<'w>(&self, workspace: &'w Workspace<'w>, package: usize) -> Scope<'w>
    where
        'a: 'w,
    {
        let mut scope = Scope::new(workspace, package, self.imports);
        if let Some(func) = self.frame.func {
            scope = scope
                .with_locals(func)
                .with_type_params(&func.type_params);
        }
        if let Some(spec) = self.frame.spec {
            scope = scope.with_type_params(&spec.type_params);
        }
        scope
    }

    /// Entries declared directly as methods; embedded interfaces are skipped
    /// since they are reported where they are declared.
    pub fn methods(&self) -> impl Iterator<Item = (&'a Ident, &'a FuncType)> {
        let iface = self.iface;
        iface
            .methods
            .iter()
            .flatten()
            .filter_map(|entry| match entry {
                MethodEntry::Method { name, sig } => Some((name, sig)),
                MethodEntry::Embedded(_) => None,
            })
    }
}

/// Pre-order walk over a file yielding every interface type in source order,
/// including interfaces nested in other types and in function bodies.
pub struct Interfaces<'a> {
    imports: &'a [Import],
    stack: Vec<(Node<'a>, Frame<'a>)>,
}

pub fn interfaces(file: &SourceFile) -> Interfaces<'_> {
    let stack = file
        .decls
        .iter()
        .rev()
        .map(|decl| (Node::Decl(decl), Frame::default()))
        .collect();
    Interfaces {
        imports: &file.imports,
        stack,
    }
}

impl<'a> Interfaces<'a> {
    fn push_fields(&mut self, fields: &'a [Field], frame: Frame<'a>) {
        for field in fields.iter().rev() {
            self.stack.push((Node::Type(&field.ty), frame));
        }
    }

    fn push_sig(&mut self, sig: &'a FuncType, frame: Frame<'a>) {
        self.push_fields(&sig.results, frame);
        self.push_fields(&sig.params, frame);
    }

    fn push_type(&mut self, ty: &'a TypeExpr, frame: Frame<'a>) {
        self.stack.push((Node::Type(ty), frame));
    }

    fn expand(&mut self, node: Node<'a>, frame: Frame<'a>) {
        match node {
            Node::Decl(Decl::Type(spec)) | Node::Spec(spec) => {
                let frame = Frame {
                    spec: Some(spec),
                    ..frame
                };
                self.push_type(&spec.ty, frame);
                self.push_fields(&spec.type_params, frame);
            }
            Node::Decl(Decl::Func(func)) => self.stack.push((Node::Func(func), frame)),
            Node::Decl(Decl::Value(value)) => self.stack.push((Node::Value(value), frame)),
            Node::Func(func) => {
                let frame = Frame {
                    func: Some(func),
                    spec: None,
                };
                for item in func.body.iter().rev() {
                    self.stack.push((Node::Item(item), frame));
                }
                self.push_sig(&func.sig, frame);
                self.push_fields(&func.type_params, frame);
                if let Some(recv) = &func.recv {
                    self.push_type(&recv.ty, frame);
                }
            }
            Node::Value(value) => {
                for item in value.literals.iter().rev() {
                    self.stack.push((Node::Item(item), frame));
                }
                if let Some(ty) = &value.ty {
                    self.push_type(ty, frame);
                }
            }
            Node::Item(BodyItem::Type(spec)) => self.stack.push((Node::Spec(spec), frame)),
            Node::Item(BodyItem::Literal(ty)) => self.push_type(ty, frame),
            Node::Type(ty) => self.expand_type(ty, frame),
        }
    }

    fn expand_type(&mut self, ty: &'a TypeExpr, frame: Frame<'a>) {
        match ty {
            TypeExpr::Name(_) | TypeExpr::Qualified { .. } => {}
            TypeExpr::Generic { base, args } => {
                for arg in args.iter().rev() {
                    self.push_type(arg, frame);
                }
                self.push_type(base, frame);
            }
            TypeExpr::Pointer(inner)
            | TypeExpr::Ellipsis(inner)
            | TypeExpr::Paren(inner)
            | TypeExpr::Tilde(inner) => self.push_type(inner, frame),
            TypeExpr::Array { elem, .. } => self.push_type(elem, frame),
            TypeExpr::Map { key, value } => {
                self.push_type(value, frame);
                self.push_type(key, frame);
            }
            TypeExpr::Chan { value, .. } => self.push_type(value, frame),
            TypeExpr::Func(sig) => self.push_sig(sig, frame),
            TypeExpr::Struct(st) => self.push_fields(&st.fields, frame),
            TypeExpr::Interface(iface) => {
                for entry in iface.methods.iter().flatten().rev() {
                    match entry {
                        MethodEntry::Method { sig, .. } => self.push_sig(sig, frame),
                        MethodEntry::Embedded(ty) => self.push_type(ty, frame),
                    }
                }
            }
            TypeExpr::Union(terms) => {
                for term in terms.iter().rev() {
                    self.push_type(term, frame);
                }
            }
        }
    }
}

impl<'a> Iterator for Interfaces<'a> {
    type Item = Located<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, frame)) = self.stack.pop() {
            self.expand(node, frame);
            if let Node::Type(TypeExpr::Interface(iface)) = node {
                // Broken or filtered method sets say nothing reliable.
                if iface.incomplete || iface.methods.is_none() {
                    tracing::debug!("skipping incomplete interface");
                    continue;
                }
                return Some(Located {
                    iface,
                    frame,
                    imports: self.imports,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_source;

    fn method_names(src: &str) -> Vec<Vec<String>> {
        let parsed = parse_source(src).expect("parse failed");
        interfaces(&parsed.ast)
            .map(|found| found.methods().map(|(name, _)| name.name.clone()).collect())
            .collect()
    }

    #[test]
    fn yields_interfaces_in_source_order_including_nested() {
        let found = method_names(
            r#"
package p

type Outer interface {
    Run(cb interface{ Inner(int) })
}

func f() {
    type Local interface{ L() }
}

var v interface{ V() }
"#,
        );
        assert_eq!(
            found,
            vec![
                vec!["Run".to_string()],
                vec!["Inner".to_string()],
                vec!["L".to_string()],
                vec!["V".to_string()],
            ]
        );
    }

    #[test]
    fn embedded_entries_are_not_methods() {
        let found = method_names(
            r#"
package p

type RW interface {
    Reader
    io.Writer
    Flush() error
}
"#,
        );
        assert_eq!(found, vec![vec!["Flush".to_string()]]);
    }

    #[test]
    fn incomplete_interfaces_are_skipped() {
        let found = method_names(
            r#"
package p

type Broken interface {
    Good(int)
    Bad(int int int)
}

type Fine interface { Ok() }
"#,
        );
        assert_eq!(found, vec![vec!["Ok".to_string()]]);
    }
}
