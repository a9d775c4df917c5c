use std::collections::HashMap;

use crate::ast::{default_import_name, Decl, Field, FuncDecl, Import, TypeExpr, TypeSpec};
use crate::source::Package;

/// Predeclared types of the universe block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Booleans, numbers and strings
    Scalar,
    /// `any`, an alias of `interface{}`
    Any,
    /// `error`, a named interface with one method
    Error,
    /// `comparable`, the predeclared constraint interface
    Comparable,
}

fn universe(name: &str) -> Option<Builtin> {
    match name {
        "bool" | "string" | "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8"
        | "uint16" | "uint32" | "uint64" | "uintptr" | "byte" | "rune" | "float32" | "float64"
        | "complex64" | "complex128" => Some(Builtin::Scalar),
        "any" => Some(Builtin::Any),
        "error" => Some(Builtin::Error),
        "comparable" => Some(Builtin::Comparable),
        _ => None,
    }
}

#[derive(Clone, Copy)]
struct Declared<'a> {
    spec: &'a TypeSpec,
    imports: &'a [Import],
}

/// Package-level type declarations of one loaded package.
pub struct PackageIndex<'a> {
    pub name: &'a str,
    pub dir_name: &'a str,
    types: HashMap<&'a str, Declared<'a>>,
}

impl<'a> PackageIndex<'a> {
    fn new(package: &'a Package) -> Self {
        let mut types = HashMap::new();
        for file in &package.files {
            for decl in &file.ast.decls {
                if let Decl::Type(spec) = decl {
                    types.insert(
                        spec.name.name.as_str(),
                        Declared {
                            spec,
                            imports: &file.ast.imports,
                        },
                    );
                }
            }
        }
        PackageIndex {
            name: &package.name,
            dir_name: package.dir_name(),
            types,
        }
    }
}

/// Every package of one run, so that qualified references can be followed
/// into packages that were loaded alongside.
pub struct Workspace<'a> {
    packages: Vec<PackageIndex<'a>>,
}

impl<'a> Workspace<'a> {
    pub fn new(packages: &'a [Package]) -> Self {
        Workspace {
            packages: packages.iter().map(PackageIndex::new).collect(),
        }
    }

    pub fn package(&self, idx: usize) -> Option<&PackageIndex<'a>> {
        self.packages.get(idx)
    }

    /// The loaded package an import path refers to, when it is unambiguous.
    ///
    /// A versioned path such as `mod/foo/v2` may live in a `v2` directory or
    /// in `foo` itself, so both directory names are accepted.
    fn find_import(&self, path: &str) -> Option<usize> {
        let last = path.rsplit('/').next().unwrap_or(path);
        let name = default_import_name(path);
        let mut candidates = self
            .packages
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                (p.dir_name == last || p.dir_name == name) && !p.name.ends_with("_test")
            })
            .map(|(idx, _)| idx);
        match (candidates.next(), candidates.next()) {
            (Some(idx), None) => Some(idx),
            _ => None,
        }
    }
}

pub enum Lookup<'a> {
    TypeParam,
    /// A declared type distinct from every other type
    Named,
    /// `type A = B`; `target` must be read in `scope`
    Alias {
        target: &'a TypeExpr,
        scope: Scope<'a>,
    },
    Universe(Builtin),
    /// Declared in a file or package that was not loaded
    Unresolved,
}

/// Identifier resolution at one point of a source file.
#[derive(Clone)]
pub struct Scope<'a> {
    workspace: &'a Workspace<'a>,
    package: usize,
    imports: &'a [Import],
    locals: Vec<&'a TypeSpec>,
    type_params: Vec<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn new(workspace: &'a Workspace<'a>, package: usize, imports: &'a [Import]) -> Self {
        Scope {
            workspace,
            package,
            imports,
            locals: Vec::new(),
            type_params: Vec::new(),
        }
    }

    /// Adds the type declarations made inside a function body.
    pub fn with_locals(mut self, func: &'a FuncDecl) -> Self {
        self.locals.extend(func.local_types());
        self
    }

    pub fn with_type_params(mut self, params: &'a [Field]) -> Self {
        self.type_params.extend(
            params
                .iter()
                .flat_map(|group| group.names.iter().map(|n| n.name.as_str())),
        );
        self
    }

    pub fn lookup(&self, name: &str) -> Lookup<'a> {
        if self.type_params.iter().any(|p| *p == name) {
            return Lookup::TypeParam;
        }

        let local = self.locals.iter().rev().copied().find(|s| s.name.name == name);
        if let Some(spec) = local {
            let declared = Declared {
                spec,
                imports: self.imports,
            };
            return self.declared(self.package, declared, self.locals.clone());
        }

        let package_decl = self
            .workspace
            .package(self.package)
            .and_then(|p| p.types.get(name).copied());
        if let Some(declared) = package_decl {
            return self.declared(self.package, declared, Vec::new());
        }

        match universe(name) {
            Some(builtin) => Lookup::Universe(builtin),
            None => Lookup::Unresolved,
        }
    }

    pub fn lookup_qualified(&self, package: &str, name: &str) -> Lookup<'a> {
        let declared = self.imported_package(package).and_then(|idx| {
            self.workspace
                .package(idx)
                .and_then(|p| p.types.get(name).copied())
                .map(|d| (idx, d))
        });
        match declared {
            Some((idx, declared)) => self.declared(idx, declared, Vec::new()),
            None => Lookup::Unresolved,
        }
    }

    /// The loaded package a qualifier refers to. An unnamed import is known
    /// by its package clause, which may differ from its path.
    fn imported_package(&self, qualifier: &str) -> Option<usize> {
        if matches!(qualifier, "." | "_") {
            return None;
        }
        if let Some(import) = self.imports.iter().find(|i| i.local_name() == qualifier) {
            return self.workspace.find_import(&import.path);
        }
        self.imports
            .iter()
            .filter(|i| i.name.is_none())
            .filter_map(|i| self.workspace.find_import(&i.path))
            .find(|&idx| self.workspace.package(idx).is_some_and(|p| p.name == qualifier))
    }

    fn declared(
        &self,
        package: usize,
        declared: Declared<'a>,
        locals: Vec<&'a TypeSpec>,
    ) -> Lookup<'a> {
        if !declared.spec.alias {
            return Lookup::Named;
        }
        let scope = Scope {
            workspace: self.workspace,
            package,
            imports: declared.imports,
            locals,
            type_params: Vec::new(),
        }
        .with_type_params(&declared.spec.type_params);
        Lookup::Alias {
            target: &declared.spec.ty,
            scope,
        }
    }
}
