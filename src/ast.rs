use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
    /// `chan T`
    Both,
}

/// A declared type as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `int`, `Reader`, `T`
    Name(Ident),
    /// `io.Reader`
    Qualified { package: Ident, name: Ident },
    /// `List[T]`, `maps.Map[K, V]`
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    /// `[N]T`, or `[]T` when `len` is `None`
    Array {
        len: Option<String>,
        elem: Box<TypeExpr>,
    },
    /// Variadic parameter `...T`
    Ellipsis(Box<TypeExpr>),
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Paren(Box<TypeExpr>),
    Chan {
        dir: ChanDir,
        value: Box<TypeExpr>,
    },
    Func(FuncType),
    Struct(StructType),
    Interface(InterfaceType),
    /// Constraint union `A | ~B`; only legal inside interfaces and type parameter lists
    Union(Vec<TypeExpr>),
    /// Constraint term `~T`
    Tilde(Box<TypeExpr>),
}

/// A parameter, result, struct field or type parameter group.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    /// First name when named, otherwise the start of the type.
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuncType {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructType {
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MethodEntry {
    Method { name: Ident, sig: FuncType },
    /// Embedded interface or constraint element
    Embedded(TypeExpr),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InterfaceType {
    /// `None` when the body could not be read at all.
    pub methods: Option<Vec<MethodEntry>>,
    /// Set when some entries were dropped during error recovery.
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub name: Option<Ident>,
    pub path: String,
}

impl Import {
    /// Name the import is referred to by inside the file.
    pub fn local_name(&self) -> &str {
        match &self.name {
            Some(name) => &name.name,
            None => default_import_name(&self.path),
        }
    }
}

/// The package name Go tooling assumes for an import path: the last path
/// segment, skipping a `/vN` major version and dropping a `.vN` suffix, so
/// `github.com/x/foo/v2` and `gopkg.in/yaml.v3` give `foo` and `yaml`.
pub fn default_import_name(path: &str) -> &str {
    let mut segments = path.rsplit('/');
    let last = segments.next().unwrap_or(path);
    let base = match segments.next() {
        Some(parent) if is_major_version(last) => parent,
        _ => last,
    };
    match base.rsplit_once('.') {
        Some((name, version)) if !name.is_empty() && is_major_version(version) => name,
        _ => base,
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<Field>,
    /// `type A = B`
    pub alias: bool,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Type(TypeSpec),
    Literal(TypeExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub recv: Option<Field>,
    pub name: Ident,
    pub type_params: Vec<Field>,
    pub sig: FuncType,
    pub body: Vec<BodyItem>,
}

impl FuncDecl {
    pub fn local_types(&self) -> impl Iterator<Item = &TypeSpec> {
        self.body.iter().filter_map(|item| match item {
            BodyItem::Type(spec) => Some(spec),
            BodyItem::Literal(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    /// Type literals found in the initializer expressions
    pub literals: Vec<BodyItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Type(TypeSpec),
    Func(FuncDecl),
    Value(ValueSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: Ident,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
}

// ---------------------------------------------------------------------------
// Canonical rendering, matching what `go/types.ExprString` prints
// ---------------------------------------------------------------------------

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.names.is_empty() {
            write_list(f, &self.names, ", ")?;
            f.write_str(" ")?;
        }
        write!(f, "{}", self.ty)
    }
}

/// Parameters and results without the leading `func` keyword.
pub struct Signature<'a>(&'a FuncType);

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = self.0;
        f.write_str("(")?;
        write_list(f, &sig.params, ", ")?;
        f.write_str(")")?;
        match sig.results.as_slice() {
            [] => Ok(()),
            [single] if single.names.is_empty() => write!(f, " {}", single.ty),
            results => {
                f.write_str(" (")?;
                write_list(f, results, ", ")?;
                f.write_str(")")
            }
        }
    }
}

impl FuncType {
    pub fn signature(&self) -> Signature<'_> {
        Signature(self)
    }
}

impl fmt::Display for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodEntry::Method { name, sig } => write!(f, "{}{}", name, sig.signature()),
            MethodEntry::Embedded(ty) => write!(f, "{}", ty),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(ident) => write!(f, "{}", ident),
            TypeExpr::Qualified { package, name } => write!(f, "{}.{}", package, name),
            TypeExpr::Generic { base, args } => {
                write!(f, "{}[", base)?;
                write_list(f, args, ", ")?;
                f.write_str("]")
            }
            TypeExpr::Pointer(inner) => write!(f, "*{}", inner),
            TypeExpr::Array { len: None, elem } => write!(f, "[]{}", elem),
            TypeExpr::Array {
                len: Some(len),
                elem,
            } => write!(f, "[{}]{}", len, elem),
            TypeExpr::Ellipsis(elem) => write!(f, "...{}", elem),
            TypeExpr::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeExpr::Paren(inner) => write!(f, "({})", inner),
            TypeExpr::Chan { dir, value } => match dir {
                ChanDir::Send => write!(f, "chan<- {}", value),
                ChanDir::Recv => write!(f, "<-chan {}", value),
                ChanDir::Both => write!(f, "chan {}", value),
            },
            TypeExpr::Func(sig) => write!(f, "func{}", sig.signature()),
            TypeExpr::Struct(st) => {
                f.write_str("struct{")?;
                write_list(f, &st.fields, "; ")?;
                f.write_str("}")
            }
            TypeExpr::Interface(iface) => {
                f.write_str("interface{")?;
                if let Some(methods) = &iface.methods {
                    write_list(f, methods, "; ")?;
                }
                f.write_str("}")
            }
            TypeExpr::Union(terms) => write_list(f, terms, " | "),
            TypeExpr::Tilde(inner) => write!(f, "~{}", inner),
        }
    }
}
