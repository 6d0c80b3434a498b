use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary name of the universal root type. Never recorded in superclass chains.
pub const ROOT_TYPE: &str = "java.lang.Object";

/// Declaration modifiers.
///
/// Variants are declared in wire-tag order so that a `BTreeSet<Modifier>`
/// iterates (and therefore encodes) deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    Abstract,
    Default,
    Final,
    Native,
    NonSealed,
    Open,
    Private,
    Protected,
    Public,
    Sealed,
    Static,
    Synchronized,
    Transient,
    Volatile,
}

impl Modifier {
    pub const ALL: [Modifier; 14] = [
        Modifier::Abstract,
        Modifier::Default,
        Modifier::Final,
        Modifier::Native,
        Modifier::NonSealed,
        Modifier::Open,
        Modifier::Private,
        Modifier::Protected,
        Modifier::Public,
        Modifier::Sealed,
        Modifier::Static,
        Modifier::Synchronized,
        Modifier::Transient,
        Modifier::Volatile,
    ];

    /// Short tag used in the record line format.
    pub fn tag(self) -> &'static str {
        match self {
            Modifier::Abstract => "a",
            Modifier::Default => "d",
            Modifier::Final => "f",
            Modifier::Native => "n",
            Modifier::NonSealed => "ns",
            Modifier::Open => "o",
            Modifier::Private => "pv",
            Modifier::Protected => "pt",
            Modifier::Public => "pb",
            Modifier::Sealed => "sl",
            Modifier::Static => "s",
            Modifier::Synchronized => "sy",
            Modifier::Transient => "t",
            Modifier::Volatile => "v",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.tag() == tag)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Final => "final",
            Modifier::Native => "native",
            Modifier::NonSealed => "non-sealed",
            Modifier::Open => "open",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Public => "public",
            Modifier::Sealed => "sealed",
            Modifier::Static => "static",
            Modifier::Synchronized => "synchronized",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
        };
        f.write_str(keyword)
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    /// One-letter tag used as the last block of a type record line.
    pub fn tag(self) -> char {
        match self {
            TypeKind::Class => 'c',
            TypeKind::Interface => 'i',
            TypeKind::Enum => 'e',
            TypeKind::Record => 'r',
            TypeKind::Annotation => 'a',
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "c" => Some(TypeKind::Class),
            "i" => Some(TypeKind::Interface),
            "e" => Some(TypeKind::Enum),
            "r" => Some(TypeKind::Record),
            "a" => Some(TypeKind::Annotation),
            _ => None,
        }
    }
}

/// Reference to a type by name.
///
/// Stores the binary form (`pkg.Outer$Inner`); equality and hashing use only
/// that name. The dotted canonical form is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRef(Box<str>);

impl TypeRef {
    pub fn new(binary_name: impl Into<Box<str>>) -> Self {
        Self(binary_name.into())
    }

    /// Rebuild a reference from a package and a package-relative binary name.
    pub fn from_parts(package: &str, simple_binary_name: &str) -> Self {
        if package.is_empty() {
            Self::new(simple_binary_name)
        } else {
            Self::new(format!("{package}.{simple_binary_name}"))
        }
    }

    pub fn binary_name(&self) -> &str {
        &self.0
    }

    /// Dotted display form: nested type separators become dots.
    pub fn canonical_name(&self) -> String {
        self.0.replace('$', ".")
    }

    pub fn package_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(pos) => &self.0[..pos],
            None => "",
        }
    }

    /// Binary name with the package prefix stripped (`Outer$Inner`).
    pub fn simple_binary_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(pos) => &self.0[pos + 1..],
            None => &self.0,
        }
    }

    pub fn is_root(&self) -> bool {
        &*self.0 == ROOT_TYPE
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeRef {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
