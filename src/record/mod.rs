//! Metadata records: the six kinds of entries stored in an index.
//!
//! Every record carries a canonical id derived from its module, owner, name
//! and (for executables) its parameter signature. `Record` equality and
//! hashing use that id only; the per-kind structs compare structurally.

use crate::types::{Modifier, TypeKind, TypeRef};
use indexmap::IndexSet;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Sentinel member name used for constructors.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Attributes shared by every record kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub modifiers: BTreeSet<Modifier>,
    pub annotations: BTreeSet<String>,
    pub aliases: BTreeSet<String>,
}

impl Attributes {
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn with_annotations<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.annotations.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_aliases<S: Into<String>>(mut self, aliases: impl IntoIterator<Item = S>) -> Self {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }
}

/// Record kind, one per wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Module,
    Package,
    Type,
    Field,
    Method,
    Constructor,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::Module,
        RecordKind::Package,
        RecordKind::Type,
        RecordKind::Field,
        RecordKind::Method,
        RecordKind::Constructor,
    ];

    /// Leading tag of an encoded line.
    pub fn tag(self) -> &'static str {
        match self {
            RecordKind::Module => "mo",
            RecordKind::Package => "p",
            RecordKind::Type => "t",
            RecordKind::Field => "f",
            RecordKind::Method => "m",
            RecordKind::Constructor => "c",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "mo" => Some(RecordKind::Module),
            "p" => Some(RecordKind::Package),
            "t" => Some(RecordKind::Type),
            "f" => Some(RecordKind::Field),
            "m" => Some(RecordKind::Method),
            "c" => Some(RecordKind::Constructor),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Module => "module",
            RecordKind::Package => "package",
            RecordKind::Type => "type",
            RecordKind::Field => "field",
            RecordKind::Method => "method",
            RecordKind::Constructor => "constructor",
        };
        f.write_str(name)
    }
}

/// Prefix `rest` with the owning module, if any.
fn qualify(module: &str, rest: &str) -> String {
    if module.is_empty() {
        rest.to_string()
    } else {
        format!("{module}/{rest}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    pub name: String,
    pub attributes: Attributes,
}

impl ModuleRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::default(),
        }
    }

    /// Open modules carry the `open` modifier.
    pub fn open(mut self) -> Self {
        self.attributes.modifiers.insert(Modifier::Open);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn is_open(&self) -> bool {
        self.attributes.modifiers.contains(&Modifier::Open)
    }

    pub fn id(&self) -> String {
        format!("{}/", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub module: String,
    pub name: String,
    pub attributes: Attributes,
}

impl PackageRecord {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            attributes: Attributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn id(&self) -> String {
        qualify(&self.module, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRecord {
    pub module: String,
    pub type_ref: TypeRef,
    pub kind: TypeKind,
    pub interfaces: IndexSet<TypeRef>,
    /// Nearest first, never containing the root type.
    pub superclasses: Vec<TypeRef>,
    pub attributes: Attributes,
}

impl TypeRecord {
    pub fn new(module: impl Into<String>, type_ref: impl Into<TypeRef>, kind: TypeKind) -> Self {
        Self {
            module: module.into(),
            type_ref: type_ref.into(),
            kind,
            interfaces: IndexSet::new(),
            superclasses: Vec::new(),
            attributes: Attributes::default(),
        }
    }

    pub fn with_interfaces<T: Into<TypeRef>>(mut self, interfaces: impl IntoIterator<Item = T>) -> Self {
        self.interfaces.extend(interfaces.into_iter().map(Into::into));
        self
    }

    /// Set the superclass chain. The root type is dropped wherever it appears.
    pub fn with_superclasses<T: Into<TypeRef>>(mut self, chain: impl IntoIterator<Item = T>) -> Self {
        self.superclasses = chain
            .into_iter()
            .map(Into::into)
            .filter(|t: &TypeRef| !t.is_root())
            .collect();
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn package(&self) -> &str {
        self.type_ref.package_name()
    }

    pub fn id(&self) -> String {
        qualify(&self.module, self.type_ref.binary_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    pub module: String,
    pub owner: TypeRef,
    pub name: String,
    pub attributes: Attributes,
}

impl FieldRecord {
    pub fn new(module: impl Into<String>, owner: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            owner: owner.into(),
            name: name.into(),
            attributes: Attributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn id(&self) -> String {
        qualify(&self.module, &format!("{}#{}", self.owner, self.name))
    }
}

/// Shared payload of methods and constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableRecord {
    pub module: String,
    pub owner: TypeRef,
    pub name: String,
    pub parameters: Vec<TypeRef>,
    pub attributes: Attributes,
}

impl ExecutableRecord {
    pub fn method(module: impl Into<String>, owner: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            owner: owner.into(),
            name: name.into(),
            parameters: Vec::new(),
            attributes: Attributes::default(),
        }
    }

    pub fn constructor(module: impl Into<String>, owner: impl Into<TypeRef>) -> Self {
        Self::method(module, owner, CONSTRUCTOR_NAME)
    }

    pub fn with_parameters<T: Into<TypeRef>>(mut self, parameters: impl IntoIterator<Item = T>) -> Self {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Parenthesized, comma-joined parameter binary names.
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.parameters.iter().map(TypeRef::binary_name).collect();
        format!("({})", params.join(","))
    }

    pub fn id(&self) -> String {
        qualify(
            &self.module,
            &format!("{}#{}{}", self.owner, self.name, self.signature()),
        )
    }
}

/// A metadata record of one of the six kinds.
#[derive(Debug, Clone)]
pub enum Record {
    Module(ModuleRecord),
    Package(PackageRecord),
    Type(TypeRecord),
    Field(FieldRecord),
    Method(ExecutableRecord),
    Constructor(ExecutableRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Module(_) => RecordKind::Module,
            Record::Package(_) => RecordKind::Package,
            Record::Type(_) => RecordKind::Type,
            Record::Field(_) => RecordKind::Field,
            Record::Method(_) => RecordKind::Method,
            Record::Constructor(_) => RecordKind::Constructor,
        }
    }

    pub fn id(&self) -> String {
        match self {
            Record::Module(r) => r.id(),
            Record::Package(r) => r.id(),
            Record::Type(r) => r.id(),
            Record::Field(r) => r.id(),
            Record::Method(r) | Record::Constructor(r) => r.id(),
        }
    }

    /// Owning module; a module record is its own module.
    pub fn module(&self) -> &str {
        match self {
            Record::Module(r) => &r.name,
            Record::Package(r) => &r.module,
            Record::Type(r) => &r.module,
            Record::Field(r) => &r.module,
            Record::Method(r) | Record::Constructor(r) => &r.module,
        }
    }

    /// Enclosing package; empty for modules and packages.
    pub fn package(&self) -> &str {
        match self {
            Record::Module(_) | Record::Package(_) => "",
            Record::Type(r) => r.package(),
            Record::Field(r) => r.owner.package_name(),
            Record::Method(r) | Record::Constructor(r) => r.owner.package_name(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Record::Module(r) => &r.name,
            Record::Package(r) => &r.name,
            Record::Type(r) => r.type_ref.binary_name(),
            Record::Field(r) => &r.name,
            Record::Method(r) | Record::Constructor(r) => &r.name,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            Record::Module(r) => &r.attributes,
            Record::Package(r) => &r.attributes,
            Record::Type(r) => &r.attributes,
            Record::Field(r) => &r.attributes,
            Record::Method(r) | Record::Constructor(r) => &r.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        match self {
            Record::Module(r) => &mut r.attributes,
            Record::Package(r) => &mut r.attributes,
            Record::Type(r) => &mut r.attributes,
            Record::Field(r) => &mut r.attributes,
            Record::Method(r) | Record::Constructor(r) => &mut r.attributes,
        }
    }

    pub fn modifiers(&self) -> &BTreeSet<Modifier> {
        &self.attributes().modifiers
    }

    pub fn annotations(&self) -> &BTreeSet<String> {
        &self.attributes().annotations
    }

    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.attributes().aliases
    }

    pub fn is_annotated_with(&self, annotation: &str) -> bool {
        self.annotations().contains(annotation)
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases().contains(alias)
    }

    pub fn as_type(&self) -> Option<&TypeRecord> {
        match self {
            Record::Type(r) => Some(r),
            _ => None,
        }
    }

    /// True when this is a type whose recorded chain or interfaces name `ancestor`.
    pub fn is_subtype_of(&self, ancestor: &str) -> bool {
        self.as_type().is_some_and(|t| {
            t.superclasses.iter().any(|s| s.binary_name() == ancestor)
                || t.interfaces.iter().any(|i| i.binary_name() == ancestor)
        })
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl From<ModuleRecord> for Record {
    fn from(value: ModuleRecord) -> Self {
        Record::Module(value)
    }
}

impl From<PackageRecord> for Record {
    fn from(value: PackageRecord) -> Self {
        Record::Package(value)
    }
}

impl From<TypeRecord> for Record {
    fn from(value: TypeRecord) -> Self {
        Record::Type(value)
    }
}

impl From<FieldRecord> for Record {
    fn from(value: FieldRecord) -> Self {
        Record::Field(value)
    }
}
