//! Program elements visible to one build pass.
//!
//! The host build tool enumerates these; the collector only reads them.
//! Elements without a qualified name (local or anonymous types, members of
//! such types) have `None` where the name would be and never produce a
//! record.

use crate::record::{
    Attributes, ExecutableRecord, FieldRecord, ModuleRecord, PackageRecord, Record, TypeRecord,
};
use crate::types::{Modifier, TypeKind};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct ModuleElement {
    pub name: String,
    pub modifiers: BTreeSet<Modifier>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PackageElement {
    pub module: String,
    pub name: String,
    pub modifiers: BTreeSet<Modifier>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TypeElement {
    pub module: String,
    /// Binary name; `None` for local and anonymous types.
    pub binary_name: Option<String>,
    pub kind: TypeKind,
    /// Directly declared interfaces.
    pub interfaces: Vec<String>,
    /// Superclass chain, nearest first. May include the root type.
    pub superclasses: Vec<String>,
    pub modifiers: BTreeSet<Modifier>,
    pub tags: Vec<String>,
}

impl TypeElement {
    pub fn new(binary_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            module: String::new(),
            binary_name: Some(binary_name.into()),
            kind,
            interfaces: Vec::new(),
            superclasses: Vec::new(),
            modifiers: BTreeSet::new(),
            tags: Vec::new(),
        }
    }

    pub fn class(binary_name: impl Into<String>) -> Self {
        Self::new(binary_name, TypeKind::Class)
    }

    pub fn interface(binary_name: impl Into<String>) -> Self {
        Self::new(binary_name, TypeKind::Interface)
    }

    pub fn annotation(binary_name: impl Into<String>) -> Self {
        Self::new(binary_name, TypeKind::Annotation)
    }

    /// A type the host could not name.
    pub fn anonymous(kind: TypeKind) -> Self {
        Self {
            binary_name: None,
            ..Self::new(String::new(), kind)
        }
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn implementing<S: Into<String>>(mut self, interfaces: impl IntoIterator<Item = S>) -> Self {
        self.interfaces.extend(interfaces.into_iter().map(Into::into));
        self
    }

    pub fn extending<S: Into<String>>(mut self, chain: impl IntoIterator<Item = S>) -> Self {
        self.superclasses = chain.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn tagged<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn immediate_superclass(&self) -> Option<&str> {
        self.superclasses.first().map(String::as_str)
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(&Modifier::Final)
    }

    /// Non-final classes can be subclassed, so they can pass markers on.
    pub fn is_extensible_class(&self) -> bool {
        self.kind == TypeKind::Class && !self.is_final()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldElement {
    pub module: String,
    /// Binary name of the declaring type; `None` if it has no name.
    pub owner: Option<String>,
    pub name: String,
    pub modifiers: BTreeSet<Modifier>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExecutableElement {
    pub module: String,
    pub owner: Option<String>,
    pub name: String,
    pub parameters: Vec<String>,
    pub modifiers: BTreeSet<Modifier>,
    pub tags: Vec<String>,
}

/// One program element of the current pass.
#[derive(Debug, Clone)]
pub enum Element {
    Module(ModuleElement),
    Package(PackageElement),
    Type(TypeElement),
    Field(FieldElement),
    Method(ExecutableElement),
    Constructor(ExecutableElement),
}

impl Element {
    pub fn tags(&self) -> &[String] {
        match self {
            Element::Module(e) => &e.tags,
            Element::Package(e) => &e.tags,
            Element::Type(e) => &e.tags,
            Element::Field(e) => &e.tags,
            Element::Method(e) | Element::Constructor(e) => &e.tags,
        }
    }

    pub fn as_type(&self) -> Option<&TypeElement> {
        match self {
            Element::Type(t) => Some(t),
            _ => None,
        }
    }

    /// Tag declarations are annotation types.
    pub fn declared_tag(&self) -> Option<&str> {
        self.as_type()
            .filter(|t| t.kind == TypeKind::Annotation)
            .and_then(|t| t.binary_name.as_deref())
    }

    /// Build the record for this element, or `None` if it cannot be named.
    pub fn to_record(&self) -> Option<Record> {
        let record = match self {
            Element::Module(e) => ModuleRecord::new(&e.name)
                .with_attributes(attributes(&e.modifiers, &e.tags))
                .into(),
            Element::Package(e) => PackageRecord::new(&e.module, &e.name)
                .with_attributes(attributes(&e.modifiers, &e.tags))
                .into(),
            Element::Type(e) => TypeRecord::new(&e.module, e.binary_name.as_deref()?, e.kind)
                .with_interfaces(e.interfaces.iter().map(String::as_str))
                .with_superclasses(e.superclasses.iter().map(String::as_str))
                .with_attributes(attributes(&e.modifiers, &e.tags))
                .into(),
            Element::Field(e) => FieldRecord::new(&e.module, e.owner.as_deref()?, &e.name)
                .with_attributes(attributes(&e.modifiers, &e.tags))
                .into(),
            Element::Method(e) => Record::Method(executable(e, false)?),
            Element::Constructor(e) => Record::Constructor(executable(e, true)?),
        };
        Some(record)
    }
}

fn attributes(modifiers: &BTreeSet<Modifier>, tags: &[String]) -> Attributes {
    Attributes::default()
        .with_modifiers(modifiers.iter().copied())
        .with_annotations(tags.iter().cloned())
}

fn executable(e: &ExecutableElement, constructor: bool) -> Option<ExecutableRecord> {
    let owner = e.owner.as_deref()?;
    let record = if constructor {
        ExecutableRecord::constructor(&e.module, owner)
    } else {
        ExecutableRecord::method(&e.module, owner, &e.name)
    };
    Some(
        record
            .with_parameters(e.parameters.iter().map(String::as_str))
            .with_attributes(attributes(&e.modifiers, &e.tags)),
    )
}

impl From<TypeElement> for Element {
    fn from(value: TypeElement) -> Self {
        Element::Type(value)
    }
}

impl From<ModuleElement> for Element {
    fn from(value: ModuleElement) -> Self {
        Element::Module(value)
    }
}

impl From<PackageElement> for Element {
    fn from(value: PackageElement) -> Self {
        Element::Package(value)
    }
}

impl From<FieldElement> for Element {
    fn from(value: FieldElement) -> Self {
        Element::Field(value)
    }
}

/// Every element one pass can see.
#[derive(Debug, Clone, Default)]
pub struct ElementUniverse {
    elements: Vec<Element>,
}

impl ElementUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    pub fn with(mut self, element: impl Into<Element>) -> Self {
        self.push(element);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Named type declarations.
    pub fn types(&self) -> impl Iterator<Item = (&str, &TypeElement)> {
        self.elements
            .iter()
            .filter_map(Element::as_type)
            .filter_map(|t| t.binary_name.as_deref().map(|name| (name, t)))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromIterator<Element> for ElementUniverse {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_type_has_no_record() {
        let element: Element = TypeElement::anonymous(TypeKind::Class).into();
        assert!(element.to_record().is_none());

        let field = Element::Field(FieldElement {
            owner: None,
            name: "x".to_string(),
            ..Default::default()
        });
        assert!(field.to_record().is_none());
    }

    #[test]
    fn test_type_record_strips_root_type() {
        let element: Element = TypeElement::class("pkg.C2")
            .extending(["pkg.C", "java.lang.Object"])
            .into();
        let record = element.to_record().expect("named type");
        let type_record = record.as_type().expect("type record");
        assert_eq!(type_record.superclasses.len(), 1);
        assert_eq!(type_record.superclasses[0].binary_name(), "pkg.C");
    }

    #[test]
    fn test_constructor_uses_sentinel_name() {
        let element = Element::Constructor(ExecutableElement {
            owner: Some("pkg.C".to_string()),
            name: "ignored".to_string(),
            parameters: vec!["int".to_string()],
            ..Default::default()
        });
        assert_eq!(element.to_record().expect("named").id(), "pkg.C#<init>(int)");
    }

    #[test]
    fn test_declared_tag_only_for_annotations() {
        let tag: Element = TypeElement::annotation("pkg.Tag").into();
        let class: Element = TypeElement::class("pkg.C").into();
        assert_eq!(tag.declared_tag(), Some("pkg.Tag"));
        assert_eq!(class.declared_tag(), None);
    }

    #[test]
    fn test_universe_types_skips_unnamed() {
        let universe = ElementUniverse::new()
            .with(TypeElement::class("pkg.A"))
            .with(TypeElement::anonymous(TypeKind::Class))
            .with(PackageElement {
                name: "pkg".to_string(),
                ..Default::default()
            });
        let names: Vec<&str> = universe.types().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["pkg.A"]);
        assert_eq!(universe.len(), 3);
    }
}
