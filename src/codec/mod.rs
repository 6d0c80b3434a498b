//! Record line codec
//!
//! Each record is one line of `|`-separated blocks:
//!
//! ```text
//! <tag>|<modifiers>|<module>|<package>|<name>|<aliases>|<annotations>[|<extra>...]
//! ```
//!
//! Free-text fields are replaced by dictionary tokens on the way out and
//! resolved through the reader dictionary on the way in. Lists inside a block
//! are joined with `;`; member names are `<owner>#<name>[#<params>]`.
//!
//! Decoding never fails loudly: a line that does not fit a kind decodes to
//! `None`, so callers can probe kinds and skip garbage.

mod member;
mod module;
mod package;
mod type_record;

pub use member::{ExecutableCodec, FieldCodec};
pub use module::ModuleCodec;
pub use package::PackageCodec;
pub use type_record::TypeCodec;

use crate::dictionary::{Dictionary, TokenAllocator};
use crate::record::{Attributes, Record, RecordKind};
use crate::types::Modifier;
use std::collections::BTreeSet;

pub const BLOCK_SEPARATOR: char = '|';
pub const LIST_SEPARATOR: char = ';';
pub const NAME_SEPARATOR: char = '#';

/// Blocks shared by every kind: tag, modifiers, module, package, name, aliases, annotations.
pub const COMMON_COMPONENTS: usize = 7;

/// Encoder/decoder pair for one record kind.
pub trait RecordCodec {
    type Record;

    /// Leading tag this codec writes and accepts.
    fn tag(&self) -> &'static str;

    /// Minimum number of blocks a line must have to decode as this kind.
    fn components(&self) -> usize {
        COMMON_COMPONENTS
    }

    fn encode(&self, record: &Self::Record, dict: &mut TokenAllocator) -> String;

    fn decode(&self, line: &str, dict: &Dictionary) -> Option<Self::Record>;
}

/// Routes lines to the codec named by their leading tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelegatingCodec;

impl DelegatingCodec {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, record: &Record, dict: &mut TokenAllocator) -> String {
        match record {
            Record::Module(r) => ModuleCodec.encode(r, dict),
            Record::Package(r) => PackageCodec.encode(r, dict),
            Record::Type(r) => TypeCodec.encode(r, dict),
            Record::Field(r) => FieldCodec.encode(r, dict),
            Record::Method(r) => ExecutableCodec::METHOD.encode(r, dict),
            Record::Constructor(r) => ExecutableCodec::CONSTRUCTOR.encode(r, dict),
        }
    }

    /// Decode a line; unknown tags and malformed lines yield `None`.
    pub fn decode(&self, line: &str, dict: &Dictionary) -> Option<Record> {
        let tag = line.split(BLOCK_SEPARATOR).next()?;
        match RecordKind::from_tag(tag)? {
            RecordKind::Module => ModuleCodec.decode(line, dict).map(Record::Module),
            RecordKind::Package => PackageCodec.decode(line, dict).map(Record::Package),
            RecordKind::Type => TypeCodec.decode(line, dict).map(Record::Type),
            RecordKind::Field => FieldCodec.decode(line, dict).map(Record::Field),
            RecordKind::Method => ExecutableCodec::METHOD
                .decode(line, dict)
                .map(Record::Method),
            RecordKind::Constructor => ExecutableCodec::CONSTRUCTOR
                .decode(line, dict)
                .map(Record::Constructor),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Shared helpers
// ═══════════════════════════════════════════════════════════════════════════

pub(crate) fn encode_modifiers(modifiers: &BTreeSet<Modifier>) -> String {
    modifiers
        .iter()
        .map(|m| m.tag())
        .collect::<Vec<_>>()
        .join(&LIST_SEPARATOR.to_string())
}

/// `None` if any tag is unknown.
pub(crate) fn decode_modifiers(block: &str) -> Option<BTreeSet<Modifier>> {
    split_list(block).map(Modifier::from_tag).collect()
}

pub(crate) fn tokenize_list<'a>(
    values: impl IntoIterator<Item = &'a str>,
    dict: &mut TokenAllocator,
) -> String {
    values
        .into_iter()
        .map(|v| dict.map(v))
        .collect::<Vec<_>>()
        .join(&LIST_SEPARATOR.to_string())
}

/// Resolve a token. An empty block is the empty string; an unknown token
/// resolves to itself.
pub(crate) fn detokenize(token: &str, dict: &Dictionary) -> String {
    if token.is_empty() {
        return String::new();
    }
    match dict.map(token) {
        Some(value) => value.to_string(),
        None => {
            tracing::trace!("[codec] unresolved token {token}");
            token.to_string()
        }
    }
}

pub(crate) fn detokenize_list(block: &str, dict: &Dictionary) -> Vec<String> {
    split_list(block).map(|t| detokenize(t, dict)).collect()
}

fn split_list(block: &str) -> impl Iterator<Item = &str> {
    block.split(LIST_SEPARATOR).filter(|s| !s.is_empty())
}

/// Assemble a line from already-tokenized module, package and name blocks.
pub(crate) fn encode_line(
    tag: &str,
    attributes: &Attributes,
    module: String,
    package: String,
    name: String,
    extra: Vec<String>,
    dict: &mut TokenAllocator,
) -> String {
    let aliases = tokenize_list(attributes.aliases.iter().map(String::as_str), dict);
    let annotations = tokenize_list(attributes.annotations.iter().map(String::as_str), dict);

    let mut blocks = vec![
        tag.to_string(),
        encode_modifiers(&attributes.modifiers),
        module,
        package,
        name,
        aliases,
        annotations,
    ];
    blocks.extend(extra);
    blocks.join(&BLOCK_SEPARATOR.to_string())
}

/// A line split into blocks, with the shared blocks already decoded.
pub(crate) struct DecodedLine<'a> {
    pub attributes: Attributes,
    pub module: String,
    pub package: String,
    /// Raw name block; its layout is kind-specific.
    pub name: &'a str,
    /// Blocks after the annotations, in order.
    pub extra: Vec<&'a str>,
}

pub(crate) fn decode_line<'a>(
    line: &'a str,
    tag: &str,
    components: usize,
    dict: &Dictionary,
) -> Option<DecodedLine<'a>> {
    let blocks: Vec<&str> = line.split(BLOCK_SEPARATOR).collect();
    if blocks.len() < components || blocks[0] != tag {
        return None;
    }

    let attributes = Attributes {
        modifiers: decode_modifiers(blocks[1])?,
        aliases: detokenize_list(blocks[5], dict).into_iter().collect(),
        annotations: detokenize_list(blocks[6], dict).into_iter().collect(),
    };

    Some(DecodedLine {
        attributes,
        module: detokenize(blocks[2], dict),
        package: detokenize(blocks[3], dict),
        name: blocks[4],
        extra: blocks[COMMON_COMPONENTS..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{
        ExecutableRecord, FieldRecord, ModuleRecord, PackageRecord, TypeRecord,
    };
    use crate::types::TypeKind;

    fn round_trip(record: Record) -> Record {
        let codec = DelegatingCodec::new();
        let mut alloc = TokenAllocator::new();
        let line = codec.encode(&record, &mut alloc);
        codec
            .decode(&line, &alloc.reader_dictionary())
            .unwrap_or_else(|| panic!("line did not decode: {line}"))
    }

    #[test]
    fn test_delegates_every_kind() {
        let records: Vec<Record> = vec![
            ModuleRecord::new("app").into(),
            PackageRecord::new("app", "pkg").into(),
            TypeRecord::new("app", "pkg.T", TypeKind::Interface).into(),
            FieldRecord::new("app", "pkg.T", "f").into(),
            Record::Method(ExecutableRecord::method("app", "pkg.T", "run")),
            Record::Constructor(ExecutableRecord::constructor("app", "pkg.T")),
        ];

        for record in records {
            let decoded = round_trip(record.clone());
            assert_eq!(decoded.kind(), record.kind());
            assert_eq!(decoded.id(), record.id());
        }
    }

    #[test]
    fn test_unknown_tag_is_absent() {
        let codec = DelegatingCodec::new();
        assert!(codec.decode("zz|a|b|c|d|e|f", &Dictionary::new()).is_none());
        assert!(codec.decode("", &Dictionary::new()).is_none());
        assert!(codec.decode("no separators at all", &Dictionary::new()).is_none());
    }

    #[test]
    fn test_short_line_is_absent() {
        let codec = DelegatingCodec::new();
        assert!(codec.decode("f|pv|0|1", &Dictionary::new()).is_none());
        assert!(codec.decode("t|pb|0|1|2||", &Dictionary::new()).is_none());
    }

    #[test]
    fn test_unknown_modifier_is_absent() {
        let codec = DelegatingCodec::new();
        assert!(codec.decode("f|qq|0|1|2#3||", &Dictionary::new()).is_none());
    }

    #[test]
    fn test_unresolved_token_decodes_to_itself() {
        let dict: Dictionary = [("1", "pkg"), ("2", "Owner")].into_iter().collect();
        let decoded = DelegatingCodec::new()
            .decode("f||9|1|2#7||", &dict)
            .expect("decodes");
        let Record::Field(field) = decoded else {
            panic!("expected a field record");
        };
        assert_eq!(field.module, "9");
        assert_eq!(field.name, "7");
        assert_eq!(field.owner.binary_name(), "pkg.Owner");
    }

    #[test]
    fn test_modifier_block_order_is_stable() {
        let modifiers: BTreeSet<Modifier> = [Modifier::Private, Modifier::Final].into_iter().collect();
        assert_eq!(encode_modifiers(&modifiers), "f;pv");
        assert_eq!(decode_modifiers("pv;f"), Some(modifiers));
        assert_eq!(decode_modifiers(""), Some(BTreeSet::new()));
    }
}
