//! Type records carry three extra blocks: interfaces, superclasses, kind tag.

use super::{RecordCodec, decode_line, detokenize, detokenize_list, encode_line, tokenize_list};
use crate::dictionary::{Dictionary, TokenAllocator};
use crate::record::{RecordKind, TypeRecord};
use crate::types::{TypeKind, TypeRef};

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCodec;

impl RecordCodec for TypeCodec {
    type Record = TypeRecord;

    fn tag(&self) -> &'static str {
        RecordKind::Type.tag()
    }

    fn components(&self) -> usize {
        super::COMMON_COMPONENTS + 3
    }

    fn encode(&self, record: &TypeRecord, dict: &mut TokenAllocator) -> String {
        let module = dict.map(&record.module);
        let package = dict.map(record.package());
        let name = dict.map(record.type_ref.simple_binary_name());
        let interfaces = tokenize_list(record.interfaces.iter().map(TypeRef::binary_name), dict);
        let superclasses =
            tokenize_list(record.superclasses.iter().map(TypeRef::binary_name), dict);

        encode_line(
            self.tag(),
            &record.attributes,
            module,
            package,
            name,
            vec![interfaces, superclasses, record.kind.tag().to_string()],
            dict,
        )
    }

    fn decode(&self, line: &str, dict: &Dictionary) -> Option<TypeRecord> {
        let decoded = decode_line(line, self.tag(), self.components(), dict)?;
        let [interfaces, superclasses, kind, ..] = decoded.extra.as_slice() else {
            return None;
        };
        let kind = TypeKind::from_tag(kind)?;
        let simple = detokenize(decoded.name, dict);

        Some(TypeRecord {
            module: decoded.module,
            type_ref: TypeRef::from_parts(&decoded.package, &simple),
            kind,
            interfaces: detokenize_list(interfaces, dict)
                .into_iter()
                .map(TypeRef::from)
                .collect(),
            superclasses: detokenize_list(superclasses, dict)
                .into_iter()
                .map(TypeRef::from)
                .collect(),
            attributes: decoded.attributes,
        })
    }
}
