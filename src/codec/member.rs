//! Field, method and constructor records.
//!
//! The name block is `<owner-simple-name>#<member-name>[#<p1;p2;...>]`; the
//! owner's package travels in the package block.

use super::{
    NAME_SEPARATOR, RecordCodec, decode_line, detokenize, detokenize_list, encode_line,
    tokenize_list,
};
use crate::dictionary::{Dictionary, TokenAllocator};
use crate::record::{ExecutableRecord, FieldRecord, RecordKind};
use crate::types::TypeRef;

fn member_name(owner: &TypeRef, name: &str, dict: &mut TokenAllocator) -> String {
    let owner = dict.map(owner.simple_binary_name());
    let name = dict.map(name);
    format!("{owner}{NAME_SEPARATOR}{name}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldCodec;

impl RecordCodec for FieldCodec {
    type Record = FieldRecord;

    fn tag(&self) -> &'static str {
        RecordKind::Field.tag()
    }

    fn encode(&self, record: &FieldRecord, dict: &mut TokenAllocator) -> String {
        let module = dict.map(&record.module);
        let package = dict.map(record.owner.package_name());
        let name = member_name(&record.owner, &record.name, dict);
        encode_line(
            self.tag(),
            &record.attributes,
            module,
            package,
            name,
            Vec::new(),
            dict,
        )
    }

    fn decode(&self, line: &str, dict: &Dictionary) -> Option<FieldRecord> {
        let decoded = decode_line(line, self.tag(), self.components(), dict)?;
        let (owner, name) = decoded.name.split_once(NAME_SEPARATOR)?;
        if name.contains(NAME_SEPARATOR) {
            return None;
        }

        Some(FieldRecord {
            owner: TypeRef::from_parts(&decoded.package, &detokenize(owner, dict)),
            name: detokenize(name, dict),
            module: decoded.module,
            attributes: decoded.attributes,
        })
    }
}

/// Methods and constructors share a layout and differ only by tag.
#[derive(Debug, Clone, Copy)]
pub struct ExecutableCodec {
    kind: RecordKind,
}

impl ExecutableCodec {
    pub const METHOD: ExecutableCodec = ExecutableCodec {
        kind: RecordKind::Method,
    };
    pub const CONSTRUCTOR: ExecutableCodec = ExecutableCodec {
        kind: RecordKind::Constructor,
    };
}

impl RecordCodec for ExecutableCodec {
    type Record = ExecutableRecord;

    fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    fn encode(&self, record: &ExecutableRecord, dict: &mut TokenAllocator) -> String {
        let module = dict.map(&record.module);
        let package = dict.map(record.owner.package_name());
        let mut name = member_name(&record.owner, &record.name, dict);
        if !record.parameters.is_empty() {
            let params = tokenize_list(record.parameters.iter().map(TypeRef::binary_name), dict);
            name.push(NAME_SEPARATOR);
            name.push_str(&params);
        }
        encode_line(
            self.tag(),
            &record.attributes,
            module,
            package,
            name,
            Vec::new(),
            dict,
        )
    }

    fn decode(&self, line: &str, dict: &Dictionary) -> Option<ExecutableRecord> {
        let decoded = decode_line(line, self.tag(), self.components(), dict)?;
        let parts: Vec<&str> = decoded.name.split(NAME_SEPARATOR).collect();
        let (owner, name, params) = match parts.as_slice() {
            [owner, name] => (*owner, *name, ""),
            [owner, name, params] => (*owner, *name, *params),
            _ => return None,
        };

        Some(ExecutableRecord {
            owner: TypeRef::from_parts(&decoded.package, &detokenize(owner, dict)),
            name: detokenize(name, dict),
            parameters: detokenize_list(params, dict)
                .into_iter()
                .map(TypeRef::from)
                .collect(),
            module: decoded.module,
            attributes: decoded.attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Attributes, CONSTRUCTOR_NAME};
    use crate::types::Modifier;

    #[test]
    fn test_field_line_matches_reference_encoding() {
        let record = FieldRecord::new("", "pkg.Owner", "var").with_attributes(
            Attributes::default().with_modifiers([Modifier::Private, Modifier::Final]),
        );

        let mut alloc = TokenAllocator::new();
        alloc.add_mapping("", "0");
        alloc.add_mapping("pkg", "1");
        alloc.add_mapping("Owner", "2");
        alloc.add_mapping("var", "3");

        let line = FieldCodec.encode(&record, &mut alloc);
        assert_eq!(line, "f|f;pv|0|1|2#3||");

        let decoded = FieldCodec
            .decode(&line, &alloc.reader_dictionary())
            .expect("field decodes");
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_nested_owner_field() {
        let record = FieldRecord::new("mod", "pkg.Outer$Inner", "count");
        let mut alloc = TokenAllocator::new();
        let line = FieldCodec.encode(&record, &mut alloc);
        let decoded = FieldCodec
            .decode(&line, &alloc.reader_dictionary())
            .expect("field decodes");
        assert_eq!(decoded.owner.binary_name(), "pkg.Outer$Inner");
        assert_eq!(decoded.id(), "mod/pkg.Outer$Inner#count");
    }

    #[test]
    fn test_method_round_trip_keeps_parameter_order() {
        let record = ExecutableRecord::method("", "pkg.Service", "handle")
            .with_parameters(["java.lang.String", "int", "pkg.Request$Body"])
            .with_attributes(
                Attributes::default()
                    .with_modifiers([Modifier::Public, Modifier::Synchronized])
                    .with_annotations(["pkg.Handler"]),
            );

        let mut alloc = TokenAllocator::new();
        let line = ExecutableCodec::METHOD.encode(&record, &mut alloc);
        let decoded = ExecutableCodec::METHOD
            .decode(&line, &alloc.reader_dictionary())
            .expect("method decodes");

        assert_eq!(decoded, record);
        assert_eq!(decoded.id(), "pkg.Service#handle(java.lang.String,int,pkg.Request$Body)");
    }

    #[test]
    fn test_constructor_without_parameters() {
        let record = ExecutableRecord::constructor("", "pkg.Service");
        let mut alloc = TokenAllocator::new();
        let line = ExecutableCodec::CONSTRUCTOR.encode(&record, &mut alloc);
        assert!(line.starts_with("c|"));

        let decoded = ExecutableCodec::CONSTRUCTOR
            .decode(&line, &alloc.reader_dictionary())
            .expect("constructor decodes");
        assert_eq!(decoded.name, CONSTRUCTOR_NAME);
        assert!(decoded.parameters.is_empty());
        // Tag mismatch: a constructor line is not a method line.
        assert!(ExecutableCodec::METHOD.decode(&line, &alloc.reader_dictionary()).is_none());
    }

    #[test]
    fn test_malformed_member_name_is_absent() {
        let dict = Dictionary::new();
        assert!(FieldCodec.decode("f||0|1|2||", &dict).is_none());
        assert!(FieldCodec.decode("f||0|1|2#3#4||", &dict).is_none());
        assert!(ExecutableCodec::METHOD.decode("m||0|1|2#3#4#5||", &dict).is_none());
    }
}
