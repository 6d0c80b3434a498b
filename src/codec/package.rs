use super::{RecordCodec, decode_line, detokenize, encode_line};
use crate::dictionary::{Dictionary, TokenAllocator};
use crate::record::{PackageRecord, RecordKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct PackageCodec;

impl RecordCodec for PackageCodec {
    type Record = PackageRecord;

    fn tag(&self) -> &'static str {
        RecordKind::Package.tag()
    }

    fn encode(&self, record: &PackageRecord, dict: &mut TokenAllocator) -> String {
        let module = dict.map(&record.module);
        let name = dict.map(&record.name);
        // A package has no enclosing package.
        encode_line(
            self.tag(),
            &record.attributes,
            module,
            String::new(),
            name,
            Vec::new(),
            dict,
        )
    }

    fn decode(&self, line: &str, dict: &Dictionary) -> Option<PackageRecord> {
        let decoded = decode_line(line, self.tag(), self.components(), dict)?;
        Some(PackageRecord {
            module: decoded.module,
            name: detokenize(decoded.name, dict),
            attributes: decoded.attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Attributes;

    #[test]
    fn test_package_round_trip() {
        let record = PackageRecord::new("", "com.example.api").with_attributes(
            Attributes::default().with_annotations(["com.example.Api", "com.example.Stable"]),
        );

        let mut alloc = TokenAllocator::new();
        let line = PackageCodec.encode(&record, &mut alloc);
        let decoded = PackageCodec
            .decode(&line, &alloc.reader_dictionary())
            .expect("package decodes");

        assert_eq!(decoded, record);
        assert_eq!(decoded.id(), "com.example.api");
    }
}
