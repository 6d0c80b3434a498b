//! Module records: the module token doubles as the name, the package block is empty.

use super::{RecordCodec, decode_line, detokenize, encode_line};
use crate::dictionary::{Dictionary, TokenAllocator};
use crate::record::{ModuleRecord, RecordKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleCodec;

impl RecordCodec for ModuleCodec {
    type Record = ModuleRecord;

    fn tag(&self) -> &'static str {
        RecordKind::Module.tag()
    }

    fn encode(&self, record: &ModuleRecord, dict: &mut TokenAllocator) -> String {
        let name = dict.map(&record.name);
        encode_line(
            self.tag(),
            &record.attributes,
            name.clone(),
            String::new(),
            name,
            Vec::new(),
            dict,
        )
    }

    fn decode(&self, line: &str, dict: &Dictionary) -> Option<ModuleRecord> {
        let decoded = decode_line(line, self.tag(), self.components(), dict)?;
        Some(ModuleRecord {
            name: detokenize(decoded.name, dict),
            attributes: decoded.attributes,
        })
    }
}
