//! Offline index of program-element metadata.
//!
//! A build pass hands the [`indexing::IndexPass`] the elements it can see;
//! the collector finds every element that directly or transitively carries a
//! marker (tag, interface, base class, alias), the records are merged into a
//! compact dictionary-encoded index file, and the markers this pass expanded
//! are snapshotted so later passes keep propagating them.

pub mod codec;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod indexing;
pub mod logging;
pub mod record;
pub mod storage;
pub mod types;

pub use codec::{DelegatingCodec, RecordCodec};
pub use config::Settings;
pub use dictionary::{Dictionary, TokenAllocator};
pub use error::{IndexError, IndexResult};
pub use indexing::{
    Collection, Collector, Element, ElementUniverse, IndexPass, MarkerHistory, MarkerSet,
    PassStats, SeedConfig,
};
pub use record::{
    Attributes, ExecutableRecord, FieldRecord, ModuleRecord, PackageRecord, Record, RecordKind,
    TypeRecord,
};
pub use storage::{FileIndexService, IndexService, IndexStats, MarkerStore, ServiceRegistry};
pub use types::{Modifier, TypeKind, TypeRef};
