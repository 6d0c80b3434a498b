//! Incremental discovery of indexed elements.

pub mod collector;
pub mod markers;
pub mod pass;
pub mod seeds;
pub mod universe;

pub use collector::{Collection, Collector};
pub use markers::{MarkerHistory, MarkerSet};
pub use pass::{IndexPass, PassStats};
pub use seeds::{SeedConfig, SeedParseError};
pub use universe::{
    Element, ElementUniverse, ExecutableElement, FieldElement, ModuleElement, PackageElement,
    TypeElement,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Tag nesting exceeded {limit} levels; still expanding {pending:?}")]
    TagNestingTooDeep { limit: usize, pending: Vec<String> },
}

pub type CollectResult<T> = Result<T, CollectError>;
