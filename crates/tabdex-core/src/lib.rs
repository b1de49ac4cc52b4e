//! Core runtime for Tabdex: the key-value model, the nested search
//! structure, the index builder, and build-phase observability.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod error;
pub mod index;
pub mod model;
pub mod obs;
pub mod types;
pub mod value;

///
/// CONSTANTS
///

/// Maximum number of key levels allowed in one index plan.
///
/// This bounds tree depth (and with it recursion during merge and
/// aggregation) well past anything generated rule tables produce.
pub const MAX_INDEX_LEVELS: usize = 8;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or internal helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        index::{RangeKey, SearchNode, TableIndex, TableIndexBuilder},
        model::{Cardinality, IndexPlan, LevelKind, RowKey},
        types::{Date, Timestamp},
        value::Value,
    };
}
