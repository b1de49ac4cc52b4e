//! ## Crate layout
//! - `core`: the runtime — key values, search structure, builder, and
//!   observability.
//!
//! The `prelude` module mirrors the runtime surface used by generated
//! lookup code; everything else stays one module level down.

pub use tabdex_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Re-exports
//

pub use tabdex_core::error::InternalError as Error;

///
/// Runtime Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        index::{Bound, Cut, RangeKey, SearchNode, TableIndex, TableIndexBuilder},
        model::{Cardinality, IndexPlan, LevelKind, RowKey},
        obs::{metrics_report, metrics_reset_all},
        types::{Date, Timestamp},
        value::Value,
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// TESTS
///
