//! Task-incremental views over a fixed pool of labeled samples.
//!
//! The crate supports class-incremental learning (CIL), where each sample
//! has one label, and incremental implicitly-refined classification (IIRC),
//! where each sample has a superclass and an optional subclass.

mod common;
pub mod config;
mod dataset;
mod error;
mod loader;
mod options;
mod pool;
mod record;
mod schedule;
mod state;
mod transform;
mod view;
mod visibility;

pub use dataset::*;
pub use error::*;
pub use label::{HierarchyError, Label, LabelHierarchy, LabelKind, LabelTuple};
pub use loader::*;
pub use options::*;
pub use pool::*;
pub use record::*;
pub use schedule::*;
pub use state::*;
pub use transform::*;
pub use view::*;
pub use visibility::*;
