//! # pipemon-path
//!
//! Field path templates evaluated against reflected records.
//!
//! This crate provides:
//! - [`Value`], the dynamic value tree records are reflected into
//! - [`Reflect`], the introspection trait producing that tree
//! - [`PathTemplate`], a JSONPath-style template language (the Kubernetes
//!   dialect: `{.status.startTime}`, `{.items[*].name}`, `{..name}`,
//!   `{.items[?(@.type=="Succeeded")].status}`)
//!
//! ## Usage
//!
//! ```ignore
//! use pipemon_path::{PathTemplate, Reflect};
//!
//! let template = PathTemplate::concat(".status.startTime", ".status.completionTime")?;
//! let results = template.find_results(&run.reflect())?;
//! assert_eq!(results.len(), 2);
//! ```
//!
//! No other pipemon crate inspects record structure directly; everything
//! goes through [`PathTemplate::find_results`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod eval;
mod parser;
mod reflect;
mod value;

pub use error::{PathError, PathResult};
pub use parser::{wrap_action, CmpOp, Filter, Literal, PathTemplate, Segment, Selector, Step};
pub use reflect::Reflect;
pub use value::{TimeRepr, Value};
