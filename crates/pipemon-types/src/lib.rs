//! # pipemon-types
//!
//! Core data types for pipemon.
//!
//! This crate provides:
//! - Tekton-shaped run records ([`PipelineRun`], [`TaskRun`]) and the
//!   [`RunRecord`] envelope used to load them from JSON
//! - Monitor configuration ([`MonitorSpec`], [`MetricSpec`], [`DurationSpec`])
//!
//! Every record type implements [`pipemon_path::Reflect`] using the same
//! camelCase field names it has on the wire, so a path written against the
//! JSON form of a run resolves against the typed form too.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod meta;
mod monitor;
mod pipelinerun;
mod record;
mod taskrun;

pub use error::{TypesError, TypesResult};
pub use meta::{Condition, ObjectMeta, Param};
pub use monitor::{CounterSpec, DurationSpec, GaugeSpec, HistogramSpec, MetricKind, MetricSpec, MonitorSpec};
pub use pipelinerun::{ChildStatusReference, PipelineRef, PipelineRun, PipelineRunSpec, PipelineRunStatus};
pub use record::RunRecord;
pub use taskrun::{StepState, TaskRef, TaskRun, TaskRunSpec, TaskRunStatus, TerminatedState};
