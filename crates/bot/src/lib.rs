//! The message-processing pipeline: admission, context assembly, completion,
//! dispatch, and audit. Gateway connectors feed events into [`Pipeline`].

pub mod context;
pub mod dispatch;
pub mod error;
pub mod pipeline;

pub use {
    error::{PipelineError, Result},
    pipeline::{Outcome, Pipeline},
};
