//! Experience types exchanged with the model.

pub mod buffer;

pub use buffer::{OnPolicyBuffer, SegmentReturns, Transition};
