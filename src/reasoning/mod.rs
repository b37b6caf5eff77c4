//! AI reasoning - model-mediated tool selection and schema transformation
//!
//! Free-form model output is treated as a small wire protocol: each reply is
//! run through a parser with a fixed grammar, and anything that does not fit
//! is a failure rather than a guess.

mod adapter;
mod selection;
mod transform;

pub use adapter::ReasoningAdapter;
pub use selection::{SelectionOutcome, parse_selection};
pub use transform::{clean_json, extract_json, parse_transformation};
