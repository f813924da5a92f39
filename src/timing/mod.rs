//! Time expression handling.
//!
//! Users describe placement in free text ("from 2 sec for 10 sec",
//! "at 1:30", "make it 500ms long"). This module turns those expressions
//! into seconds and completes the start/duration/end triple of a tool call.

mod normalize;
mod parse;

pub use normalize::{normalize, TimeSpec, DURATION_KEY, END_KEY, START_KEY};
pub use parse::parse_seconds;
