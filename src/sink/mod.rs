//! Output boundary: batch persistence of finished record collections.

pub(crate) mod json;
pub(crate) mod sqlite;

pub use json::JsonSink;
pub use sqlite::{SinkStats, SqliteSink};
