//! Handle resolution module
//!
//! Turns a human-readable handle into the API's stable account identifier
//! with a single lookup call.

mod resolver;

pub use resolver::{HandleResolver, LOOKUP_PATH};
