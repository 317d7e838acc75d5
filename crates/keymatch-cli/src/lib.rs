//! Library side of the keymatch command-line tool.

pub mod logging;
pub mod pipeline;
pub mod profile;
