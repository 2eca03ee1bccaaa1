//! Command-line front end for ffthumb.

pub mod cli;
pub mod logging;
