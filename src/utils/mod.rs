//! Host helpers: paths and external commands

pub mod paths;
pub mod system;
