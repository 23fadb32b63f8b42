//! `l2` command line interface: project scaffolding, user defaults and the smart account client

pub mod cli;
pub mod utils;
