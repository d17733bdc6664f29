//! RollCall host: bootstrap wiring and the command-line front end.

pub mod bootstrap;
pub mod cli;
