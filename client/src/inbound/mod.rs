//! Inbound adapters that translate user input into domain service calls
//! while keeping framework details at the edge.

pub mod cli;
