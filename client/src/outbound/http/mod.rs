//! HTTP adapter for the LoanFlow backend.

mod dto;
mod gateway;

pub use gateway::HttpGateway;
