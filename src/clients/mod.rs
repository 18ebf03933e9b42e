//! Clients - HTTP Clients for External APIs
//!
//! This module contains HTTP clients for communicating with external APIs.

pub mod token_client;

pub use token_client::PasswordGrantClient;
