//! Integration test common infrastructure.
//!
//! Provides utilities for spawning in-process API servers and a small HTTP
//! client for driving them.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
