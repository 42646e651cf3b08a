//! Shopify feeds service library.
//!
//! This crate provides the feeds service as a library, allowing the router
//! to be exercised in integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod shopify;
pub mod state;
