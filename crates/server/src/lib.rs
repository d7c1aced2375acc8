//! ArtConnect server library.
//!
//! This crate provides the marketplace API as a library, allowing the
//! router to be driven in-process by integration tests and reused by
//! other tooling.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
