//! User Registry server library.
//!
//! Id generation, the storage engine, the registry service and the HTTP
//! layer, exposed as a library so the binary and the integration tests share
//! them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
