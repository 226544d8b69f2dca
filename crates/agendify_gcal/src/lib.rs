// --- File: crates/agendify_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
#[cfg(test)]
mod auth_test;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod service;
