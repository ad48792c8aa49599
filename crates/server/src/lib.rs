//! Userhub server library.
//!
//! This crate provides the user CRUD service as a library, allowing the
//! router to be tested and reused without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod validate;
