//! Discuss and Snippets.
//!
//! Two small server-rendered web applications over one SQLite database: a
//! discussion forum with topics, posts and search, and a code snippet
//! manager.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod actions;
pub mod auth;
pub mod components;
pub mod config;
pub mod db;
pub mod forms;
pub mod paths;
pub mod web;
