//! Institute site library
//!
//! Backend for the institute website: admissions, alumni, news,
//! publications, contact messages and site settings, served as a JSON API
//! over a file-backed or SQLite-backed store.

pub mod api;
pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod resources;
pub mod services;
pub mod storage;
