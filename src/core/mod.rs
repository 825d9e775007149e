//! Core functionality for the document catalog, its records, and configuration

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
