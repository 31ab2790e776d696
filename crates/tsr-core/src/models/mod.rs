//! Data models for term sheet review.

pub mod config;
pub mod document;
pub mod field;
