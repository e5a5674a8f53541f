//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cookie mechanics (building, clearing, extraction)
//! - Client identification (IP and User-Agent extraction)
//! - Rate limiting infrastructure

pub mod client;
pub mod cookie;
pub mod rate_limit;
