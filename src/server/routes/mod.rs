//! Server Routes
//!
//! Route handlers organized by functionality.

pub mod dashboard;
pub mod health;
pub mod readings;
