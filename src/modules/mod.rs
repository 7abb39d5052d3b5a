//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the persistence provider and object storage clients the DAL is
//! built on.

pub mod persistence;
pub mod storage;
