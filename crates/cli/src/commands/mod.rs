//! Command implementations.

pub mod storage;
