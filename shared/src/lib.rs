//! Shepherd shared types.
//!
//! Wire models exchanged between the REST backend and its clients, plus the
//! pure display computations (derived member/community fields, the retention
//! scan, finance and dashboard aggregates) that run over fetched collections.

pub mod insights;
pub mod models;
