//! Contract bindings for the lending program's order records

pub mod obligation_order;

pub use obligation_order::*;
