//! Domains module containing the capabilities the server offers.
//!
//! - **tools**: named operations with validated argument records
//! - **resources**: read-only documents addressed by URI or URI template

pub mod resources;
pub mod tools;
