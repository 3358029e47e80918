pub mod client;
pub mod types;
pub mod xml;

pub use client::{BindOutcome, UcsSession};
