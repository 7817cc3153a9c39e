//! Command implementations for the ZMap CLI

pub mod bump;
pub mod simulate;
