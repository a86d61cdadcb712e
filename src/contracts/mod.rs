//! Contract bindings for typed reads through the wallet provider

pub mod erc20;

pub use erc20::*;
