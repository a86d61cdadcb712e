//! Types for the user-facing API

pub mod transaction;
pub mod wallet;

pub use transaction::EvmTransaction;
pub use wallet::{ExportedWalletData, TypedData, TypedDataField, WalletIdentity};
