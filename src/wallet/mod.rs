//! Wallet key derivation and mnemonic helpers.

pub mod extended_key;
pub mod mnemonic;

pub use self::extended_key::{ExtendedKey, ExtendedKeyType};
pub use self::mnemonic::Wordlist;
