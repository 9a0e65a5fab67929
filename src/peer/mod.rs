//! Peer-to-peer networking helpers.

pub mod atomic_reader;

pub use self::atomic_reader::AtomicReader;
