pub mod alert;
pub mod config;
pub mod filter;
pub mod packet;
pub mod snapshot;
pub mod stats;
pub mod traffic;
