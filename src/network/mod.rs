pub mod backend;
pub mod iwd;
pub mod manager;
pub mod provision;
pub mod table;
pub mod types;

pub use backend::{BackendKind, WirelessBackend};
pub use manager::WirelessManager;
