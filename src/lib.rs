pub mod config;
pub mod corrector;
pub mod engine;
pub mod error;
pub mod fixlist;
pub mod identity;
pub mod messages;
pub mod protocol;
pub mod quota;
pub mod server;
pub mod storage;
pub mod utils;

pub use engine::ReconciliationEngine;
pub use server::Server;
