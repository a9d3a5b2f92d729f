pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod pokemon;
pub mod store;
pub mod views;

pub use client::*;
pub use config::*;
pub use error::*;
pub use pokemon::*;
pub use store::*;
