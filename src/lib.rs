pub mod command;
pub mod config;
pub mod detect;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod net;
pub mod system;
pub mod wasm;
