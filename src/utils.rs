pub mod host;
pub mod lock;
pub mod logging;
pub mod process;
pub mod toml;
