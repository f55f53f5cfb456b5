pub mod error;
pub mod game;
pub mod gate;
pub mod locale;
pub mod paths;
pub mod session;
pub mod slot;
pub mod update;
