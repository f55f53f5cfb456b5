pub mod cmdline;
pub mod crash;
pub mod game;
pub mod gate;
pub mod language;
pub mod registry;
pub mod session;
pub mod settings;
pub mod shell;
pub mod startup;
pub mod update;
