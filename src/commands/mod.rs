pub mod agent;

pub use agent::handle_command;
