mod database;
mod sessions;
mod state_builder;

pub use database::connect_and_migrate;
pub use sessions::{build_memory_session_layer, build_postgres_session_layer};
pub use state_builder::{build_memory_app_state, build_postgres_app_state};
