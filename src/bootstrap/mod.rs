pub mod config;
pub mod paths;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_or_default};
pub use paths::AppPaths;
pub use wiring::{build_store, start_session};
