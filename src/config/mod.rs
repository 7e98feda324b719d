//! Configuration: YAML schema, loading and backend wiring.

pub mod loader;
pub mod schema;

pub use loader::{
    apply_env_overrides, default_config_path, load, load_roster, load_with_env,
    open_record_source,
};
pub use schema::{MmaMathConfig, RecordBackend, RecordsConfig, SearchConfig};
