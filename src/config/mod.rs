//! Manager configuration.
//!
//! [`ManagerConfig`] carries the limits a manager enforces when pools are
//! initialized and swapped. It can be built in code or loaded from TOML;
//! both paths validate before returning.

mod manager_config;

pub use manager_config::ManagerConfig;
