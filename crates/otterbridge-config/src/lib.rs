//! Configuration system for the Otterbridge transcript gateway.
//!
//! Provides TOML-based configuration with:
//! - `[server]`, `[upstream]`, `[cache]` and `[credentials]` sections
//! - Config file layering (XDG user config + project-local overrides)
//! - Environment overrides (`OTTER_EMAIL`, `OTTER_PASSWORD`, `PORT`)
//!
//! Every section is optional; the `*_or_default` accessors fill gaps.

pub mod discovery;
pub mod env;
pub mod error;
pub mod types;

pub use discovery::{
    LoadedConfig, load_config, load_config_file, load_config_with_options,
    xdg_config_dir, xdg_config_path,
};
pub use env::{apply_env, apply_env_from};
pub use error::{ConfigError, Result};
pub use types::*;
