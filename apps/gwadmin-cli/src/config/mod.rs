//! Configuration management for the gwadmin CLI

mod settings;
mod template;

pub use settings::{
    BatchSettings, CredentialsSettings, DirectorySettings, GroupMappings, ProvisionSettings,
    Settings,
};
pub use template::{write_starter_config, STARTER_CONFIG};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "GWADMIN_CONFIG";

/// Configuration file used when neither `--config` nor `GWADMIN_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";
