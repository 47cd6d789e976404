//! Application-wide constants.

/// The display name of the application; also names the config directory.
pub const APP_NAME: &str = "KeyViz";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "keyviz";

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
