//! Default values for configuration options.

/// The service starts disabled unless configured otherwise.
pub const ENABLED: bool = false;

/// Configuration file written by `init` when no path is given.
pub const CONFIG_FILE: &str = "alertmanager-relay.toml";

/// Message carried by self-test options.
pub const TEST_MESSAGE: &str = "test alertmanager message";
