/// Suffix marking a uid as owned by polycal.
pub const UID_NAMESPACE: &str = "@polycal";

/// Longest uid a target calendar accepts.
pub const MAX_UID_LEN: usize = 255;

pub const DEFAULT_USER_AGENT: &str = "polycal";

pub const DEFAULT_PROVIDER: &str = "google";

/// Name of the config file inside a config directory.
pub const CONFIG_FILE_NAME: &str = "polycal.toml";
