pub const APP_NAME: &str = "vessel";

/// Environment file looked up in the working directory by default.
pub const ENVIRONMENT_FILE: &str = "Vessel.toml";

/// Overrides the data directory when set.
pub const HOME_ENV: &str = "VESSEL_HOME";
