use crate::consts::{APP_NAME, HOME_ENV};
use std::path::PathBuf;

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  std::env::var_os("USERPROFILE").map(PathBuf::from).unwrap_or_default()
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default()
}

/// Returns the directory where vessel and its providers keep machine data.
///
/// `VESSEL_HOME` takes precedence over the platform default.
pub fn data_dir() -> PathBuf {
  match std::env::var_os(HOME_ENV) {
    Some(dir) if !dir.is_empty() => PathBuf::from(dir),
    _ => default_data_dir(),
  }
}

#[cfg(windows)]
fn default_data_dir() -> PathBuf {
  std::env::var_os("APPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|| home_dir().join("AppData").join("Roaming"))
    .join(APP_NAME)
}

#[cfg(not(windows))]
fn default_data_dir() -> PathBuf {
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}
