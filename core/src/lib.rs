pub mod config;
pub mod display;
pub mod errors;
pub mod logger;
pub mod pages;
pub mod route;
pub mod session;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

use std::path::PathBuf;

use errors::DirectoryError;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "sekai-mylist")
}

/// Get the config directory for sekai-mylist.
///
/// | Platform | Value                                                        |
/// | -------- | ------------------------------------------------------------ |
/// | Linux    | `$XDG_CONFIG_HOME/sekai-mylist` or `$HOME/.config/sekai-mylist` |
/// | macOS    | `$HOME/Library/Application Support/sekai-mylist`             |
/// | Windows  | `{FOLDERID_RoamingAppData}\sekai-mylist\config`               |
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf, DirectoryError> {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(DirectoryError::Config)
}

/// Get the data directory for sekai-mylist, where the session token is kept.
///
/// | Platform | Value                                                          |
/// | -------- | -------------------------------------------------------------- |
/// | Linux    | `$XDG_DATA_HOME/sekai-mylist` or `$HOME/.local/share/sekai-mylist` |
/// | macOS    | `$HOME/Library/Application Support/sekai-mylist`               |
/// | Windows  | `{FOLDERID_RoamingAppData}\sekai-mylist\data`                   |
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn get_data_dir() -> Result<PathBuf, DirectoryError> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(DirectoryError::Data)
}

/// Format a duration as `seconds.millis`, e.g. `12.034`.
#[must_use]
pub fn format_duration(duration: &std::time::Duration) -> String {
    format!("{}.{:03}", duration.as_secs(), duration.subsec_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    #[case(Duration::from_millis(0), "0.000")]
    #[case(Duration::from_millis(1_500), "1.500")]
    #[case(Duration::from_millis(61_007), "61.007")]
    fn test_format_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(&duration), expected);
    }
}
