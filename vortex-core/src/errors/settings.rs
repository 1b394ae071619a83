use thiserror::Error;

/// Malformed environment-variable overrides. Fatal at startup only.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("{var}=`{value}` is not a valid socket address")]
    BadBindAddr { var: &'static str, value: String },

    #[error("{var}=`{value}` is not a valid unsigned integer")]
    BadInteger { var: &'static str, value: String },
}
