use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core and its settings.
///
/// The core performs no I/O; the `Io`/`Json` variants only surface when the
/// host loads [`Settings`](crate::Settings) from disk.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected start configuration (non-positive or non-finite mass/size, bad Pi mode).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Arena or integrator tunables that cannot produce a valid boundary.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidConfiguration("mass1 must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("mass1"));
    }

    #[test]
    fn json_errors_convert() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
