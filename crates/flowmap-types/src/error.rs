//! Error types for flowmap.

use std::io;

/// Errors produced by the flowmap framework.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("graph error: {0}")]
    Graph(String),

    #[error("navigation error: {0}")]
    Navigation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_display() {
        let e = FlowError::Graph("start node missing".into());
        assert_eq!(format!("{e}"), "graph error: start node missing");
    }

    #[test]
    fn navigation_error_display() {
        let e = FlowError::Navigation("bad step".into());
        assert_eq!(format!("{e}"), "navigation error: bad step");
    }

    #[test]
    fn config_error_display() {
        let e = FlowError::Config("scale_min must be positive".into());
        assert_eq!(format!("{e}"), "config error: scale_min must be positive");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: FlowError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: FlowError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: FlowError = json_err.into();
        assert!(format!("{e}").contains("JSON error"));
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(FlowError::Graph("oops".into()));
        assert!(r.is_err());
    }
}
