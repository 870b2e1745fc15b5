use std::fmt;
use std::time::Duration;

/// Errors raised at the panel's component boundaries.
///
/// None of these ever reach the top level: the executor folds them into a
/// `CommandResult`, the network fetcher turns them into placeholder text.
#[derive(Debug)]
pub enum PanelError {
    Io(std::io::Error),
    Timeout { what: &'static str, after: Duration },
    Resolve(String),
    Network(String),
    Serialization(String),
    DependencyMissing(&'static str),
    Config(String),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::Io(err) => write!(f, "{err}"),
            PanelError::Timeout { what, after } => {
                write!(f, "{what} timed out after {} seconds", after.as_secs())
            }
            PanelError::Resolve(msg) => write!(f, "Name resolution failed: {msg}"),
            PanelError::Network(msg) => write!(f, "Network error: {msg}"),
            PanelError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            PanelError::DependencyMissing(name) => write!(f, "Dependency missing: {name}"),
            PanelError::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanelError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PanelError {
    fn from(err: std::io::Error) -> Self {
        PanelError::Io(err)
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(err: serde_json::Error) -> Self {
        PanelError::Serialization(err.to_string())
    }
}

#[cfg(feature = "public-ip")]
impl From<reqwest::Error> for PanelError {
    fn from(err: reqwest::Error) -> Self {
        PanelError::Network(err.to_string())
    }
}

pub type PanelResult<T> = Result<T, PanelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = PanelError::Timeout {
            what: "command",
            after: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "command timed out after 10 seconds");
    }

    #[test]
    fn test_from_serde_json() {
        let err: PanelError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, PanelError::Serialization(_)));
    }

    #[test]
    fn test_io_keeps_source() {
        use std::error::Error;
        let err: PanelError = std::io::Error::new(std::io::ErrorKind::NotFound, "no sh").into();
        assert_eq!(err.to_string(), "no sh");
        assert!(err.source().is_some());
    }
}
