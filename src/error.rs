use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("degenerate alignment: {field} is zero")]
    DegenerateAlignment { field: &'static str },
    #[error("malformed alignment record at `{field}`: {message}")]
    MalformedRecord { field: String, message: String },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}: {message}")]
    Runtime {
        context: &'static str,
        message: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl AlignmentError {
    pub(crate) fn degenerate(field: &'static str) -> Self {
        Self::DegenerateAlignment { field }
    }

    pub(crate) fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn runtime(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Field path of a malformed record, if this is a decode failure.
    pub fn malformed_field(&self) -> Option<&str> {
        match self {
            Self::MalformedRecord { field, .. } => Some(field),
            _ => None,
        }
    }
}
