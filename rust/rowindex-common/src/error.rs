use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// A malformed or incomplete request (blank field name, missing value, unknown field).
    pub fn validation(message: impl Into<String>) -> Error {
        Error(
            ErrorKind::Validation {
                message: message.into(),
            }
            .into(),
        )
    }

    /// A literal that could not be parsed into the field's logical type.
    ///
    /// `pattern` is set for pattern-driven types (dates).
    pub fn parse(field: impl Into<String>, value: impl Into<String>, pattern: Option<&str>) -> Error {
        Error(
            ErrorKind::Parse {
                field: field.into(),
                value: value.into(),
                pattern: pattern.map(str::to_string),
            }
            .into(),
        )
    }

    /// A native value whose runtime representation is not accepted by the field's type.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidValue {
                field: field.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn unsupported_operation(condition: impl Into<String>, mapper: impl Into<String>) -> Error {
        Error(
            ErrorKind::UnsupportedOperation {
                condition: condition.into(),
                mapper: mapper.into(),
            }
            .into(),
        )
    }

    pub fn empty_analysis(field: impl Into<String>, value: impl Into<String>) -> Error {
        Error(
            ErrorKind::EmptyAnalysis {
                field: field.into(),
                value: value.into(),
            }
            .into(),
        )
    }

    pub fn schema(
        field: impl Into<String>,
        option: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error(
            ErrorKind::Schema {
                field: field.into(),
                option: option.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Error {
        Error(
            ErrorKind::Json {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse { .. })
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidValue { .. })
    }

    pub fn is_unsupported_operation(&self) -> bool {
        matches!(self.kind(), ErrorKind::UnsupportedOperation { .. })
    }

    pub fn is_empty_analysis(&self) -> bool {
        matches!(self.kind(), ErrorKind::EmptyAnalysis { .. })
    }

    pub fn is_schema(&self) -> bool {
        matches!(self.kind(), ErrorKind::Schema { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error(
        "field {field}: the string '{value}' cannot be parsed{}",
        .pattern.as_deref().map(|p| format!(", it does not satisfy the pattern {p}")).unwrap_or_default()
    )]
    Parse {
        field: String,
        value: String,
        pattern: Option<String>,
    },

    #[error("field {field}: invalid value: {message}")]
    InvalidValue { field: String, message: String },

    #[error("{condition} conditions are not supported by {mapper} mapper")]
    UnsupportedOperation { condition: String, mapper: String },

    #[error("field {field}: value '{value}' discarded by analyzer")]
    EmptyAnalysis { field: String, value: String },

    #[error("invalid schema for field '{field}', option '{option}': {message}")]
    Schema {
        field: String,
        option: String,
        message: String,
    },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("JSON error for '{context}': {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::json("", e)
    }
}
