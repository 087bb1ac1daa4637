//! Field-level filter errors
//!
//! Every failure raised while compiling a filter map names the offending
//! field and literal, so an outer layer can turn it into a precise client
//! error without parsing messages.

use serde::Serialize;
use thiserror::Error;

/// Boxed parse failure kept as the error source
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Client-facing error categories, with the codes used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    EmptyValue,
    WrongFilterValue,
    WrongFilterOperator,
    InternalError,
}

impl ErrorType {
    pub fn code(&self) -> u16 {
        match self {
            ErrorType::EmptyValue => 201,
            ErrorType::WrongFilterValue => 202,
            ErrorType::WrongFilterOperator => 203,
            ErrorType::InternalError => 301,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorType::EmptyValue => "Field value is empty.",
            ErrorType::WrongFilterValue => "Field value is wrong.",
            ErrorType::WrongFilterOperator => "Field contains a wrong operator.",
            ErrorType::InternalError => {
                "Internal error occurred, please contact your administrator."
            }
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ErrorType::InternalError => 500,
            _ => 400,
        }
    }
}

/// Error raised while extracting a filter value.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A typed literal (number, identifier, date) failed to parse
    #[error("Field value is wrong: unable to parse '{value}' as {type_name} for field '{field}'")]
    WrongFilterValue {
        field: String,
        type_name: &'static str,
        value: String,
        #[source]
        cause: Option<Cause>,
    },

    /// A range is missing one of its bounds
    #[error("Field value is empty: missing {type_name} bound in '{value}' for field '{field}'")]
    EmptyValue {
        field: String,
        type_name: &'static str,
        value: String,
    },

    /// An operator token embedded in the value is not allowed there
    #[error("Field contains a wrong operator: '{value}' for field '{field}'")]
    WrongFilterOperator { field: String, value: String },

    /// A literal does not name a member of a strictly parsed enumeration
    #[error("Invalid {type_name} format: Unable to parse the value '{value}' as an {type_name}.")]
    InvalidEnum {
        type_name: &'static str,
        field: String,
        value: String,
    },

    /// A derived operator was not recognised; never caused by client input
    #[error("Unknown filter operator '{token}'")]
    UnknownOperator { token: String },
}

impl FilterError {
    pub fn wrong_value(
        field: impl Into<String>,
        type_name: &'static str,
        value: impl Into<String>,
        cause: impl Into<Cause>,
    ) -> Self {
        FilterError::WrongFilterValue {
            field: field.into(),
            type_name,
            value: value.into(),
            cause: Some(cause.into()),
        }
    }

    /// Name of the offending field, when the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            FilterError::WrongFilterValue { field, .. }
            | FilterError::EmptyValue { field, .. }
            | FilterError::WrongFilterOperator { field, .. }
            | FilterError::InvalidEnum { field, .. } => Some(field),
            FilterError::UnknownOperator { .. } => None,
        }
    }

    /// Offending literal as received
    pub fn value(&self) -> Option<&str> {
        match self {
            FilterError::WrongFilterValue { value, .. }
            | FilterError::EmptyValue { value, .. }
            | FilterError::WrongFilterOperator { value, .. }
            | FilterError::InvalidEnum { value, .. } => Some(value),
            FilterError::UnknownOperator { .. } => None,
        }
    }

    /// Filter category or enumeration type that was attempted
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            FilterError::WrongFilterValue { type_name, .. }
            | FilterError::EmptyValue { type_name, .. }
            | FilterError::InvalidEnum { type_name, .. } => Some(type_name),
            FilterError::WrongFilterOperator { .. } | FilterError::UnknownOperator { .. } => None,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            FilterError::WrongFilterValue { .. } | FilterError::InvalidEnum { .. } => {
                ErrorType::WrongFilterValue
            }
            FilterError::EmptyValue { .. } => ErrorType::EmptyValue,
            FilterError::WrongFilterOperator { .. } => ErrorType::WrongFilterOperator,
            FilterError::UnknownOperator { .. } => ErrorType::InternalError,
        }
    }

    /// Serializable view for the error-handling layer
    pub fn to_dto(&self) -> ErrorDto {
        let error_type = self.error_type();
        ErrorDto {
            code: error_type.code(),
            message: error_type.message().to_string(),
            field: self.field().map(str::to_string),
            value: self.value().map(str::to_string),
            cause: Some(self.to_string()),
        }
    }
}

/// Error body handed to the HTTP layer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorDto {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_enum_message() {
        let error = FilterError::InvalidEnum {
            type_name: "AccessControlType",
            field: "type".to_string(),
            value: "bad".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid AccessControlType format: Unable to parse the value 'bad' as an AccessControlType."
        );
        assert_eq!(error.type_name(), Some("AccessControlType"));
        assert_eq!(error.field(), Some("type"));
        assert_eq!(error.value(), Some("bad"));
        assert_eq!(error.error_type(), ErrorType::WrongFilterValue);
    }

    #[test]
    fn test_wrong_value_keeps_cause() {
        let cause = "x".parse::<i64>().unwrap_err();
        let error = FilterError::wrong_value("id", "number", "x", cause);
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(error.error_type().code(), 202);
    }

    #[test]
    fn test_dto_serialization() {
        let error = FilterError::WrongFilterOperator {
            field: "insertDate".to_string(),
            value: "2019-01-01 00:00:00aa2019-01-02 00:00:00".to_string(),
        };
        let json = serde_json::to_value(error.to_dto()).unwrap();
        assert_eq!(json["code"], 203);
        assert_eq!(json["message"], "Field contains a wrong operator.");
        assert_eq!(json["field"], "insertDate");
    }

    #[test]
    fn test_unknown_operator_is_internal() {
        let error = FilterError::UnknownOperator {
            token: "zz".to_string(),
        };
        assert_eq!(error.error_type(), ErrorType::InternalError);
        assert_eq!(error.error_type().http_status(), 500);
        assert_eq!(error.field(), None);
        let dto = error.to_dto();
        assert_eq!(dto.field, None);
        assert_eq!(dto.code, 301);
    }
}
