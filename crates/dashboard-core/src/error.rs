use crate::EndpointKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Transport error on {endpoint}: {message}")]
    Transport {
        endpoint: EndpointKind,
        status: Option<u16>,
        message: String,
    },

    #[error("Parse error on {endpoint}: {message}")]
    Parse {
        endpoint: EndpointKind,
        message: String,
    },

    #[error("Provider error on {endpoint}: {message}")]
    Provider {
        endpoint: EndpointKind,
        message: String,
    },

    #[error("Schema error on {endpoint}: field '{field}' missing from provider record")]
    Schema {
        endpoint: EndpointKind,
        field: String,
    },

    #[error("Field not found: {field}")]
    FieldNotFound { field: String },

    #[error("Insufficient data for {field}: {rows} row(s), need at least 2")]
    InsufficientData { field: String, rows: usize },

    #[error("Missing value for {field} in period {period}")]
    MissingValue { field: String, period: String },

    #[error("Undefined change for {field}: previous value is zero")]
    ZeroBaseline { field: String },

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl DashboardError {
    pub fn transport(
        endpoint: EndpointKind,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Transport {
            endpoint,
            status,
            message: message.into(),
        }
    }

    pub fn parse(endpoint: EndpointKind, message: impl Into<String>) -> Self {
        Self::Parse {
            endpoint,
            message: message.into(),
        }
    }

    pub fn schema(endpoint: EndpointKind, field: impl Into<String>) -> Self {
        Self::Schema {
            endpoint,
            field: field.into(),
        }
    }

    /// Endpoint the error originated from, for fetch and normalization failures.
    pub fn endpoint(&self) -> Option<EndpointKind> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Parse { endpoint, .. }
            | Self::Provider { endpoint, .. }
            | Self::Schema { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }

    /// HTTP status for transport failures that got as far as a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Sentence shown to the user in place of the failed section.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Parse { endpoint, .. }
            | Self::Provider { endpoint, .. }
            | Self::Schema { endpoint, .. } => format!(
                "Not possible to retrieve {} for that ticker. Please check if it's valid and try again.",
                endpoint.label().to_lowercase()
            ),
            Self::FieldNotFound { field } => format!("{} is not available.", field),
            Self::InsufficientData { field, .. } => {
                format!("Not enough reporting periods to compare {}.", field)
            }
            Self::MissingValue { field, period } => {
                format!("{} is not reported for {}.", field, period)
            }
            Self::ZeroBaseline { field } => {
                format!("{} change is undefined from a zero baseline.", field)
            }
            Self::InvalidSymbol(_) => "Please input a ticker.".to_string(),
            Self::Config(msg) => format!("Configuration problem: {}", msg),
            Self::Export(_) => "Data not available for download".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_and_status_accessors() {
        let err = DashboardError::transport(EndpointKind::Ratios, Some(503), "Service Unavailable");
        assert_eq!(err.endpoint(), Some(EndpointKind::Ratios));
        assert_eq!(err.status(), Some(503));

        let err = DashboardError::FieldNotFound { field: "ROE".to_string() };
        assert_eq!(err.endpoint(), None);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_user_message_names_section() {
        let err = DashboardError::schema(EndpointKind::BalanceSheet, "totalAssets");
        let msg = err.user_message();
        assert!(msg.contains("balance sheet"));
        assert!(!msg.contains("totalAssets"));
    }
}
