use reqwest::StatusCode;

/// Failures of a single request to the controller. These never leave the
/// dashboard; they end up as critical alerts.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Network(#[source] reqwest::Error),

    #[error("HTTP {}", .status.as_u16())]
    Protocol { status: StatusCode },

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ClientError::Protocol { status }
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_message() {
        let err = ClientError::Protocol {
            status: StatusCode::SERVICE_UNAVAILABLE,
        };

        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[test]
    fn test_decode_from_serde() {
        let err: ClientError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();

        assert!(matches!(err, ClientError::Decode(_)));
        assert!(err.to_string().starts_with("Invalid response body"));
    }
}
