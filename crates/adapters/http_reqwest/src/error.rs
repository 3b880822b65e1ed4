//! HTTP adapter error types.

use salon_domain::error::{NotFoundError, SalonError};

/// Errors specific to the HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The configured base URL, or a path joined onto it, is not a valid URL.
    #[error("invalid API url: {0}")]
    InvalidUrl(String),

    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("HTTP request failed")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{method} {path} returned {status}: {message}")]
    Status {
        method: reqwest::Method,
        path: String,
        status: u16,
        message: String,
    },

    /// A success response whose body did not match the expected shape.
    #[error("failed to decode response body")]
    Decode(#[source] reqwest::Error),
}

impl HttpError {
    /// Convert into a [`SalonError`] for propagation across port boundaries.
    ///
    /// Status codes keep their meaning: 401 and 403 become session errors,
    /// 404 becomes [`SalonError::NotFound`] and the remaining 4xx codes carry
    /// the server's message as [`SalonError::Rejected`].
    pub fn into_domain(self) -> SalonError {
        match self {
            Self::Status { status: 401, .. } => SalonError::Unauthorized,
            Self::Status { status: 403, .. } => SalonError::Forbidden,
            Self::Status {
                status: 404, path, ..
            } => SalonError::NotFound(NotFoundError {
                entity: "resource",
                id: path,
            }),
            Self::Status {
                status: 400..=499,
                message,
                ..
            } => SalonError::Rejected(message),
            other => SalonError::Transport(Box::new(other)),
        }
    }
}

impl From<HttpError> for SalonError {
    fn from(err: HttpError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, message: &str) -> HttpError {
        HttpError::Status {
            method: reqwest::Method::POST,
            path: "cars/1/rent".to_string(),
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn should_display_status_error_with_request_and_message() {
        assert_eq!(
            status(409, "Car already rented").to_string(),
            "POST cars/1/rent returned 409: Car already rented"
        );
    }

    #[test]
    fn should_convert_401_to_unauthorized() {
        assert!(matches!(status(401, "x").into_domain(), SalonError::Unauthorized));
    }

    #[test]
    fn should_convert_403_to_forbidden() {
        assert!(matches!(status(403, "x").into_domain(), SalonError::Forbidden));
    }

    #[test]
    fn should_convert_404_to_not_found_with_path() {
        let err: SalonError = status(404, "Car not found").into();
        match err {
            SalonError::NotFound(nf) => assert_eq!(nf.id, "cars/1/rent"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn should_convert_other_client_errors_to_rejected_with_message() {
        let err: SalonError = status(400, "Car is not available").into();
        match err {
            SalonError::Rejected(msg) => assert_eq!(msg, "Car is not available"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn should_convert_server_errors_to_transport() {
        assert!(matches!(
            status(500, "boom").into_domain(),
            SalonError::Transport(_)
        ));
        assert!(matches!(
            HttpError::InvalidUrl("nope".to_string()).into_domain(),
            SalonError::Transport(_)
        ));
    }
}
