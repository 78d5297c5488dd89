use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use checkout::CheckoutError;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Not found".into()),
                RepositoryError::Conflict(msg) => HttpError::Conflict(msg),
                RepositoryError::AlreadyExists(msg) => HttpError::Conflict(msg),
                RepositoryError::ForeignKey(msg) => {
                    HttpError::BadRequest(format!("Foreign key violation: {msg}"))
                }
                _ => HttpError::Internal("Repository error".into()),
            },

            // checkout failures are caller mistakes, never 5xx; a rejected
            // status transition reads as a conflict with current state
            ServiceError::Checkout(checkout_err) => match checkout_err {
                CheckoutError::IllegalTransition { .. } => {
                    HttpError::Conflict(checkout_err.to_string())
                }
                _ => HttpError::BadRequest(checkout_err.to_string()),
            },

            ServiceError::Forbidden(msg) => HttpError::Forbidden(msg),

            ServiceError::Conflict(msg) => HttpError::Conflict(msg),

            ServiceError::Validation(errors) => {
                HttpError::BadRequest(format!("Validation failed: {errors:?}"))
            }

            ServiceError::Internal(msg) | ServiceError::Custom(msg) => HttpError::Internal(msg),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            message: msg,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout::OrderStatus;

    #[test]
    fn checkout_validation_errors_map_to_bad_request() {
        let err = ServiceError::Checkout(CheckoutError::EmptyCart);
        assert!(matches!(HttpError::from(err), HttpError::BadRequest(_)));
    }

    #[test]
    fn illegal_transition_maps_to_conflict() {
        let err = ServiceError::Checkout(CheckoutError::IllegalTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Shipping,
        });
        assert!(matches!(HttpError::from(err), HttpError::Conflict(_)));
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let err = ServiceError::Repo(RepositoryError::NotFound);
        assert!(matches!(HttpError::from(err), HttpError::NotFound(_)));
    }
}
