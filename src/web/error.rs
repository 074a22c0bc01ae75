use crate::state::ActionError;
use crate::web::pages;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Action(#[from] ActionError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            WebError::Action(ActionError::NoWallet) => (StatusCode::CONFLICT, self.to_string()),
            WebError::Action(ActionError::Busy) => (StatusCode::CONFLICT, self.to_string()),
            WebError::Action(ActionError::Invalid(_)) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            WebError::Action(ActionError::Failed(_)) => (StatusCode::BAD_GATEWAY, self.to_string()),
            WebError::Action(ActionError::Storage(e)) => {
                error!("Storage failure while serving request: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Wallet storage error".to_string())
            }
        };

        (status, Html(pages::error_page(status, &message))).into_response()
    }
}
