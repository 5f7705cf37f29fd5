use axum::{http::StatusCode, response::{IntoResponse, Response}};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// A lookup by id found nothing; the str names the entity kind.
    NotFound(&'static str),
    /// Ownership check failed.
    Forbidden,
    Internal(anyhow::Error),
}

impl AppError {
    pub fn not_found(what: &'static str) -> Self {
        Self::NotFound(what)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                format!("No such {what}."),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "You are not allowed here!",
            )
                .into_response(),
            Self::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{}\n\n{}", err, err.backtrace()),
            )
                .into_response(),
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_carry_the_right_status() {
        let response = AppError::not_found("room").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = AppError::from(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
