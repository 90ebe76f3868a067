use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::pipeline::PipelineError;

const BAD_PARAMETERS: &str = "Bad Parameters";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad parameters: {0}")]
    BadParameters(String),

    #[error("{error}")]
    Pipeline {
        error: PipelineError,
        distinct_status: bool,
    },
}

impl ApiError {
    pub fn pipeline(error: PipelineError, distinct_status: bool) -> Self {
        ApiError::Pipeline {
            error,
            distinct_status,
        }
    }

    /// Every failure is 400 unless distinct statuses are switched on
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadParameters(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline {
                distinct_status: false,
                ..
            } => StatusCode::BAD_REQUEST,
            ApiError::Pipeline { error, .. } => match error {
                PipelineError::Fetch(_) | PipelineError::Decode(_) => StatusCode::BAD_GATEWAY,
                PipelineError::Map(_) => StatusCode::UNPROCESSABLE_ENTITY,
                PipelineError::Build(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Body text; internal detail never leaves the process
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadParameters(_) => BAD_PARAMETERS,
            ApiError::Pipeline { error, .. } => error.public_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())],
            self.message(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::BuildError;
    use crate::feed::FetchError;
    use crate::publication::MapError;

    fn all_failures() -> Vec<PipelineError> {
        vec![
            PipelineError::Fetch(FetchError::Status(503)),
            PipelineError::Map(MapError::EmptyFeed),
            PipelineError::Build(BuildError::InvalidPackage("x".into())),
        ]
    }

    #[test]
    fn parity_mode_is_always_bad_request() {
        for error in all_failures() {
            assert_eq!(
                ApiError::pipeline(error, false).status_code(),
                StatusCode::BAD_REQUEST
            );
        }
        assert_eq!(
            ApiError::BadParameters("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn distinct_mode_separates_failure_kinds() {
        let statuses: Vec<_> = all_failures()
            .into_iter()
            .map(|e| ApiError::pipeline(e, true).status_code())
            .collect();

        assert_eq!(
            statuses,
            [
                StatusCode::BAD_GATEWAY,
                StatusCode::UNPROCESSABLE_ENTITY,
                StatusCode::INTERNAL_SERVER_ERROR
            ]
        );
    }

    #[test]
    fn messages_hide_detail() {
        let err = ApiError::BadParameters("scheme ftp not allowed".into());
        assert_eq!(err.message(), "Bad Parameters");

        let err = ApiError::pipeline(PipelineError::Fetch(FetchError::Status(404)), false);
        assert_eq!(err.message(), "Server error");
    }
}
