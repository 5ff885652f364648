//! Request body extractors.
//!
//! Both reject with [`AppError`] so that handlers taking
//! `Result<Extractor, AppError>` can render extraction failures in the
//! configured response format.

use axum::Form;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Body accepted as JSON or `application/x-www-form-urlencoded`.
///
/// Any other content type, including none, is `415 Unsupported Media Type`.
#[derive(Debug, Clone)]
pub struct JsonOrForm<T>(pub T);

/// Body parsed as JSON whatever the declared content type.
#[derive(Debug, Clone)]
pub struct LenientJson<T>(pub T);

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
}

fn body_kind(content_type: &str) -> Option<BodyKind> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/json" || essence.ends_with("+json") {
        Some(BodyKind::Json)
    } else if essence == "application/x-www-form-urlencoded" {
        Some(BodyKind::Form)
    } else {
        None
    }
}

/// Keep an oversized body's 413; any other body failure is unexpected.
fn body_rejection(status: StatusCode, detail: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(detail)
    } else {
        AppError::Unexpected(detail)
    }
}

async fn parse_json<T, S>(req: Request, state: &S) -> Result<T, AppError>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    let bytes = Bytes::from_request(req, state)
        .await
        .map_err(|e| body_rejection(e.status(), e.body_text()))?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::Unexpected(format!("invalid JSON body: {e}")))
}

impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();

        match body_kind(&content_type) {
            Some(BodyKind::Json) => parse_json(req, state).await.map(Self),
            Some(BodyKind::Form) => {
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(|e| body_rejection(e.status(), e.body_text()))?;
                Ok(Self(value))
            }
            None if content_type.is_empty() => {
                Err(AppError::UnsupportedMediaType("none".to_string()))
            }
            None => Err(AppError::UnsupportedMediaType(content_type)),
        }
    }
}

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        parse_json(req, state).await.map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[test]
    fn test_body_kind() {
        assert_eq!(body_kind("application/json"), Some(BodyKind::Json));
        assert_eq!(
            body_kind("Application/JSON; charset=utf-8"),
            Some(BodyKind::Json)
        );
        assert_eq!(body_kind("application/vnd.api+json"), Some(BodyKind::Json));
        assert_eq!(
            body_kind("application/x-www-form-urlencoded"),
            Some(BodyKind::Form)
        );
        assert_eq!(body_kind("text/plain"), None);
        assert_eq!(body_kind(""), None);
    }

    #[tokio::test]
    async fn test_json_or_form_accepts_both() {
        let JsonOrForm(json) =
            JsonOrForm::<Named>::from_request(request(Some("application/json"), r#"{"name":"a"}"#), &())
                .await
                .unwrap();
        assert_eq!(json.name, "a");

        let JsonOrForm(form) = JsonOrForm::<Named>::from_request(
            request(Some("application/x-www-form-urlencoded"), "name=b"),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(form.name, "b");
    }

    #[tokio::test]
    async fn test_json_or_form_rejects_other_types() {
        let err = JsonOrForm::<Named>::from_request(request(Some("text/plain"), "name=c"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let err = JsonOrForm::<Named>::from_request(request(None, "name=c"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_malformed_body_is_unexpected() {
        let err = JsonOrForm::<Named>::from_request(request(Some("application/json"), "{"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_lenient_json_ignores_content_type() {
        let LenientJson(named) =
            LenientJson::<Named>::from_request(request(Some("text/plain"), r#"{"name":"d"}"#), &())
                .await
                .unwrap();
        assert_eq!(named.name, "d");

        let err = LenientJson::<Named>::from_request(request(None, ""), &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_oversized_body_keeps_payload_too_large() {
        // One byte past the default 2 MiB body limit.
        let body = vec![b' '; 2 * 1024 * 1024 + 1];
        for content_type in ["application/json", "application/x-www-form-urlencoded"] {
            let req = Request::builder()
                .method("POST")
                .uri("/")
                .header(CONTENT_TYPE, content_type)
                .body(Body::from(body.clone()))
                .unwrap();
            let err = JsonOrForm::<Named>::from_request(req, &()).await.unwrap_err();
            assert!(matches!(err, AppError::PayloadTooLarge(_)), "{content_type}: {err}");
            assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        }
    }
}
