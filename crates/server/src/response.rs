//! Response formatting strategy.
//!
//! Every endpoint produces an [`Ack`] on success or a status plus message on
//! failure. [`ResponseFormat`] renders both, either as a JSON envelope or as
//! a short plain-text line, so handlers are written once for both formats.
//!
//! ```text
//! json  200  {"success":true,"message":"Customer updated successfully","id":7,"updated":true}
//! text  200  updated 7
//! json  400  {"success":false,"message":"Missing required fields: address"}
//! text  400  Missing required fields: address
//! ```

use std::fmt;
use std::str::FromStr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use intake_core::{CustomerId, OrderId};

/// How outcomes are written to the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Json,
    PlainText,
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::PlainText => write!(f, "text"),
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "plain" => Ok(Self::PlainText),
            other => Err(format!("invalid response format: {other}")),
        }
    }
}

/// A successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Customer { id: CustomerId, updated: bool },
    Order { id: OrderId },
}

impl Ack {
    fn message(self) -> &'static str {
        match self {
            Self::Customer { updated: true, .. } => "Customer updated successfully",
            Self::Customer { updated: false, .. } => "Customer created successfully",
            Self::Order { .. } => "Order created successfully",
        }
    }
}

#[derive(Serialize)]
struct SuccessBody {
    success: bool,
    message: &'static str,
    id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated: Option<bool>,
}

#[derive(Serialize)]
struct FailureBody<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl ResponseFormat {
    /// Render a successful write as `200 OK`.
    #[must_use]
    pub fn success(self, ack: Ack) -> Response {
        let (id, updated) = match ack {
            Ack::Customer { id, updated } => (id.as_i32(), Some(updated)),
            Ack::Order { id } => (id.as_i32(), None),
        };

        match self {
            Self::Json => (
                StatusCode::OK,
                Json(SuccessBody {
                    success: true,
                    message: ack.message(),
                    id,
                    updated,
                }),
            )
                .into_response(),
            Self::PlainText => {
                let verb = if updated == Some(true) {
                    "updated"
                } else {
                    "created"
                };
                (StatusCode::OK, format!("{verb} {id}")).into_response()
            }
        }
    }

    /// Render a failure. `detail` carries diagnostics such as the underlying
    /// store error.
    #[must_use]
    pub fn failure(self, status: StatusCode, message: &str, detail: Option<&str>) -> Response {
        match self {
            Self::Json => (
                status,
                Json(FailureBody {
                    success: false,
                    message,
                    error: detail,
                }),
            )
                .into_response(),
            Self::PlainText => {
                let body = match detail {
                    Some(detail) => format!("{message}: {detail}"),
                    None => message.to_owned(),
                };
                (status, body).into_response()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::header::CONTENT_TYPE;

    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<ResponseFormat>().unwrap(), ResponseFormat::Json);
        assert_eq!(" TEXT ".parse::<ResponseFormat>().unwrap(), ResponseFormat::PlainText);
        assert!("xml".parse::<ResponseFormat>().is_err());
        assert_eq!(ResponseFormat::PlainText.to_string(), "text");
    }

    #[tokio::test]
    async fn test_json_customer_success() {
        let ack = Ack::Customer {
            id: CustomerId::new(7),
            updated: true,
        };
        let response = ResponseFormat::Json.success(ack);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["id"], 7);
        assert_eq!(json["updated"], true);
        assert_eq!(json["message"], "Customer updated successfully");
    }

    #[tokio::test]
    async fn test_json_order_success_has_no_updated_flag() {
        let response = ResponseFormat::Json.success(Ack::Order {
            id: OrderId::new(3),
        });
        let json = body_json(response).await;
        assert_eq!(json["message"], "Order created successfully");
        assert_eq!(json["id"], 3);
        assert!(json.get("updated").is_none());
    }

    #[tokio::test]
    async fn test_text_success() {
        let created = ResponseFormat::PlainText.success(Ack::Customer {
            id: CustomerId::new(4),
            updated: false,
        });
        assert_eq!(body_text(created).await, "created 4");

        let updated = ResponseFormat::PlainText.success(Ack::Customer {
            id: CustomerId::new(4),
            updated: true,
        });
        assert_eq!(body_text(updated).await, "updated 4");

        let order = ResponseFormat::PlainText.success(Ack::Order {
            id: OrderId::new(9),
        });
        assert_eq!(body_text(order).await, "created 9");
    }

    #[tokio::test]
    async fn test_failure_bodies() {
        let response = ResponseFormat::Json.failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Storage error",
            Some("connection refused"),
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "connection refused");

        let response = ResponseFormat::PlainText.failure(StatusCode::BAD_REQUEST, "bad", None);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "bad");
    }
}
