//! Uniform JSON envelope shared by every handler.
//!
//! ```json
//! {"status": "Ok", "data": {...}}
//! {"status": "Error", "error": {"message": "...", "details": [{"field": "email", "info": "..."}]}}
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub info: String,
}

impl ErrDetail {
    pub fn field(field: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            info: info.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrDetail>,
}

#[derive(Debug, Serialize)]
pub struct Response<T = ()> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: Status::Ok,
            error: None,
            data: Some(data),
        }
    }
}

impl Response {
    pub fn err(message: impl Into<String>) -> Self {
        Self::err_with_details(message, Vec::new())
    }

    pub fn err_with_details(message: impl Into<String>, details: Vec<ErrDetail>) -> Self {
        Self {
            status: Status::Error,
            error: Some(ErrorBody {
                message: message.into(),
                details,
            }),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ok_envelope_carries_data_without_error() {
        let body = serde_json::to_value(Response::ok(json!({ "access_token": "abc" }))).unwrap();
        assert_eq!(
            body,
            json!({ "status": "Ok", "data": { "access_token": "abc" } })
        );
    }

    #[test]
    fn error_envelope_omits_empty_details() {
        let body = serde_json::to_value(Response::err("you are not authorized")).unwrap();
        assert_eq!(
            body,
            json!({ "status": "Error", "error": { "message": "you are not authorized" } })
        );
    }

    #[test]
    fn error_details_keep_optional_field() {
        let body = serde_json::to_value(Response::err_with_details(
            "invalid request",
            vec![
                ErrDetail::field("email", "is required"),
                ErrDetail {
                    field: None,
                    info: "body too large".into(),
                },
            ],
        ))
        .unwrap();
        assert_eq!(
            body["error"]["details"],
            json!([
                { "field": "email", "info": "is required" },
                { "info": "body too large" }
            ])
        );
    }
}
