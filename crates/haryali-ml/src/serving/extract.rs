use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use serde_path_to_error::Segment;

/// JSON body extractor that reports which field failed to deserialize.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::body(rejection.body_text(), "body_unreadable"))?;
        parse_json(&body).map(ValidatedJson)
    }
}

/// One rejected field. `loc` starts at `"body"` and descends into the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    fn body(msg: impl Into<String>, kind: &'static str) -> Self {
        Self {
            issues: vec![FieldIssue {
                loc: vec!["body".to_string()],
                msg: msg.into(),
                kind,
            }],
        }
    }

    fn from_path_error(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let mut loc = vec!["body".to_string()];
        let path: Vec<String> = err
            .path()
            .iter()
            .filter_map(|segment| match segment {
                Segment::Seq { index } => Some(index.to_string()),
                Segment::Map { key } => Some(key.clone()),
                Segment::Enum { variant } => Some(variant.clone()),
                _ => None,
            })
            .collect();

        let inner = err.into_inner();
        let msg = inner.to_string();
        let kind = if !inner.is_data() {
            // Syntax and EOF errors have no meaningful field path.
            "json_invalid"
        } else if let Some(field) = missing_field(&msg) {
            loc.extend(path);
            loc.push(field.to_string());
            "missing"
        } else {
            loc.extend(path);
            "invalid_value"
        };

        Self {
            issues: vec![FieldIssue { loc, msg, kind }],
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.issues }));
        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}

pub fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ValidationError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(ValidationError::from_path_error)?;
    deserializer
        .end()
        .map_err(|err| ValidationError::body(err.to_string(), "json_invalid"))?;
    Ok(value)
}

fn missing_field(msg: &str) -> Option<&str> {
    msg.strip_prefix("missing field `")?.split('`').next()
}
