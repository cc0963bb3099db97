//! JSON request/response shapes for callers that sit behind a transport.
//!
//! A request is `{"language": "JAVA", "inputTxt": "..."}`. Success is the parsed JSON
//! tree; failure is an [`ErrorBody`] carrying the error kind and a readable message.

use crate::error::{DispatchError, ErrorKind};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub language: String,
    pub input_txt: String,
}

impl ParseRequest {
    pub fn new(language: impl Into<String>, input_txt: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            input_txt: input_txt.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&DispatchError> for ErrorBody {
    fn from(err: &DispatchError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<DispatchError> for ErrorBody {
    fn from(err: DispatchError) -> Self {
        Self::from(&err)
    }
}

/// Run one request through `registry`.
pub fn handle(registry: &Registry, request: &ParseRequest) -> Result<serde_json::Value, ErrorBody> {
    registry
        .dispatch(&request.language, &request.input_txt)
        .map(|value| value.to_json())
        .map_err(ErrorBody::from)
}
