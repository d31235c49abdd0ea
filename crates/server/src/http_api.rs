use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Response as HttpResponse, StatusCode},
    response::Response,
};
use serde::{de::DeserializeOwned, Serialize};
use tp_rag::{KnowledgeBaseError, SourceRecord};

pub(crate) const SERVICE_NAME: &str = "transfer-pricing-agent";

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Serialize)]
pub(crate) struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Serialize)]
pub(crate) struct QueryResponse {
    pub status: &'static str,
    pub answer: String,
    pub sources: Vec<SourceRecord>,
}

#[derive(Serialize)]
pub(crate) struct DocumentsResponse {
    pub status: &'static str,
    pub documents: Vec<String>,
}

pub(crate) fn build_response<T: Serialize>(
    status: StatusCode,
    payload: &T,
) -> Result<Response, StatusCode> {
    let bytes = serde_json::to_vec(payload).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    HttpResponse::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub(crate) fn error_response(status: StatusCode, message: String) -> Result<Response, StatusCode> {
    build_response(
        status,
        &MessageResponse {
            status: "error",
            message,
        },
    )
}

/// Decode a JSON body; an empty body decodes as `T::default()`
pub(crate) fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| format!("Invalid JSON request: {err}"))
}

pub(crate) fn status_for(err: &KnowledgeBaseError) -> StatusCode {
    match err {
        KnowledgeBaseError::NotInitialized => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `err` followed by every source, `: `-separated
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}
