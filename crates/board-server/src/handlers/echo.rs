//! Echo handler for `POST /`
//!
//! Accepts JSON bodies and flat urlencoded forms.

use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::info;

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

pub async fn echo(request: Request) -> Result<Json<Value>, Response> {
    let body = if is_form(&request) {
        let Form(fields) = Form::<BTreeMap<String, String>>::from_request(request, &())
            .await
            .map_err(IntoResponse::into_response)?;
        json!(fields)
    } else {
        let Json(body) = Json::<Value>::from_request(request, &())
            .await
            .map_err(IntoResponse::into_response)?;
        body
    };

    info!("[POST] [/] Param : [{}]", body);
    Ok(Json(json!({
        "myResponse": "My Response!",
        "myRequestBody": body,
    })))
}
