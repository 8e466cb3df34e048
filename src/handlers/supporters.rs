use axum::{
    Json,
    body::to_bytes,
    extract::{ConnectInfo, Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::Limits;
use crate::error::{ApiError, json_response};
use crate::metrics::{DUPLICATE_SUBMISSIONS, RATE_LIMITED, REQUEST_LATENCY, REQUEST_TOTAL, SUPPORTERS_ADDED};
use crate::models::{
    SUPPORTERS_LIST_KEY, SUPPORTERS_SET_KEY, SupporterEntry, SupportersResponse, project_names,
};
use crate::rate_limit::{check_rate_limit, client_ip};
use crate::state::AppState;
use crate::store::SupporterStore;

// Largest request body read for a registration
const MAX_BODY_BYTES: usize = 16 * 1024;

/// `GET` lists supporters, `POST` registers one; anything else is 405.
pub async fn supporters_handler(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Response {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let response = match handle(&state, request).await {
        Ok(body) => json_response(StatusCode::OK, Json(body)),
        Err(e) => e.into_response(),
    };

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    response
}

async fn handle(state: &AppState, request: Request) -> Result<SupportersResponse, ApiError> {
    // checked before anything else, including the method
    let store = state.store.as_deref().ok_or(ApiError::KvNotConfigured)?;

    match *request.method() {
        Method::GET => Ok(SupportersResponse::listing(list_supporters(store).await?)),
        Method::POST => register_supporter(store, &state.limits, request).await,
        _ => Err(ApiError::MethodNotAllowed),
    }
}

async fn list_supporters(store: &dyn SupporterStore) -> Result<Vec<String>, ApiError> {
    let raw = store.list_range(SUPPORTERS_LIST_KEY, 0, -1).await?;
    Ok(project_names(raw))
}

async fn register_supporter(
    store: &dyn SupporterStore,
    limits: &Limits,
    request: Request,
) -> Result<SupportersResponse, ApiError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let ip = client_ip(request.headers(), peer);

    if !check_rate_limit(store, &ip, limits).await? {
        RATE_LIMITED.inc();
        warn!(ip = %ip, "supporter registration rate limited");
        return Err(ApiError::RateLimited);
    }

    let body = to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    let payload: Value = if body.is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?
    };
    if payload.is_null() {
        return Err(ApiError::InvalidBody("body is `null`".to_string()));
    }

    let name = normalize_username(payload.get("username"));
    if name.is_empty() {
        return Err(ApiError::UsernameRequired);
    }
    // measured in UTF-16 code units, so an astral character counts twice
    if name.encode_utf16().count() > limits.max_name_len {
        return Err(ApiError::UsernameTooLong);
    }

    // dedupe on the lower-cased name, store the name as typed
    let normalized = name.to_lowercase();
    if store.set_add(SUPPORTERS_SET_KEY, &normalized).await? {
        let entry = SupporterEntry::new(name.as_str());
        store.list_prepend(SUPPORTERS_LIST_KEY, &entry.encode()).await?;
        store
            .list_trim(SUPPORTERS_LIST_KEY, 0, i64::from(limits.max_supporters) - 1)
            .await?;

        SUPPORTERS_ADDED.inc();
        info!(name = %name, ip = %ip, "supporter added");
    } else {
        DUPLICATE_SUBMISSIONS.inc();
        debug!(name = %name, "supporter already listed");
    }

    Ok(SupportersResponse::registered(list_supporters(store).await?))
}

/// Turn the submitted `username` value into a display name.
///
/// Falsy values (`null`, `false`, `0`, `""`, a missing field) are empty.
/// Other values are stringified the way a browser would: arrays join their
/// items with `,`, objects read `[object Object]`. Leading and trailing
/// whitespace is trimmed and inner whitespace runs collapse to one space.
pub fn normalize_username(value: Option<&Value>) -> String {
    let raw = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(other) => js_string(other),
    };

    raw.split(is_js_whitespace)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// String conversion of a JSON value with script-engine semantics
fn js_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => js_number(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(js_string).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn js_number(f: f64) -> String {
    let abs = f.abs();
    if f.fract() == 0.0 && abs < 1e21 {
        return format!("{}", f as i128);
    }
    if abs >= 1e21 || abs < 1e-6 {
        // exponent form, with an explicit sign on positive exponents
        let exp = format!("{f:e}");
        return match exp.split_once('e') {
            Some((mantissa, e)) if !e.starts_with('-') => format!("{mantissa}e+{e}"),
            _ => exp,
        };
    }
    f.to_string()
}

// Characters matched by `\s` in a script regex, the same set `trim()` strips
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' '
            | '\u{A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}'
            | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}' | '\u{3000}' | '\u{FEFF}'
    )
}
