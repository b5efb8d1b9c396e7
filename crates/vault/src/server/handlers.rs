//! Axum request handlers for all service endpoints.
//!
//! Handlers never log request bodies. Codec failures are logged by error kind
//! and validation rejections by reason code.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use checksum::{ValidationContext, Verdict};
use common::protocol::{
    ErrorResponse, FieldRequest, HealthResponse, MaskedFieldResponse, PlainFieldResponse,
    StoredFieldRequest, StoredFieldResponse, ValidateRequest, ValidateResponse,
};
use common::ServiceError;
use tracing::{debug, warn};
use zeroize::Zeroize;

use super::state::AppState;
use crate::crypto::{self, CodecError, DecryptionError, EncryptionError, FieldValue, KeyOrigin};

/// Error type returned by handlers; renders as an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

impl From<EncryptionError> for ApiError {
    fn from(e: EncryptionError) -> Self {
        warn!(error = %e, "field encryption failed");
        ApiError(ServiceError::EncryptionFailure("encryption failed".into()))
    }
}

impl From<DecryptionError> for ApiError {
    fn from(e: DecryptionError) -> Self {
        warn!(error = %e, "field decryption failed");
        ApiError(ServiceError::DecryptionFailure("decryption failed".into()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        debug!(status = %e.status(), "request body rejected");
        ApiError(ServiceError::BadRequest(
            "request body does not match the expected JSON shape".into(),
        ))
    }
}

impl From<CodecError> for ApiError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Encryption(e) => e.into(),
            CodecError::Decryption(e) => e.into(),
        }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// [`Json`] extractor whose rejection renders as an [`ErrorResponse`].
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}

/// `POST /fields/encrypt` — encrypt a plaintext value for storage.
pub async fn encrypt(
    State(state): State<AppState>,
    AppJson(req): AppJson<FieldRequest>,
) -> ApiResult<StoredFieldResponse> {
    let stored = crypto::encrypt(&req.value, state.current_key.get())?;
    Ok(Json(StoredFieldResponse { stored }))
}

/// `POST /fields/decrypt` — recover the plaintext of a stored value.
///
/// A value without the separator is legacy plaintext, not corrupt data, and is
/// answered with `not_encrypted` rather than `decryption_failed`.
pub async fn decrypt(
    State(state): State<AppState>,
    AppJson(req): AppJson<StoredFieldRequest>,
) -> ApiResult<PlainFieldResponse> {
    match FieldValue::from_record(req.stored) {
        FieldValue::Stored(stored) => {
            let value = crypto::decrypt(&stored, state.current_key.get())?;
            Ok(Json(PlainFieldResponse { value }))
        }
        FieldValue::Legacy(mut plaintext) => {
            plaintext.zeroize();
            debug!("decrypt called on legacy plaintext field");
            Err(ApiError(ServiceError::NotEncrypted(
                "value is legacy plaintext; migrate it first".into(),
            )))
        }
    }
}

/// `POST /fields/mask` — display form of a record-store value, stored or legacy.
pub async fn mask(
    State(state): State<AppState>,
    AppJson(req): AppJson<FieldRequest>,
) -> ApiResult<MaskedFieldResponse> {
    let value = FieldValue::from_record(req.value);
    let masked = crypto::mask(&value, state.current_key.get())?;
    Ok(Json(MaskedFieldResponse { masked }))
}

/// `POST /fields/migrate` — encrypt a legacy plaintext value; stored values
/// pass through unchanged.
pub async fn migrate(
    State(state): State<AppState>,
    AppJson(req): AppJson<FieldRequest>,
) -> ApiResult<StoredFieldResponse> {
    let value = FieldValue::from_record(req.value);
    if value.is_legacy() {
        debug!("migrating legacy plaintext field");
    }
    let stored = crypto::migrate(value, state.current_key.get())?;
    Ok(Json(StoredFieldResponse { stored }))
}

/// `POST /fields/rotate` — re-encrypt a value from the previous key to the
/// current one. `409 Conflict` when no previous key is configured.
pub async fn rotate(
    State(state): State<AppState>,
    AppJson(req): AppJson<StoredFieldRequest>,
) -> ApiResult<StoredFieldResponse> {
    let previous = state.previous_key.as_ref().ok_or_else(|| {
        ApiError(ServiceError::Conflict(
            "no previous field key is configured".into(),
        ))
    })?;
    let stored = crypto::reencrypt(&req.stored, previous.get(), state.current_key.get())?;
    Ok(Json(StoredFieldResponse { stored }))
}

/// `POST /validate` — check a card number, routing number, or birth date.
///
/// Rejections are an expected outcome and return `200 OK` with
/// `accepted: false`.
pub async fn validate(
    State(state): State<AppState>,
    AppJson(req): AppJson<ValidateRequest>,
) -> Json<ValidateResponse> {
    let (kind, verdict) = match &req {
        ValidateRequest::Card { value } => {
            ("card", checksum::validate(ValidationContext::Card, value))
        }
        ValidateRequest::BankTransfer { value } => (
            "bank_transfer",
            checksum::validate(ValidationContext::BankTransfer, value),
        ),
        ValidateRequest::BirthDate { value } => {
            let today = chrono::Utc::now().date_naive();
            (
                "birth_date",
                checksum::validate_birth_date(value, today, state.minimum_age_years),
            )
        }
    };

    if let Some(code) = verdict.code() {
        debug!(kind, code, "validation rejected");
    }
    Json(to_response(&verdict))
}

fn to_response(verdict: &Verdict) -> ValidateResponse {
    ValidateResponse {
        accepted: verdict.accepted(),
        code: verdict.code().map(str::to_owned),
        reason: verdict.reason(),
        brand: verdict.brand.map(|b| b.code().to_owned()),
    }
}

/// `GET /health` — liveness and readiness check.
///
/// Returns `200 OK` once the field key has been derived, `503` before.
pub async fn health(State(state): State<AppState>) -> Response {
    let key_ready = state.current_key.is_ready();
    let (status_code, status_str) = if key_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        key_ready,
        dev_key: state.current_key.origin() == KeyOrigin::DevelopmentFallback,
        rotation_enabled: state.previous_key.is_some(),
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeySecret;
    use crate::server::router;
    use axum_test::TestServer;
    use serde_json::json;

    fn server(state: AppState) -> TestServer {
        TestServer::new(router::build(state)).unwrap()
    }

    fn rotating_state() -> AppState {
        AppState::new(
            KeySecret::configured("new-secret"),
            Some(KeySecret::configured("old-secret")),
            18,
        )
    }

    #[tokio::test]
    async fn encrypt_then_decrypt() {
        let server = server(AppState::default());
        let stored = server
            .post("/fields/encrypt")
            .json(&json!({"value": "123-45-6789"}))
            .await
            .json::<StoredFieldResponse>()
            .stored;
        assert!(stored.contains(':'));

        let resp = server
            .post("/fields/decrypt")
            .json(&json!({ "stored": stored }))
            .await;
        resp.assert_status_ok();
        assert_eq!(resp.json::<PlainFieldResponse>().value, "123-45-6789");
    }

    #[tokio::test]
    async fn decrypt_tampered_value_is_422() {
        let state = AppState::default();
        let stored = crypto::encrypt("123456789", state.current_key.get()).unwrap();
        let mut chars: Vec<char> = stored.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '0' { '1' } else { '0' };
        let tampered: String = chars.into_iter().collect();

        let resp = server(state)
            .post("/fields/decrypt")
            .json(&json!({ "stored": tampered }))
            .await;
        resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp.json::<ErrorResponse>().code, "decryption_failed");
    }

    #[tokio::test]
    async fn decrypt_legacy_plaintext_is_not_encrypted() {
        let resp = server(AppState::default())
            .post("/fields/decrypt")
            .json(&json!({"stored": "123456789"}))
            .await;
        resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = resp.json::<ErrorResponse>();
        assert_eq!(body.code, "not_encrypted");
        assert!(!body.message.contains("123456789"));
    }

    #[tokio::test]
    async fn legacy_and_tampered_values_are_distinguishable() {
        let state = AppState::default();
        let stored = crypto::encrypt("123456789", state.current_key.get()).unwrap();
        let (iv, ct) = stored.split_once(':').unwrap();
        let flipped = if ct.starts_with('0') { "1" } else { "0" };
        let tampered = format!("{iv}:{flipped}{}", &ct[1..]);
        let server = server(state);

        let legacy = server
            .post("/fields/decrypt")
            .json(&json!({"stored": "123456789"}))
            .await
            .json::<ErrorResponse>();
        let corrupt = server
            .post("/fields/decrypt")
            .json(&json!({ "stored": tampered }))
            .await
            .json::<ErrorResponse>();
        assert_eq!(legacy.code, "not_encrypted");
        assert_eq!(corrupt.code, "decryption_failed");
    }

    #[tokio::test]
    async fn decryption_failures_share_one_message() {
        let server = server(AppState::default());
        let wrong_tag = format!("{}:{}", "00".repeat(16), "ab".repeat(20));
        let mut messages = Vec::new();
        for stored in ["zz:00", "00:00", wrong_tag.as_str()] {
            let resp = server
                .post("/fields/decrypt")
                .json(&json!({ "stored": stored }))
                .await;
            resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
            messages.push(resp.json::<ErrorResponse>().message);
        }
        assert!(messages.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn malformed_body_is_400_error_response() {
        let resp = server(AppState::default())
            .post("/fields/encrypt")
            .json(&json!({"plaintext": "x"}))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(resp.json::<ErrorResponse>().code, "bad_request");
    }

    #[tokio::test]
    async fn mask_accepts_both_forms() {
        let state = AppState::default();
        let stored = crypto::encrypt("123456789", state.current_key.get()).unwrap();
        let server = server(state);

        for value in [stored.as_str(), "123456789"] {
            let resp = server
                .post("/fields/mask")
                .json(&json!({ "value": value }))
                .await;
            resp.assert_status_ok();
            assert_eq!(resp.json::<MaskedFieldResponse>().masked, "***-**-6789");
        }
    }

    #[tokio::test]
    async fn migrate_encrypts_legacy_value() {
        let state = AppState::default();
        let key = state.current_key.clone();
        let resp = server(state)
            .post("/fields/migrate")
            .json(&json!({"value": "123456789"}))
            .await;
        resp.assert_status_ok();
        let stored = resp.json::<StoredFieldResponse>().stored;
        assert_eq!(crypto::decrypt(&stored, key.get()).unwrap(), "123456789");
    }

    #[tokio::test]
    async fn rotate_without_previous_key_is_409() {
        let resp = server(AppState::default())
            .post("/fields/rotate")
            .json(&json!({"stored": "00:00"}))
            .await;
        resp.assert_status(StatusCode::CONFLICT);
        assert_eq!(resp.json::<ErrorResponse>().code, "conflict");
    }

    #[tokio::test]
    async fn rotate_moves_value_to_current_key() {
        let state = rotating_state();
        let old = state.previous_key.clone().unwrap();
        let new = state.current_key.clone();
        let stored = crypto::encrypt("123456789", old.get()).unwrap();

        let resp = server(state)
            .post("/fields/rotate")
            .json(&json!({ "stored": stored }))
            .await;
        resp.assert_status_ok();
        let rotated = resp.json::<StoredFieldResponse>().stored;
        assert_eq!(crypto::decrypt(&rotated, new.get()).unwrap(), "123456789");
    }

    #[tokio::test]
    async fn validate_card_accepted_with_brand() {
        let resp = server(AppState::default())
            .post("/validate")
            .json(&json!({"kind": "card", "value": "4532 0151 1283 0366"}))
            .await;
        resp.assert_status_ok();
        let body = resp.json::<ValidateResponse>();
        assert!(body.accepted);
        assert_eq!(body.brand.as_deref(), Some("visa"));
        assert!(body.code.is_none());
    }

    #[tokio::test]
    async fn validate_rejection_is_200_with_code() {
        let server = server(AppState::default());
        let cases = [
            (json!({"kind": "card", "value": "9900000000000002"}), "unknown-brand"),
            (json!({"kind": "bank_transfer", "value": "123456789"}), "checksum-mismatch"),
            (json!({"kind": "bank_transfer", "value": "12345678a"}), "non-digit"),
            (json!({"kind": "birth_date", "value": "2999-01-01"}), "future-date"),
            (json!({"kind": "birth_date", "value": "yesterday"}), "malformed-date"),
        ];
        for (body, code) in cases {
            let resp = server.post("/validate").json(&body).await;
            resp.assert_status_ok();
            let body = resp.json::<ValidateResponse>();
            assert!(!body.accepted);
            assert_eq!(body.code.as_deref(), Some(code));
        }
    }

    #[tokio::test]
    async fn validate_birth_date_uses_configured_minimum() {
        let state = AppState::new(KeySecret::configured("s"), None, 21);
        let resp = server(state)
            .post("/validate")
            .json(&json!({"kind": "birth_date", "value": "1990-01-01"}))
            .await;
        assert!(resp.json::<ValidateResponse>().accepted);
    }

    #[tokio::test]
    async fn health_ok_after_key_derived() {
        let state = rotating_state();
        state.current_key.get();
        let resp = server(state).get("/health").await;
        resp.assert_status_ok();
        let body = resp.json::<HealthResponse>();
        assert!(body.key_ready);
        assert!(!body.dev_key);
        assert!(body.rotation_enabled);
    }

    #[tokio::test]
    async fn health_flags_development_key() {
        let state = AppState::new(KeySecret::development_fallback(), None, 18);
        state.current_key.get();
        let body = server(state).get("/health").await.json::<HealthResponse>();
        assert!(body.dev_key);
    }
}
