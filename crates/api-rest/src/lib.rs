//! # API REST
//!
//! REST API for the doctor directory.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (status codes, JSON envelopes, CORS)
//! - the outbound postal-code lookup adapter
//!
//! Validation and storage live in `docdir-core`; wire types in `api-shared`.

#![warn(rust_2018_idioms)]

pub mod address;

use std::sync::Arc;

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    AddressFound, AddressMessage, AddressRes, DoctorId, DoctorRecord, FieldViolation, HealthRes,
    ListDoctorsRes, SpecialitiesRes, SubmissionRes, ValidationInfo,
};
use docdir_core::{CoreConfig, DoctorError, DoctorService, PostalCode, SaveOutcome};

pub use address::{AddressLookupError, AddressSource, ViaCepAddressSource};

/// Application state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    service: DoctorService,
    address_source: Arc<dyn AddressSource>,
}

impl AppState {
    pub fn new(service: DoctorService, address_source: Arc<dyn AddressSource>) -> Self {
        Self {
            service,
            address_source,
        }
    }

    /// State backed by YAML storage and the configured ViaCEP endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the outbound HTTP client cannot be constructed.
    pub fn from_config(cfg: Arc<CoreConfig>) -> Result<Self, reqwest::Error> {
        let source = ViaCepAddressSource::new(cfg.address_lookup_url(), cfg.address_lookup_timeout())?;
        Ok(Self::new(DoctorService::new(cfg), Arc::new(source)))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_doctors,
        get_doctor,
        add_doctor,
        edit_doctor,
        lookup_address,
        list_specialities,
    ),
    components(schemas(
        HealthRes,
        DoctorRecord,
        ListDoctorsRes,
        FieldViolation,
        ValidationInfo,
        SubmissionRes,
        AddressFound,
        AddressMessage,
        AddressRes,
        SpecialitiesRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/doctor", get(list_doctors))
        .route("/api/doctor/:id", get(get_doctor))
        .route("/api/doctor/add", post(add_doctor))
        .route("/api/doctor/edit/:id", put(edit_doctor))
        .route("/api/services/address/:code", get(lookup_address))
        .route("/api/specialities", get(list_specialities))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
async fn health() -> Json<HealthRes> {
    Json(HealthRes::alive())
}

#[utoipa::path(
    get,
    path = "/api/doctor",
    responses(
        (status = 200, description = "All doctors, ordered by id", body = ListDoctorsRes)
    )
)]
/// List every stored doctor.
///
/// Files that cannot be parsed are skipped and logged by the repository.
#[axum::debug_handler]
async fn list_doctors(State(state): State<AppState>) -> Json<ListDoctorsRes> {
    Json(ListDoctorsRes {
        doctors: state.service.list(),
    })
}

#[utoipa::path(
    get,
    path = "/api/doctor/{id}",
    params(("id" = u64, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "The doctor", body = DoctorRecord),
        (status = 404, description = "Unknown doctor"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn get_doctor(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
) -> Result<Json<DoctorRecord>, (StatusCode, &'static str)> {
    match state.service.get(DoctorId::new(id)) {
        Ok(record) => Ok(Json(record)),
        Err(DoctorError::NotFound(_)) => Err((StatusCode::NOT_FOUND, "Doctor not found")),
        Err(e) => {
            tracing::error!("Read doctor error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/doctor/add",
    request_body = DoctorRecord,
    responses(
        (status = 200, description = "Doctor stored; `newData` carries the assigned id", body = SubmissionRes),
        (status = 422, description = "Validation failed; see `info.inner`", body = SubmissionRes),
        (status = 500, description = "Internal server error", body = SubmissionRes)
    )
)]
/// Validate and store a new doctor.
///
/// Any `id` in the body is ignored; the repository assigns one.
#[axum::debug_handler]
async fn add_doctor(
    State(state): State<AppState>,
    Json(draft): Json<DoctorRecord>,
) -> (StatusCode, Json<SubmissionRes>) {
    match state.service.create(draft) {
        Ok(SaveOutcome::Saved(record)) => (
            StatusCode::OK,
            Json(SubmissionRes::succeeded(record, "Doctor added successfully")),
        ),
        Ok(SaveOutcome::Rejected(violations)) => rejected(violations),
        Err(e) => {
            tracing::error!("Create doctor error: {:?}", e);
            internal_error()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/doctor/edit/{id}",
    params(("id" = u64, Path, description = "Doctor id")),
    request_body = DoctorRecord,
    responses(
        (status = 200, description = "Doctor updated", body = SubmissionRes),
        (status = 400, description = "Body id differs from path id", body = SubmissionRes),
        (status = 404, description = "Unknown doctor", body = SubmissionRes),
        (status = 422, description = "Validation failed; see `info.inner`", body = SubmissionRes),
        (status = 500, description = "Internal server error", body = SubmissionRes)
    )
)]
/// Validate and replace an existing doctor.
#[axum::debug_handler]
async fn edit_doctor(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
    Json(draft): Json<DoctorRecord>,
) -> (StatusCode, Json<SubmissionRes>) {
    let id = DoctorId::new(id);
    match state.service.update(id, draft) {
        Ok(SaveOutcome::Saved(record)) => (
            StatusCode::OK,
            Json(SubmissionRes::succeeded(record, "Doctor updated successfully")),
        ),
        Ok(SaveOutcome::Rejected(violations)) => rejected(violations),
        Err(DoctorError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(SubmissionRes::failed(format!("Doctor {id} not found"))),
        ),
        Err(e @ DoctorError::IdMismatch { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(SubmissionRes::failed(e.to_string())),
        ),
        Err(e) => {
            tracing::error!("Update doctor error: {:?}", e);
            internal_error()
        }
    }
}

fn rejected(violations: Vec<FieldViolation>) -> (StatusCode, Json<SubmissionRes>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(SubmissionRes::rejected(violations, "Validation failed")),
    )
}

fn internal_error() -> (StatusCode, Json<SubmissionRes>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(SubmissionRes::failed("Internal error")),
    )
}

#[utoipa::path(
    get,
    path = "/api/services/address/{code}",
    params(("code" = String, Path, description = "Eight-digit postal code")),
    responses(
        (status = 200, description = "Resolved address", body = AddressFound),
        (status = 400, description = "Malformed postal code", body = AddressMessage),
        (status = 404, description = "No address for this code", body = AddressMessage),
        (status = 502, description = "Upstream lookup failed", body = AddressMessage)
    )
)]
/// Resolve a postal code to a street, neighbourhood, city and state.
#[axum::debug_handler]
async fn lookup_address(
    State(state): State<AppState>,
    AxumPath(code): AxumPath<String>,
) -> Response {
    let code = match PostalCode::parse(&code) {
        Ok(code) => code,
        Err(e) => return message(StatusCode::BAD_REQUEST, format!("invalid postal code: {e}")),
    };

    match state.address_source.lookup(&code).await {
        Ok(Some(found)) => (StatusCode::OK, Json(AddressRes::Found(found))).into_response(),
        Ok(None) => message(StatusCode::NOT_FOUND, format!("No address found for {code}")),
        Err(e) => {
            tracing::error!(%code, "Address lookup error: {}", e);
            message(StatusCode::BAD_GATEWAY, "Address lookup unavailable")
        }
    }
}

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    let body = AddressMessage {
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/specialities",
    responses(
        (status = 200, description = "Speciality catalog, in display order", body = SpecialitiesRes)
    )
)]
#[axum::debug_handler]
async fn list_specialities(State(state): State<AppState>) -> Json<SpecialitiesRes> {
    Json(SpecialitiesRes {
        specialities: state.service.catalog().names().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::SpecialitySelection;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use docdir_core::NonEmptyText;
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct StubAddressSource;

    #[async_trait]
    impl AddressSource for StubAddressSource {
        async fn lookup(
            &self,
            code: &PostalCode,
        ) -> Result<Option<AddressFound>, AddressLookupError> {
            match code.as_str() {
                "01001000" => Ok(Some(AddressFound {
                    street: "Praça da Sé".into(),
                    neighborhood: "Sé".into(),
                    city: "São Paulo".into(),
                    state_abbreviation: "SP".into(),
                })),
                "99999999" => Err(AddressLookupError::Status(503)),
                _ => Ok(None),
            }
        }
    }

    fn test_app() -> (TempDir, Router) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(
            temp_dir.path().to_path_buf(),
            NonEmptyText::new("http://lookup.invalid").expect("url"),
            Duration::from_secs(1),
        )
        .expect("config");
        let state = AppState::new(
            DoctorService::new(Arc::new(cfg)),
            Arc::new(StubAddressSource),
        );
        (temp_dir, router(state))
    }

    fn json_request(method: Method, uri: &str, body: &DoctorRecord) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("encode")))
            .expect("request")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    async fn send<T: DeserializeOwned>(app: &Router, req: Request<Body>) -> (StatusCode, T) {
        let response = app.clone().oneshot(req).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    fn valid_doctor() -> DoctorRecord {
        DoctorRecord {
            name: "Ana".into(),
            med_cert_id: "123456".into(),
            speciality: SpecialitySelection::new(["Cardiologia clínca"]),
            ..DoctorRecord::default()
        }
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (_tmp, app) = test_app();
        let (status, body): (_, HealthRes) = send(&app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, HealthRes::alive());
    }

    #[tokio::test]
    async fn add_then_list_and_read() {
        let (_tmp, app) = test_app();

        let (status, res): (_, SubmissionRes) = send(
            &app,
            json_request(Method::POST, "/api/doctor/add", &valid_doctor()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(res.success);
        let stored = res.new_data.expect("newData");
        assert_eq!(stored.id, Some(DoctorId::new(1)));

        let (status, list): (_, ListDoctorsRes) = send(&app, get_request("/api/doctor")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.doctors, vec![stored.clone()]);

        let (status, one): (_, DoctorRecord) = send(&app, get_request("/api/doctor/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(one, stored);
    }

    #[tokio::test]
    async fn add_rejects_invalid_doctor_with_violations() {
        let (_tmp, app) = test_app();
        let draft = DoctorRecord {
            med_cert_id: "12a".into(),
            ..valid_doctor()
        };

        let (status, res): (_, SubmissionRes) =
            send(&app, json_request(Method::POST, "/api/doctor/add", &draft)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!res.success);
        let inner = res.info.expect("info").inner;
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].path, "medCertId");

        let (_, list): (_, ListDoctorsRes) = send(&app, get_request("/api/doctor")).await;
        assert!(list.doctors.is_empty());
    }

    #[tokio::test]
    async fn edit_updates_existing_doctor() {
        let (_tmp, app) = test_app();
        let _: (_, SubmissionRes) = send(
            &app,
            json_request(Method::POST, "/api/doctor/add", &valid_doctor()),
        )
        .await;

        let changed = DoctorRecord {
            name: "Ana Maria".into(),
            ..valid_doctor()
        };
        let (status, res): (_, SubmissionRes) = send(
            &app,
            json_request(Method::PUT, "/api/doctor/edit/1", &changed),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(res.success);
        let (_, one): (_, DoctorRecord) = send(&app, get_request("/api/doctor/1")).await;
        assert_eq!(one.name, "Ana Maria");
    }

    #[tokio::test]
    async fn edit_unknown_doctor_is_not_found() {
        let (_tmp, app) = test_app();
        let (status, res): (_, SubmissionRes) = send(
            &app,
            json_request(Method::PUT, "/api/doctor/edit/42", &valid_doctor()),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!res.success);
        assert!(res.message.contains("42"));
    }

    #[tokio::test]
    async fn read_unknown_doctor_is_not_found() {
        let (_tmp, app) = test_app();
        let response = app
            .oneshot(get_request("/api/doctor/7"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lookup_maps_source_results_to_statuses() {
        let (_tmp, app) = test_app();

        let (status, found): (_, AddressRes) =
            send(&app, get_request("/api/services/address/01001000")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(matches!(found, AddressRes::Found(ref a) if a.state_abbreviation == "SP"));

        let (status, missing): (_, AddressMessage) =
            send(&app, get_request("/api/services/address/00000000")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(missing.message.contains("00000000"));

        let (status, _): (_, AddressMessage) =
            send(&app, get_request("/api/services/address/99999999")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _): (_, AddressMessage) =
            send(&app, get_request("/api/services/address/0100")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn specialities_lists_the_catalog() {
        let (_tmp, app) = test_app();
        let (status, body): (_, SpecialitiesRes) =
            send(&app, get_request("/api/specialities")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.specialities.len(), 8);
        assert_eq!(body.specialities[0], "Alergologia");
    }

    #[test]
    fn openapi_document_lists_doctor_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/doctor/add"));
        assert!(doc.paths.paths.contains_key("/api/services/address/{code}"));
    }
}
