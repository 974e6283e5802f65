//! REST surface consumed by the health-tracking page.
//!
//! Handlers only read and publish state; flag resolution and the appointment policy live in
//! `healthboard-core`.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};

use healthboard_core::appointments::{group_by_role, select_next};
use healthboard_core::{
    role_label, Appointment, AppointmentCache, AppointmentSource, CaptureRegistry,
    CaptureState, CoreConfig, CoreResult, Feature, FlagResolver, LegacyFlagSource, LegacyGlobals,
    YamlAppointmentSource, APPOINTMENT_ROLES,
};

/// Shared state for the REST handlers.
///
/// Built once at startup from [`CoreConfig`]. The resolver strategy is fixed at that point: the
/// live capture module is registered only when the `live_capture` feature is on.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    resolver: Arc<FlagResolver>,
    capture: Option<Arc<CaptureState>>,
    cache: Arc<RwLock<AppointmentCache>>,
    source: Arc<dyn AppointmentSource>,
}

impl AppState {
    /// Load the legacy globals, register the capture module and wire the appointment source.
    ///
    /// # Errors
    ///
    /// Returns an error if the legacy flags file exists but cannot be read or parsed.
    pub fn build(cfg: Arc<CoreConfig>) -> CoreResult<Self> {
        let legacy = LegacyGlobals::load(&cfg.legacy_flags_file())?;
        let source = Arc::new(YamlAppointmentSource::new(cfg.appointments_file()));
        Ok(Self::with_source(cfg, legacy, source))
    }

    pub fn with_source(
        cfg: Arc<CoreConfig>,
        legacy: LegacyGlobals,
        source: Arc<dyn AppointmentSource>,
    ) -> Self {
        let mut registry = CaptureRegistry::new();
        let capture = if cfg.features().is_enabled(Feature::LiveCapture) {
            let capture = Arc::new(CaptureState::new());
            registry.register(capture.clone());
            Some(capture)
        } else {
            None
        };

        let resolver = FlagResolver::from_registry(&registry, LegacyFlagSource::new(legacy));
        tracing::info!("flag resolver strategy: {}", resolver.strategy());

        Self {
            cfg,
            resolver: Arc::new(resolver),
            capture,
            cache: Arc::new(RwLock::new(AppointmentCache::new())),
            source,
        }
    }

    /// Run one load cycle at startup. The source is read on the blocking pool.
    pub async fn initial_load(&self) -> anyhow::Result<()> {
        self.cache.write().await.begin_load();

        let source = Arc::clone(&self.source);
        let fetched = tokio::task::spawn_blocking(move || source.fetch()).await;
        self.publish(fetched).await
    }

    /// Publish a finished fetch into the cache: complete the load on success, fail it otherwise.
    async fn publish(
        &self,
        fetched: Result<CoreResult<Vec<Appointment>>, tokio::task::JoinError>,
    ) -> anyhow::Result<()> {
        let mut cache = self.cache.write().await;
        match fetched {
            Ok(Ok(appointments)) => {
                let data = group_by_role(appointments);
                let next = select_next(&data, Utc::now());
                cache.complete_load(data, next);
                Ok(())
            }
            Ok(Err(e)) => {
                cache.fail_load();
                Err(e.into())
            }
            Err(e) => {
                cache.fail_load();
                Err(e.into())
            }
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct FlagsRes {
    /// `live`, `legacy` or `fallback`
    pub source: String,
    pub flags: BTreeMap<String, bool>,
    pub active: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CaptureFlagsReq {
    pub flags: BTreeMap<String, bool>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AppointmentRes {
    pub role: String,
    pub label: Option<String>,
    /// RFC 3339
    pub time: String,
    pub location: Option<String>,
    pub note: Option<String>,
}

impl From<&Appointment> for AppointmentRes {
    fn from(appt: &Appointment) -> Self {
        Self {
            role: appt.role.clone(),
            label: role_label(&appt.role).map(str::to_string),
            time: appt.time.to_rfc3339(),
            location: appt.location.clone(),
            note: appt.note.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AppointmentsRes {
    pub loading: bool,
    pub loaded: bool,
    /// `true` once any load has started, even if every load so far failed
    pub attempted: bool,
    pub data: BTreeMap<String, Vec<AppointmentRes>>,
    pub next: Option<AppointmentRes>,
}

impl AppointmentsRes {
    fn from_cache(cache: &AppointmentCache) -> Self {
        let state = cache.state_at(Utc::now());
        Self {
            loading: state.loading,
            loaded: state.loaded,
            attempted: state.attempted,
            data: state
                .data
                .iter()
                .map(|(role, list)| (role.clone(), list.iter().map(Into::into).collect()))
                .collect(),
            next: state.next.as_ref().map(Into::into),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RoleRes {
    pub code: String,
    pub label: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        get_flags,
        put_capture_flags,
        get_appointments,
        refresh_appointments,
        list_roles,
    ),
    components(schemas(
        HealthRes,
        FlagsRes,
        CaptureFlagsReq,
        AppointmentRes,
        AppointmentsRes,
        RoleRes,
    ))
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/flags", get(get_flags))
        .route("/capture/flags", put(put_capture_flags))
        .route("/appointments", get(get_appointments))
        .route("/appointments/refresh", post(refresh_appointments))
        .route("/roles", get(list_roles))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: format!(
            "healthboard is alive (features: {})",
            state.cfg.features().enabled().join(",")
        ),
    })
}

#[utoipa::path(
    get,
    path = "/flags",
    responses(
        (status = 200, description = "Current flag snapshot", body = FlagsRes)
    )
)]
/// Resolve the current health-tracking flags
///
/// Never fails: when the live capture module errors the legacy globals answer and `source`
/// reports `fallback`.
async fn get_flags(State(state): State<AppState>) -> Json<FlagsRes> {
    let resolution = state.resolver.resolve();
    if let healthboard_core::ResolvedVia::Fallback(e) = &resolution.origin {
        tracing::warn!("live capture flags unavailable, using legacy globals: {}", e);
    }

    let active = resolution
        .snapshot
        .active_flags()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(FlagsRes {
        source: resolution.origin.as_str().to_string(),
        flags: resolution.snapshot.into_inner(),
        active,
    })
}

#[utoipa::path(
    put,
    path = "/capture/flags",
    request_body = CaptureFlagsReq,
    responses(
        (status = 200, description = "Capture state replaced", body = FlagsRes),
        (status = 404, description = "Live capture is disabled"),
        (status = 500, description = "Internal server error")
    )
)]
/// Replace the live capture module's flag state
async fn put_capture_flags(
    State(state): State<AppState>,
    Json(req): Json<CaptureFlagsReq>,
) -> Result<Json<FlagsRes>, (StatusCode, &'static str)> {
    let Some(capture) = &state.capture else {
        return Err((StatusCode::NOT_FOUND, "live capture is disabled"));
    };

    if let Err(e) = capture.replace(req.flags) {
        tracing::error!("failed to update capture state: {}", e);
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
    }

    Ok(get_flags(State(state)).await)
}

#[utoipa::path(
    get,
    path = "/appointments",
    responses(
        (status = 200, description = "Cached appointment state", body = AppointmentsRes)
    )
)]
/// Read the appointment cache
///
/// `next` is evaluated at request time, so an appointment past its grace window is omitted even
/// if no refresh has run since.
async fn get_appointments(State(state): State<AppState>) -> Json<AppointmentsRes> {
    let cache = state.cache.read().await;
    Json(AppointmentsRes::from_cache(&cache))
}

#[utoipa::path(
    post,
    path = "/appointments/refresh",
    responses(
        (status = 200, description = "Appointments reloaded", body = AppointmentsRes),
        (status = 404, description = "Appointments are disabled"),
        (status = 500, description = "Internal server error")
    )
)]
/// Reload appointments from the backing source
///
/// The cache lock is released while the source is read. Overlapping refreshes are not
/// de-duplicated; the last one to complete wins.
async fn refresh_appointments(
    State(state): State<AppState>,
) -> Result<Json<AppointmentsRes>, (StatusCode, &'static str)> {
    if !state.cfg.features().is_enabled(Feature::Appointments) {
        return Err((StatusCode::NOT_FOUND, "appointments are disabled"));
    }

    state.cache.write().await.begin_load();

    let source = Arc::clone(&state.source);
    let fetched = tokio::task::spawn_blocking(move || source.fetch()).await;

    if let Err(e) = state.publish(fetched).await {
        tracing::error!("appointment refresh failed: {}", e);
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
    }

    let cache = state.cache.read().await;
    Ok(Json(AppointmentsRes::from_cache(&cache)))
}

#[utoipa::path(
    get,
    path = "/roles",
    responses(
        (status = 200, description = "Appointment roles", body = [RoleRes])
    )
)]
/// List the fixed appointment roles
async fn list_roles() -> Json<Vec<RoleRes>> {
    Json(
        APPOINTMENT_ROLES
            .iter()
            .map(|role| RoleRes {
                code: role.code.to_string(),
                label: role.label.to_string(),
            })
            .collect(),
    )
}
