//! Administrative endpoints: presence counts for the dashboard and
//! role-targeted system broadcasts. Both require an Admin token.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use jb_core::{Notification, NotificationKind, Role};
use jb_ws::AppState;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub connected: usize,
    pub online_seekers: usize,
    pub online_employers: usize,
    pub timestamp: String,
}

/// GET /admin/presence - live connection counts for the dashboard
pub async fn presence_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PresenceResponse>, (StatusCode, String)> {
    require_admin(&headers, &state)?;

    Ok(Json(PresenceResponse {
        connected: state.registry.count_all().await,
        online_seekers: state.registry.count_by_role(Role::Seeker).await,
        online_employers: state.registry.count_by_role(Role::Employer).await,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub message: String,
    /// Display hint forwarded to clients (info, warning, ...)
    #[serde(default)]
    pub priority: Option<String>,
    /// Limit the broadcast to one role; None means everyone
    #[serde(default)]
    pub target_role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub success: bool,
    /// Number of recipients attempted at fan-out time
    pub recipients: usize,
}

/// POST /admin/broadcast - push a system message to a role group or everyone
pub async fn broadcast_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, (StatusCode, String)> {
    require_admin(&headers, &state)?;

    if request.message.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "message is required".to_string()));
    }

    let notification = Notification::new(
        NotificationKind::SystemMessage,
        "System Notification",
        request.message,
        json!({"priority": request.priority.as_deref().unwrap_or("info")}),
    );

    let result = match request.target_role {
        Some(role) => {
            state
                .router
                .broadcast_to_role(role, "notification", &notification)
                .await
        }
        None => {
            state
                .router
                .broadcast_to_all("notification", &notification)
                .await
        }
    };

    let recipients = result.map_err(|e| {
        log::error!("Admin broadcast failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(
        "Admin broadcast sent to {} recipient(s) (target: {})",
        recipients,
        request
            .target_role
            .map_or("all".to_string(), |r| r.to_string())
    );

    Ok(Json(BroadcastResponse {
        success: true,
        recipients,
    }))
}

/// Validate the bearer token and require the Admin role
fn require_admin(headers: &HeaderMap, state: &AppState) -> Result<(), (StatusCode, String)> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "missing authorization header".to_string(),
        ))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or((
        StatusCode::UNAUTHORIZED,
        "expected bearer token".to_string(),
    ))?;

    let claims = state
        .jwt_validator
        .validate(token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    match claims.role() {
        Ok(Role::Admin) => Ok(()),
        _ => Err((StatusCode::FORBIDDEN, "admin access required".to_string())),
    }
}
