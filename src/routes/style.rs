use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use crate::error::{StorageError, ValidationError};
use crate::models::{ProfileResponse, SaveProfileRequest, SaveProfileResponse, StyleProfile};
use crate::routes::{bad_request, storage_failure, AppState, AuthenticatedUser};
use crate::services::CacheKey;

/// Configure style profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/style/profile", web::post().to(save_profile))
        .route("/style/profile", web::get().to(get_profile));
}

/// Load a user's profile, going through the cache when one is configured
pub async fn load_profile(
    state: &AppState,
    user_id: Uuid,
) -> Result<Option<StyleProfile>, StorageError> {
    let key = CacheKey::profile(user_id);
    if let Some(profile) = state.cache_get::<StyleProfile>(&key).await {
        return Ok(Some(profile));
    }

    let profile = state.profiles.get_profile(user_id).await?;
    if let Some(profile) = &profile {
        state.cache_set(&key, profile).await;
    }

    Ok(profile)
}

/// Create or replace the caller's style profile
///
/// POST /api/v1/style/profile
///
/// Request body:
/// ```json
/// {
///   "preferences": { "occasion": "formal", "color_palette": "neutrals" }
/// }
/// ```
///
/// The narrative is generated before the write. A failed generation still
/// saves the profile with the fallback narrative.
async fn save_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<SaveProfileRequest>,
) -> impl Responder {
    let Some(preferences) = req.into_inner().preferences else {
        tracing::info!("Profile save without preferences from user {}", user.user_id);
        return bad_request(&ValidationError::Missing("preferences"));
    };

    tracing::info!(
        "Saving style profile for user {} ({} preferences)",
        user.user_id,
        preferences.len()
    );

    let narrative = state.narratives.generate(&preferences).await;

    // Cleared on both sides of the write; a read racing the upsert can
    // re-cache the old profile in between
    let stale_keys = CacheKey::for_profile_change(user.user_id);
    state.cache_invalidate(&stale_keys).await;

    let profile = match state
        .profiles
        .upsert_profile(user.user_id, &preferences, &narrative)
        .await
    {
        Ok(profile) => profile,
        Err(e) => return storage_failure("Failed to save style profile", &e),
    };

    state.cache_invalidate(&stale_keys).await;

    HttpResponse::Ok().json(SaveProfileResponse {
        message: "Style profile saved successfully".to_string(),
        profile_id: profile.id,
        ai_analysis: narrative,
    })
}

/// GET /api/v1/style/profile
async fn get_profile(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    match load_profile(&state, user.user_id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(ProfileResponse {
            has_profile: true,
            profile: Some(profile),
            message: None,
        }),
        Ok(None) => HttpResponse::Ok().json(ProfileResponse {
            has_profile: false,
            profile: None,
            message: Some("No style profile found".to_string()),
        }),
        Err(e) => storage_failure("Failed to fetch style profile", &e),
    }
}
