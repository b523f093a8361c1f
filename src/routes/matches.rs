use actix_web::{web, HttpResponse};
use crate::models::{MatchFilter, UserId};
use crate::routes::AppState;
use crate::services::ServiceError;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/match/{user_id}", web::post().to(match_users));
}

/// Match endpoint
///
/// POST /api/v1/match/{user_id}
///
/// Request body:
/// ```json
/// {
///   "city": ["string"],
///   "gender": ["string"],
///   "age_range_start": 20,
///   "age_range_end": 40
/// }
/// ```
///
/// Responds with the matching users in storage order.
async fn match_users(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    req: web::Json<MatchFilter>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();

    tracing::info!(
        "Finding matches for user: {}, cities: {}, genders: {}, ages: {}-{}",
        user_id,
        req.cities.len(),
        req.genders.len(),
        req.age_start,
        req.age_end
    );

    let matches = state.users.match_users(user_id, &req).await?;
    Ok(HttpResponse::Ok().json(matches))
}
