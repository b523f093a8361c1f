use actix_web::{web, HttpResponse};
use crate::models::{EmailValidationResponse, ListUsersQuery, UserFields, UserId};
use crate::routes::AppState;
use crate::services::ServiceError;

/// Configure user record routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/users", web::get().to(list_users))
        .route("/users", web::post().to(create_user))
        .route("/users/bulk", web::post().to(create_users_bulk))
        .route("/users/{user_id}", web::get().to(get_user))
        .route("/users/{user_id}", web::put().to(update_user))
        .route("/users/{user_id}", web::delete().to(delete_user))
        .route("/validate_email/{email}", web::get().to(validate_email));
}

/// Create user endpoint
///
/// POST /api/v1/users
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "age": 25,
///   "gender": "string",
///   "email": "string",
///   "city": "string",
///   "interests": ["string"]
/// }
/// ```
async fn create_user(
    state: web::Data<AppState>,
    req: web::Json<UserFields>,
) -> Result<HttpResponse, ServiceError> {
    let user = state.users.create_user(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Bulk create endpoint
///
/// POST /api/v1/users/bulk
///
/// Takes an array of user bodies. Either every user is created or none is.
async fn create_users_bulk(
    state: web::Data<AppState>,
    req: web::Json<Vec<UserFields>>,
) -> Result<HttpResponse, ServiceError> {
    let users = state.users.create_users(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(users))
}

/// List users endpoint
///
/// GET /api/v1/users?skip={skip}&limit={limit}
async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, ServiceError> {
    let limit = query
        .limit
        .unwrap_or(state.default_list_limit)
        .min(state.max_list_limit);
    let users = state.users.list_users(query.skip, limit).await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
) -> Result<HttpResponse, ServiceError> {
    let user = state.users.get_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Update user endpoint
///
/// PUT /api/v1/users/{user_id}
///
/// Replaces every field. Same body as create.
async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    req: web::Json<UserFields>,
) -> Result<HttpResponse, ServiceError> {
    let user = state.users.update_user(path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
) -> Result<HttpResponse, ServiceError> {
    let user = state.users.delete_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Validate email endpoint
///
/// GET /api/v1/validate_email/{email}
///
/// Always answers 200 with the classification:
/// ```json
/// { "is_valid": false, "error": "Duplicate email", "user_id": 5 }
/// ```
async fn validate_email(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let email = path.into_inner();
    let result = state.users.validate_email(&email).await?;

    tracing::debug!("Email validation for {}: {:?}", email, result);

    Ok(HttpResponse::Ok().json(EmailValidationResponse::from(result)))
}
