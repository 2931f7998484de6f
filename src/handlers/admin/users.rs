// GET /api/users - admin-only account listing

use axum::extract::{Extension, State};

use crate::database::models::User;
use crate::database::store::Document;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Document>> {
    user.require_admin()?;

    let mut users = state.repo::<User>().list(&Document::new()).await?;
    for account in users.iter_mut() {
        account.remove("password");
    }
    Ok(ApiResponse::success(users))
}
