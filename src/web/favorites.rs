use super::prelude::*;
use super::recipes::RecipeList;

/// handles POST /api/recipes/{id}/favorite
pub(crate) async fn add_favorite_handler(
    user: AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    favorites::add_favorite(&state.db, &user.user_id, recipe_id).await?;
    debug!(user_id = user.user_id.as_str(), recipe_id, "Favorited recipe");
    Ok(StatusCode::NO_CONTENT)
}

/// handles DELETE /api/recipes/{id}/favorite
pub(crate) async fn remove_favorite_handler(
    user: AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    favorites::remove_favorite(&state.db, &user.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// handles GET /api/favorites
pub(crate) async fn list_favorites_handler(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<RecipeList>, AppError> {
    let models = favorites::favorite_recipes(&state.db, &user.user_id).await?;
    Ok(Json(RecipeList::from_models(&models)?))
}
