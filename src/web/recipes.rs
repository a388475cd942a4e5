use crate::ai::{
    DietType, GenerationError, MealType, ParsedRecipes, SignedRecipe, generate_recipes,
    normalize_ingredients,
};
use crate::constants::RECIPE_LIST_LIMIT;
use crate::photos::fetch_image_for_recipe;

use super::prelude::*;

#[derive(Deserialize)]
pub(crate) struct GenerateRequest {
    ingredients: Vec<String>,
    #[serde(default)]
    meal_type: Option<MealType>,
    #[serde(default)]
    diet_type: Option<DietType>,
}

#[derive(Serialize)]
pub(crate) struct GenerateResponse {
    status: &'static str,
    data: Vec<SignedRecipe>,
}

#[derive(Serialize)]
pub(crate) struct RecipeList {
    data: Vec<recipes::RecipeView>,
}

impl RecipeList {
    pub(crate) fn from_models(models: &[recipes::Model]) -> Result<Self, AppError> {
        let data = models
            .iter()
            .map(recipes::Model::to_view)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { data })
    }
}

/// handles POST /api/recipes/generate
pub(crate) async fn generate_handler(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let ingredients = if state.translate_ingredients {
        let translated =
            normalize_ingredients(state.chat.as_ref(), &state.policy, &request.ingredients).await;
        if translated.is_empty() {
            return Err(GenerationError::NoValidIngredients.into());
        }
        translated
    } else {
        request.ingredients
    };

    let parsed = generate_recipes(
        state.chat.as_ref(),
        &state.policy,
        ingredients.as_slice(),
        request.meal_type,
        request.diet_type,
    )
    .await?;
    let generated = match parsed {
        ParsedRecipes::Ok { data } => data,
        ParsedRecipes::AiError { message } => return Err(AppError::Rejected(message)),
        ParsedRecipes::InvalidFormat { .. } => return Err(AppError::GenerationFailed),
    };

    let mut data = Vec::with_capacity(generated.len());
    for recipe in generated {
        let image_url = fetch_image_for_recipe(
            state.photos.as_ref(),
            &recipe.image_search,
            &state.placeholder_image_url,
        )
        .await;
        let recipe = recipe.finalize(image_url);
        let signature = state.signer.sign(&recipe)?;
        data.push(SignedRecipe { recipe, signature });
    }

    info!(user_id = user.user_id.as_str(), "Generated {} recipes", data.len());
    Ok(Json(GenerateResponse { status: "ok", data }))
}

/// handles POST /api/recipes
pub(crate) async fn save_recipe_handler(
    user: AuthUser,
    State(state): State<AppState>,
    Json(signed): Json<SignedRecipe>,
) -> Result<impl IntoResponse, AppError> {
    if !signed.recipe.recipe.is_valid() {
        return Err(AppError::BadRequest("recipe failed validation".to_string()));
    }
    if !state.signer.verify(&signed.recipe, &signed.signature) {
        return Err(AppError::Forbidden("recipe signature mismatch".to_string()));
    }

    let model = recipes::save_signed_recipe(&state.db, &user.user_id, &signed).await?;
    info!(user_id = user.user_id.as_str(), recipe_id = model.id, "Saved recipe");
    Ok((StatusCode::CREATED, Json(model.to_view()?)))
}

/// handles GET /api/recipes
pub(crate) async fn list_recipes_handler(
    State(state): State<AppState>,
) -> Result<Json<RecipeList>, AppError> {
    let models = recipes::Entity::find()
        .order_by_desc(recipes::Column::CreatedAt)
        .order_by_desc(recipes::Column::Id)
        .limit(RECIPE_LIST_LIMIT)
        .all(&state.db)
        .await?;
    Ok(Json(RecipeList::from_models(&models)?))
}

/// handles GET /api/recipes/mine
pub(crate) async fn my_recipes_handler(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<RecipeList>, AppError> {
    let models = recipes::Entity::find()
        .filter(recipes::Column::UserId.eq(user.user_id.as_str()))
        .order_by_desc(recipes::Column::CreatedAt)
        .order_by_desc(recipes::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(RecipeList::from_models(&models)?))
}

/// handles GET /api/recipes/{id}
pub(crate) async fn get_recipe_handler(
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<recipes::RecipeView>, AppError> {
    let model = recipes::Entity::find_by_id(recipe_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {recipe_id}")))?;
    Ok(Json(model.to_view()?))
}

/// handles DELETE /api/recipes/{id}, owners only
pub(crate) async fn delete_recipe_handler(
    user: AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let model = recipes::Entity::find_by_id(recipe_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {recipe_id}")))?;
    if model.user_id != user.user_id {
        return Err(AppError::Forbidden(
            "only the owner can delete this recipe".to_string(),
        ));
    }

    recipes::delete_recipe(&state.db, recipe_id).await?;
    info!(user_id = user.user_id.as_str(), recipe_id, "Deleted recipe");
    Ok(StatusCode::NO_CONTENT)
}
