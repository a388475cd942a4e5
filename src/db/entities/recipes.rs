//! DB storage for saved recipes
use chrono::NaiveDateTime;
use sea_orm::{ActiveValue::Set, TransactionTrait, entity::prelude::*};
use serde::Serialize;

use crate::ai::SignedRecipe;
use crate::db::is_unique_violation;
use crate::error::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
/// A recipe a user saved after generating it
pub struct Model {
    #[sea_orm(primary_key)]
    /// db id
    pub id: i32,
    /// owner, as reported by the identity service
    pub user_id: String,
    /// recipe title
    pub title: String,
    /// recipe description
    pub description: String,
    /// JSON array of ingredient lines
    pub ingredients: String,
    /// JSON array of steps
    pub steps: String,
    /// energy in kcal
    pub kcal: f64,
    /// carbohydrates in grams
    pub carbs: f64,
    /// protein in grams
    pub protein: f64,
    /// fat in grams
    pub fat: f64,
    /// phrase used for the photo lookup
    pub image_search: String,
    /// resolved photo URL
    pub image_url: String,
    /// fingerprint issued at generation time
    pub signature: String,
    /// when it was saved
    pub created_at: DateTime,
}

/// relations for recipes
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::favorites::Entity")]
    /// users who favorited this recipe
    Favorites,
}

impl Related<super::favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// API representation of a stored recipe.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipeView {
    /// db id
    pub id: i32,
    /// owner
    pub user_id: String,
    /// recipe title
    pub title: String,
    /// recipe description
    pub description: String,
    /// ingredient lines
    pub ingredients: Vec<String>,
    /// steps
    pub steps: Vec<String>,
    /// energy in kcal
    pub kcal: f64,
    /// carbohydrates in grams
    pub carbs: f64,
    /// protein in grams
    pub protein: f64,
    /// fat in grams
    pub fat: f64,
    /// resolved photo URL
    pub image_url: String,
    /// when it was saved
    pub created_at: NaiveDateTime,
}

impl Model {
    /// Decodes the JSON columns into the API shape.
    pub fn to_view(&self) -> Result<RecipeView, AppError> {
        Ok(RecipeView {
            id: self.id,
            user_id: self.user_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            ingredients: serde_json::from_str(&self.ingredients)?,
            steps: serde_json::from_str(&self.steps)?,
            kcal: self.kcal,
            carbs: self.carbs,
            protein: self.protein,
            fat: self.fat,
            image_url: self.image_url.clone(),
            created_at: self.created_at,
        })
    }
}

impl Entity {
    /// Finds a recipe a user already saved with the same fingerprint.
    pub async fn find_by_signature<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
        signature: &str,
    ) -> Result<Option<Model>, DbErr> {
        Self::find()
            .filter(
                Column::UserId
                    .eq(user_id)
                    .and(Column::Signature.eq(signature)),
            )
            .one(db)
            .await
    }
}

/// Stores a signed recipe for `user_id`, refusing a second save of the same fingerprint.
pub(crate) async fn save_signed_recipe(
    db: &DatabaseConnection,
    user_id: &str,
    signed: &SignedRecipe,
) -> Result<Model, AppError> {
    let db_txn = db.begin().await?;

    if Entity::find_by_signature(&db_txn, user_id, &signed.signature)
        .await?
        .is_some()
    {
        return Err(duplicate_save());
    }

    let model = insert_signed_recipe(&db_txn, user_id, signed).await?;
    db_txn.commit().await?;

    Ok(model)
}

/// Inserts the row; a unique-index hit means a concurrent save of the same fingerprint won.
async fn insert_signed_recipe<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    signed: &SignedRecipe,
) -> Result<Model, AppError> {
    let recipe = &signed.recipe.recipe;
    let inserted = ActiveModel {
        user_id: Set(user_id.to_string()),
        title: Set(recipe.title.clone()),
        description: Set(recipe.description.clone()),
        ingredients: Set(serde_json::to_string(&recipe.ingredients)?),
        steps: Set(serde_json::to_string(&recipe.steps)?),
        kcal: Set(recipe.kcal),
        carbs: Set(recipe.carbs),
        protein: Set(recipe.protein),
        fat: Set(recipe.fat),
        image_search: Set(recipe.image_search.clone()),
        image_url: Set(signed.recipe.image_url.clone()),
        signature: Set(signed.signature.clone()),
        ..Default::default()
    }
    .insert(db)
    .await;

    match inserted {
        Ok(model) => Ok(model),
        Err(err) if is_unique_violation(&err) => Err(duplicate_save()),
        Err(err) => Err(err.into()),
    }
}

fn duplicate_save() -> AppError {
    AppError::Conflict("this recipe has already been saved".to_string())
}

/// Deletes a recipe and its favorites.
pub(crate) async fn delete_recipe(db: &DatabaseConnection, recipe_id: i32) -> Result<(), AppError> {
    let db_txn = db.begin().await?;
    super::favorites::Entity::delete_many()
        .filter(super::favorites::Column::RecipeId.eq(recipe_id))
        .exec(&db_txn)
        .await?;
    Entity::delete_by_id(recipe_id).exec(&db_txn).await?;
    db_txn.commit().await?;
    Ok(())
}
