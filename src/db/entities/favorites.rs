//! DB storage for favorited recipes
use sea_orm::{ActiveValue::Set, QueryOrder, TransactionTrait, entity::prelude::*};

use crate::db::is_unique_violation;
use crate::error::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "favorites")]
/// A user marking a recipe as favorite
pub struct Model {
    #[sea_orm(primary_key)]
    /// db id
    pub id: i32,
    /// user who favorited
    pub user_id: String,
    /// foreign key to recipe
    pub recipe_id: i32,
    /// when it was favorited
    pub created_at: DateTime,
}

/// relations for favorites
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipes::Entity",
        from = "Column::RecipeId",
        to = "super::recipes::Column::Id"
    )]
    /// foreign key relation to recipes
    Recipes,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Marks a recipe as favorite; doing it twice is a no-op.
pub(crate) async fn add_favorite(
    db: &DatabaseConnection,
    user_id: &str,
    recipe_id: i32,
) -> Result<(), AppError> {
    let db_txn = db.begin().await?;

    if super::recipes::Entity::find_by_id(recipe_id)
        .one(&db_txn)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!("recipe {recipe_id}")));
    }

    let existing = Entity::find()
        .filter(
            Column::UserId
                .eq(user_id)
                .and(Column::RecipeId.eq(recipe_id)),
        )
        .one(&db_txn)
        .await?;
    if existing.is_none() {
        insert_favorite(&db_txn, user_id, recipe_id).await?;
    }
    db_txn.commit().await?;
    Ok(())
}

/// Inserts the row; losing to a concurrent identical favorite still counts as done.
async fn insert_favorite<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    recipe_id: i32,
) -> Result<(), AppError> {
    let inserted = ActiveModel {
        user_id: Set(user_id.to_string()),
        recipe_id: Set(recipe_id),
        ..Default::default()
    }
    .insert(db)
    .await;

    match inserted {
        Ok(_) => Ok(()),
        Err(err) if is_unique_violation(&err) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Removes a favorite if present.
pub(crate) async fn remove_favorite(
    db: &DatabaseConnection,
    user_id: &str,
    recipe_id: i32,
) -> Result<(), AppError> {
    Entity::delete_many()
        .filter(
            Column::UserId
                .eq(user_id)
                .and(Column::RecipeId.eq(recipe_id)),
        )
        .exec(db)
        .await?;
    Ok(())
}

/// Recipes a user favorited, most recent favorite first.
pub(crate) async fn favorite_recipes(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<super::recipes::Model>, AppError> {
    let rows = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .find_also_related(super::recipes::Entity)
        .all(db)
        .await?;
    Ok(rows.into_iter().filter_map(|(_, recipe)| recipe).collect())
}
