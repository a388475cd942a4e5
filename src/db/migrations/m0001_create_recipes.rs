use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recipes::UserId).string().not_null())
                    .col(ColumnDef::new(Recipes::Title).string().not_null())
                    .col(ColumnDef::new(Recipes::Description).text().not_null())
                    .col(ColumnDef::new(Recipes::Ingredients).text().not_null())
                    .col(ColumnDef::new(Recipes::Steps).text().not_null())
                    .col(ColumnDef::new(Recipes::Kcal).double().not_null())
                    .col(ColumnDef::new(Recipes::Carbs).double().not_null())
                    .col(ColumnDef::new(Recipes::Protein).double().not_null())
                    .col(ColumnDef::new(Recipes::Fat).double().not_null())
                    .col(ColumnDef::new(Recipes::ImageSearch).string().not_null())
                    .col(ColumnDef::new(Recipes::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Recipes::Signature).string().not_null())
                    .col(
                        ColumnDef::new(Recipes::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .index(
                        Index::create()
                            .name("idx_recipes_user_signature")
                            .table(Recipes::Table)
                            .col(Recipes::UserId)
                            .col(Recipes::Signature)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Ingredients,
    Steps,
    Kcal,
    Carbs,
    Protein,
    Fat,
    ImageSearch,
    ImageUrl,
    Signature,
    CreatedAt,
}
