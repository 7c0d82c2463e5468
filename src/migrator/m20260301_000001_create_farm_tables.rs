use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Animals. `location` holds a kandang name, not a foreign key.
        manager
            .create_table(
                Table::create()
                    .table(Animals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Animals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Animals::TagId).string().not_null())
                    .col(ColumnDef::new(Animals::AnimalId).string())
                    .col(ColumnDef::new(Animals::Type).string_len(16).not_null())
                    .col(ColumnDef::new(Animals::Breed).string().not_null())
                    .col(ColumnDef::new(Animals::Gender).string_len(8).not_null())
                    .col(ColumnDef::new(Animals::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Animals::Weight).double().not_null())
                    .col(ColumnDef::new(Animals::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Animals::Location).string().not_null())
                    .col(ColumnDef::new(Animals::PhotoUrl).string())
                    .col(ColumnDef::new(Animals::Notes).text())
                    .col(ColumnDef::new(Animals::PurchaseDate).date())
                    .col(ColumnDef::new(Animals::PurchasePrice).double())
                    .col(ColumnDef::new(Animals::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Animals::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_animals_location")
                    .table(Animals::Table)
                    .col(Animals::Location)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_animals_status")
                    .table(Animals::Table)
                    .col(Animals::Status)
                    .to_owned(),
            )
            .await?;

        // Kandang. Name uniqueness is a convention only.
        manager
            .create_table(
                Table::create()
                    .table(Kandang::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Kandang::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Kandang::Name).string().not_null())
                    .col(ColumnDef::new(Kandang::Capacity).integer().not_null())
                    .col(ColumnDef::new(Kandang::Type).string_len(8).not_null())
                    .col(ColumnDef::new(Kandang::Location).string().not_null())
                    .col(ColumnDef::new(Kandang::Temperature).double())
                    .col(ColumnDef::new(Kandang::Humidity).double())
                    .col(ColumnDef::new(Kandang::FoodSpotX).integer().not_null().default(0))
                    .col(ColumnDef::new(Kandang::FoodSpotY).integer().not_null().default(0))
                    .col(ColumnDef::new(Kandang::WaterSpotX).integer().not_null().default(3))
                    .col(ColumnDef::new(Kandang::WaterSpotY).integer().not_null().default(3))
                    .col(ColumnDef::new(Kandang::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Kandang::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HealthRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HealthRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HealthRecords::LivestockId).integer().not_null())
                    .col(ColumnDef::new(HealthRecords::Date).date().not_null())
                    .col(ColumnDef::new(HealthRecords::Type).string_len(16).not_null())
                    .col(ColumnDef::new(HealthRecords::Status).string_len(16).not_null())
                    .col(ColumnDef::new(HealthRecords::Description).text().not_null())
                    .col(ColumnDef::new(HealthRecords::NextCheckup).date())
                    .col(ColumnDef::new(HealthRecords::Veterinarian).string())
                    .col(ColumnDef::new(HealthRecords::Medication).string())
                    .col(ColumnDef::new(HealthRecords::Notes).text())
                    .col(ColumnDef::new(HealthRecords::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(HealthRecords::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BreedingRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BreedingRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BreedingRecords::MotherId).integer().not_null())
                    .col(ColumnDef::new(BreedingRecords::FatherId).integer())
                    .col(ColumnDef::new(BreedingRecords::BreedingDate).date().not_null())
                    .col(
                        ColumnDef::new(BreedingRecords::ExpectedDeliveryDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BreedingRecords::ActualDeliveryDate).date())
                    .col(ColumnDef::new(BreedingRecords::Status).string_len(16).not_null())
                    .col(ColumnDef::new(BreedingRecords::NumberOfOffspring).integer())
                    .col(ColumnDef::new(BreedingRecords::Notes).text())
                    .col(ColumnDef::new(BreedingRecords::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(BreedingRecords::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sales::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sales::LivestockId).integer().not_null())
                    .col(ColumnDef::new(Sales::BuyerName).string().not_null())
                    .col(ColumnDef::new(Sales::BuyerContact).string().not_null())
                    .col(ColumnDef::new(Sales::Price).double().not_null())
                    .col(ColumnDef::new(Sales::SaleDate).date().not_null())
                    .col(ColumnDef::new(Sales::PaymentStatus).string_len(16).not_null())
                    .col(ColumnDef::new(Sales::DeliveryStatus).string_len(16).not_null())
                    .col(ColumnDef::new(Sales::Notes).text())
                    .col(ColumnDef::new(Sales::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Sales::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BreedingRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HealthRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Kandang::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Animals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Animals {
    Table,
    Id,
    TagId,
    AnimalId,
    Type,
    Breed,
    Gender,
    DateOfBirth,
    Weight,
    Status,
    Location,
    PhotoUrl,
    Notes,
    PurchaseDate,
    PurchasePrice,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Kandang {
    Table,
    Id,
    Name,
    Capacity,
    Type,
    Location,
    Temperature,
    Humidity,
    FoodSpotX,
    FoodSpotY,
    WaterSpotX,
    WaterSpotY,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HealthRecords {
    Table,
    Id,
    LivestockId,
    Date,
    Type,
    Status,
    Description,
    NextCheckup,
    Veterinarian,
    Medication,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BreedingRecords {
    Table,
    Id,
    MotherId,
    FatherId,
    BreedingDate,
    ExpectedDeliveryDate,
    ActualDeliveryDate,
    Status,
    NumberOfOffspring,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    Id,
    LivestockId,
    BuyerName,
    BuyerContact,
    Price,
    SaleDate,
    PaymentStatus,
    DeliveryStatus,
    Notes,
    CreatedAt,
    UpdatedAt,
}
