use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeedingSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeedingSchedules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeedingSchedules::Name).string().not_null())
                    .col(ColumnDef::new(FeedingSchedules::Time).time().not_null())
                    .col(ColumnDef::new(FeedingSchedules::FoodType).string().not_null())
                    .col(ColumnDef::new(FeedingSchedules::Quantity).double().not_null())
                    .col(ColumnDef::new(FeedingSchedules::Unit).string().not_null())
                    .col(ColumnDef::new(FeedingSchedules::LivestockType).string_len(16))
                    .col(ColumnDef::new(FeedingSchedules::Kandang).string())
                    .col(ColumnDef::new(FeedingSchedules::NotifyBeforeMinutes).integer())
                    .col(
                        ColumnDef::new(FeedingSchedules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(FeedingSchedules::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(FeedingSchedules::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeedingActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeedingActivities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeedingActivities::ScheduleId).integer())
                    .col(ColumnDef::new(FeedingActivities::ScheduleName).string())
                    .col(ColumnDef::new(FeedingActivities::FedAt).date_time().not_null())
                    .col(ColumnDef::new(FeedingActivities::FoodType).string().not_null())
                    .col(ColumnDef::new(FeedingActivities::Quantity).double().not_null())
                    .col(ColumnDef::new(FeedingActivities::Unit).string().not_null())
                    .col(ColumnDef::new(FeedingActivities::Kandang).string())
                    .col(ColumnDef::new(FeedingActivities::PerformedBy).string())
                    .col(ColumnDef::new(FeedingActivities::Notes).text())
                    .col(ColumnDef::new(FeedingActivities::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(FeedingActivities::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Role).string_len(8).not_null())
                    .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RfidLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RfidLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RfidLogs::TagId).string().not_null())
                    .col(ColumnDef::new(RfidLogs::Reader).string().not_null())
                    .col(ColumnDef::new(RfidLogs::Kandang).string())
                    .col(ColumnDef::new(RfidLogs::ScannedAt).date_time().not_null())
                    .col(ColumnDef::new(RfidLogs::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EatingLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EatingLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EatingLogs::TagId).string().not_null())
                    .col(ColumnDef::new(EatingLogs::Kandang).string())
                    .col(ColumnDef::new(EatingLogs::StartedAt).date_time().not_null())
                    .col(ColumnDef::new(EatingLogs::DurationSeconds).integer().not_null())
                    .col(ColumnDef::new(EatingLogs::Amount).double())
                    .col(ColumnDef::new(EatingLogs::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rfid_logs_tag_id")
                    .table(RfidLogs::Table)
                    .col(RfidLogs::TagId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_eating_logs_tag_id")
                    .table(EatingLogs::Table)
                    .col(EatingLogs::TagId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).integer())
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::ScheduledFor).date_time())
                    .col(
                        ColumnDef::new(Notifications::Read)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notifications::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Notifications::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NotificationSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationSettings::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationSettings::FeedingReminders)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationSettings::HealthReminders)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(NotificationSettings::LeadMinutes).integer().not_null())
                    .col(ColumnDef::new(NotificationSettings::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EatingLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RfidLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeedingActivities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeedingSchedules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FeedingSchedules {
    #[sea_orm(iden = "feedingSchedules")]
    Table,
    Id,
    Name,
    Time,
    FoodType,
    Quantity,
    Unit,
    LivestockType,
    Kandang,
    NotifyBeforeMinutes,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FeedingActivities {
    #[sea_orm(iden = "feedingActivities")]
    Table,
    Id,
    ScheduleId,
    ScheduleName,
    FedAt,
    FoodType,
    Quantity,
    Unit,
    Kandang,
    PerformedBy,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RfidLogs {
    Table,
    Id,
    TagId,
    Reader,
    Kandang,
    ScannedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EatingLogs {
    Table,
    Id,
    TagId,
    Kandang,
    StartedAt,
    DurationSeconds,
    Amount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Kind,
    Title,
    Message,
    ScheduledFor,
    Read,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum NotificationSettings {
    #[sea_orm(iden = "notificationSettings")]
    Table,
    Id,
    UserId,
    FeedingReminders,
    HealthReminders,
    LeadMinutes,
    UpdatedAt,
}
