use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240315_000001_create_establishments_table::Migration),
            Box::new(m20240315_000002_create_animals_table::Migration),
            Box::new(m20240315_000003_create_products_table::Migration),
            Box::new(m20240315_000004_create_product_lots_table::Migration),
            Box::new(m20240315_000005_create_treatments_table::Migration),
            Box::new(m20240315_000006_create_administrations_table::Migration),
            Box::new(m20240315_000007_create_inventory_transactions_table::Migration),
            Box::new(m20240315_000008_create_movements_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240315_000001_create_establishments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000001_create_establishments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Establishments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Establishments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Establishments::Name).string().not_null())
                        .col(ColumnDef::new(Establishments::Kind).string().not_null())
                        .col(ColumnDef::new(Establishments::RanchId).uuid().null())
                        .col(
                            ColumnDef::new(Establishments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Establishments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_establishments_ranch_id")
                        .table(Establishments::Table)
                        .col(Establishments::RanchId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Establishments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Establishments {
        Table,
        Id,
        Name,
        Kind,
        RanchId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240315_000002_create_animals_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000002_create_animals_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Animals::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Animals::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Animals::TagNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Animals::Name).string().null())
                        .col(ColumnDef::new(Animals::Breed).string().null())
                        .col(ColumnDef::new(Animals::BirthDate).date().null())
                        .col(ColumnDef::new(Animals::EstablishmentId).uuid().null())
                        .col(ColumnDef::new(Animals::Status).string().not_null())
                        .col(
                            ColumnDef::new(Animals::Version)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Animals::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Animals::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Animals::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_animals_establishment_id")
                        .table(Animals::Table)
                        .col(Animals::EstablishmentId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_animals_status")
                        .table(Animals::Table)
                        .col(Animals::Status)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Animals::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Animals {
        Table,
        Id,
        TagNumber,
        Name,
        Breed,
        BirthDate,
        EstablishmentId,
        Status,
        Version,
        CreatedAt,
        UpdatedAt,
        DeletedAt,
    }
}

mod m20240315_000003_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000003_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Description).string().null())
                        .col(
                            ColumnDef::new(Products::MeatWithdrawalDays)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::MilkWithdrawalDays)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Products {
        Table,
        Id,
        Name,
        Description,
        MeatWithdrawalDays,
        MilkWithdrawalDays,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240315_000004_create_product_lots_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000004_create_product_lots_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductLots::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductLots::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductLots::ProductId).uuid().not_null())
                        .col(ColumnDef::new(ProductLots::LotNumber).string().not_null())
                        .col(
                            ColumnDef::new(ProductLots::InitialQuantity)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductLots::AvailableQuantity)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductLots::ExpiresAt).date().null())
                        .col(
                            ColumnDef::new(ProductLots::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductLots::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductLots::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_lots_product_id")
                        .table(ProductLots::Table)
                        .col(ProductLots::ProductId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductLots::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum ProductLots {
        Table,
        Id,
        ProductId,
        LotNumber,
        InitialQuantity,
        AvailableQuantity,
        ExpiresAt,
        CreatedAt,
        UpdatedAt,
        DeletedAt,
    }
}

mod m20240315_000005_create_treatments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000005_create_treatments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Treatments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Treatments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Treatments::AnimalId).uuid().not_null())
                        .col(ColumnDef::new(Treatments::Description).string().null())
                        .col(
                            ColumnDef::new(Treatments::StartedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Treatments::EndedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Treatments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Treatments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_treatments_animal_id")
                        .table(Treatments::Table)
                        .col(Treatments::AnimalId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Treatments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Treatments {
        Table,
        Id,
        AnimalId,
        Description,
        StartedAt,
        EndedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240315_000006_create_administrations_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000006_create_administrations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Administrations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Administrations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Administrations::TreatmentId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Administrations::LotId).uuid().not_null())
                        .col(
                            ColumnDef::new(Administrations::Dose)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Administrations::Route).string().null())
                        .col(
                            ColumnDef::new(Administrations::AdministeredAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Administrations::MeatWithdrawalUntil)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Administrations::MilkWithdrawalUntil)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Administrations::Notes).string().null())
                        .col(
                            ColumnDef::new(Administrations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Administrations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_administrations_treatment_id")
                        .table(Administrations::Table)
                        .col(Administrations::TreatmentId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_administrations_lot_id")
                        .table(Administrations::Table)
                        .col(Administrations::LotId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Administrations::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Administrations {
        Table,
        Id,
        TreatmentId,
        LotId,
        Dose,
        Route,
        AdministeredAt,
        MeatWithdrawalUntil,
        MilkWithdrawalUntil,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240315_000007_create_inventory_transactions_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000007_create_inventory_transactions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryTransactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryTransactions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryTransactions::LotId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryTransactions::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryTransactions::TransactionType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryTransactions::Quantity)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryTransactions::OccurredAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryTransactions::AdministrationId)
                                .uuid()
                                .null(),
                        )
                        .col(ColumnDef::new(InventoryTransactions::Reason).string().null())
                        .col(
                            ColumnDef::new(InventoryTransactions::CreatedBy)
                                .uuid()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryTransactions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_transactions_lot_id")
                        .table(InventoryTransactions::Table)
                        .col(InventoryTransactions::LotId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_transactions_administration_id")
                        .table(InventoryTransactions::Table)
                        .col(InventoryTransactions::AdministrationId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(InventoryTransactions::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(Iden)]
    enum InventoryTransactions {
        Table,
        Id,
        LotId,
        ProductId,
        TransactionType,
        Quantity,
        OccurredAt,
        AdministrationId,
        Reason,
        CreatedBy,
        CreatedAt,
    }
}

mod m20240315_000008_create_movements_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000008_create_movements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Movements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Movements::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Movements::AnimalId).uuid().not_null())
                        .col(ColumnDef::new(Movements::OriginId).uuid().null())
                        .col(ColumnDef::new(Movements::DestinationId).uuid().null())
                        .col(ColumnDef::new(Movements::Kind).string().not_null())
                        .col(
                            ColumnDef::new(Movements::MovedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Movements::Notes).string().null())
                        .col(ColumnDef::new(Movements::CreatedBy).uuid().null())
                        .col(
                            ColumnDef::new(Movements::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movements_animal_id")
                        .table(Movements::Table)
                        .col(Movements::AnimalId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Movements::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Movements {
        Table,
        Id,
        AnimalId,
        OriginId,
        DestinationId,
        Kind,
        MovedAt,
        Notes,
        CreatedBy,
        CreatedAt,
    }
}
