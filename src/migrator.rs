// `MigrationTrait` declares `&SchemaManager` with an elided lifetime, so
// impls must elide it too; writing `<'_>` fails with E0195.
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_branches_table::Migration),
            Box::new(m20240901_000002_create_customers_table::Migration),
            Box::new(m20240901_000003_create_fabrics_table::Migration),
            Box::new(m20240901_000004_create_measurement_profiles_table::Migration),
            Box::new(m20240901_000005_create_work_orders_table::Migration),
            Box::new(m20240901_000006_create_work_order_items_table::Migration),
            Box::new(m20240901_000007_create_production_tasks_table::Migration),
            Box::new(m20240901_000008_create_payments_table::Migration),
            Box::new(m20240901_000009_create_shipments_table::Migration),
            Box::new(m20240901_000010_create_shipment_scans_table::Migration),
        ]
    }
}

mod m20240901_000001_create_branches_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240901_000001_create_branches_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Branches::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Branches::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Branches::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Branches::Area).string().not_null())
                        .col(
                            ColumnDef::new(Branches::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Branches::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Branches {
        Table,
        Id,
        Name,
        Area,
        CreatedAt,
    }
}

mod m20240901_000002_create_customers_table {
    use sea_orm_migration::prelude::*;

    use super::m20240901_000001_create_branches_table::Branches;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240901_000002_create_customers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Customers::Name).string().not_null())
                        .col(
                            ColumnDef::new(Customers::Phone)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Customers::AltPhone).string().null())
                        .col(ColumnDef::new(Customers::PreferredLang).string().null())
                        .col(ColumnDef::new(Customers::DefaultBranchId).uuid().null())
                        .col(
                            ColumnDef::new(Customers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-customers-default-branch")
                                .from(Customers::Table, Customers::DefaultBranchId)
                                .to(Branches::Table, Branches::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Customers {
        Table,
        Id,
        Name,
        Phone,
        AltPhone,
        PreferredLang,
        DefaultBranchId,
        CreatedAt,
    }
}

mod m20240901_000003_create_fabrics_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240901_000003_create_fabrics_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Fabrics::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Fabrics::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Fabrics::Sku)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Fabrics::Name).string().not_null())
                        .col(ColumnDef::new(Fabrics::Color).string().not_null())
                        .col(ColumnDef::new(Fabrics::Composition).string().not_null())
                        .col(ColumnDef::new(Fabrics::WidthCm).integer().not_null())
                        .col(ColumnDef::new(Fabrics::StockQty).integer().not_null())
                        .col(
                            ColumnDef::new(Fabrics::Price)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Fabrics::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Fabrics::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Fabrics {
        Table,
        Id,
        Sku,
        Name,
        Color,
        Composition,
        WidthCm,
        StockQty,
        Price,
        CreatedAt,
    }
}

mod m20240901_000004_create_measurement_profiles_table {
    use sea_orm_migration::prelude::*;

    use super::m20240901_000002_create_customers_table::Customers;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240901_000004_create_measurement_profiles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MeasurementProfiles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MeasurementProfiles::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MeasurementProfiles::CustomerId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MeasurementProfiles::GarmentType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MeasurementProfiles::Unit)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MeasurementProfiles::Version)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MeasurementProfiles::TakenByName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MeasurementProfiles::TakenAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MeasurementProfiles::DataJson)
                                .json()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-measurement-profiles-customer")
                                .from(
                                    MeasurementProfiles::Table,
                                    MeasurementProfiles::CustomerId,
                                )
                                .to(Customers::Table, Customers::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-measurement-profiles-customer-garment")
                        .table(MeasurementProfiles::Table)
                        .col(MeasurementProfiles::CustomerId)
                        .col(MeasurementProfiles::GarmentType)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MeasurementProfiles::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum MeasurementProfiles {
        Table,
        Id,
        CustomerId,
        GarmentType,
        Unit,
        Version,
        TakenByName,
        TakenAt,
        DataJson,
    }
}

mod m20240901_000005_create_work_orders_table {
    use sea_orm_migration::prelude::*;

    use super::m20240901_000001_create_branches_table::Branches;
    use super::m20240901_000002_create_customers_table::Customers;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240901_000005_create_work_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WorkOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WorkOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(WorkOrders::Code).string().not_null())
                        .col(ColumnDef::new(WorkOrders::CustomerId).uuid().not_null())
                        .col(ColumnDef::new(WorkOrders::BranchId).uuid().not_null())
                        .col(
                            ColumnDef::new(WorkOrders::Status)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::Total)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::Deposit)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::Balance)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::DueDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::Priority)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(ColumnDef::new(WorkOrders::Notes).string().null())
                        .col(
                            ColumnDef::new(WorkOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-work-orders-customer")
                                .from(WorkOrders::Table, WorkOrders::CustomerId)
                                .to(Customers::Table, Customers::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-work-orders-branch")
                                .from(WorkOrders::Table, WorkOrders::BranchId)
                                .to(Branches::Table, Branches::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // The code generator alone does not guarantee uniqueness; this
            // index is the backstop and inserts retry on conflict.
            manager
                .create_index(
                    Index::create()
                        .name("idx-work-orders-code")
                        .table(WorkOrders::Table)
                        .col(WorkOrders::Code)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-work-orders-status")
                        .table(WorkOrders::Table)
                        .col(WorkOrders::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WorkOrders::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum WorkOrders {
        Table,
        Id,
        Code,
        CustomerId,
        BranchId,
        Status,
        Total,
        Deposit,
        Balance,
        DueDate,
        Priority,
        Notes,
        CreatedAt,
        UpdatedAt,
        Version,
    }
}

mod m20240901_000006_create_work_order_items_table {
    use sea_orm_migration::prelude::*;

    use super::m20240901_000003_create_fabrics_table::Fabrics;
    use super::m20240901_000004_create_measurement_profiles_table::MeasurementProfiles;
    use super::m20240901_000005_create_work_orders_table::WorkOrders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240901_000006_create_work_order_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WorkOrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WorkOrderItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkOrderItems::WorkOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkOrderItems::GarmentType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkOrderItems::MeasurementProfileId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(WorkOrderItems::FabricId).uuid().null())
                        .col(
                            ColumnDef::new(WorkOrderItems::Price)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(WorkOrderItems::OptionsJson).json().null())
                        .col(
                            ColumnDef::new(WorkOrderItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-work-order-items-order")
                                .from(WorkOrderItems::Table, WorkOrderItems::WorkOrderId)
                                .to(WorkOrders::Table, WorkOrders::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-work-order-items-profile")
                                .from(
                                    WorkOrderItems::Table,
                                    WorkOrderItems::MeasurementProfileId,
                                )
                                .to(MeasurementProfiles::Table, MeasurementProfiles::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-work-order-items-fabric")
                                .from(WorkOrderItems::Table, WorkOrderItems::FabricId)
                                .to(Fabrics::Table, Fabrics::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-work-order-items-order")
                        .table(WorkOrderItems::Table)
                        .col(WorkOrderItems::WorkOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WorkOrderItems::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum WorkOrderItems {
        Table,
        Id,
        WorkOrderId,
        GarmentType,
        MeasurementProfileId,
        FabricId,
        Price,
        OptionsJson,
        CreatedAt,
    }
}

mod m20240901_000007_create_production_tasks_table {
    use sea_orm_migration::prelude::*;

    use super::m20240901_000006_create_work_order_items_table::WorkOrderItems;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240901_000007_create_production_tasks_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductionTasks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductionTasks::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionTasks::WorkOrderItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionTasks::Stage)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionTasks::StartedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionTasks::FinishedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(ProductionTasks::Notes).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-production-tasks-item")
                                .from(ProductionTasks::Table, ProductionTasks::WorkOrderItemId)
                                .to(WorkOrderItems::Table, WorkOrderItems::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // Stage advancement loads open tasks by item on every call.
            manager
                .create_index(
                    Index::create()
                        .name("idx-production-tasks-item-open")
                        .table(ProductionTasks::Table)
                        .col(ProductionTasks::WorkOrderItemId)
                        .col(ProductionTasks::FinishedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductionTasks::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum ProductionTasks {
        Table,
        Id,
        WorkOrderItemId,
        Stage,
        StartedAt,
        FinishedAt,
        Notes,
    }
}

mod m20240901_000008_create_payments_table {
    use sea_orm_migration::prelude::*;

    use super::m20240901_000005_create_work_orders_table::WorkOrders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240901_000008_create_payments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Payments::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Payments::WorkOrderId).uuid().not_null())
                        .col(
                            ColumnDef::new(Payments::Amount)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Payments::Method).string_len(16).not_null())
                        .col(ColumnDef::new(Payments::TxnRef).string().null())
                        .col(
                            ColumnDef::new(Payments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-payments-work-order")
                                .from(Payments::Table, Payments::WorkOrderId)
                                .to(WorkOrders::Table, WorkOrders::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-payments-work-order")
                        .table(Payments::Table)
                        .col(Payments::WorkOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Payments {
        Table,
        Id,
        WorkOrderId,
        Amount,
        Method,
        TxnRef,
        CreatedAt,
    }
}

mod m20240901_000009_create_shipments_table {
    use sea_orm_migration::prelude::*;

    use super::m20240901_000001_create_branches_table::Branches;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240901_000009_create_shipments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Shipments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Shipments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::FromBranchId).uuid().not_null())
                        .col(ColumnDef::new(Shipments::ToBranchId).uuid().not_null())
                        .col(
                            ColumnDef::new(Shipments::Date)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::Notes).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-shipments-from-branch")
                                .from(Shipments::Table, Shipments::FromBranchId)
                                .to(Branches::Table, Branches::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-shipments-to-branch")
                                .from(Shipments::Table, Shipments::ToBranchId)
                                .to(Branches::Table, Branches::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Shipments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Shipments {
        Table,
        Id,
        FromBranchId,
        ToBranchId,
        Date,
        Notes,
    }
}

mod m20240901_000010_create_shipment_scans_table {
    use sea_orm_migration::prelude::*;

    use super::m20240901_000005_create_work_orders_table::WorkOrders;
    use super::m20240901_000009_create_shipments_table::Shipments;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240901_000010_create_shipment_scans_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ShipmentScans::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ShipmentScans::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ShipmentScans::ShipmentId).uuid().not_null())
                        .col(
                            ColumnDef::new(ShipmentScans::WorkOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentScans::Direction)
                                .string_len(8)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentScans::ScannedByName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentScans::ScannedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-shipment-scans-shipment")
                                .from(ShipmentScans::Table, ShipmentScans::ShipmentId)
                                .to(Shipments::Table, Shipments::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-shipment-scans-work-order")
                                .from(ShipmentScans::Table, ShipmentScans::WorkOrderId)
                                .to(WorkOrders::Table, WorkOrders::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ShipmentScans::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum ShipmentScans {
        Table,
        Id,
        ShipmentId,
        WorkOrderId,
        Direction,
        ScannedByName,
        ScannedAt,
    }
}
