use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Colleges
        manager
            .create_table(
                Table::create()
                    .table(Colleges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Colleges::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Colleges::Name)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // Programs
        manager
            .create_table(
                Table::create()
                    .table(Programs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Programs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Programs::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Programs::CollegeId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-programs-college_id")
                            .from(Programs::Table, Programs::CollegeId)
                            .to(Colleges::Table, Colleges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-programs-college_id")
                    .table(Programs::Table)
                    .col(Programs::CollegeId)
                    .to_owned(),
            )
            .await?;

        // Organizations
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organizations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Organizations::Name)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Organizations::CollegeId).integer().null())
                    .col(ColumnDef::new(Organizations::Description).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-organizations-college_id")
                            .from(Organizations::Table, Organizations::CollegeId)
                            .to(Colleges::Table, Colleges::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-organizations-name")
                    .table(Organizations::Table)
                    .col(Organizations::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-organizations-college_id")
                    .table(Organizations::Table)
                    .col(Organizations::CollegeId)
                    .to_owned(),
            )
            .await?;

        // Students
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::StudentId)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Lastname).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Students::Firstname)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::Middlename).string_len(100).null())
                    .col(ColumnDef::new(Students::ProgramId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-program_id")
                            .from(Students::Table, Students::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-students-lastname")
                    .table(Students::Table)
                    .col(Students::Lastname)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-students-firstname")
                    .table(Students::Table)
                    .col(Students::Firstname)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-students-program_id")
                    .table(Students::Table)
                    .col(Students::ProgramId)
                    .to_owned(),
            )
            .await?;

        // OrgMembers
        manager
            .create_table(
                Table::create()
                    .table(OrgMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrgMembers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrgMembers::StudentId).integer().not_null())
                    .col(
                        ColumnDef::new(OrgMembers::OrganizationId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrgMembers::DateJoined).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-org_members-student_id")
                            .from(OrgMembers::Table, OrgMembers::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-org_members-organization_id")
                            .from(OrgMembers::Table, OrgMembers::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-org_members-student_id-organization_id-unique")
                    .table(OrgMembers::Table)
                    .col(OrgMembers::StudentId)
                    .col(OrgMembers::OrganizationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-org_members-organization_id")
                    .table(OrgMembers::Table)
                    .col(OrgMembers::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-org_members-date_joined")
                    .table(OrgMembers::Table)
                    .col(OrgMembers::DateJoined)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrgMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Programs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Colleges::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Colleges {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Programs {
    Table,
    Id,
    Name,
    CollegeId,
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
    Name,
    CollegeId,
    Description,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    StudentId,
    Lastname,
    Firstname,
    Middlename,
    ProgramId,
}

#[derive(DeriveIden)]
enum OrgMembers {
    Table,
    Id,
    StudentId,
    OrganizationId,
    DateJoined,
}
