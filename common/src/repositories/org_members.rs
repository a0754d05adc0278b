use super::search_term;
use crate::entities::{
    org_members::{self, MemberLabel},
    organizations,
    prelude::{OrgMembers, Organizations, Students},
    students,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct OrgMemberListQuery {
    pub search: Option<String>,
    pub organization_id: Option<i32>,
    /// Inclusive lower bound on `date_joined`.
    pub joined_from: Option<NaiveDate>,
    /// Inclusive upper bound on `date_joined`.
    pub joined_to: Option<NaiveDate>,
}

/// A membership together with the records it links.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRow {
    pub member: org_members::Model,
    pub student: students::Model,
    pub organization: organizations::Model,
}

impl MemberRow {
    pub fn label(&self) -> MemberLabel<'_> {
        MemberLabel {
            student: &self.student,
            organization: &self.organization,
        }
    }
}

#[async_trait::async_trait]
pub trait OrgMemberRepository: Send + Sync {
    async fn count(&self) -> Result<u64, DbErr>;

    async fn find_by_pair(
        &self,
        student_id: i32,
        organization_id: i32,
    ) -> Result<Option<org_members::Model>, DbErr>;

    /// Links a student to an organization unless the pair already exists.
    ///
    /// Runs in its own transaction. A unique violation from a concurrent
    /// writer rolls back this attempt only and is returned as the error.
    async fn get_or_create(
        &self,
        student_id: i32,
        organization_id: i32,
        date_joined: NaiveDate,
    ) -> Result<(org_members::Model, bool), DbErr>;

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbErr>;

    /// Memberships with student and organization, newest first.
    async fn list(&self, query: &OrgMemberListQuery) -> Result<Vec<MemberRow>, DbErr>;
}

pub struct OrgMemberRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl OrgMemberRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl OrgMemberRepository for OrgMemberRepositoryImpl {
    async fn count(&self) -> Result<u64, DbErr> {
        OrgMembers::find().count(self.db.as_ref()).await
    }

    async fn find_by_pair(
        &self,
        student_id: i32,
        organization_id: i32,
    ) -> Result<Option<org_members::Model>, DbErr> {
        OrgMembers::find()
            .filter(org_members::Column::StudentId.eq(student_id))
            .filter(org_members::Column::OrganizationId.eq(organization_id))
            .one(self.db.as_ref())
            .await
    }

    async fn get_or_create(
        &self,
        student_id: i32,
        organization_id: i32,
        date_joined: NaiveDate,
    ) -> Result<(org_members::Model, bool), DbErr> {
        let txn = self.db.begin().await?;

        let existing = OrgMembers::find()
            .filter(org_members::Column::StudentId.eq(student_id))
            .filter(org_members::Column::OrganizationId.eq(organization_id))
            .one(&txn)
            .await?;

        if let Some(existing) = existing {
            txn.commit().await?;
            return Ok((existing, false));
        }

        // Dropping `txn` on error rolls the attempt back.
        let created = org_members::ActiveModel {
            student_id: Set(student_id),
            organization_id: Set(organization_id),
            date_joined: Set(date_joined),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok((created, true))
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbErr> {
        let res = OrgMembers::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list(&self, query: &OrgMemberListQuery) -> Result<Vec<MemberRow>, DbErr> {
        let mut select = OrgMembers::find()
            .join(JoinType::InnerJoin, org_members::Relation::Student.def())
            .join(JoinType::InnerJoin, org_members::Relation::Organization.def());

        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(students::Column::StudentId.contains(term))
                    .add(students::Column::Lastname.contains(term))
                    .add(organizations::Column::Name.contains(term)),
            );
        }

        if let Some(organization_id) = query.organization_id {
            select = select.filter(org_members::Column::OrganizationId.eq(organization_id));
        }
        if let Some(from) = query.joined_from {
            select = select.filter(org_members::Column::DateJoined.gte(from));
        }
        if let Some(to) = query.joined_to {
            select = select.filter(org_members::Column::DateJoined.lte(to));
        }

        let members = select
            .order_by_desc(org_members::Column::DateJoined)
            .all(self.db.as_ref())
            .await?;

        if members.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i32> = members.iter().map(|m| m.student_id).collect();
        let organization_ids: Vec<i32> = members.iter().map(|m| m.organization_id).collect();

        let students: HashMap<i32, students::Model> = Students::find()
            .filter(students::Column::Id.is_in(student_ids))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let organizations: HashMap<i32, organizations::Model> = Organizations::find()
            .filter(organizations::Column::Id.is_in(organization_ids))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        let rows = members
            .into_iter()
            .filter_map(|member| {
                let student = students.get(&member.student_id)?.clone();
                let organization = organizations.get(&member.organization_id)?.clone();
                Some(MemberRow {
                    member,
                    student,
                    organization,
                })
            })
            .collect();

        Ok(rows)
    }
}
