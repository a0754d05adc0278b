use super::search_term;
use crate::entities::{
    colleges, organizations,
    prelude::{Colleges, Organizations},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;

/// Values applied only when an organization is created; an existing
/// organization with the same name is returned untouched.
#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub college_id: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationListQuery {
    pub search: Option<String>,
    pub college_id: Option<i32>,
}

#[async_trait::async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn count(&self) -> Result<u64, DbErr>;

    async fn all_ids(&self) -> Result<Vec<i32>, DbErr>;

    async fn find_by_id(&self, id: i32) -> Result<Option<organizations::Model>, DbErr>;

    async fn find_by_name(&self, name: &str) -> Result<Option<organizations::Model>, DbErr>;

    /// Looks the organization up by name and inserts it when absent.
    /// The flag is `true` when a row was inserted.
    async fn get_or_create(
        &self,
        params: NewOrganization,
    ) -> Result<(organizations::Model, bool), DbErr>;

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbErr>;

    async fn list(
        &self,
        query: &OrganizationListQuery,
    ) -> Result<Vec<(organizations::Model, Option<colleges::Model>)>, DbErr>;
}

pub struct OrganizationRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl OrganizationRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl OrganizationRepository for OrganizationRepositoryImpl {
    async fn count(&self) -> Result<u64, DbErr> {
        Organizations::find().count(self.db.as_ref()).await
    }

    async fn all_ids(&self) -> Result<Vec<i32>, DbErr> {
        Organizations::find()
            .select_only()
            .column(organizations::Column::Id)
            .order_by_asc(organizations::Column::Id)
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<organizations::Model>, DbErr> {
        Organizations::find_by_id(id).one(self.db.as_ref()).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<organizations::Model>, DbErr> {
        // Names are not constrained unique; rows entered by hand may repeat.
        Organizations::find()
            .filter(organizations::Column::Name.eq(name))
            .order_by_asc(organizations::Column::Id)
            .one(self.db.as_ref())
            .await
    }

    async fn get_or_create(
        &self,
        params: NewOrganization,
    ) -> Result<(organizations::Model, bool), DbErr> {
        if let Some(existing) = self.find_by_name(&params.name).await? {
            return Ok((existing, false));
        }

        let NewOrganization {
            name,
            college_id,
            description,
        } = params;

        let created = organizations::ActiveModel {
            name: Set(name),
            college_id: Set(college_id),
            description: Set(description),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        Ok((created, true))
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbErr> {
        let res = Organizations::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn list(
        &self,
        query: &OrganizationListQuery,
    ) -> Result<Vec<(organizations::Model, Option<colleges::Model>)>, DbErr> {
        let mut select = Organizations::find().find_also_related(Colleges);

        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(organizations::Column::Name.contains(term))
                    .add(colleges::Column::Name.contains(term)),
            );
        }

        if let Some(college_id) = query.college_id {
            select = select.filter(organizations::Column::CollegeId.eq(college_id));
        }

        select
            .order_by_asc(organizations::Column::Name)
            .all(self.db.as_ref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn get_or_create_returns_existing_without_insert() -> Result<(), DbErr> {
        let existing = organizations::Model {
            id: 7,
            name: "Debate Club".to_string(),
            college_id: Some(1),
            description: Some("Original description".to_string()),
        };
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results(vec![vec![existing.clone()]])
            .into_connection();
        let db = Arc::new(db);
        let repo = OrganizationRepositoryImpl::new(db.clone());

        let (found, created) = repo
            .get_or_create(NewOrganization {
                name: "Debate Club".to_string(),
                college_id: Some(2),
                description: Some("Replacement".to_string()),
            })
            .await?;

        assert!(!created);
        assert_eq!(found, existing);

        drop(repo);
        let db = Arc::try_unwrap(db).expect("connection still shared");
        assert_eq!(db.into_transaction_log().len(), 1);
        Ok(())
    }
}
