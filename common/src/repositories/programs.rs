use super::search_term;
use crate::entities::{
    colleges, programs,
    prelude::{Colleges, Programs},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ProgramListQuery {
    pub search: Option<String>,
    pub college_id: Option<i32>,
}

#[async_trait::async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn count(&self) -> Result<u64, DbErr>;

    async fn all_ids(&self) -> Result<Vec<i32>, DbErr>;

    async fn find_by_id(&self, id: i32) -> Result<Option<programs::Model>, DbErr>;

    async fn create(&self, name: &str, college_id: i32) -> Result<programs::Model, DbErr>;

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbErr>;

    /// Programs with their college, ordered by college name then program name.
    async fn list(
        &self,
        query: &ProgramListQuery,
    ) -> Result<Vec<(programs::Model, Option<colleges::Model>)>, DbErr>;
}

pub struct ProgramRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ProgramRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl ProgramRepository for ProgramRepositoryImpl {
    async fn count(&self) -> Result<u64, DbErr> {
        Programs::find().count(self.db.as_ref()).await
    }

    async fn all_ids(&self) -> Result<Vec<i32>, DbErr> {
        Programs::find()
            .select_only()
            .column(programs::Column::Id)
            .order_by_asc(programs::Column::Id)
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<programs::Model>, DbErr> {
        Programs::find_by_id(id).one(self.db.as_ref()).await
    }

    async fn create(&self, name: &str, college_id: i32) -> Result<programs::Model, DbErr> {
        programs::ActiveModel {
            name: Set(name.to_string()),
            college_id: Set(college_id),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbErr> {
        let res = Programs::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list(
        &self,
        query: &ProgramListQuery,
    ) -> Result<Vec<(programs::Model, Option<colleges::Model>)>, DbErr> {
        let mut select = Programs::find().find_also_related(Colleges);

        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(programs::Column::Name.contains(term))
                    .add(colleges::Column::Name.contains(term)),
            );
        }

        if let Some(college_id) = query.college_id {
            select = select.filter(programs::Column::CollegeId.eq(college_id));
        }

        select
            .order_by_asc(colleges::Column::Name)
            .order_by_asc(programs::Column::Name)
            .all(self.db.as_ref())
            .await
    }
}
