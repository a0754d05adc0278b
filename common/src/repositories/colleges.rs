use super::search_term;
use crate::entities::{colleges, prelude::Colleges};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CollegeListQuery {
    pub search: Option<String>,
}

#[async_trait::async_trait]
pub trait CollegeRepository: Send + Sync {
    async fn count(&self) -> Result<u64, DbErr>;

    /// The college with the lowest id, if any.
    async fn first(&self) -> Result<Option<colleges::Model>, DbErr>;

    async fn all_ids(&self) -> Result<Vec<i32>, DbErr>;

    async fn find_by_id(&self, id: i32) -> Result<Option<colleges::Model>, DbErr>;

    async fn find_by_name(&self, name: &str) -> Result<Option<colleges::Model>, DbErr>;

    async fn create(&self, name: &str) -> Result<colleges::Model, DbErr>;

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbErr>;

    async fn list(&self, query: &CollegeListQuery) -> Result<Vec<colleges::Model>, DbErr>;
}

pub struct CollegeRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl CollegeRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl CollegeRepository for CollegeRepositoryImpl {
    async fn count(&self) -> Result<u64, DbErr> {
        Colleges::find().count(self.db.as_ref()).await
    }

    async fn first(&self) -> Result<Option<colleges::Model>, DbErr> {
        Colleges::find()
            .order_by_asc(colleges::Column::Id)
            .one(self.db.as_ref())
            .await
    }

    async fn all_ids(&self) -> Result<Vec<i32>, DbErr> {
        Colleges::find()
            .select_only()
            .column(colleges::Column::Id)
            .order_by_asc(colleges::Column::Id)
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<colleges::Model>, DbErr> {
        Colleges::find_by_id(id).one(self.db.as_ref()).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<colleges::Model>, DbErr> {
        Colleges::find()
            .filter(colleges::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
    }

    async fn create(&self, name: &str) -> Result<colleges::Model, DbErr> {
        colleges::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbErr> {
        let res = Colleges::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list(&self, query: &CollegeListQuery) -> Result<Vec<colleges::Model>, DbErr> {
        let mut select = Colleges::find();
        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(colleges::Column::Name.contains(term));
        }

        select
            .order_by_asc(colleges::Column::Name)
            .all(self.db.as_ref())
            .await
    }
}
