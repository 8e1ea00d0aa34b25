use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::prelude::Todo;
use crate::db::entities::todo;

/// Column values to write on an existing todo. `None` leaves a column alone;
/// `body: Some(None)` clears the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub body: Option<Option<String>>,
    pub checked: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.checked.is_none()
    }
}

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl DaoBase for TodoDao {
    type Entity = Todo;
    const ENTITY_NAME: &'static str = "Todo";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TodoDao {
    pub async fn create_todo(
        &self,
        user_id: i32,
        title: &str,
        body: Option<&str>,
    ) -> DaoResult<todo::Model> {
        let model = todo::ActiveModel {
            user_id: Set(user_id),
            title: Set(title.to_string()),
            body: Set(body.map(str::to_string)),
            checked: Set(false),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_for_user(&self, user_id: i32) -> DaoResult<Vec<todo::Model>> {
        self.find_all(move |query| {
            query
                .filter(todo::Column::UserId.eq(user_id))
                .order_by_asc(todo::Column::Id)
        })
        .await
    }

    pub async fn find_todo(&self, id: i32) -> DaoResult<todo::Model> {
        self.find_by_id(id).await
    }

    pub async fn update_todo(&self, id: i32, changes: TodoChanges) -> DaoResult<todo::Model> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let TodoChanges {
            title,
            body,
            checked,
        } = changes;
        self.update(id, move |active| {
            if let Some(title) = title {
                active.title = Set(title);
            }
            if let Some(body) = body {
                active.body = Set(body);
            }
            if let Some(checked) = checked {
                active.checked = Set(checked);
            }
        })
        .await
    }

    pub async fn delete_todo(&self, id: i32) -> DaoResult<i32> {
        self.delete(id).await
    }

    /// Writes `checked` only when the row belongs to `user_id`. Returns
    /// whether a row matched.
    pub async fn set_checked_for_owner(
        &self,
        user_id: i32,
        id: i32,
        checked: bool,
    ) -> DaoResult<bool> {
        let result = Todo::update_many()
            .col_expr(
                todo::Column::Checked,
                sea_orm::sea_query::Expr::value(checked),
            )
            .filter(todo::Column::Id.eq(id))
            .filter(todo::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }

    pub async fn clear_all(&self) -> DaoResult<u64> {
        self.delete_all().await
    }
}
