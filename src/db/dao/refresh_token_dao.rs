use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::refresh_token::{self, Entity as RefreshToken};

#[derive(Clone)]
pub struct RefreshTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for RefreshTokenDao {
    type Entity = RefreshToken;
    const ENTITY_NAME: &'static str = "RefreshToken";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RefreshTokenDao {
    pub async fn create_refresh_token(
        &self,
        user_id: i32,
        ttl_days: i64,
    ) -> DaoResult<refresh_token::Model> {
        let expires_at = Duration::try_days(ttl_days)
            .and_then(|ttl| Utc::now().fixed_offset().checked_add_signed(ttl))
            .ok_or_else(|| {
                DaoLayerError::Db(DbErr::Custom(format!(
                    "refresh token ttl of {ttl_days} days is out of range"
                )))
            })?;
        let model = refresh_token::ActiveModel {
            token: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            revoked: Set(false),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_active_by_token(
        &self,
        token: &str,
    ) -> DaoResult<Option<refresh_token::Model>> {
        let token = token.to_string();
        self.find_one(move |query| {
            query
                .filter(refresh_token::Column::Token.eq(token))
                .filter(refresh_token::Column::Revoked.eq(false))
        })
        .await
    }

    /// Revokes the token if it is still active. Returns whether a row changed.
    pub async fn revoke_token(&self, token: &str) -> DaoResult<bool> {
        let result = RefreshToken::update_many()
            .col_expr(
                refresh_token::Column::Revoked,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(refresh_token::Column::Token.eq(token))
            .filter(refresh_token::Column::Revoked.eq(false))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    use super::RefreshTokenDao;
    use crate::db::dao::DaoLayerError;
    use crate::db::dao::DaoBase;
    use crate::db::entities::refresh_token;

    #[tokio::test]
    async fn find_active_by_token_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<refresh_token::Model>::new()])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let found = dao
            .find_active_by_token("missing")
            .await
            .expect("query should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn create_refresh_token_returns_inserted_row() {
        let row = refresh_token::Model {
            id: 1,
            token: "abc".to_string(),
            user_id: 2,
            expires_at: Utc::now().fixed_offset() + Duration::days(30),
            revoked: false,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row.clone()]])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let created = dao
            .create_refresh_token(2, 30)
            .await
            .expect("insert should succeed");
        assert_eq!(created, row);
    }

    #[tokio::test]
    async fn create_refresh_token_rejects_unrepresentable_ttl() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let dao = RefreshTokenDao::new(&db);

        let err = dao
            .create_refresh_token(2, i64::MAX)
            .await
            .expect_err("ttl should be out of range");
        assert!(matches!(err, DaoLayerError::Db(DbErr::Custom(_))));
    }

    #[tokio::test]
    async fn revoke_token_reports_whether_a_row_changed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        assert!(dao.revoke_token("abc").await.expect("revoke should run"));
        assert!(!dao.revoke_token("abc").await.expect("revoke should run"));
    }
}
