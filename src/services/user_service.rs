use crate::{
    db::dao::{DaoBase, DaoLayerError, UserDao},
    db::entities::user,
    error::AppError,
};

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, AppError> {
        match self.user_dao.find_by_id(id).await {
            Ok(model) => Ok(Some(model)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_username(username).await?)
    }

    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<user::Model, AppError> {
        Ok(self
            .user_dao
            .create_user(username, password_hash, role)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    use crate::{db::entities::user, services::ServiceContext};

    #[tokio::test]
    async fn find_by_id_turns_missing_row_into_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = ServiceContext::new(&db).user();

        let found = service.find_by_id(42).await.expect("lookup should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_by_id_reports_store_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let service = ServiceContext::new(&db).user();

        let err = service.find_by_id(1).await.expect_err("lookup should fail");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
