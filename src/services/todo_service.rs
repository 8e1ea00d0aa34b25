use crate::{
    db::dao::{DaoLayerError, TodoChanges, TodoDao},
    db::entities::todo::{self, BODY_MAX_CHARS, TITLE_MAX_CHARS},
    error::AppError,
};

pub const TODO_NOT_FOUND: &str = "To-do not found.";

/// Fields supplied by a partial update. The outer `None` means the field was
/// absent; `Some(None)` means it was sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<Option<String>>,
    pub body: Option<Option<String>>,
    pub checked: Option<Option<bool>>,
}

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
}

fn todo_error(err: DaoLayerError) -> AppError {
    match err {
        DaoLayerError::NotFound { .. } => AppError::not_found(TODO_NOT_FOUND),
        other => other.into(),
    }
}

pub fn validate_title(title: Option<&str>) -> Result<String, AppError> {
    let Some(title) = title else {
        return Err(AppError::bad_request("title: This field is required."));
    };
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("title: This field may not be blank."));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::bad_request(format!(
            "title: Ensure this field has no more than {TITLE_MAX_CHARS} characters."
        )));
    }
    Ok(title.to_string())
}

pub fn validate_body(body: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(body) = body else {
        return Ok(None);
    };
    let body = body.trim();
    if body.chars().count() > BODY_MAX_CHARS {
        return Err(AppError::bad_request(format!(
            "body: Ensure this field has no more than {BODY_MAX_CHARS} characters."
        )));
    }
    Ok(Some(body.to_string()))
}

impl TodoService {
    pub fn new(todo_dao: TodoDao) -> Self {
        Self { todo_dao }
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<todo::Model>, AppError> {
        Ok(self.todo_dao.list_for_user(user_id).await?)
    }

    pub async fn create(
        &self,
        user_id: i32,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<todo::Model, AppError> {
        let title = validate_title(title)?;
        let body = validate_body(body)?;
        Ok(self
            .todo_dao
            .create_todo(user_id, &title, body.as_deref())
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<todo::Model, AppError> {
        self.todo_dao.find_todo(id).await.map_err(todo_error)
    }

    /// Applies the supplied fields. Every field is validated before anything
    /// is written.
    pub async fn update(&self, id: i32, patch: TodoPatch) -> Result<todo::Model, AppError> {
        let title = match patch.title {
            None => None,
            Some(None) => return Err(AppError::bad_request("title: This field may not be null.")),
            Some(Some(title)) => Some(validate_title(Some(&title))?),
        };
        let body = match patch.body {
            None => None,
            Some(body) => Some(validate_body(body.as_deref())?),
        };
        let checked = match patch.checked {
            None => None,
            Some(None) => {
                return Err(AppError::bad_request("checked: This field may not be null."));
            }
            Some(Some(checked)) => Some(checked),
        };

        let changes = TodoChanges {
            title,
            body,
            checked,
        };
        self.todo_dao
            .update_todo(id, changes)
            .await
            .map_err(todo_error)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.todo_dao.delete_todo(id).await.map_err(todo_error)?;
        Ok(())
    }

    /// Sets `checked` on a todo owned by `user_id`. A todo that exists but
    /// belongs to someone else is reported as missing.
    pub async fn set_checked(&self, user_id: i32, id: i32, checked: bool) -> Result<(), AppError> {
        let matched = self
            .todo_dao
            .set_checked_for_owner(user_id, id, checked)
            .await?;
        if !matched {
            return Err(AppError::not_found(TODO_NOT_FOUND));
        }
        Ok(())
    }

    pub async fn clear_all(&self) -> Result<u64, AppError> {
        let removed = self.todo_dao.clear_all().await?;
        tracing::info!(removed, "cleared all todos");
        Ok(removed)
    }
}
