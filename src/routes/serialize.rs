use serde::{Deserialize, Deserializer, Serialize};

use crate::{db::entities::todo, services::todo_service::TodoPatch};

/// Detail and list view of a todo. The owner is not exposed.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TodoResponse {
    pub id: i32,
    pub title: String,
    pub body: Option<String>,
    pub checked: bool,
}

/// Returned by create and patch, which echo the owner id.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OwnedTodoResponse {
    pub id: i32,
    pub user: i32,
    pub title: String,
    pub body: Option<String>,
    pub checked: bool,
}

pub fn serialize_todo(todo: todo::Model) -> TodoResponse {
    TodoResponse {
        id: todo.id,
        title: todo.title,
        body: todo.body,
        checked: todo.checked,
    }
}

impl From<todo::Model> for OwnedTodoResponse {
    fn from(todo: todo::Model) -> Self {
        Self {
            id: todo.id,
            user: todo.user_id,
            title: todo.title,
            body: todo.body,
            checked: todo.checked,
        }
    }
}

// Clients may send an owner id; the caller is always the owner, so it is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PatchTodoRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub body: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub checked: Option<Option<bool>>,
}

// Keeps an explicit `null` distinct from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<PatchTodoRequest> for TodoPatch {
    fn from(req: PatchTodoRequest) -> Self {
        Self {
            title: req.title,
            body: req.body,
            checked: req.checked,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
    pub token_type: &'static str,
    pub expires_in: usize,
}

impl From<crate::auth::TokenBundle> for TokenResponse {
    fn from(bundle: crate::auth::TokenBundle) -> Self {
        Self {
            access: bundle.access_token,
            refresh: bundle.refresh_token,
            token_type: bundle.token_type,
            expires_in: bundle.expires_in,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{OwnedTodoResponse, PatchTodoRequest, serialize_todo};
    use crate::{db::entities::todo, services::todo_service::TodoPatch};

    fn stored_todo() -> todo::Model {
        todo::Model {
            id: 1,
            user_id: 4,
            title: "write more tests".to_string(),
            body: None,
            checked: false,
        }
    }

    #[test]
    fn detail_view_omits_owner() {
        let value = serde_json::to_value(serialize_todo(stored_todo())).expect("serialize");
        assert_eq!(
            value,
            json!({ "id": 1, "title": "write more tests", "body": null, "checked": false })
        );
    }

    #[test]
    fn owned_view_includes_owner() {
        let value =
            serde_json::to_value(OwnedTodoResponse::from(stored_todo())).expect("serialize");
        assert_eq!(
            value,
            json!({ "id": 1, "user": 4, "title": "write more tests", "body": null, "checked": false })
        );
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let cleared: PatchTodoRequest =
            serde_json::from_value(json!({ "body": null })).expect("deserialize");
        assert_eq!(
            TodoPatch::from(cleared),
            TodoPatch {
                body: Some(None),
                ..Default::default()
            }
        );

        let empty: PatchTodoRequest = serde_json::from_value(json!({})).expect("deserialize");
        assert_eq!(TodoPatch::from(empty), TodoPatch::default());
    }

    #[test]
    fn patch_keeps_null_checked() {
        let nulled: PatchTodoRequest =
            serde_json::from_value(json!({ "checked": null })).expect("deserialize");
        assert_eq!(nulled.checked, Some(None));

        let set: PatchTodoRequest =
            serde_json::from_value(json!({ "checked": true })).expect("deserialize");
        assert_eq!(set.checked, Some(Some(true)));
    }
}
