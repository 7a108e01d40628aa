//! User listing queries.

use tracing::info;

use super::models::UsersResult;
use crate::cancel::CancellationToken;
use crate::error::QueryError;
use crate::graphql::GraphQlClient;

/// Selects every user with their group memberships.
pub const ALL_USERS_QUERY: &str = r#"
{
    users {
        id,
        email,
        displayName,
        firstName,
        lastName,
        creationDate,
        uuid,
        groups {
            displayName,
            id
        }
    }
}"#;

impl GraphQlClient {
    /// Fetch all users and their groups.
    pub async fn fetch_all_users(
        &self,
        cancel: &CancellationToken,
    ) -> Result<UsersResult, QueryError> {
        info!("Fetching users");

        let result: UsersResult = self.execute_typed(cancel, ALL_USERS_QUERY, None).await?;

        info!("Fetched {} users", result.users.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;
    use crate::directory::models::GroupRef;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_returning(body: serde_json::Value) -> (MockServer, GraphQlClient) {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .and(body_json(json!({ "query": ALL_USERS_QUERY })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let session = Session::with_token(&server.uri(), "tok").unwrap();
        (server, GraphQlClient::new(session))
    }

    #[tokio::test]
    async fn test_fetch_all_users() {
        let (_server, client) = client_returning(json!({
            "data": {
                "users": [{
                    "id": "1",
                    "displayName": "Alice",
                    "email": "a@x.com",
                    "groups": [{ "id": 1, "displayName": "admins" }]
                }]
            }
        }))
        .await;

        let result = client
            .fetch_all_users(&CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.users.len(), 1);
        let user = &result.users[0];
        assert_eq!(user.id, "1");
        assert_eq!(user.display_name, "Alice");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(
            user.groups,
            vec![GroupRef {
                id: 1,
                name: "admins".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_users_empty_list() {
        let (_server, client) = client_returning(json!({ "data": { "users": [] } })).await;

        let result = client
            .fetch_all_users(&CancellationToken::new())
            .await
            .unwrap();

        assert!(result.users.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_users_missing_users_field() {
        let (_server, client) = client_returning(json!({ "data": { "groups": [] } })).await;

        let result = client.fetch_all_users(&CancellationToken::new()).await;

        assert!(matches!(result, Err(QueryError::ResultDecode(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_users_wrong_group_id_type() {
        let (_server, client) = client_returning(json!({
            "data": {
                "users": [{ "id": "1", "groups": [{ "id": "one", "displayName": "admins" }] }]
            }
        }))
        .await;

        let result = client.fetch_all_users(&CancellationToken::new()).await;

        assert!(matches!(result, Err(QueryError::ResultDecode(_))));
    }
}
