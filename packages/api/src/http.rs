//! [`HttpStore`]: the REST implementation of [`RemoteStore`].

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use store::config::RemoteConfig;
use store::{Experience, RemoteStore, StoreError, User};

/// REST client for the users/experiences backend. Cheap to clone.
#[derive(Clone, Debug)]
pub struct HttpStore {
    client: Client,
    base: String,
    users_path: String,
    experiences_path: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddExperience<'a> {
    experience_id: &'a str,
}

impl HttpStore {
    pub fn new(config: &RemoteConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &RemoteConfig) -> Self {
        Self {
            client,
            base: config.base_url.trim_end_matches('/').to_string(),
            users_path: config.users_path.trim_matches('/').to_string(),
            experiences_path: config.experiences_path.trim_matches('/').to_string(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/{}", self.base, self.users_path)
    }

    fn user_url(&self, id: &str) -> String {
        format!("{}/{}", self.users_url(), id)
    }

    fn experiences_url(&self) -> String {
        format!("{}/{}", self.base, self.experiences_path)
    }

    fn experience_url(&self, id: &str) -> String {
        format!("{}/{}", self.experiences_url(), id)
    }

    /// Send the request and return the body of a successful answer.
    async fn send(&self, request: RequestBuilder) -> Result<String, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        check_status(status, &body)?;
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let body = self.send(request).await?;
        decode(&body)
    }
}

fn check_status(status: u16, body: &str) -> Result<(), StoreError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StoreError::NotFound(body.to_string())),
        _ => Err(StoreError::Status {
            status,
            message: body.to_string(),
        }),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

impl RemoteStore for HttpStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let url = self.users_url();
        tracing::debug!("GET {}", url);
        self.fetch(self.client.get(url)).await
    }

    async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        let url = self.users_url();
        tracing::debug!("POST {}", url);
        let body = User {
            id: None,
            ..user.clone()
        };
        self.fetch(self.client.post(url).json(&body)).await
    }

    async fn update_user(&self, user: &User) -> Result<User, StoreError> {
        let id = user.id.as_deref().ok_or(StoreError::MissingId)?;
        let url = self.user_url(id);
        tracing::debug!("PUT {}", url);
        self.fetch(self.client.put(url).json(user)).await
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        let url = self.user_url(id);
        tracing::debug!("DELETE {}", url);
        self.send(self.client.delete(url)).await.map(|_| ())
    }

    async fn get_experience(&self, id: &str) -> Result<Experience, StoreError> {
        let url = self.experience_url(id);
        tracing::debug!("GET {}", url);
        self.fetch(self.client.get(url)).await
    }

    async fn list_experiences(&self) -> Result<Vec<Experience>, StoreError> {
        let url = self.experiences_url();
        tracing::debug!("GET {}", url);
        self.fetch(self.client.get(url)).await
    }

    async fn list_experiences_for(&self, user_id: &str) -> Result<Vec<Experience>, StoreError> {
        let url = self.experiences_url();
        tracing::debug!("GET {}?participant={}&owner={}", url, user_id, user_id);
        let request = self
            .client
            .get(url)
            .query(&[("participant", user_id), ("owner", user_id)]);
        self.fetch(request).await
    }

    async fn create_experience(&self, experience: &Experience) -> Result<Experience, StoreError> {
        let url = self.experiences_url();
        tracing::debug!("POST {}", url);
        self.fetch(self.client.post(url).json(experience)).await
    }

    async fn add_experience_to_user(
        &self,
        user_id: &str,
        experience_id: &str,
    ) -> Result<(), StoreError> {
        let url = format!("{}/addExperience", self.user_url(user_id));
        tracing::debug!("PUT {}", url);
        let body = AddExperience { experience_id };
        self.send(self.client.put(url).json(&body)).await.map(|_| ())
    }

    async fn delete_experience(&self, id: &str) -> Result<(), StoreError> {
        let url = self.experience_url(id);
        tracing::debug!("DELETE {}", url);
        self.send(self.client.delete(url)).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::ExperienceRef;

    fn store_at(base: &str) -> HttpStore {
        HttpStore::new(&RemoteConfig {
            base_url: base.to_string(),
            ..RemoteConfig::default()
        })
    }

    #[test]
    fn test_urls() {
        let store = store_at("http://localhost:3000/api/");
        assert_eq!(store.users_url(), "http://localhost:3000/api/user");
        assert_eq!(store.user_url("u1"), "http://localhost:3000/api/user/u1");
        assert_eq!(
            store.experience_url("e1"),
            "http://localhost:3000/api/experiencias/e1"
        );
    }

    #[test]
    fn test_custom_paths() {
        let store = HttpStore::new(&RemoteConfig {
            base_url: "https://example.com".to_string(),
            users_path: "/users/".to_string(),
            experiences_path: "experiences".to_string(),
        });
        assert_eq!(store.user_url("7"), "https://example.com/users/7");
        assert_eq!(store.experiences_url(), "https://example.com/experiences");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(check_status(201, ""), Ok(()));
        assert_eq!(
            check_status(404, "no such user"),
            Err(StoreError::NotFound("no such user".to_string()))
        );
        assert_eq!(
            check_status(500, "boom"),
            Err(StoreError::Status {
                status: 500,
                message: "boom".to_string()
            })
        );
    }

    #[test]
    fn test_decode_user_list() {
        let users: Vec<User> = decode(
            r#"[{"_id":"u1","name":"Ann","mail":"a@x.co","password":"p","comment":"","experiencies":["e1"],"__v":0}]"#,
        )
        .unwrap();
        assert_eq!(users[0].id.as_deref(), Some("u1"));
        assert_eq!(
            users[0].experiences,
            vec![ExperienceRef::Unresolved("e1".to_string())]
        );

        assert!(matches!(
            decode::<Vec<User>>("<html>"),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn test_add_experience_body() {
        let body = serde_json::to_value(AddExperience { experience_id: "e1" }).unwrap();
        assert_eq!(body, serde_json::json!({ "experienceId": "e1" }));
    }

    #[tokio::test]
    async fn test_update_without_id_is_refused_locally() {
        let store = store_at("http://127.0.0.1:9");
        assert_eq!(
            store.update_user(&User::default()).await,
            Err(StoreError::MissingId)
        );
    }
}
