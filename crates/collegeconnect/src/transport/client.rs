//! The shared HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info, instrument, trace};

use crate::auth::{BearerToken, Identity, IdentitySource, SessionStore};
use crate::config::ClientConfig;
use crate::error::{AuthError, Error, MalformedResponseError, ProtocolError};
use crate::types::ApiUrl;

use super::navigator::{LOGIN_ROUTE, Navigator};

/// HTTP client for the CollegeConnect REST API.
///
/// Every request goes through the same two hooks:
///
/// - outbound: the credential currently in durable storage, if any, is
///   attached as `Authorization: Bearer <token>`
/// - inbound: a 401 response invalidates the session through
///   [`SessionStore::expire`] and navigates to [`LOGIN_ROUTE`]; the caller
///   still receives [`AuthError::SessionExpired`]
///
/// Cheap to clone; clones share the connection pool and session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: ApiUrl,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client bound to `session`.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base: config.base_url.clone(),
            session,
            navigator,
        })
    }

    /// Returns the base URL this client is configured for.
    pub fn base_url(&self) -> &ApiUrl {
        &self.base
    }

    /// Returns the session this client reads credentials from.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// `GET` a JSON document.
    pub async fn get<T>(&self, path: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, path, |r| r).await?;
        decode(path, response).await
    }

    /// `GET` a JSON array.
    ///
    /// A 2xx payload that is not an array is a malformed response.
    pub async fn get_list<T>(&self, path: &str) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, path, |r| r).await?;
        decode_list(path, response).await
    }

    /// `GET` a JSON array with query parameters.
    pub async fn get_list_with<Q, T>(&self, path: &str, query: &Q) -> Result<Vec<T>, Error>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, path, |r| r.query(query)).await?;
        decode_list(path, response).await
    }

    /// `POST` a JSON body and decode the JSON reply.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, |r| r.json(body)).await?;
        decode(path, response).await
    }

    /// `POST` a multipart form and decode the JSON reply.
    pub async fn post_multipart<T>(&self, path: &str, form: Form) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, |r| r.multipart(form)).await?;
        decode(path, response).await
    }

    /// `PUT` a JSON body, ignoring the reply body.
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<(), Error>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, |r| r.json(body)).await?;
        Ok(())
    }

    /// Send a bodiless request and decode the JSON reply.
    pub async fn call<T>(&self, method: Method, path: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, |r| r).await?;
        decode(path, response).await
    }

    /// Send a bodiless request, ignoring the reply body.
    pub async fn execute(&self, method: Method, path: &str) -> Result<(), Error> {
        self.send(method, path, |r| r).await?;
        Ok(())
    }

    async fn send<F>(&self, method: Method, path: &str, build: F) -> Result<Response, Error>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let credential = self.session.credential();
        self.send_as(method, path, credential, build).await
    }

    #[instrument(skip(self, credential, build), fields(api = %self.base))]
    async fn send_as<F>(
        &self,
        method: Method,
        path: &str,
        credential: Option<BearerToken>,
        build: F,
    ) -> Result<Response, Error>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.base.endpoint(path);
        debug!(%method, authenticated = credential.is_some(), "API request");

        let mut request = self.http.request(method, &url);
        if let Some(ref token) = credential {
            request = request.bearer_auth(token.as_str());
        }

        let response = build(request).send().await?;
        let status = response.status();
        trace!(status = %status, "API response");

        if status == StatusCode::UNAUTHORIZED {
            self.on_unauthorized();
            return Err(AuthError::SessionExpired.into());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProtocolError::from_body(status.as_u16(), &body).into());
        }

        Ok(response)
    }

    fn on_unauthorized(&self) {
        self.session.expire();
        info!("Credential rejected, redirecting to login");
        self.navigator.navigate(LOGIN_ROUTE);
    }
}

#[async_trait]
impl IdentitySource for ApiClient {
    async fn fetch_identity(&self, credential: &BearerToken) -> Result<Identity, Error> {
        let path = "/user/me";
        let response = self
            .send_as(Method::GET, path, Some(credential.clone()), |r| r)
            .await?;
        decode(path, response).await
    }
}

async fn decode<T>(path: &str, response: Response) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| MalformedResponseError::new(path, e.to_string()).into())
}

async fn decode_list<T>(path: &str, response: Response) -> Result<Vec<T>, Error>
where
    T: DeserializeOwned,
{
    let bytes = response.bytes().await?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| MalformedResponseError::new(path, e.to_string()))?;

    if !value.is_array() {
        return Err(MalformedResponseError::new(
            path,
            format!("expected a JSON array, got {}", json_kind(&value)),
        )
        .into());
    }

    serde_json::from_value(value)
        .map_err(|e| MalformedResponseError::new(path, e.to_string()).into())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::auth::{CredentialStore, MemoryCredentialStore};
    use crate::transport::RecordingNavigator;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Fixture {
        api: ApiClient,
        credentials: Arc<MemoryCredentialStore>,
        navigator: Arc<RecordingNavigator>,
    }

    fn fixture(server: &MockServer, token: Option<&str>) -> Fixture {
        fixture_at(&server.uri(), token)
    }

    fn fixture_at(uri: &str, token: Option<&str>) -> Fixture {
        let credentials = Arc::new(match token {
            Some(t) => MemoryCredentialStore::with_token(BearerToken::new(t).unwrap()),
            None => MemoryCredentialStore::new(),
        });
        let navigator = Arc::new(RecordingNavigator::new());
        let session = SessionStore::new(credentials.clone());
        let config = ClientConfig::new(ApiUrl::new(uri).unwrap());
        let api = ApiClient::new(&config, session, navigator.clone()).unwrap();
        Fixture {
            api,
            credentials,
            navigator,
        }
    }

    #[tokio::test]
    async fn attaches_stored_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let f = fixture(&server, Some("abc"));
        let body: Value = f.api.get("/ping").await.unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn sends_no_authorization_without_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let f = fixture(&server, None);
        let items: Vec<Value> = f.api.get_list("/ping").await.unwrap();
        assert!(items.is_empty());

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn unauthorized_purges_and_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/posts/9"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let f = fixture(&server, Some("abc"));
        let err = f.api.execute(Method::DELETE, "/posts/9").await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(f.credentials.load().is_none());
        assert_eq!(f.navigator.routes(), vec![LOGIN_ROUTE]);
    }

    #[tokio::test]
    async fn unauthorized_for_replaced_credential_still_purges() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let f = fixture(&server, Some("new"));
        let stale = BearerToken::new("old").unwrap();
        let err = f.api.fetch_identity(&stale).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(f.credentials.load().is_none());
        assert_eq!(f.navigator.routes(), vec![LOGIN_ROUTE]);
    }

    #[tokio::test]
    async fn late_unauthorized_after_newer_login_purges_and_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/me"))
            .and(header("authorization", "Bearer xyz"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 2, "name": "Bo"})),
            )
            .mount(&server)
            .await;

        let f = fixture(&server, Some("abc"));
        let pending = {
            let api = f.api.clone();
            tokio::spawn(async move { api.get_list::<Value>("/posts").await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        f.api
            .session()
            .login(BearerToken::new("xyz").unwrap(), &f.api)
            .await
            .unwrap();
        assert!(f.navigator.routes().is_empty());

        let err = pending.await.unwrap().unwrap_err();
        assert!(err.is_unauthorized());
        assert!(f.credentials.load().is_none());
        assert!(!f.api.session().is_authenticated());
        assert_eq!(f.navigator.routes(), vec![LOGIN_ROUTE]);
    }

    #[tokio::test]
    async fn late_unauthorized_after_logout_still_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;

        let f = fixture(&server, Some("abc"));
        let pending = {
            let api = f.api.clone();
            tokio::spawn(async move { api.get_list::<Value>("/posts").await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        f.api.session().logout();

        let err = pending.await.unwrap().unwrap_err();
        assert!(err.is_unauthorized());
        assert!(f.credentials.load().is_none());
        assert_eq!(f.navigator.routes(), vec![LOGIN_ROUTE]);
    }

    #[tokio::test]
    async fn error_status_becomes_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/4"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Post not found with id: 4"))
            .mount(&server)
            .await;

        let f = fixture(&server, Some("abc"));
        let err = f.api.get::<Value>("/posts/4").await.unwrap_err();

        match err {
            Error::Protocol(e) => {
                assert_eq!(e.status, 404);
                assert_eq!(e.message.as_deref(), Some("Post not found with id: 4"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(f.credentials.load().is_some());
        assert!(f.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn non_array_list_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "oops"})),
            )
            .mount(&server)
            .await;

        let f = fixture(&server, None);
        let err = f.api.get_list::<Value>("/posts").await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        assert!(err.to_string().contains("an object"));
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let f = fixture_at(&format!("http://127.0.0.1:{port}"), None);

        let err = f.api.get::<Value>("/posts").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
