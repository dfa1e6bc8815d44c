//! API Client
//!
//! One method per backend operation. Every call goes through [`ApiClient::execute`],
//! which attaches the bearer token, turns a 401 into a cleared session and maps
//! other failures onto the error taxonomy. Payloads are normalized before they
//! leave this module.

use std::sync::Arc;

use reqwest::Url;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::normalize;
use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::connection::{Service, ServiceEndpoints};
use crate::domain::configuration::{ConfigurationDetail, ConfigurationSummary, NewConfiguration};
use crate::domain::search::{AdvancedSearchParams, SearchResults};
use crate::domain::user::{AccessToken, Credentials, Registration, UserProfile};
use crate::error::{Error, Result};
use crate::state::session_state::SessionManager;

/// How a request authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
enum Auth {
    /// Never send a token (register, login, health checks)
    Anonymous,
    /// Send the session token when there is one
    Session,
    /// Send this token regardless of the session
    Bearer(String),
}

/// Result of probing every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceHealth {
    pub users: bool,
    pub configs: bool,
    pub visualizations: bool,
    pub valuations: bool,
}

impl ServiceHealth {
    pub fn get(&self, service: Service) -> bool {
        match service {
            Service::Users => self.users,
            Service::Configs => self.configs,
            Service::Visualizations => self.visualizations,
            Service::Valuations => self.valuations,
        }
    }

    pub fn all_online(&self) -> bool {
        Service::all().iter().all(|s| self.get(*s))
    }
}

/// Typed facade over the four backend services
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    endpoints: ServiceEndpoints,
    session: SessionManager,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: ServiceEndpoints,
        session: SessionManager,
    ) -> Self {
        Self {
            transport,
            endpoints,
            session,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    /// Build `<base>/<segments...>?<query>`; segments are percent-encoded
    fn url(&self, service: Service, segments: &[&str], query: &[(&str, String)]) -> Result<String> {
        let base = self.endpoints.base(service);
        let mut url = Url::parse(base).map_err(|e| Error::Invalid {
            message: format!("Invalid {service} service URL '{base}': {e}"),
        })?;
        url.path_segments_mut()
            .map_err(|_| Error::Invalid {
                message: format!("{service} service URL cannot carry a path: {base}"),
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url.to_string())
    }

    async fn execute(&self, request: HttpRequest, auth: Auth) -> Result<Value> {
        let mut request = request.with_header("Content-Type", "application/json");
        let token = match &auth {
            Auth::Anonymous => None,
            Auth::Session => self.session.current_token(),
            Auth::Bearer(token) => Some(token.clone()),
        };
        if let Some(token) = token {
            request = request.with_header("Authorization", format!("Bearer {token}"));
        }

        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        self.handle_response(method, &url, &auth, response)
    }

    fn handle_response(
        &self,
        method: Method,
        url: &str,
        auth: &Auth,
        response: HttpResponse,
    ) -> Result<Value> {
        if response.is_success() {
            return response.json();
        }

        // A rejected login is a wrong password, not an expired session
        if response.status == 401 && *auth != Auth::Anonymous {
            warn!(method = method.as_str(), url, "Token rejected, clearing session");
            self.session.clear();
            return Err(Error::SessionExpired);
        }

        let message = normalize::error_message(&response.body);
        debug!(method = method.as_str(), url, status = response.status, %message, "Request failed");
        Err(Error::Service {
            status: response.status,
            message,
        })
    }

    // === Health ===

    /// Probe `GET <base>/docs`. Never fails.
    pub async fn check_service(&self, service: Service) -> bool {
        let url = self.endpoints.url(service, "docs");
        match self.transport.send(HttpRequest::get(url)).await {
            Ok(response) => response.is_success(),
            Err(e) => {
                warn!(%service, error = %e, "Health check failed");
                false
            }
        }
    }

    /// Probe every backend concurrently
    pub async fn check_all_services(&self) -> ServiceHealth {
        let (users, configs, visualizations, valuations) = futures::join!(
            self.check_service(Service::Users),
            self.check_service(Service::Configs),
            self.check_service(Service::Visualizations),
            self.check_service(Service::Valuations),
        );
        ServiceHealth {
            users,
            configs,
            visualizations,
            valuations,
        }
    }

    // === Users service ===

    pub async fn register(&self, registration: &Registration) -> Result<Option<UserProfile>> {
        registration.validate()?;
        let url = self.url(Service::Users, &["users", "register"], &[])?;
        let body = serde_json::to_value(registration)?;
        let value = self.execute(HttpRequest::post(url, body), Auth::Anonymous).await?;
        info!(username = %registration.username, "Registered");
        Ok(normalize::user(&value))
    }

    /// Log in, fetch the profile with the new token, then establish the session.
    /// The session is only touched once both round trips succeeded.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }

        let url = self.url(Service::Users, &["users", "login-json"], &[])?;
        let body = serde_json::to_value(credentials)?;
        let value = self.execute(HttpRequest::post(url, body), Auth::Anonymous).await?;
        let token: AccessToken = serde_json::from_value(value)?;

        let url = self.url(Service::Users, &["users", "me"], &[])?;
        let value = self
            .execute(HttpRequest::get(url), Auth::Bearer(token.access_token.clone()))
            .await?;
        let user = normalize::user(&value).ok_or_else(|| Error::Invalid {
            message: "Profile response has no user id".to_string(),
        })?;

        self.session.establish(token.access_token, user.clone())?;
        Ok(user)
    }

    pub async fn current_user(&self) -> Result<UserProfile> {
        let url = self.url(Service::Users, &["users", "me"], &[])?;
        let value = self.execute(HttpRequest::get(url), Auth::Session).await?;
        normalize::user(&value).ok_or_else(|| Error::Invalid {
            message: "Profile response has no user id".to_string(),
        })
    }

    pub async fn user_by_id(&self, user_id: &str) -> Result<UserProfile> {
        let url = self.url(Service::Users, &["users", user_id], &[])?;
        let value = self.execute(HttpRequest::get(url), Auth::Session).await?;
        normalize::user(&value).ok_or_else(|| Error::Invalid {
            message: format!("User {user_id} has no id in response"),
        })
    }

    // === Configs service ===

    pub async fn upload_config(&self, config: &NewConfiguration) -> Result<ConfigurationSummary> {
        let url = self.url(Service::Configs, &["configs", ""], &[])?;
        let body = serde_json::to_value(config)?;
        let value = self.execute(HttpRequest::post(url, body), Auth::Session).await?;
        let created = normalize::summary(&value).unwrap_or_default();
        info!(id = %created.id, title = %config.title, "Configuration uploaded");
        Ok(created)
    }

    /// Raw configuration from the configs service, without statistics
    pub async fn get_config(&self, config_id: &str) -> Result<ConfigurationDetail> {
        let url = self.url(Service::Configs, &["configs", config_id], &[])?;
        let value = self.execute(HttpRequest::get(url), Auth::Session).await?;
        normalize::detail(&value).ok_or_else(|| Error::Invalid {
            message: format!("Configuration {config_id} response is not an object"),
        })
    }

    /// Basic listing, optionally narrowed to one game
    pub async fn search_configs(&self, game: Option<&str>) -> Result<Vec<ConfigurationSummary>> {
        let query: Vec<(&str, String)> = game
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(|g| vec![("game", g.to_string())])
            .unwrap_or_default();
        let url = self.url(Service::Configs, &["configs", ""], &query)?;
        let value = self.execute(HttpRequest::get(url), Auth::Session).await?;
        Ok(normalize::summaries(&value))
    }

    // === Visualizations service ===

    pub async fn configuration_details(&self, config_id: &str) -> Result<ConfigurationDetail> {
        let url = self.url(Service::Visualizations, &["visualizations", "configs", config_id], &[])?;
        let value = self.execute(HttpRequest::get(url), Auth::Session).await?;
        normalize::detail(&value).ok_or_else(|| Error::Invalid {
            message: format!("Configuration {config_id} response is not an object"),
        })
    }

    pub async fn search_advanced(&self, params: &AdvancedSearchParams) -> Result<SearchResults> {
        let url = self.url(
            Service::Visualizations,
            &["visualizations", "search"],
            &params.query_pairs(),
        )?;
        let value = self.execute(HttpRequest::get(url), Auth::Session).await?;
        Ok(normalize::search_results(&value))
    }

    pub async fn configurations_by_game(
        &self,
        game: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchResults> {
        let url = self.url(
            Service::Visualizations,
            &["visualizations", "game", game],
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )?;
        let value = self.execute(HttpRequest::get(url), Auth::Session).await?;
        Ok(normalize::search_results(&value))
    }

    // === Valuations service ===

    pub async fn add_comment(&self, config_id: &str, text: &str) -> Result<Value> {
        let text = non_empty_comment(text)?;
        let url = self.url(
            Service::Valuations,
            &["valutations", "config", config_id, "comment"],
            &[],
        )?;
        self.execute(HttpRequest::post(url, json!({ "comment": text })), Auth::Session)
            .await
    }

    pub async fn edit_comment(&self, comment_id: &str, text: &str) -> Result<Value> {
        let text = non_empty_comment(text)?;
        let url = self.url(Service::Valuations, &["valutations", "comment", comment_id], &[])?;
        self.execute(HttpRequest::put(url, json!({ "comment": text })), Auth::Session)
            .await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<Value> {
        let url = self.url(Service::Valuations, &["valutations", "comment", comment_id], &[])?;
        self.execute(HttpRequest::delete(url), Auth::Session).await
    }

    /// Like or unlike, the server decides which
    pub async fn toggle_like(&self, config_id: &str) -> Result<Value> {
        let url = self.url(
            Service::Valuations,
            &["valutations", "config", config_id, "like"],
            &[],
        )?;
        self.execute(HttpRequest::post(url, json!({})), Auth::Session).await
    }

    pub async fn add_rating(&self, config_id: &str, rating: u8) -> Result<Value> {
        if !(1..=5).contains(&rating) {
            return Err(Error::validation("Rating must be between 1 and 5"));
        }
        let url = self.url(
            Service::Valuations,
            &["valutations", "config", config_id, "rating"],
            &[],
        )?;
        self.execute(HttpRequest::post(url, json!({ "rating": rating })), Auth::Session)
            .await
    }
}

fn non_empty_comment(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::validation("Comment cannot be empty"));
    }
    Ok(text)
}
