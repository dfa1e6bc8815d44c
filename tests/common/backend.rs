//! In-memory stand-in for the users, configs, visualizations and valuations services

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Url;
use serde_json::{Value, json};

use config_hub::connection::Service;
use config_hub::error::{Error, Result};
use config_hub::services::{HttpRequest, HttpResponse, Method, Transport};

#[derive(Debug, Clone)]
struct StoredUser {
    id: String,
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
struct StoredComment {
    id: String,
    user_id: String,
    username: String,
    text: String,
    created_at: String,
}

#[derive(Debug, Clone)]
struct StoredConfig {
    id: String,
    title: String,
    game: String,
    description: String,
    tags: Vec<String>,
    parameters: Value,
    user_id: String,
    created_at: String,
    views: u64,
    comments: Vec<StoredComment>,
    liked_by: BTreeSet<String>,
    ratings: BTreeMap<String, u8>,
}

impl StoredConfig {
    fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: u32 = self.ratings.values().map(|r| u32::from(*r)).sum();
        Some(f64::from(sum) / self.ratings.len() as f64)
    }

    fn summary(&self) -> Value {
        json!({
            "_id": self.id,
            "title": self.title,
            "game": self.game,
            "description": self.description,
            "tags": self.tags,
            "parameters": self.parameters,
            "user_id": self.user_id,
            "created_at": self.created_at,
            "average_rating": self.average_rating(),
        })
    }
}

#[derive(Debug, Default)]
struct BackendState {
    users: Vec<StoredUser>,
    tokens: HashMap<String, String>,
    configs: Vec<StoredConfig>,
    next_id: u64,
    offline: HashSet<Service>,
    requests: Vec<HttpRequest>,
}

impl BackendState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn user(&self, id: &str) -> Option<&StoredUser> {
        self.users.iter().find(|u| u.id == id)
    }

    fn config_mut(&mut self, id: &str) -> Option<&mut StoredConfig> {
        self.configs.iter_mut().find(|c| c.id == id)
    }

    fn caller(&self, request: &HttpRequest) -> Option<StoredUser> {
        let token = request.header("Authorization")?.strip_prefix("Bearer ")?;
        let user_id = self.tokens.get(token)?;
        self.user(user_id).cloned()
    }
}

/// Stateful fake of the four backends on their default local ports
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
}

fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

fn detail(status: u16, message: &str) -> HttpResponse {
    respond(status, json!({ "detail": message }))
}

fn unauthorized() -> HttpResponse {
    detail(401, "Could not validate credentials")
}

fn body_str<'a>(request: &'a HttpRequest, key: &str) -> &'a str {
    request
        .body
        .as_ref()
        .and_then(|b| b.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

fn service_of(url: &Url) -> Option<Service> {
    match url.port()? {
        8001 => Some(Service::Users),
        8002 => Some(Service::Configs),
        8003 => Some(Service::Visualizations),
        8004 => Some(Service::Valuations),
        _ => None,
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().expect("backend lock")
    }

    /// Register an account directly, returning its id
    pub fn seed_user(&self, username: &str, email: &str, password: &str) -> String {
        let mut state = self.lock();
        let id = state.next_id("user");
        state.users.push(StoredUser {
            id: id.clone(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
        id
    }

    /// Insert a configuration created `age_days` ago
    pub fn seed_config(
        &self,
        owner: &str,
        title: &str,
        game: &str,
        tags: &[&str],
        age_days: i64,
    ) -> String {
        let mut state = self.lock();
        let id = state.next_id("cfg");
        state.configs.push(StoredConfig {
            id: id.clone(),
            title: title.to_string(),
            game: game.to_string(),
            description: format!("{title} for {game}"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            parameters: json!({ "sensitivity": 2.5, "fullscreen": true }),
            user_id: owner.to_string(),
            created_at: (Utc::now() - Duration::days(age_days)).to_rfc3339(),
            views: 0,
            comments: Vec::new(),
            liked_by: BTreeSet::new(),
            ratings: BTreeMap::new(),
        });
        id
    }

    /// Make every request to `service` fail at the transport level
    pub fn set_offline(&self, service: Service) {
        self.lock().offline.insert(service);
    }

    pub fn set_online(&self, service: Service) {
        self.lock().offline.remove(&service);
    }

    /// Invalidate every issued token
    pub fn expire_tokens(&self) {
        self.lock().tokens.clear();
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn count(&self, method: Method, fragment: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.url.contains(fragment))
            .count()
    }

    pub fn config_count(&self) -> usize {
        self.lock().configs.len()
    }

    /// Parameters as stored for the configuration titled `title`
    pub fn stored_parameters(&self, title: &str) -> Option<Value> {
        self.lock()
            .configs
            .iter()
            .find(|c| c.title == title)
            .map(|c| c.parameters.clone())
    }

    fn route(&self, request: &HttpRequest, url: &Url, service: Service) -> HttpResponse {
        let mut state = self.lock();
        let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let caller = state.caller(request);

        match (service, request.method, segments.as_slice()) {
            (_, Method::Get, ["docs"]) => respond(200, json!({})),

            // Users
            (Service::Users, Method::Post, ["users", "register"]) => {
                let email = body_str(request, "email");
                if state.users.iter().any(|u| u.email == email) {
                    return detail(400, "Email already registered");
                }
                let id = state.next_id("user");
                let user = StoredUser {
                    id: id.clone(),
                    username: body_str(request, "username").to_string(),
                    email: email.to_string(),
                    password: body_str(request, "password").to_string(),
                };
                let body = json!({ "user_id": id, "username": user.username, "email": user.email });
                state.users.push(user);
                respond(200, body)
            }
            (Service::Users, Method::Post, ["users", "login-json"]) => {
                let email = body_str(request, "email");
                let password = body_str(request, "password");
                let Some(user_id) = state
                    .users
                    .iter()
                    .find(|u| u.email == email && u.password == password)
                    .map(|u| u.id.clone())
                else {
                    return detail(401, "Incorrect email or password");
                };
                let token = state.next_id("token");
                state.tokens.insert(token.clone(), user_id);
                respond(200, json!({ "access_token": token, "token_type": "bearer" }))
            }
            (Service::Users, Method::Get, ["users", "me"]) => match caller {
                Some(user) => respond(
                    200,
                    json!({ "user_id": user.id, "username": user.username, "email": user.email }),
                ),
                None => unauthorized(),
            },
            (Service::Users, Method::Get, ["users", id]) => match state.user(id) {
                Some(user) => respond(
                    200,
                    json!({ "id": user.id, "username": user.username, "email": user.email }),
                ),
                None => detail(404, "User not found"),
            },

            // Configs
            (Service::Configs, Method::Post, ["configs", ""]) => {
                let Some(user) = caller else {
                    return unauthorized();
                };
                let body = request.body.clone().unwrap_or_default();
                let id = state.next_id("cfg");
                let config = StoredConfig {
                    id,
                    title: body_str(request, "title").to_string(),
                    game: body_str(request, "game").to_string(),
                    description: body_str(request, "description").to_string(),
                    tags: body
                        .get("tags")
                        .and_then(Value::as_array)
                        .map(|t| t.iter().filter_map(Value::as_str).map(str::to_string).collect())
                        .unwrap_or_default(),
                    parameters: body.get("parameters").cloned().unwrap_or_else(|| json!({})),
                    user_id: user.id,
                    created_at: Utc::now().to_rfc3339(),
                    views: 0,
                    comments: Vec::new(),
                    liked_by: BTreeSet::new(),
                    ratings: BTreeMap::new(),
                };
                let summary = config.summary();
                state.configs.push(config);
                respond(200, summary)
            }
            (Service::Configs, Method::Get, ["configs", ""]) => {
                let game = query.iter().find(|(k, _)| k == "game").map(|(_, v)| v.to_lowercase());
                let items: Vec<Value> = state
                    .configs
                    .iter()
                    .filter(|c| game.as_ref().is_none_or(|g| c.game.to_lowercase() == *g))
                    .map(StoredConfig::summary)
                    .collect();
                respond(200, Value::Array(items))
            }
            (Service::Configs, Method::Get, ["configs", id]) => {
                match state.configs.iter().find(|c| c.id == *id) {
                    Some(config) => respond(200, config.summary()),
                    None => detail(404, "Configuration not found"),
                }
            }

            // Visualizations
            (Service::Visualizations, Method::Get, ["visualizations", "configs", id]) => {
                let Some(config) = state.config_mut(id) else {
                    return detail(404, "Configuration not found");
                };
                config.views += 1;
                let config = config.clone();
                let author = state.user(&config.user_id).map(|u| {
                    json!({ "username": u.username, "email": u.email })
                });
                let mut body = config.summary();
                body["author"] = author.unwrap_or(Value::Null);
                body["views"] = json!(config.views);
                body["likes_count"] = json!(config.liked_by.len());
                body["liked_by"] = json!(config.liked_by);
                body["total_ratings"] = json!(config.ratings.len());
                body["comments"] = config
                    .comments
                    .iter()
                    .map(|c| {
                        json!({
                            "id": c.id,
                            "user_id": c.user_id,
                            "username": c.username,
                            "comment": c.text,
                            "created_at": c.created_at,
                        })
                    })
                    .collect();
                respond(200, body)
            }
            (Service::Visualizations, Method::Get, ["visualizations", "search"]) => {
                let game = query.iter().find(|(k, _)| k == "game").map(|(_, v)| v.to_lowercase());
                let tags: Vec<String> = query
                    .iter()
                    .filter(|(k, _)| k == "tags")
                    .map(|(_, v)| v.to_lowercase())
                    .collect();
                let items: Vec<Value> = state
                    .configs
                    .iter()
                    .filter(|c| game.as_ref().is_none_or(|g| c.game.to_lowercase().contains(g)))
                    .filter(|c| {
                        tags.iter()
                            .all(|t| c.tags.iter().any(|ct| ct.to_lowercase() == *t))
                    })
                    .map(StoredConfig::summary)
                    .collect();
                respond(
                    200,
                    json!({ "configurations": items, "total": items.len(), "has_more": false }),
                )
            }
            (Service::Visualizations, Method::Get, ["visualizations", "game", game]) => {
                let items: Vec<Value> = state
                    .configs
                    .iter()
                    .filter(|c| c.game.eq_ignore_ascii_case(game))
                    .map(StoredConfig::summary)
                    .collect();
                respond(
                    200,
                    json!({ "game": game, "total_configurations": items.len(), "configurations": items }),
                )
            }

            // Valuations
            (Service::Valuations, _, ["valutations", ..]) => {
                let Some(user) = caller else {
                    return unauthorized();
                };
                self.valuations(&mut state, request, &segments, user)
            }

            _ => detail(404, "Not Found"),
        }
    }

    fn valuations(
        &self,
        state: &mut BackendState,
        request: &HttpRequest,
        segments: &[&str],
        user: StoredUser,
    ) -> HttpResponse {
        let comment_id = state.next_id("comment");
        match (request.method, segments) {
            (Method::Post, ["valutations", "config", id, "comment"]) => {
                let Some(config) = state.config_mut(id) else {
                    return detail(404, "Configuration not found");
                };
                config.comments.push(StoredComment {
                    id: comment_id.clone(),
                    user_id: user.id,
                    username: user.username,
                    text: body_str(request, "comment").to_string(),
                    created_at: Utc::now().to_rfc3339(),
                });
                respond(200, json!({ "message": "Comment added", "comment_id": comment_id }))
            }
            (Method::Post, ["valutations", "config", id, "like"]) => {
                let Some(config) = state.config_mut(id) else {
                    return detail(404, "Configuration not found");
                };
                let liked = if config.liked_by.remove(&user.id) {
                    false
                } else {
                    config.liked_by.insert(user.id);
                    true
                };
                respond(200, json!({ "liked": liked }))
            }
            (Method::Post, ["valutations", "config", id, "rating"]) => {
                let rating = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("rating"))
                    .and_then(Value::as_u64)
                    .unwrap_or_default();
                let Some(config) = state.config_mut(id) else {
                    return detail(404, "Configuration not found");
                };
                config.ratings.insert(user.id, rating as u8);
                respond(200, json!({ "message": "Rating saved" }))
            }
            (Method::Put | Method::Delete, ["valutations", "comment", cid]) => {
                let found = state.configs.iter_mut().find_map(|c| {
                    let index = c.comments.iter().position(|m| m.id == *cid)?;
                    Some((c, index))
                });
                let Some((config, index)) = found else {
                    return detail(404, "Comment not found");
                };
                if config.comments[index].user_id != user.id {
                    return detail(403, "Not authorized to modify this comment");
                }
                if request.method == Method::Delete {
                    config.comments.remove(index);
                } else {
                    config.comments[index].text = body_str(request, "comment").to_string();
                }
                respond(200, json!({ "message": "ok" }))
            }
            _ => detail(404, "Not Found"),
        }
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.lock().requests.push(request.clone());

        let url = Url::parse(&request.url).map_err(|e| Error::Network {
            message: e.to_string(),
        })?;
        let Some(service) = service_of(&url) else {
            return Err(Error::Network {
                message: format!("connection refused: {url}"),
            });
        };
        if self.lock().offline.contains(&service) {
            return Err(Error::Network {
                message: format!("{service} service is unreachable"),
            });
        }
        Ok(self.route(&request, &url, service))
    }
}
