//! Payload Normalization
//!
//! The four backends disagree on field names (`_id` vs `id`, `likes_count` vs
//! `likes`, `comment` vs `text`, ...). Everything coming off the wire passes
//! through here and leaves as one of the canonical domain types.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::configuration::{Author, Comment, ConfigurationDetail, ConfigurationSummary};
use crate::domain::search::SearchResults;
use crate::domain::user::UserProfile;

/// Fallback when an error body carries no usable message
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// Parse an ISO-8601 timestamp. Naive timestamps are taken as UTC.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// First key holding a string (or a number, rendered as text)
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First key holding a non-negative integer
fn count(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| {
        let value = obj.get(*key)?;
        value
            .as_u64()
            .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
    })
}

fn tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => crate::domain::configuration::parse_tags(s),
        _ => Vec::new(),
    }
}

/// Map a configuration payload from any service onto a summary
pub fn summary(value: &Value) -> Option<ConfigurationSummary> {
    let obj = value.as_object()?;
    Some(ConfigurationSummary {
        id: text(obj, &["_id", "id", "config_id"]).unwrap_or_default(),
        title: text(obj, &["title"]).unwrap_or_default(),
        game: text(obj, &["game"]).unwrap_or_default(),
        description: text(obj, &["description"]).unwrap_or_default(),
        tags: tags(obj.get("tags")),
        created_at: obj.get("created_at").and_then(parse_timestamp),
        user_id: text(obj, &["user_id"]),
        average_rating: obj.get("average_rating").and_then(Value::as_f64),
    })
}

/// Listing payloads: a bare array, `{configs: [...]}` or `{configurations: [...]}`
pub fn summaries(value: &Value) -> Vec<ConfigurationSummary> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("configs").or_else(|| obj.get("configurations")) {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items.iter().filter_map(summary).collect()
}

/// Advanced search payload, with or without the paging envelope
pub fn search_results(value: &Value) -> SearchResults {
    let items = summaries(value);
    let (total, has_more) = match value.as_object() {
        Some(obj) => (
            count(obj, &["total", "total_configurations"]).map(|t| t as usize),
            obj.get("has_more").and_then(Value::as_bool),
        ),
        None => (None, None),
    };
    SearchResults {
        total: total.unwrap_or(items.len()),
        has_more: has_more.unwrap_or(false),
        items,
    }
}

/// A comment from the visualizations or valuations service
pub fn comment(value: &Value) -> Option<Comment> {
    let obj = value.as_object()?;
    Some(Comment {
        id: text(obj, &["id", "_id"]),
        user_id: text(obj, &["user_id"]),
        username: text(obj, &["username"]),
        text: text(obj, &["comment", "text"]).unwrap_or_default(),
        created_at: obj.get("created_at").and_then(parse_timestamp),
    })
}

fn author(value: Option<&Value>) -> Option<Author> {
    match value? {
        Value::String(name) if !name.trim().is_empty() => Some(Author {
            username: name.clone(),
            email: None,
        }),
        Value::Object(obj) => text(obj, &["username", "name"]).map(|username| Author {
            username,
            email: text(obj, &["email"]),
        }),
        _ => None,
    }
}

fn liked_by(obj: &Map<String, Value>) -> BTreeSet<String> {
    let explicit = obj.get("liked_by").and_then(Value::as_array);
    let derived = obj.get("likes").and_then(Value::as_array);
    explicit
        .or(derived)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(id) => Some(id.clone()),
                    Value::Object(like) => text(like, &["user_id"]),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Map an enriched configuration payload onto the canonical detail
pub fn detail(value: &Value) -> Option<ConfigurationDetail> {
    let obj = value.as_object()?;
    let summary = summary(value)?;

    let comments: Vec<Comment> = obj
        .get("comments")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(comment).collect())
        .unwrap_or_default();

    let liked_by = liked_by(obj);
    let likes_count = count(obj, &["likes_count", "likes", "total_likes"])
        .unwrap_or(liked_by.len() as u64);

    let ratings_count = count(obj, &["total_ratings", "ratings_count"])
        .or_else(|| {
            obj.get("ratings")
                .and_then(Value::as_array)
                .map(|r| r.len() as u64)
        })
        .unwrap_or(0);

    Some(ConfigurationDetail {
        parameters: obj
            .get("parameters")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        author: author(obj.get("author")),
        views: count(obj, &["views", "views_count"]).unwrap_or(0),
        likes_count,
        liked_by,
        comments_count: count(obj, &["comments_count"])
            .map(|c| c as usize)
            .unwrap_or(comments.len()),
        comments,
        average_rating: summary.average_rating,
        ratings_count,
        summary,
    })
}

/// Profile from `/users/me` or `/users/{id}`
pub fn user(value: &Value) -> Option<UserProfile> {
    let obj = value.as_object()?;
    Some(UserProfile {
        id: text(obj, &["user_id", "id", "_id"])?,
        username: text(obj, &["username"]).unwrap_or_default(),
        email: text(obj, &["email"]).unwrap_or_default(),
    })
}

/// Human-readable message of an error body: `detail`, then `message`
pub fn error_message(body: &str) -> String {
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) else {
        return GENERIC_SERVER_ERROR.to_string();
    };
    for key in ["detail", "message"] {
        match obj.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.clone(),
            // Validation errors arrive as a list of `{msg, loc, ...}`
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
    }
    GENERIC_SERVER_ERROR.to_string()
}
