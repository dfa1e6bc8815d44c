//! UploadState - Upload Form and Autosaved Drafts

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::configuration::{NewConfiguration, parse_tags};
use crate::domain::draft::{InputMode, UploadDraft};
use crate::domain::parameter::{ObjectParsePolicy, ParameterRow, rows_to_map};
use crate::error::{Error, Result};

/// Message shown when the mandatory fields are missing
pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and game are required";

/// Message shown when the raw JSON editor does not hold an object
pub const INVALID_JSON_MESSAGE: &str = "Parameters JSON is not valid";

/// What to do with a stored draft when the form opens
#[derive(Debug, Clone, PartialEq)]
pub enum DraftCheck {
    /// Nothing stored
    None,
    /// Too old, removed without asking
    Expired,
    /// Ask the user to restore or discard
    Prompt(UploadDraft),
}

impl DraftCheck {
    pub fn classify(draft: Option<UploadDraft>, now: DateTime<Utc>) -> Self {
        match draft {
            None => DraftCheck::None,
            Some(draft) if draft.is_expired(now) => DraftCheck::Expired,
            Some(draft) => DraftCheck::Prompt(draft),
        }
    }
}

/// The upload form
#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    pub title: String,
    pub game: String,
    pub description: String,
    /// Comma-separated, as typed
    pub tags: String,
    pub rows: Vec<ParameterRow>,
    pub json_text: String,
    mode: InputMode,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            game: String::new(),
            description: String::new(),
            tags: String::new(),
            rows: vec![ParameterRow::default()],
            json_text: String::new(),
            mode: InputMode::Simple,
        }
    }
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Append a tag unless it is already listed
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        let mut tags = parse_tags(&self.tags);
        if tags.iter().any(|t| t == tag) {
            return;
        }
        tags.push(tag.to_string());
        self.tags = tags.join(", ");
    }

    /// Switch editor. Going to JSON writes the rows into the JSON text;
    /// coming back leaves the rows untouched.
    pub fn switch_mode(&mut self, mode: InputMode, policy: ObjectParsePolicy) -> Result<()> {
        if self.mode == InputMode::Simple && mode == InputMode::Json {
            self.json_text = rows_to_json(&self.rows, policy)?;
        }
        self.mode = mode;
        Ok(())
    }

    /// Parameters from the active editor
    pub fn parameters(&self, policy: ObjectParsePolicy) -> Result<Map<String, Value>> {
        match self.mode {
            InputMode::Simple => rows_to_map(&self.rows, policy),
            InputMode::Json => parse_json_object(&self.json_text),
        }
    }

    /// Validate and assemble the payload; never touches the network
    pub fn build(&self, policy: ObjectParsePolicy) -> Result<NewConfiguration> {
        let title = self.title.trim();
        let game = self.game.trim();
        if title.is_empty() || game.is_empty() {
            return Err(Error::validation(REQUIRED_FIELDS_MESSAGE));
        }
        Ok(NewConfiguration {
            title: title.to_string(),
            game: game.to_string(),
            description: self.description.trim().to_string(),
            tags: parse_tags(&self.tags),
            parameters: self.parameters(policy)?,
        })
    }

    /// Snapshot for autosave
    pub fn snapshot(&self, now: DateTime<Utc>) -> UploadDraft {
        let parameters_json = match self.mode {
            InputMode::Json => self.json_text.clone(),
            InputMode::Simple => {
                rows_to_json(&self.rows, ObjectParsePolicy::KeepRaw).unwrap_or_default()
            }
        };
        UploadDraft {
            title: self.title.clone(),
            game: self.game.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            parameters_json,
            active_input_mode: self.mode,
            saved_at: now,
        }
    }

    /// Refill the form from a draft. Rows are not rebuilt from the JSON text,
    /// so saved parameters come back in the JSON editor.
    pub fn restore(&mut self, draft: &UploadDraft) {
        let has_parameters = match parse_json_object(&draft.parameters_json) {
            Ok(map) => !map.is_empty(),
            Err(_) => true,
        };
        let mode = if has_parameters {
            InputMode::Json
        } else {
            draft.active_input_mode
        };
        *self = UploadForm {
            title: draft.title.clone(),
            game: draft.game.clone(),
            description: draft.description.clone(),
            tags: draft.tags.clone(),
            json_text: draft.parameters_json.clone(),
            mode,
            ..UploadForm::default()
        };
    }

    pub fn reset(&mut self) {
        *self = UploadForm::default();
    }

    /// Nothing typed yet
    pub fn is_blank(&self) -> bool {
        self.snapshot(Utc::now()).is_blank()
            && self.rows.iter().all(|r| r.name.trim().is_empty())
    }
}

fn rows_to_json(rows: &[ParameterRow], policy: ObjectParsePolicy) -> Result<String> {
    let map = rows_to_map(rows, policy)?;
    Ok(serde_json::to_string_pretty(&Value::Object(map))?)
}

fn parse_json_object(text: &str) -> Result<Map<String, Value>> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(Error::validation(INVALID_JSON_MESSAGE)),
    }
}
