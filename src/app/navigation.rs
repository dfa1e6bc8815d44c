//! Navigation - Pages and Routes
//!
//! Pages mirror the web front end's documents; a [`Route`] carries the query
//! parameters that seed a page's initial state.

use std::fmt;

use reqwest::Url;

use crate::error::{Error, Result};

/// Available pages in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    /// Dashboard with service status and recent uploads
    #[default]
    Home,
    /// Paginated list of every configuration
    Configurations,
    /// Search with filters
    Search,
    /// A single configuration
    Detail,
    /// Upload form, requires a session
    Upload,
}

impl Page {
    /// Document name used in links
    pub fn document(&self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::Configurations => "configurations.html",
            Page::Search => "search.html",
            Page::Detail => "configuration.html",
            Page::Upload => "upload.html",
        }
    }

    /// Get the translation key for the page title
    pub fn title_key(&self) -> &'static str {
        match self {
            Page::Home => "nav-home",
            Page::Configurations => "nav-configurations",
            Page::Search => "nav-search",
            Page::Detail => "nav-detail",
            Page::Upload => "nav-upload",
        }
    }

    /// Pages that need an authenticated session
    pub fn requires_auth(&self) -> bool {
        matches!(self, Page::Upload)
    }

    pub fn from_document(document: &str) -> Option<Page> {
        match document {
            "" | "index.html" => Some(Page::Home),
            "configurations.html" => Some(Page::Configurations),
            "search.html" => Some(Page::Search),
            "configuration.html" => Some(Page::Detail),
            "upload.html" => Some(Page::Upload),
            _ => None,
        }
    }

    pub fn all() -> &'static [Page] {
        &[
            Page::Home,
            Page::Configurations,
            Page::Search,
            Page::Detail,
            Page::Upload,
        ]
    }
}

/// A page plus the query parameters it was opened with
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub page: Page,
    /// `q`: free-text search
    pub query: Option<String>,
    /// `game`
    pub game: Option<String>,
    /// `tags`: comma-separated
    pub tags: Option<String>,
    /// `id`: configuration shown by the detail page
    pub id: Option<String>,
}

impl Route {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    pub fn detail(id: impl Into<String>) -> Self {
        Self {
            page: Page::Detail,
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Parse an absolute URL or a relative link such as `search.html?q=chess`
    pub fn parse(link: &str) -> Result<Route> {
        let base = Url::parse("http://localhost/").map_err(|e| Error::Invalid {
            message: e.to_string(),
        })?;
        let url = base.join(link.trim()).map_err(|e| Error::Invalid {
            message: format!("Invalid link '{link}': {e}"),
        })?;

        let document = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        let page = Page::from_document(document).ok_or_else(|| Error::Invalid {
            message: format!("Unknown page '{document}'"),
        })?;

        let mut route = Route::new(page);
        for (key, value) in url.query_pairs() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "q" => route.query = Some(value.to_string()),
                "game" => route.game = Some(value.to_string()),
                "tags" => route.tags = Some(value.to_string()),
                "id" => route.id = Some(value.to_string()),
                _ => {}
            }
        }
        Ok(route)
    }

    /// Render back into a relative link
    pub fn to_link(&self) -> String {
        let params: Vec<(&str, &str)> = [
            ("id", self.id.as_deref()),
            ("q", self.query.as_deref()),
            ("game", self.game.as_deref()),
            ("tags", self.tags.as_deref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect();

        if params.is_empty() {
            return self.page.document().to_string();
        }
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", encode_component(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.page.document())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_link())
    }
}

/// Percent-encode a query component
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_link() {
        let route = Route::parse("search.html?q=night%20mode&game=Chess&tags=blitz,pro").expect("route");
        assert_eq!(route.page, Page::Search);
        assert_eq!(route.query.as_deref(), Some("night mode"));
        assert_eq!(route.game.as_deref(), Some("Chess"));
        assert_eq!(route.tags.as_deref(), Some("blitz,pro"));
    }

    #[test]
    fn test_parse_absolute_detail_url() {
        let route = Route::parse("http://hub.example.com/app/configuration.html?id=abc123").expect("route");
        assert_eq!(route, Route::detail("abc123"));
    }

    #[test]
    fn test_unknown_page_rejected() {
        assert!(Route::parse("admin.html").is_err());
    }

    #[test]
    fn test_link_roundtrip() {
        let mut route = Route::new(Page::Search);
        route.query = Some("fps & more".to_string());
        let link = route.to_link();
        assert_eq!(link, "search.html?q=fps%20%26%20more");
        assert_eq!(Route::parse(&link).expect("parse"), route);
    }

    #[test]
    fn test_only_upload_is_protected() {
        let protected: Vec<_> = Page::all().iter().filter(|p| p.requires_auth()).collect();
        assert_eq!(protected, vec![&Page::Upload]);
    }
}
