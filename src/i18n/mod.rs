//! i18n - Internationalization Module
//!
//! Provides simple translation functions using HashMap-based lookups.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Italian
    It,
}

impl Locale {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::It => "Italiano",
        }
    }

    /// Parse a language code such as `it`, `it-IT` or `en_US`
    pub fn from_code(code: &str) -> Option<Locale> {
        let lang = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match lang.as_str() {
            "en" => Some(Locale::En),
            "it" => Some(Locale::It),
            _ => None,
        }
    }

    /// Configured locale, else the system one, else English
    pub fn resolve(configured: Option<&str>) -> Locale {
        configured
            .filter(|c| !c.trim().is_empty())
            .and_then(Locale::from_code)
            .or_else(|| Locale::from_code(&locale_config::Locale::current().to_string()))
            .unwrap_or_default()
    }
}

/// Translation resources
static TRANSLATIONS: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> = OnceLock::new();

/// Initialize translations (key -> (en, it))
fn init_translations() -> HashMap<&'static str, (&'static str, &'static str)> {
    let mut map = HashMap::new();

    // App
    map.insert("app-title", ("Config Hub", "Config Hub"));

    // Navigation
    map.insert("nav-home", ("Home", "Home"));
    map.insert("nav-configurations", ("Configurations", "Configurazioni"));
    map.insert("nav-search", ("Search", "Cerca"));
    map.insert("nav-detail", ("Configuration", "Configurazione"));
    map.insert("nav-upload", ("Upload", "Carica"));

    // User menu
    map.insert("menu-profile", ("Profile", "Profilo"));
    map.insert("menu-upload", ("Upload", "Carica"));
    map.insert("menu-logout", ("Logout", "Esci"));
    map.insert("menu-login", ("Login", "Accedi"));
    map.insert("menu-register", ("Register", "Registrati"));
    map.insert(
        "guard-login-required",
        ("You must be logged in to access this page", "Devi effettuare l'accesso per visualizzare questa pagina"),
    );

    // Service status
    map.insert("status-title", ("Service status", "Stato dei servizi"));
    map.insert("status-online", ("online", "online"));
    map.insert("status-offline", ("offline", "offline"));

    // Dashboard and list
    map.insert("home-recent", ("Recent configurations", "Configurazioni recenti"));
    map.insert("stats-total", ("Configurations", "Configurazioni"));
    map.insert("stats-games", ("Games", "Giochi"));
    map.insert("stats-recent", ("Last 7 days", "Ultimi 7 giorni"));
    map.insert("list-no-data", ("No configurations available yet", "Nessuna configurazione disponibile"));
    map.insert("list-no-data-action", ("Upload the first configuration", "Carica la prima configurazione"));
    map.insert("list-no-results", ("No configurations match your filters", "Nessuna configurazione corrisponde ai filtri"));
    map.insert("list-no-results-action", ("Clear filters", "Cancella filtri"));
    map.insert("list-page", ("Page", "Pagina"));
    map.insert("list-of", ("of", "di"));
    map.insert("list-prev", ("Previous", "Precedente"));
    map.insert("list-next", ("Next", "Successiva"));
    map.insert("suggest-games", ("Games", "Giochi"));
    map.insert("suggest-tags", ("Tags", "Tag"));
    map.insert("no-description", ("No description", "Nessuna descrizione"));

    // Search
    map.insert("search-initial", ("Enter a query or choose a filter to start searching", "Inserisci una ricerca o scegli un filtro"));
    map.insert("search-results", ("results", "risultati"));
    map.insert("search-elapsed", ("in", "in"));
    map.insert("search-failed", ("Search failed", "Ricerca non riuscita"));

    // Detail
    map.insert("detail-loading", ("Loading configuration...", "Caricamento configurazione..."));
    map.insert("detail-error", ("Could not load the configuration", "Impossibile caricare la configurazione"));
    map.insert("detail-retry", ("Retry", "Riprova"));
    map.insert("detail-author", ("Author", "Autore"));
    map.insert("detail-game", ("Game", "Gioco"));
    map.insert("detail-tags", ("Tags", "Tag"));
    map.insert("detail-created", ("Created", "Creata"));
    map.insert("detail-views", ("Views", "Visualizzazioni"));
    map.insert("detail-likes", ("Likes", "Mi piace"));
    map.insert("detail-rating", ("Rating", "Valutazione"));
    map.insert("detail-comments", ("Comments", "Commenti"));
    map.insert("detail-no-comments", ("No comments yet", "Ancora nessun commento"));
    map.insert("detail-related", ("Related configurations", "Configurazioni correlate"));
    map.insert("detail-related-empty", ("No related configurations", "Nessuna configurazione correlata"));
    map.insert("detail-related-unavailable", ("Related configurations are unavailable", "Configurazioni correlate non disponibili"));
    map.insert("detail-parameters", ("Parameters", "Parametri"));
    map.insert("detail-liked", ("You like this", "Ti piace"));
    map.insert("detail-not-liked", ("Like", "Mi piace"));
    map.insert("detail-share", ("Share", "Condividi"));
    map.insert("detail-load-failed", ("Failed to load configuration", "Caricamento della configurazione non riuscito"));
    map.insert("detail-refresh-failed", ("Saved, but the page could not be refreshed", "Salvato, ma non è stato possibile aggiornare la pagina"));

    // Upload
    map.insert("upload-draft-found", ("An unsaved draft was found, saved", "È stata trovata una bozza non salvata, salvata"));
    map.insert("upload-draft-restored", ("Draft restored", "Bozza ripristinata"));
    map.insert("upload-draft-discarded", ("Draft discarded", "Bozza eliminata"));
    map.insert("upload-draft-expired", ("An expired draft was removed", "Una bozza scaduta è stata rimossa"));
    map.insert("upload-success", ("Configuration uploaded", "Configurazione caricata"));
    map.insert("upload-failed", ("Upload failed", "Caricamento non riuscito"));
    map.insert("upload-preview-params", ("parameters", "parametri"));

    // Auth and actions
    map.insert("auth-login-success", ("Login successful", "Accesso effettuato"));
    map.insert("auth-login-failed", ("Login failed", "Accesso non riuscito"));
    map.insert("auth-register-success", ("Registration completed, you can now log in", "Registrazione completata, ora puoi accedere"));
    map.insert("auth-register-failed", ("Registration failed", "Registrazione non riuscita"));
    map.insert("auth-logout", ("Logged out", "Disconnesso"));
    map.insert("auth-required", ("You must be logged in", "Devi effettuare l'accesso"));
    map.insert("comment-added", ("Comment added", "Commento aggiunto"));
    map.insert("comment-updated", ("Comment updated", "Commento modificato"));
    map.insert("comment-deleted", ("Comment deleted", "Commento eliminato"));
    map.insert("comment-failed", ("Comment failed", "Commento non riuscito"));
    map.insert("rating-saved", ("Rating saved", "Valutazione salvata"));
    map.insert("rating-failed", ("Rating failed", "Valutazione non riuscita"));
    map.insert("like-added", ("Added to liked configurations", "Aggiunta ai preferiti"));
    map.insert("like-removed", ("Removed from liked configurations", "Rimossa dai preferiti"));
    map.insert("like-failed", ("Like failed", "Mi piace non riuscito"));
    map.insert("list-load-failed", ("Failed to load configurations", "Caricamento delle configurazioni non riuscito"));

    // Profile
    map.insert("profile-title", ("Profile", "Profilo"));
    map.insert("profile-username", ("Username", "Nome utente"));
    map.insert("profile-email", ("Email", "Email"));
    map.insert("profile-id", ("User ID", "ID utente"));
    map.insert("profile-anonymous", ("Not logged in", "Accesso non effettuato"));

    // Notifications
    map.insert("notifications-title", ("Notifications", "Notifiche"));
    map.insert("notifications-empty", ("No notifications", "Nessuna notifica"));

    map
}

/// Get translations
fn translations() -> &'static HashMap<&'static str, (&'static str, &'static str)> {
    TRANSLATIONS.get_or_init(init_translations)
}

/// Translate a key
pub fn t(locale: Locale, key: &'static str) -> &'static str {
    match translations().get(key) {
        Some(&(en, it)) => match locale {
            Locale::En => en,
            Locale::It => it,
        },
        // Fallback: return the key itself
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_fallback() {
        assert_eq!(t(Locale::En, "nav-search"), "Search");
        assert_eq!(t(Locale::It, "nav-search"), "Cerca");
        assert_eq!(t(Locale::It, "missing-key"), "missing-key");
    }

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::from_code("it-IT"), Some(Locale::It));
        assert_eq!(Locale::from_code("en_US"), Some(Locale::En));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::resolve(Some("it")), Locale::It);
    }

    #[test]
    fn test_every_page_and_menu_key_is_translated() {
        use crate::app::navigation::Page;
        use crate::state::session_state::NavAction;

        let keys = Page::all().iter().map(|p| p.title_key()).chain(
            [
                NavAction::Profile,
                NavAction::Upload,
                NavAction::Logout,
                NavAction::Login,
                NavAction::Register,
            ]
            .iter()
            .map(|a| a.label_key()),
        );
        for key in keys {
            assert!(translations().contains_key(key), "missing {key}");
        }
    }
}
