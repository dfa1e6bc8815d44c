//! Config Hub - Command Line Front End
//!
//! Share, search and rate game configurations from the terminal.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use config_hub::app::navigation::{Page, Route};
use config_hub::app::{AppContext, Application};
use config_hub::connection::load_config;
use config_hub::constants::SEARCH_DEFAULT_LIMIT;
use config_hub::domain::draft::InputMode;
use config_hub::domain::parameter::ParameterRow;
use config_hub::domain::search::{SortField, SortOrder};
use config_hub::eventing::AppEvent;
use config_hub::features::auth::AuthController;
use config_hub::features::configurations::ConfigurationsController;
use config_hub::features::dashboard::DashboardController;
use config_hub::features::detail::DetailController;
use config_hub::features::search::{SearchController, SearchOutcome};
use config_hub::features::upload::{UploadController, UploadEntry};
use config_hub::helpers::get_or_create_data_dir;
use config_hub::i18n::{Locale, t};
use config_hub::services::build_runtime;
use config_hub::state::{DraftCheck, GuardDecision};
use config_hub::utils::config_store::{FileStore, LocalStore, MemoryStore};
use config_hub::utils::format::format_datetime;
use config_hub::views::{
    DetailView, EmptyState, ListPage, NotificationsView, ProfileView, Render, StatusView,
    SuggestionsView, card,
};

#[derive(Parser, Debug)]
#[command(name = "config-hub", version, about = "Share, search and rate game configurations")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write a daily rolling log file to the data directory
    #[arg(long, global = true)]
    log_file: bool,

    /// Keep the session and drafts in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Health of the four backend services and the latest uploads
    Status,
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the cached profile
    Whoami,
    /// Browse every configuration
    List {
        /// Matches the game or the title
        #[arg(long)]
        game: Option<String>,
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long, default_value = "created_at")]
        sort: SortField,
        #[arg(long, default_value = "desc")]
        order: SortOrder,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Print the known games and tags instead of the list
        #[arg(long)]
        suggestions: bool,
        /// Quick look at one configuration instead of the list
        #[arg(long, value_name = "ID", conflicts_with = "suggestions")]
        preview: Option<String>,
    },
    Search {
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long)]
        game: Option<String>,
        /// Comma-separated
        #[arg(long)]
        tags: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        min_rating: f64,
        #[arg(long, default_value = "created_at")]
        sort: SortField,
        #[arg(long, default_value = "desc")]
        order: SortOrder,
        /// Maximum number of results asked from the server
        #[arg(long, default_value_t = SEARCH_DEFAULT_LIMIT)]
        limit: usize,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Open a page link such as `search.html?q=chess` or `configuration.html?id=..`
    Open { link: String },
    Show {
        id: String,
        /// Print only the parameters as JSON
        #[arg(long)]
        params: bool,
        /// Write the export document into this directory
        #[arg(long)]
        export: Option<PathBuf>,
    },
    Comment { id: String, text: String },
    EditComment {
        id: String,
        comment_id: String,
        text: String,
    },
    DeleteComment { id: String, comment_id: String },
    Rate { id: String, rating: u8 },
    Like { id: String },
    Upload {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        game: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated
        #[arg(long, default_value = "")]
        tags: String,
        /// `name:type:value`, repeatable
        #[arg(long = "param")]
        params: Vec<ParameterRow>,
        /// Raw JSON object instead of `--param`
        #[arg(long, conflicts_with = "params")]
        json: Option<String>,
        /// Start from the stored draft
        #[arg(long)]
        resume: bool,
        /// Print the payload without uploading
        #[arg(long)]
        dry_run: bool,
    },
    /// Inspect or discard the autosaved upload draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand, Debug)]
enum DraftAction {
    Show,
    Discard,
}

fn init_logging(log_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !log_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    let appender = tracing_appender::rolling::daily(get_or_create_data_dir()?, "config-hub.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file)?;

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let store: Arc<dyn LocalStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::open_default().context("Failed to open local store")?)
    };
    let mut app = Application::connect(config, store)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting config-hub");

    let runtime = build_runtime().context("Failed to start the async runtime")?;
    let ok = runtime.block_on(run(&app.ctx, cli.command));

    for event in app.pump_events() {
        if let AppEvent::Redirect { to, .. } = event {
            info!(to = %to, "Redirect requested");
        }
    }
    if !app.notifications.is_empty() {
        eprintln!("{}", NotificationsView(&app.notifications).render(app.ctx.locale));
    }

    Ok(if ok && !app.notifications.has_errors() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(ctx: &AppContext, command: Command) -> bool {
    let locale = ctx.locale;
    match command {
        Command::Status => status(ctx).await,
        Command::Register {
            username,
            email,
            password,
        } => AuthController::new(ctx.clone()).register(&username, &email, &password).await,
        Command::Login { email, password } => {
            let auth = AuthController::new(ctx.clone());
            let user = auth.login(&email, &password).await;
            println!("{}", auth.nav_menu().render(locale));
            user.is_some()
        }
        Command::Logout => {
            AuthController::new(ctx.clone()).logout();
            true
        }
        Command::Whoami => {
            let auth = AuthController::new(ctx.clone());
            println!("{}", auth.nav_menu().render(locale));
            println!("{}", ProfileView(auth.profile().as_ref()).render(locale));
            true
        }
        Command::List {
            game,
            query,
            sort,
            order,
            page,
            suggestions,
            preview,
        } => {
            let mut list = ConfigurationsController::new(ctx.clone());
            if let Some(id) = preview {
                let Some(detail) = list.preview(&id).await else {
                    return false;
                };
                println!("{}", card(&detail.summary, locale));
                println!("{}", serde_json::Value::Object(detail.parameters));
                return true;
            }
            list.load().await;
            if suggestions {
                println!("{}", SuggestionsView(&list.suggestions()).render(locale));
                return true;
            }
            list.set_sort(sort, order);
            list.set_query(query.as_deref().unwrap_or_default());
            list.set_game(game.as_deref().unwrap_or_default());
            let outcome = list.go_to_page(page);
            let stats = list.stats(Utc::now());
            println!(
                "{}",
                ListPage {
                    outcome: &outcome,
                    stats: Some(stats),
                }
                .render(locale)
            );
            true
        }
        Command::Search {
            query,
            game,
            tags,
            min_rating,
            sort,
            order,
            limit,
            page,
        } => {
            let search = SearchController::new(ctx.clone());
            search.update_filters(|f| {
                f.text_query = query.unwrap_or_default();
                f.game = game.unwrap_or_default();
                f.tags = tags.unwrap_or_default();
                f.min_rating = min_rating;
                f.sort_field = sort;
                f.sort_order = order;
                f.limit = limit;
            });
            run_search(&search, page, locale).await
        }
        Command::Open { link } => match Route::parse(&link) {
            Ok(route) => open_route(ctx, route).await,
            Err(e) => {
                ctx.notifier.report("", &e);
                false
            }
        },
        Command::Show { id, params, export } => show(ctx, &id, params, export.as_deref()).await,
        Command::Comment { id, text } => {
            let mut detail = loaded_detail(ctx, &id).await;
            detail.add_comment(&text).await
        }
        Command::EditComment {
            id,
            comment_id,
            text,
        } => {
            let mut detail = loaded_detail(ctx, &id).await;
            detail.edit_comment(&comment_id, &text).await
        }
        Command::DeleteComment { id, comment_id } => {
            let mut detail = loaded_detail(ctx, &id).await;
            detail.delete_comment(&comment_id).await
        }
        Command::Rate { id, rating } => {
            let mut detail = loaded_detail(ctx, &id).await;
            detail.rate(rating).await
        }
        Command::Like { id } => {
            let mut detail = loaded_detail(ctx, &id).await;
            detail.toggle_like().await
        }
        Command::Upload {
            title,
            game,
            description,
            tags,
            params,
            json,
            resume,
            dry_run,
        } => {
            let mut upload = UploadController::new(ctx.clone());
            let draft = match upload.open(Utc::now()) {
                UploadEntry::Redirected => return false,
                UploadEntry::Ready { draft } => draft,
            };
            if let (true, Some(draft)) = (resume, draft.as_ref()) {
                upload.restore_draft(draft);
                // Rows typed now replace the draft's parameters
                if !params.is_empty() && !upload.switch_mode(InputMode::Simple) {
                    return false;
                }
            }
            upload.edit(|form| {
                let fields = [
                    (&mut form.title, title),
                    (&mut form.game, game),
                    (&mut form.description, description),
                    (&mut form.tags, tags),
                ];
                for (field, value) in fields {
                    if !value.is_empty() {
                        *field = value;
                    }
                }
                if !params.is_empty() {
                    form.rows = params;
                }
            });
            if let Some(json) = json {
                if !upload.switch_mode(InputMode::Json) {
                    return false;
                }
                upload.edit(|form| form.json_text = json);
            }

            if dry_run {
                return match upload.preview() {
                    Ok(payload) => match serde_json::to_string_pretty(&payload) {
                        Ok(text) => {
                            println!("{text}");
                            true
                        }
                        Err(e) => {
                            ctx.notifier.error(e.to_string());
                            false
                        }
                    },
                    Err(e) => {
                        ctx.notifier.report(ctx.t("upload-failed"), &e);
                        false
                    }
                };
            }

            match upload.submit().await {
                Some(route) => {
                    println!("{route}");
                    true
                }
                None => {
                    // Keep the work for a later `--resume`
                    if let Err(e) = upload.save_draft_now(Utc::now()) {
                        ctx.notifier.report("", &e);
                    }
                    false
                }
            }
        }
        Command::Draft { action } => {
            let upload = UploadController::new(ctx.clone());
            match action {
                DraftAction::Show => {
                    match upload.check_draft(Utc::now()) {
                        DraftCheck::Prompt(draft) => {
                            println!(
                                "{} {}",
                                ctx.t("upload-draft-found"),
                                format_datetime(&draft.saved_at)
                            );
                            println!("{} [{}]", draft.title, draft.game);
                            if !draft.parameters_json.trim().is_empty() {
                                println!("{}", draft.parameters_json);
                            }
                        }
                        DraftCheck::Expired => println!("{}", ctx.t("upload-draft-expired")),
                        DraftCheck::None => {}
                    }
                    true
                }
                DraftAction::Discard => {
                    upload.discard_draft();
                    true
                }
            }
        }
    }
}

async fn status(ctx: &AppContext) -> bool {
    let view = DashboardController::new(ctx.clone()).load(Utc::now()).await;
    println!("{}", StatusView(view.health).render(ctx.locale));
    println!("{}", ctx.t("home-recent"));
    if view.recent.is_empty() {
        println!("{}", EmptyState::NoData.render(ctx.locale));
    }
    for item in &view.recent {
        println!("{}\n", card(item, ctx.locale));
    }
    true
}

async fn run_search(search: &SearchController, page: usize, locale: Locale) -> bool {
    match search.search().await {
        SearchOutcome::Idle | SearchOutcome::Skipped => {
            println!("{}", EmptyState::SearchIdle.render(locale));
            true
        }
        SearchOutcome::Results { total, elapsed, .. } => {
            let outcome = search.go_to_page(page);
            println!(
                "{total} {} {} {} ms\n",
                t(locale, "search-results"),
                t(locale, "search-elapsed"),
                elapsed.as_millis()
            );
            println!(
                "{}",
                ListPage {
                    outcome: &outcome,
                    stats: None,
                }
                .render(locale)
            );
            true
        }
        SearchOutcome::Superseded => true,
        SearchOutcome::Failed => false,
    }
}

async fn open_route(ctx: &AppContext, route: Route) -> bool {
    match route.page {
        Page::Home => status(ctx).await,
        Page::Configurations => {
            let mut list = ConfigurationsController::new(ctx.clone());
            let outcome = list.load().await;
            let stats = list.stats(Utc::now());
            println!(
                "{}",
                ListPage {
                    outcome: &outcome,
                    stats: Some(stats),
                }
                .render(ctx.locale)
            );
            true
        }
        Page::Search => {
            let search = SearchController::from_route(ctx.clone(), &route);
            run_search(&search, 1, ctx.locale).await
        }
        Page::Detail => match route.id {
            Some(id) => show(ctx, &id, false, None).await,
            None => {
                ctx.notifier.error(ctx.t("detail-load-failed"));
                false
            }
        },
        Page::Upload => {
            let decision = AuthController::new(ctx.clone()).enforce(Page::Upload);
            decision == GuardDecision::Allow
        }
    }
}

async fn loaded_detail(ctx: &AppContext, id: &str) -> DetailController {
    let mut detail = DetailController::new(ctx.clone(), id);
    detail.load().await;
    detail
}

async fn show(ctx: &AppContext, id: &str, params: bool, export: Option<&Path>) -> bool {
    let mut detail = DetailController::new(ctx.clone(), id);
    detail.load().await;
    if detail.state().detail.is_none() {
        println!(
            "{}",
            DetailView {
                state: detail.state(),
                liked: false,
                share_link: detail.share_link(),
            }
            .render(ctx.locale)
        );
        return false;
    }

    if params {
        println!("{}", detail.parameters_json());
    } else {
        println!(
            "{}",
            DetailView {
                state: detail.state(),
                liked: detail.has_liked(),
                share_link: detail.share_link(),
            }
            .render(ctx.locale)
        );
    }

    if let Some(dir) = export {
        let Some((file_name, document)) = detail.export(Utc::now()) else {
            return false;
        };
        let path = dir.join(file_name);
        let written = serde_json::to_string_pretty(&document)
            .map_err(anyhow::Error::from)
            .and_then(|content| std::fs::write(&path, content).map_err(anyhow::Error::from));
        match written {
            Ok(()) => println!("{}", path.display()),
            Err(e) => {
                ctx.notifier.error(format!("{}: {e}", path.display()));
                return false;
            }
        }
    }
    true
}
