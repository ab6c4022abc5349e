// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the dossier session, the
//! page viewer and the upload surfaces.
//!
//! The `App` owns the single dossier client and the single viewer. It turns
//! session and viewer decisions into tasks (fetches, uploads, rotation saves)
//! and feeds their results back as messages.

mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{ActionKind, Flags, Message};

use crate::config::{self, Config};
use crate::dossier::DossierClient;
use crate::i18n::fluent::I18n;
use crate::session::{DossierSession, FilesFilter};
use crate::transport::{HttpTransport, Transport, UnavailableTransport};
use crate::ui::notifications;
use crate::upload::{CommandScanner, ExternalPicker, Scanner, UploadForm};
use crate::viewer::listeners::ListenerRegistry;
use crate::viewer::{LoadedPage, Viewer};
use iced::{window, Element, Size, Subscription, Task, Theme};
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Page images kept in memory across file switches.
const PAGE_CACHE_PAGES: usize = 64;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    config: Config,
    client: DossierClient,
    /// Scanner bridge; `None` when no command is configured.
    scanner: Option<Arc<dyn Scanner>>,
    session: DossierSession,
    listeners: ListenerRegistry,
    viewer: Option<Viewer>,
    external: ExternalPicker,
    /// Last viewport size reported by the page scrollable.
    container_size: Option<Size>,
    page_cache: LruCache<String, LoadedPage>,
    info_open: bool,
    theme: Theme,
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("params", self.session.params())
            .field("viewer_pages", &self.viewer.as_ref().map(Viewer::page_count))
            .field("external_open", &self.external.is_open())
            .finish()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 800;
pub const WINDOW_DEFAULT_WIDTH: u32 = 1100;
pub const MIN_WINDOW_HEIGHT: u32 = 600;
pub const MIN_WINDOW_WIDTH: u32 = 800;

pub fn window_settings() -> window::Settings {
    window::Settings {
        size: Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(Size::new(MIN_WINDOW_WIDTH as f32, MIN_WINDOW_HEIGHT as f32)),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced requires an `Fn` boot closure; the flags are only consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_else(|| {
            log::warn!("boot called again, starting without flags");
            Flags::default()
        });
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

fn build_transport(config: &Config) -> Arc<dyn Transport> {
    match HttpTransport::new(&config.service) {
        Ok(transport) => Arc::new(transport),
        Err(error) => {
            log::error!("HTTP client unavailable: {error}");
            Arc::new(UnavailableTransport(error))
        }
    }
}

impl App {
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (mut config, config_warning) = config::load();
        if let Some(base_url) = flags.base_url {
            config.service.base_url = base_url;
        }
        let i18n = I18n::new(flags.lang, &config);

        let client = DossierClient::new(build_transport(&config), config.service.base_url.clone());
        let scanner = CommandScanner::from_config(&config.scanner)
            .map(|scanner| Arc::new(scanner) as Arc<dyn Scanner>);

        let filter = flags
            .filter
            .as_deref()
            .map(FilesFilter::from_codes)
            .unwrap_or_default();
        let mut session = DossierSession::new(flags.params, filter, flags.read_only);
        session.upload = UploadForm::new(config.scanner.color, config.scanner.dpi);

        let mut app = Self::from_parts(config, i18n, client, scanner, session);
        if let Some(key) = config_warning {
            app.notifications
                .push(notifications::Notification::warning(key));
        }

        let task = app.load_dossier();
        (app, task)
    }

    fn from_parts(
        config: Config,
        i18n: I18n,
        client: DossierClient,
        scanner: Option<Arc<dyn Scanner>>,
        session: DossierSession,
    ) -> Self {
        let cache_size = NonZeroUsize::new(PAGE_CACHE_PAGES).unwrap_or(NonZeroUsize::MIN);
        let theme = if config.general.theme_mode.is_dark() {
            Theme::Dark
        } else {
            Theme::Light
        };

        App {
            i18n,
            config,
            client,
            scanner,
            session,
            listeners: ListenerRegistry::new(),
            viewer: None,
            external: ExternalPicker::default(),
            container_size: None,
            page_cache: LruCache::new(cache_size),
            info_open: false,
            theme,
            notifications: notifications::Manager::new(),
        }
    }

    /// True when a scanner bridge is configured and its program was found.
    fn scanner_available(&self) -> bool {
        self.scanner
            .as_ref()
            .is_some_and(|scanner| scanner.is_available())
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        match self.session.dossier() {
            Some(dossier) if !dossier.name.is_empty() => format!("{} - {app_name}", dossier.name),
            _ => app_name,
        }
    }

    fn theme(&self) -> Theme {
        self.theme.clone()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_viewport_subscription(self.listeners.is_attached()),
            subscription::create_tick_subscription(self.notifications.has_notifications()),
        ])
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(self)
    }
}
