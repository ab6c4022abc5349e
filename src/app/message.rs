// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::action::ActionState;
use crate::dossier::{ContainerIndex, DossierFetch, DossierParams, FileIdentity, LocalFile};
use crate::error::Error;
use crate::session::LoadTicket;
use crate::ui::{controls, external_picker, file_list, info_panel, notifications, upload_form};
use crate::upload::ScanResult;
use crate::viewer;
use std::time::Instant;

/// User actions that run through the action wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Upload,
    Import,
}

impl ActionKind {
    /// i18n key of the human-readable action name.
    pub fn description_key(self) -> &'static str {
        match self {
            ActionKind::Upload => "upload-action",
            ActionKind::Import => "import-action",
        }
    }

    /// i18n key of the notification shown when the action succeeds.
    pub fn success_key(self) -> &'static str {
        match self {
            ActionKind::Upload => "notification-upload-success",
            ActionKind::Import => "notification-import-success",
        }
    }
}

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    DossierLoaded {
        ticket: LoadTicket,
        fetch: DossierFetch,
    },
    ContainerLoaded {
        identity: FileIdentity,
        result: Result<ContainerIndex, Error>,
    },
    Viewer(viewer::Message),
    Controls(controls::Message),
    Files(file_list::Message),
    Upload(upload_form::Message),
    External(external_picker::Message),
    Info(info_panel::Message),
    Notification(notifications::NotificationMessage),
    FilesPicked(Vec<LocalFile>),
    ScanFinished(Result<ScanResult, Error>),
    /// Progress of the running user action.
    ActionState(ActionState),
    ActionFinished {
        kind: ActionKind,
        /// Code of the file the action targeted, reselected after the refresh.
        code: String,
        /// Load issued for the refresh; abandoned when the action fails.
        ticket: LoadTicket,
        error: Option<String>,
    },
    Tick(Instant),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `ru`, `en-US`).
    pub lang: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `DOSSIER_LENS_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Overrides `[service] base_url` from the config file.
    pub base_url: Option<String>,
    pub params: DossierParams,
    pub read_only: bool,
    /// Comma-separated codes of the files to show.
    pub filter: Option<String>,
}
