// SPDX-License-Identifier: MPL-2.0
//! Scanner bridge.
//!
//! Scanning is an injected capability. Without a configured bridge every
//! scan request fails with [`Error::CapabilityUnavailable`].

use crate::config::{ScannerConfig, MIN_SCAN_DPI};
use crate::dossier::LocalFile;
use crate::error::{Error, Result};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanColor {
    #[default]
    Color,
    #[serde(rename = "bw")]
    BlackWhite,
}

impl ScanColor {
    pub fn as_str(self) -> &'static str {
        match self {
            ScanColor::Color => "color",
            ScanColor::BlackWhite => "bw",
        }
    }
}

/// Parameters of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanParams {
    /// Name the bridge gives the scanned file.
    pub file_id: String,
    /// File slot the scan is for.
    pub input_id: String,
    pub color: ScanColor,
    pub dpi: u32,
}

impl ScanParams {
    /// Builds parameters for a slot; `dpi` below the minimum is raised to it.
    pub fn new(file_id: &str, color: ScanColor, dpi: u32) -> Self {
        Self {
            file_id: format!("bystroscan_{file_id}"),
            input_id: file_id.to_string(),
            color,
            dpi: dpi.max(MIN_SCAN_DPI),
        }
    }

    /// Arguments appended to the bridge command line.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--file-id".into(),
            self.file_id.clone(),
            "--input-id".into(),
            self.input_id.clone(),
            "--color".into(),
            self.color.as_str().into(),
            "--dpi".into(),
            self.dpi.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub file: LocalFile,
}

pub trait Scanner: Send + Sync {
    fn is_available(&self) -> bool;

    fn start(&self, params: ScanParams) -> BoxFuture<'static, Result<ScanResult>>;
}

/// Stand-in used when no bridge is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScanner;

impl Scanner for NoScanner {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&self, _params: ScanParams) -> BoxFuture<'static, Result<ScanResult>> {
        Box::pin(async { Err(unavailable()) })
    }
}

fn unavailable() -> Error {
    Error::CapabilityUnavailable("scanner bridge is not configured".into())
}

/// Runs an external program that scans to a file and prints the file's path
/// on its first line of standard output.
#[derive(Debug, Clone)]
pub struct CommandScanner {
    program: String,
    args: Vec<String>,
    /// Whether the program resolved to a file when the scanner was built.
    available: bool,
}

/// Looks `program` up as a path, or on `PATH` when it is a bare name.
fn locate(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .flat_map(|dir| {
            let plain = dir.join(program);
            let exe = dir.join(format!("{program}{}", std::env::consts::EXE_SUFFIX));
            [plain, exe]
        })
        .find(|candidate| candidate.is_file())
}

impl CommandScanner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        let available = match locate(&program) {
            Some(path) => {
                log::debug!("scanner bridge found at {}", path.display());
                true
            }
            None => {
                log::warn!("scanner bridge {program} was not found");
                false
            }
        };
        Self {
            program,
            args,
            available,
        }
    }

    /// Returns a scanner for the configured command, if any.
    pub fn from_config(config: &ScannerConfig) -> Option<Self> {
        config
            .command
            .as_deref()
            .map(str::trim)
            .filter(|command| !command.is_empty())
            .map(|command| Self::new(command, config.args.clone()))
    }
}

impl Scanner for CommandScanner {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&self, params: ScanParams) -> BoxFuture<'static, Result<ScanResult>> {
        let program = self.program.clone();
        let mut args = self.args.clone();
        args.extend(params.to_args());

        Box::pin(async move {
            log::info!("starting scan {} at {} dpi", params.file_id, params.dpi);
            let output = tokio::process::Command::new(&program)
                .args(&args)
                .output()
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => {
                        Error::CapabilityUnavailable(format!("{program}: {e}"))
                    }
                    _ => Error::Io(format!("Failed to run {program}: {e}")),
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(Error::Io(format!(
                    "{program} exited with {}: {}",
                    output.status,
                    stderr.trim()
                )));
            }

            let stdout = String::from_utf8_lossy(&output.stdout);
            let path = stdout
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(PathBuf::from)
                .ok_or_else(|| Error::Io(format!("{program} did not report a scanned file")))?;

            let bytes = tokio::fs::read(&path).await?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| params.file_id.clone());
            Ok(ScanResult {
                file: LocalFile::from_name(name, bytes),
            })
        })
    }
}
