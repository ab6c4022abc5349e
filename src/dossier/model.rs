// SPDX-License-Identifier: MPL-2.0
//! Normalized dossier records.

use std::collections::BTreeMap;
use std::fmt;

/// Identity of one dossier on the file service.
///
/// Two params comparing equal address the same dossier; any difference
/// demands a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DossierParams {
    pub dossier_key: String,
    pub dossier_package: String,
    pub dossier_code: String,
    pub dossier_mode: String,
    /// URI of a foreign file source offered for import.
    pub external_dossier: Option<String>,
}

impl DossierParams {
    /// Returns true when every path segment needed for a fetch is present.
    pub fn is_complete(&self) -> bool {
        [
            &self.dossier_key,
            &self.dossier_package,
            &self.dossier_code,
            &self.dossier_mode,
        ]
        .iter()
        .all(|part| !part.trim().is_empty())
    }
}

/// A named relation from a file to the URL serving one operation on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rel {
    Inline,
    Attachment,
    Context,
    Publish,
    Update,
    Container,
    PdfContainer,
    Rotation,
    Other(String),
}

impl Rel {
    pub fn parse(name: &str) -> Self {
        match name {
            "inline" => Rel::Inline,
            "attachment" => Rel::Attachment,
            "context" => Rel::Context,
            "publish" => Rel::Publish,
            "update" => Rel::Update,
            "container" => Rel::Container,
            "pdfContainer" => Rel::PdfContainer,
            "rotation" => Rel::Rotation,
            other => Rel::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Rel::Inline => "inline",
            Rel::Attachment => "attachment",
            Rel::Context => "context",
            Rel::Publish => "publish",
            Rel::Update => "update",
            Rel::Container => "container",
            Rel::PdfContainer => "pdfContainer",
            Rel::Rotation => "rotation",
            Rel::Other(name) => name,
        }
    }
}

impl fmt::Display for Rel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Links of one file, keyed by relation. A later link with the same rel
/// replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links(BTreeMap<Rel, String>);

impl Links {
    pub fn get(&self, rel: &Rel) -> Option<&str> {
        self.0.get(rel).map(String::as_str)
    }

    pub fn insert(&mut self, rel: Rel, href: impl Into<String>) {
        self.0.insert(rel, href.into());
    }

    pub fn contains(&self, rel: &Rel) -> bool {
        self.0.contains_key(rel)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rel, &str)> {
        self.0.iter().map(|(rel, href)| (rel, href.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(Rel, S)> for Links {
    fn from_iter<I: IntoIterator<Item = (Rel, S)>>(iter: I) -> Self {
        let mut links = Links::default();
        for (rel, href) in iter {
            links.insert(rel, href);
        }
        links
    }
}

/// How a file's content can be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileKind {
    Image,
    Pdf,
    #[default]
    Unknown,
}

impl FileKind {
    pub fn from_media_type(media_type: Option<&str>) -> Self {
        match media_type {
            Some(mt) if mt.starts_with("image/") => FileKind::Image,
            Some("application/pdf") => FileKind::Pdf,
            _ => FileKind::Unknown,
        }
    }

    /// Classifies an external listing entry by its file extension.
    ///
    /// Image extensions match case-insensitively; `pdf` only in lower case.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext {
            Some(ext)
                if ["jpeg", "jpg", "jpe", "png"]
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext)) =>
            {
                FileKind::Image
            }
            Some("pdf") => FileKind::Pdf,
            _ => FileKind::Unknown,
        }
    }
}

/// One logical file slot of a dossier, normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DossierFile {
    pub code: String,
    pub name: String,
    pub exists: bool,
    pub hidden: bool,
    pub readonly: bool,
    pub allowed_media_types: Vec<String>,
    /// `allowed_media_types` joined with `,`; `None` when no list was sent.
    pub accept: Option<String>,
    pub allowed_multiple: bool,
    pub media_type: Option<String>,
    pub last_modified: Option<String>,
    pub kind: FileKind,
    pub links: Links,
    pub file_id: String,
    pub can_save_rotation: bool,
    pub external: bool,
    /// Server-side location of an external listing entry.
    pub path: Option<String>,
}

impl DossierFile {
    pub fn identity(&self) -> FileIdentity {
        FileIdentity {
            file_id: self.file_id.clone(),
            last_modified: self.last_modified.clone(),
        }
    }

    pub fn link(&self, rel: &Rel) -> Option<&str> {
        self.links.get(rel)
    }

    /// True when the file is displayed page by page from a container index.
    pub fn has_container(&self) -> bool {
        self.links.contains(&Rel::PdfContainer)
    }

    /// True when either renderer can show this file.
    pub fn can_display(&self) -> bool {
        self.has_container() || self.kind == FileKind::Image
    }
}

/// A named collection of file slots, replaced wholesale after each fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dossier {
    pub name: String,
    pub dossier_file: Vec<DossierFile>,
}

impl Dossier {
    pub fn file(&self, code: &str) -> Option<&DossierFile> {
        self.dossier_file.iter().find(|file| file.code == code)
    }
}

/// Version identity of displayed content. Viewer state, container indexes
/// and page images are only valid for the identity they were produced for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub file_id: String,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub name: String,
}

/// Ordered page images of a container-backed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerIndex {
    /// Resolved URL the index was served from.
    pub url: String,
    pub pages: Vec<Page>,
}

/// A file picked, scanned or downloaded locally, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    /// Builds a local file guessing its media type from the name.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            name,
            media_type,
            bytes,
        }
    }
}
