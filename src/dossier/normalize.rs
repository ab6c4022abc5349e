// SPDX-License-Identifier: MPL-2.0
//! Conversion of service JSON into normalized records.

use super::model::{
    ContainerIndex, Dossier, DossierFile, DossierParams, FileKind, Links, Page, Rel,
};
use super::url::encode_component;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDossier {
    #[serde(default)]
    name: String,
    #[serde(default)]
    dossier_file: Vec<RawFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFile {
    code: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    exists: bool,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    readonly: bool,
    #[serde(default)]
    allowed_media_types: Option<Vec<String>>,
    #[serde(default)]
    allowed_multiple: bool,
    #[serde(default)]
    media_type: Option<String>,
    #[serde(default, deserialize_with = "version_marker")]
    last_modified: Option<String>,
    #[serde(default)]
    link: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    rel: String,
    href: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExternalFile {
    name: String,
    path: String,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default, deserialize_with = "version_marker")]
    last_modified: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    name: String,
}

/// Accepts a version marker sent either as a string or as a number.
fn version_marker<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Deterministic id of a file slot within a dossier identity.
pub fn file_id(params: &DossierParams, file_code: &str) -> String {
    format!(
        "file_{}_{}_{}_{}",
        params.dossier_key, params.dossier_package, params.dossier_code, file_code
    )
}

fn normalize_file(params: &DossierParams, raw: RawFile) -> DossierFile {
    let kind = FileKind::from_media_type(raw.media_type.as_deref());
    let mut links: Links = raw
        .link
        .into_iter()
        .map(|link| (Rel::parse(&link.rel), link.href))
        .collect();

    if kind == FileKind::Pdf {
        if let Some(container) = links.get(&Rel::Container).map(str::to_owned) {
            links.insert(Rel::PdfContainer, format!("{container}?path=index.json"));
        }
    }

    let accept = raw.allowed_media_types.as_ref().map(|types| types.join(","));

    DossierFile {
        file_id: file_id(params, &raw.code),
        code: raw.code,
        name: raw.name,
        exists: raw.exists,
        hidden: raw.hidden,
        readonly: raw.readonly,
        allowed_media_types: raw.allowed_media_types.unwrap_or_default(),
        accept,
        allowed_multiple: raw.allowed_multiple,
        media_type: raw.media_type,
        last_modified: raw.last_modified,
        kind,
        links,
        can_save_rotation: true,
        external: false,
        path: None,
    }
}

/// Normalizes a dossier document for the given identity.
pub fn dossier(params: &DossierParams, value: Value) -> Result<Dossier> {
    let raw: RawDossier = serde_json::from_value(value)?;
    Ok(Dossier {
        name: raw.name,
        dossier_file: raw
            .dossier_file
            .into_iter()
            .map(|file| normalize_file(params, file))
            .collect(),
    })
}

fn external_file(index_url: &str, raw: RawExternalFile) -> DossierFile {
    let kind = FileKind::from_extension(raw.ext.as_deref());
    let mut links = Links::default();
    links.insert(
        Rel::Attachment,
        format!("{}&contentDisposition=attachment", raw.path),
    );
    links.insert(Rel::Inline, format!("{}&contentDisposition=inline", raw.path));

    if kind == FileKind::Pdf {
        let container = format!("{index_url}/{}", encode_component(&raw.name));
        links.insert(Rel::PdfContainer, format!("{container}/index.json"));
        links.insert(Rel::Container, container);
    }

    DossierFile {
        code: raw.name.clone(),
        file_id: raw.name.clone(),
        name: raw.name,
        exists: true,
        last_modified: raw.last_modified,
        kind,
        links,
        external: true,
        path: Some(raw.path),
        ..DossierFile::default()
    }
}

/// Maps an external listing into files, `index_url` being the final URL the
/// listing was served from.
pub fn external_files(index_url: &str, value: Value) -> Result<Vec<DossierFile>> {
    let raw: Vec<RawExternalFile> = serde_json::from_value(value)?;
    Ok(raw
        .into_iter()
        .map(|file| external_file(index_url, file))
        .collect())
}

/// Builds a container index from its JSON page list.
pub fn container_index(url: impl Into<String>, value: Value) -> Result<ContainerIndex> {
    let pages: Vec<RawPage> = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        other => {
            return Err(Error::Parse(format!(
                "container index is not a list: {other}"
            )))
        }
    };
    Ok(ContainerIndex {
        url: url.into(),
        pages: pages
            .into_iter()
            .map(|page| Page { name: page.name })
            .collect(),
    })
}
