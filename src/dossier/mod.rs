// SPDX-License-Identifier: MPL-2.0
//! Dossier records and the client that fetches and updates them.

pub mod client;
pub mod model;
pub mod normalize;
pub mod url;

pub use client::{
    ContextPayload, DossierClient, DossierFetch, ExternalListing, ImportRequest, UploadRequest,
};
pub use model::{
    ContainerIndex, Dossier, DossierFile, DossierParams, FileIdentity, FileKind, Links, LocalFile,
    Page, Rel,
};
