// SPDX-License-Identifier: MPL-2.0
mod common;

use common::{params, RecordingTransport, BASE};
use dossier_lens::action::{ActionState, ActionWrapper};
use dossier_lens::dossier::{DossierClient, ImportRequest, LocalFile, UploadRequest};
use dossier_lens::error::Error;
use dossier_lens::session::{DossierSession, FileView, FilesFilter};
use dossier_lens::transport::{Body, Response};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn dossier_json() -> serde_json::Value {
    json!({
        "name": "Case 42",
        "dossierFile": [
            {
                "code": "PASSPORT",
                "name": "Passport",
                "exists": true,
                "mediaType": "application/pdf",
                "lastModified": "2024-03-01T09:30:00Z",
                "link": [
                    {"rel": "container", "href": "https://public/x/dossiers/K/P/C/PASSPORT/container"},
                    {"rel": "publish", "href": "https://public/x/dossiers/K/P/C/PASSPORT/publish"},
                    {"rel": "update", "href": "https://public/x/dossiers/K/P/C/PASSPORT/update"}
                ]
            },
            {
                "code": "PHOTO",
                "name": "Photo",
                "exists": false,
                "link": [
                    {"rel": "publish", "href": "https://public/x/dossiers/K/P/C/PHOTO/publish"}
                ]
            }
        ]
    })
}

#[tokio::test]
async fn paged_file_resolves_its_pages_through_the_container() {
    let transport = Arc::new(
        RecordingTransport::new()
            .route("/container?path=index.json", Response::json(json!([
                {"name": "page-1.png"},
                {"name": "page-2.png"}
            ])))
            .route("/dossiers/K/P/C/edit", Response::json(dossier_json())),
    );
    let client = DossierClient::new(transport.clone(), BASE);
    let mut session = DossierSession::new(params(), FilesFilter::All, false);

    let ticket = session.begin_load();
    let fetch = client.fetch_dossier(ticket.params()).await;
    assert!(session.apply_load(&ticket, fetch));

    let file = session.selected_file().cloned().expect("first file selected");
    assert_eq!(file.code, "PASSPORT");
    assert!(matches!(
        session.view_of(&client, &file),
        FileView::Paged { .. }
    ));

    session.begin_container(file.identity());
    let index = client.fetch_container(&file).await;
    assert!(session.apply_container(&file.identity(), index));

    let sources = session.page_sources(&file).expect("index loaded");
    assert_eq!(sources.len(), 2);
    assert!(sources[0].starts_with("http://svc/api/dossiers/K/P/C/PASSPORT/container"));
    assert!(sources[0].contains("page-1.png"));
    assert!(sources[0].contains("_nocache=20240301093000"));
}

#[tokio::test]
async fn missing_file_is_reported_as_missing() {
    let transport = Arc::new(
        RecordingTransport::new().route("/dossiers/K/P/C/edit", Response::json(dossier_json())),
    );
    let client = DossierClient::new(transport, BASE);
    let mut session = DossierSession::new(params(), FilesFilter::Code("PHOTO".into()), false);

    let ticket = session.begin_load();
    let fetch = client.fetch_dossier(ticket.params()).await;
    session.apply_load(&ticket, fetch);

    let file = session.selected_file().cloned().expect("filtered file");
    assert_eq!(file.code, "PHOTO");
    assert_eq!(session.view_of(&client, &file), FileView::Missing);
}

#[tokio::test]
async fn upload_action_refreshes_before_clearing_loading() {
    let transport = Arc::new(
        RecordingTransport::new()
            .route("/PASSPORT/publish", Response::default())
            .route("/dossiers/K/P/C/edit", Response::json(dossier_json())),
    );
    let client = DossierClient::new(transport.clone(), BASE);
    let file = client
        .fetch_dossier(&params())
        .await
        .dossier
        .expect("dossier")
        .dossier_file
        .remove(0);

    let states = Arc::new(Mutex::new(Vec::<ActionState>::new()));
    let sink_states = Arc::clone(&states);
    let sink = move |state: ActionState| sink_states.lock().unwrap().push(state);

    let refresh_client = client.clone();
    let refresh_transport = Arc::clone(&transport);
    let refreshed_before_done = Arc::new(Mutex::new(false));
    let refresh_flag = Arc::clone(&refreshed_before_done);
    let wrapper = ActionWrapper::new("upload-action").with_refresh(move || {
        let client = refresh_client.clone();
        let transport = Arc::clone(&refresh_transport);
        let flag = Arc::clone(&refresh_flag);
        async move {
            client.fetch_dossier(&params()).await;
            *flag.lock().unwrap() = transport.count("/dossiers/K/P/C/edit") == 2;
        }
    });

    let request = UploadRequest {
        file,
        files: vec![LocalFile::from_name("scan.pdf", b"%PDF-1.4".to_vec())],
        merge: false,
    };
    let response = wrapper
        .run(&sink, client.upload_files(request))
        .await;

    assert!(!response.is_err());
    assert!(*refreshed_before_done.lock().unwrap());
    let states = states.lock().unwrap();
    assert_eq!(states.len(), 2);
    assert!(states[0].loading);
    assert!(!states[1].loading);
    assert!(states[1].error.is_none());
    assert_eq!(
        transport.urls()[1],
        "http://svc/api/dossiers/K/P/C/PASSPORT/publish"
    );
}

#[tokio::test]
async fn failed_import_never_uploads() {
    let good = Response {
        value: Some(Body::Bytes(vec![1, 2, 3])),
        content_type: Some("image/png".into()),
        ..Response::default()
    };
    let transport = Arc::new(
        RecordingTransport::new()
            .route("/ext/a.png", good)
            .route("/dossiers/K/P/C/edit", Response::json(dossier_json())),
    );
    let client = DossierClient::new(transport.clone(), BASE);
    let file = client
        .fetch_dossier(&params())
        .await
        .dossier
        .expect("dossier")
        .dossier_file
        .remove(0);

    let states = Arc::new(Mutex::new(Vec::<ActionState>::new()));
    let sink_states = Arc::clone(&states);
    let sink = move |state: ActionState| sink_states.lock().unwrap().push(state);
    let wrapper = ActionWrapper::new("import-action");

    let response = wrapper
        .run(
            &sink,
            client.import_from_urls(ImportRequest {
                file,
                urls: vec![
                    "http://files/ext/a.png".into(),
                    "http://files/ext/missing.png".into(),
                ],
                merge: false,
            }),
        )
        .await;

    assert!(matches!(response.error, Some(Error::HttpStatus { status: 404, .. })));
    assert_eq!(transport.count("/publish"), 0);
    let last = states.lock().unwrap().last().cloned().expect("final state");
    assert!(!last.loading);
    assert!(last.error.is_some_and(|error| error.contains("missing.png")));
}

#[tokio::test]
async fn reload_with_a_stale_ticket_keeps_the_newer_snapshot() {
    let transport = Arc::new(
        RecordingTransport::new().route("/dossiers/K/P/C/edit", Response::json(dossier_json())),
    );
    let client = DossierClient::new(transport, BASE);
    let mut session = DossierSession::new(params(), FilesFilter::All, false);

    let stale = session.begin_load();
    let current = session.begin_load();
    let fetch = client.fetch_dossier(current.params()).await;
    assert!(session.apply_load(&current, fetch));

    assert!(!session.apply_load(&stale, Default::default()));
    assert_eq!(session.dossier().map(|d| d.name.as_str()), Some("Case 42"));
}
