//! End-to-end fetch and extraction against a local HTTP server.

mod common;

use cfgfetch_core::client::{Client, ClientMode};
use cfgfetch_core::config::CfgfetchConfig;
use cfgfetch_core::{ExtractGetter, GetError, Getter};
use common::yaml_server::{self, Route};
use url::Url;

const DEPLOY: &str = "\
spec:
  replicas: 3
  containers:
    - name: web
      image: nginx
    - name: sidecar
      image: envoy
";

fn server() -> yaml_server::YamlServer {
    yaml_server::start(vec![
        ("/deploy.yaml", Route::ok(DEPLOY)),
        ("/plain.txt", Route::ok("Hello\n")),
    ])
}

#[test]
fn extract_scalar_over_http() {
    let srv = server();
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("replicas.yaml");
    let url = Url::parse(&srv.url("deploy.yaml?xpath=spec.replicas")).unwrap();

    ExtractGetter::new().get_file(&dst, &url).unwrap();

    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "3\n");
    assert_eq!(srv.targets(), vec!["/deploy.yaml".to_string()]);
}

#[test]
fn client_extracts_list_with_newkey() {
    let srv = server();
    let dir = tempfile::tempdir().unwrap();
    let src = srv.url("deploy.yaml?xpath=$.spec.containers[*].image&type=list&newkey=images&rev=7");

    let mut client = Client::with_default_getters(src, "images.yaml", &CfgfetchConfig::default());
    client.pwd = Some(dir.path().to_path_buf());
    client.get().unwrap();

    let out = std::fs::read_to_string(dir.path().join("images.yaml")).unwrap();
    assert_eq!(out, "images:\n  - nginx\n  - envoy\n");
    assert_eq!(srv.targets(), vec!["/deploy.yaml?rev=7".to_string()]);
}

#[test]
fn plain_file_round_trip() {
    let srv = server();
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("plain.txt");

    let cfg = CfgfetchConfig::default();
    let mut client = Client::with_default_getters(srv.url("plain.txt"), &dst, &cfg);
    client.mode = ClientMode::File;
    client.get().unwrap();

    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "Hello\n");
}

#[test]
fn missing_resource_is_http_error() {
    let srv = server();
    let dir = tempfile::tempdir().unwrap();
    let url = Url::parse(&srv.url("nope.yaml?xpath=spec")).unwrap();

    match ExtractGetter::new().get_file(&dir.path().join("x"), &url) {
        Err(GetError::Http { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected 404, got {:?}", other),
    }
}

#[test]
fn directory_fetch_saves_named_file() {
    let srv = server();
    let dir = tempfile::tempdir().unwrap();
    let url = Url::parse(&srv.url("deploy.yaml")).unwrap();

    ExtractGetter::new().get(dir.path(), &url).unwrap();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("deploy.yaml")).unwrap(),
        DEPLOY
    );
}
