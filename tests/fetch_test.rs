//! Bulk body retrieval and yEnc decoding

mod common;

use common::{Fail, FakeConnector, GROUP, yenc_body};
use nntp_scanner::Server;

fn group_with_bodies(bodies: &[(&str, Vec<u8>)]) -> FakeConnector {
    let connector = FakeConnector::with_group(1, 100);
    {
        let mut news = connector.news();
        for (id, body) in bodies {
            news.bodies.insert(id.to_string(), body.clone());
        }
    }
    connector
}

#[tokio::test(start_paused = true)]
async fn test_bodies_are_concatenated_in_order() {
    let first: Vec<u8> = (0u8..=255).collect();
    let second = b"the rest of the file".to_vec();
    let connector = group_with_bodies(&[
        ("<a@fake>", yenc_body("file.bin", &first)),
        ("<b@fake>", yenc_body("file.bin", &second)),
    ]);
    let mut server = Server::with_connector(connector.clone());

    // Brackets are optional
    let data = server.get(GROUP, &["a@fake", "<b@fake>"]).await.unwrap();

    let mut expected = first.clone();
    expected.extend_from_slice(&second);
    assert_eq!(data, expected);

    let calls = connector.calls();
    assert_eq!(calls.bodies, vec!["<a@fake>".to_string(), "<b@fake>".to_string()]);
    assert_eq!(calls.selects, vec![GROUP.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_missing_article_fails_the_whole_fetch() {
    let connector = group_with_bodies(&[("<a@fake>", yenc_body("x", b"data"))]);
    let mut server = Server::with_connector(connector.clone());

    assert_eq!(server.get(GROUP, &["a@fake", "gone@fake", "a@fake"]).await, None);
    // Stops at the first failure
    assert_eq!(connector.calls().bodies.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_crc_mismatch_fails_the_fetch() {
    let mut body = yenc_body("x", b"payload");
    // Corrupt one data byte after the header line
    let data_start = body.iter().position(|&b| b == b'\n').unwrap() + 1;
    body[data_start] = body[data_start].wrapping_add(1);
    let connector = group_with_bodies(&[("<a@fake>", body)]);
    let mut server = Server::with_connector(connector);

    assert_eq!(server.get(GROUP, &["a@fake"]).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_non_yenc_body_fails_the_fetch() {
    let connector = group_with_bodies(&[("<a@fake>", b"just some text\r\n".to_vec())]);
    let mut server = Server::with_connector(connector);

    assert_eq!(server.get(GROUP, &["a@fake"]).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_empty_id_list_is_none() {
    let connector = group_with_bodies(&[]);
    let mut server = Server::with_connector(connector.clone());
    let ids: [&str; 0] = [];

    assert_eq!(server.get(GROUP, &ids).await, None);
    assert_eq!(connector.calls().connects, 0);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_group_is_none() {
    let connector = group_with_bodies(&[("<a@fake>", yenc_body("x", b"data"))]);
    let mut server = Server::with_connector(connector.clone());

    assert_eq!(server.get("alt.nowhere", &["a@fake"]).await, None);
    assert!(connector.calls().bodies.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transient_body_failure_recovers_for_next_call() {
    let connector = group_with_bodies(&[("<a@fake>", yenc_body("x", b"data"))]);
    connector.news().body_failures.push_back(Fail::Closed);
    let mut server = Server::with_connector(connector.clone());

    assert_eq!(server.get(GROUP, &["a@fake"]).await, None);
    assert_eq!(server.get(GROUP, &["a@fake"]).await, Some(b"data".to_vec()));

    let calls = connector.calls();
    assert_eq!(calls.connects, 2);
}
