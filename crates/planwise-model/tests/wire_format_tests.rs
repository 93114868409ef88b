// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Wire-format tests: a loopback HTTP/1.1 server streams a canned Gemini SSE
//! body in chunks, and the driver is pointed at it through `base_url`.
//!
//! No API key leaves the machine and no external network is touched.

use futures::StreamExt;
use planwise_config::ModelConfig;
use planwise_model::{from_config, CompletionRequest, Message, ResponseEvent};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

// ── Chunked SSE server ────────────────────────────────────────────────────────

/// Serve one request, answering with `pieces` as separate HTTP chunks.
async fn chunked_server_once(pieces: Vec<Vec<u8>>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            if let Some((k, v)) = trimmed.split_once(": ") {
                if k.eq_ignore_ascii_case("content-length") {
                    content_length = v.parse().unwrap_or(0);
                }
            }
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await.unwrap();

        let head = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n";
        write_half.write_all(head.as_bytes()).await.unwrap();
        for piece in pieces {
            write_half.write_all(format!("{:x}\r\n", piece.len()).as_bytes()).await.unwrap();
            write_half.write_all(&piece).await.unwrap();
            write_half.write_all(b"\r\n").await.unwrap();
            write_half.flush().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        }
        let _ = write_half.write_all(b"0\r\n\r\n").await;
    });

    port
}

fn google_at(port: u16) -> ModelConfig {
    ModelConfig {
        provider: "google".into(),
        api_key: Some("test-key".into()),
        base_url: Some(format!("http://127.0.0.1:{port}")),
        ..ModelConfig::default()
    }
}

async fn collect_text(port: u16) -> (String, Vec<ResponseEvent>) {
    let provider = from_config(&google_at(port)).unwrap();
    let req = CompletionRequest { messages: vec![Message::user("Prüfung")], ..Default::default() };
    let mut stream = provider.complete(req).await.unwrap();

    let mut text = String::new();
    let mut events = Vec::new();
    while let Some(ev) = stream.next().await {
        let ev = ev.unwrap();
        if let ResponseEvent::TextDelta(t) = &ev {
            text.push_str(t);
        }
        events.push(ev);
    }
    (text, events)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn multibyte_text_split_across_http_chunks_survives() {
    let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Prüfung\"}]},\"finishReason\":\"STOP\"}]}\r\n\r\n";
    // Cut right after the lead byte of 'ü'.
    let split = body.find('ü').unwrap() + 1;
    let bytes = body.as_bytes();
    let port = chunked_server_once(vec![bytes[..split].to_vec(), bytes[split..].to_vec()]).await;

    let (text, events) = collect_text(port).await;
    assert_eq!(text, "Prüfung");
    assert_eq!(events.last(), Some(&ResponseEvent::Done));
}

#[tokio::test]
async fn curly_quotes_across_several_events_are_preserved() {
    let first = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"“Bring ID” — \"}]}}]}\n\n";
    let second = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"試験\"}]},\"finishReason\":\"STOP\"}]}\n\n";
    let whole = format!("{first}{second}");
    let bytes = whole.as_bytes();
    // Three-byte characters cut in the middle on both sides of the event boundary.
    let a = whole.find('”').unwrap() + 2;
    let b = whole.find('試').unwrap() + 1;
    let port = chunked_server_once(vec![
        bytes[..a].to_vec(),
        bytes[a..b].to_vec(),
        bytes[b..].to_vec(),
    ])
    .await;

    let (text, _) = collect_text(port).await;
    assert_eq!(text, "“Bring ID” — 試験");
}
