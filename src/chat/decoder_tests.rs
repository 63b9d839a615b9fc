use bytes::Bytes;
use futures::stream::StreamExt;
use proptest::prelude::*;

use super::{buffered_text_stream, decode_text_stream, Utf8StreamDecoder};
use crate::error::ChatError;

#[test]
fn test_decoder_holds_back_split_multibyte_char() {
    let text = "Dose: 5 µg";
    let bytes = text.as_bytes();
    let split = text.find('µ').unwrap() + 1;

    let mut decoder = Utf8StreamDecoder::new();
    let first = decoder.decode(&bytes[..split]);
    assert_eq!(first, "Dose: 5 ");
    assert!(decoder.has_pending());

    let second = decoder.decode(&bytes[split..]);
    assert_eq!(second, "µg");
    assert!(!decoder.has_pending());
    assert_eq!(decoder.finish(), "");
}

#[test]
fn test_decoder_handles_four_byte_char_one_byte_at_a_time() {
    let text = "ok 🩺";
    let mut decoder = Utf8StreamDecoder::new();
    let mut out = String::new();
    for byte in text.as_bytes() {
        out.push_str(&decoder.decode(&[*byte]));
    }
    out.push_str(&decoder.finish());
    assert_eq!(out, text);
}

#[test]
fn test_decoder_replaces_invalid_bytes_and_continues() {
    let mut decoder = Utf8StreamDecoder::new();
    let out = decoder.decode(b"a\xffb");
    assert_eq!(out, "a\u{FFFD}b");
    assert!(!decoder.has_pending());
}

#[test]
fn test_finish_flushes_truncated_sequence() {
    let mut decoder = Utf8StreamDecoder::new();
    let snowman = "☃".as_bytes();
    assert_eq!(decoder.decode(&snowman[..2]), "");
    assert_eq!(decoder.finish(), "\u{FFFD}");
    assert!(!decoder.has_pending());
}

#[tokio::test]
async fn test_decode_text_stream_skips_empty_fragments() {
    let text = "Métformin";
    let bytes = text.as_bytes();
    let split = text.find('é').unwrap() + 1;
    let chunks: Vec<Result<Bytes, ChatError>> = vec![
        Ok(Bytes::from(bytes[..1].to_vec())),
        Ok(Bytes::from(bytes[1..split].to_vec())),
        Ok(Bytes::new()),
        Ok(Bytes::from(bytes[split..].to_vec())),
    ];

    let results = collect(decode_text_stream(futures::stream::iter(chunks))).await;

    let fragments: Vec<String> = results.into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(fragments, vec!["M".to_string(), "étformin".to_string()]);
}

#[tokio::test]
async fn test_decode_text_stream_flushes_pending_bytes_at_end() {
    let snowman = "☃".as_bytes();
    let chunks: Vec<Result<Bytes, ChatError>> = vec![
        Ok(Bytes::from_static(b"cold ")),
        Ok(Bytes::from(snowman[..2].to_vec())),
    ];

    let results = collect(decode_text_stream(futures::stream::iter(chunks))).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), "cold ");
    assert_eq!(results[1].as_ref().unwrap(), "\u{FFFD}");
}

#[tokio::test]
async fn test_decode_text_stream_stops_after_error() {
    let chunks: Vec<Result<Bytes, ChatError>> = vec![
        Ok(Bytes::from_static(b"partial")),
        Err(ChatError::HttpError("connection reset".into())),
        Ok(Bytes::from_static(b"never seen")),
    ];

    let results = collect(decode_text_stream(futures::stream::iter(chunks))).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), "partial");
    assert_eq!(results[1].as_ref().unwrap_err().message(), "connection reset");
}

#[tokio::test]
async fn test_decode_text_stream_over_reqwest_body() {
    let text = "Metformin is a biguanide ✨";
    let bytes = text.as_bytes().to_vec();
    let split = text.find('✨').unwrap() + 2;
    let chunks: Vec<Result<Bytes, reqwest::Error>> = vec![
        Ok(Bytes::from(bytes[..split].to_vec())),
        Ok(Bytes::from(bytes[split..].to_vec())),
    ];

    let response = create_mock_response(chunks);
    let results = collect(decode_text_stream(response.bytes_stream())).await;

    let joined: String = results.into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(joined, text);
}

#[tokio::test]
async fn test_buffered_text_stream_yields_single_fragment() {
    let results = collect(buffered_text_stream("whole answer".into())).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_ref().unwrap(), "whole answer");

    let results = collect(buffered_text_stream(String::new())).await;
    assert!(results.is_empty());
}

proptest! {
    #[test]
    fn decoding_split_input_reproduces_text(text in "\\PC{0,40}", cuts in proptest::collection::vec(any::<usize>(), 0..6)) {
        let bytes = text.as_bytes();
        let mut points: Vec<usize> = cuts
            .into_iter()
            .map(|c| if bytes.is_empty() { 0 } else { c % (bytes.len() + 1) })
            .collect();
        points.sort_unstable();

        let mut decoder = Utf8StreamDecoder::new();
        let mut out = String::new();
        let mut start = 0;
        for point in points {
            out.push_str(&decoder.decode(&bytes[start..point]));
            start = point;
        }
        out.push_str(&decoder.decode(&bytes[start..]));
        out.push_str(&decoder.finish());

        prop_assert_eq!(out, text);
    }
}

async fn collect(
    mut stream: super::TextStream,
) -> Vec<Result<String, ChatError>> {
    let mut results = Vec::new();
    while let Some(result) = stream.next().await {
        results.push(result);
    }
    results
}

fn create_mock_response(chunks: Vec<Result<Bytes, reqwest::Error>>) -> reqwest::Response {
    use http_body_util::StreamBody;
    use reqwest::Body;

    let frame_stream = futures::stream::iter(
        chunks
            .into_iter()
            .map(|chunk| chunk.map(hyper::body::Frame::data)),
    );

    let body = StreamBody::new(frame_stream);
    let body = Body::wrap(body);

    let http_response = http::Response::builder().status(200).body(body).unwrap();

    http_response.into()
}
