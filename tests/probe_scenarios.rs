mod common;

use common::{PanicClient, StubClient};
use m3u_curator::config::ProbeConfig;
use m3u_curator::models::{ChannelRecord, ProbeStatus};
use m3u_curator::services::StreamProber;
use rstest::rstest;
use std::sync::atomic::Ordering;

fn records_for(endpoints: &[&str]) -> Vec<ChannelRecord> {
    endpoints
        .iter()
        .enumerate()
        .map(|(i, endpoint)| ChannelRecord::new(format!("Channel {i}"), *endpoint).unwrap())
        .collect()
}

#[tokio::test]
async fn test_results_reindexed_by_input_position() {
    let records = records_for(&["http://ok.example/x", "not-a-url", "http://timeout.example/y"]);
    let prober = StreamProber::new(StubClient::by_host(), &ProbeConfig::default());

    let mut results = prober.probe_all(&records).await;
    assert_eq!(results.len(), records.len());
    results.sort_by_key(|r| r.index);

    let statuses: Vec<_> = results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![ProbeStatus::Working, ProbeStatus::Invalid, ProbeStatus::Failed]
    );
    assert_eq!(results[0].http_status, Some(200));
    assert_eq!(results[1].error_detail.as_deref(), Some("Invalid URL format"));
    assert_eq!(results[2].error_detail.as_deref(), Some("Timeout"));

    for (result, record) in results.iter().zip(&records) {
        assert_eq!(result.record.endpoint(), record.endpoint());
    }
}

#[rstest]
#[case("https'://https://x.com/y")]
#[case("http://http://x.com/y")]
#[case("httpsG://x.com/y")]
#[case("not-a-url")]
#[case("http://")]
#[tokio::test]
async fn test_invalid_endpoints_never_reach_network(#[case] endpoint: &str) {
    let records = records_for(&[endpoint]);
    let prober = StreamProber::new(PanicClient, &ProbeConfig::default());

    let results = prober.probe_all(&records).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, ProbeStatus::Invalid);
}

#[tokio::test]
async fn test_at_most_two_requests_per_record() {
    let records = records_for(&[
        "http://ok.example/a",
        "http://dead.example/b",
        "http://headless.example/c",
        "http://refused.example/d",
        "httpsG://bad.example/e",
    ]);
    let client = StubClient::by_host();
    let calls = client.call_counter();
    let config = ProbeConfig {
        concurrency: 2,
        ..ProbeConfig::default()
    };

    let mut results = StreamProber::new(client, &config).probe_all(&records).await;
    results.sort_by_key(|r| r.index);

    // ok: HEAD, dead: HEAD+GET, headless: HEAD+GET, refused: HEAD, bad: none
    assert_eq!(calls.load(Ordering::SeqCst), 6);

    assert_eq!(results[1].status, ProbeStatus::Failed);
    assert_eq!(results[1].error_detail.as_deref(), Some("HTTP 404"));
    assert_eq!(results[2].status, ProbeStatus::Working);
    assert_eq!(results[3].error_detail.as_deref(), Some("Connection Error"));
    assert_eq!(
        results[4].error_detail.as_deref(),
        Some("Malformed URL (duplicate protocol or typo)")
    );
}
