//! Load testing for the redirect service.

use std::time::{Duration, Instant};

use reqwest::StatusCode;

mod common;

use common::{client, location, TestServer};

#[tokio::test]
async fn test_load_performance() {
    let server = TestServer::start().await;
    server.seed(&[
        ("docs", "https://example.com/docs"),
        ("team/%s", "https://chat.example.com/%s"),
    ]);

    let concurrency = 20;
    let requests_per_task = 50;
    let total_requests = concurrency * requests_per_task;

    let client = client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task_id in 0..concurrency {
        let client = client.clone();
        let url = server.url(&format!("/team/t{task_id}"));
        let expected = format!("https://chat.example.com/t{task_id}");
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for _ in 0..requests_per_task {
                let req_start = Instant::now();
                if let Ok(res) = client.get(&url).send().await {
                    if res.status() == StatusCode::TEMPORARY_REDIRECT {
                        assert_eq!(location(&res), expected);
                        latencies.push(req_start.elapsed());
                    }
                }
            }
            latencies
        }));
    }

    let mut all_latencies: Vec<Duration> = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }

    let duration = start.elapsed();
    let rps = total_requests as f64 / duration.as_secs_f64();

    assert_eq!(all_latencies.len(), total_requests, "every request should redirect");

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", rps);
    println!("P50 Latency:    {:?}", p50);
    println!("P99 Latency:    {:?}", p99);
    println!("-------------------------\n");
}

#[tokio::test]
async fn test_reads_during_writes_see_whole_values() {
    let server = TestServer::start().await;
    server.seed(&[("docs", "https://example.com/v0")]);

    let registry = server.registry.clone();
    let writer = tokio::task::spawn_blocking(move || {
        for version in 1..=50 {
            registry
                .put(shortlinks::RedirectEntry::new(
                    "docs",
                    format!("https://example.com/v{version}"),
                ))
                .unwrap();
        }
    });

    let client = client();
    let mut seen = Vec::new();
    for _ in 0..100 {
        let res = client.get(server.url("/docs")).send().await.unwrap();
        seen.push(location(&res).to_owned());
    }
    writer.await.unwrap();

    for destination in seen {
        let version: u32 = destination
            .strip_prefix("https://example.com/v")
            .and_then(|v| v.parse().ok())
            .expect("torn or foreign destination");
        assert!(version <= 50);
    }
}
