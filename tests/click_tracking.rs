mod common;

use std::collections::HashSet;
use std::sync::Arc;

use tinylink::application::services::LinkService;
use tinylink::domain::repositories::UrlRepository;
use tinylink::infrastructure::persistence::MemoryUrlRepository;
use tinylink::utils::id_generator::IdGenerator;

#[tokio::test]
async fn test_shorten_resolve_click_stats_scenario() {
    let (state, _worker, _repo) = common::create_running_state();

    let first = state
        .link_service
        .find_or_create("http://example.com")
        .await
        .unwrap();
    assert!(first.is_new);
    assert_eq!(first.link.target, "http://example.com");

    let second = state
        .link_service
        .find_or_create("http://example.com")
        .await
        .unwrap();
    assert!(!second.is_new);
    assert_eq!(second.link.id, first.link.id);

    let resolved = state
        .link_service
        .resolve(&first.link.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.target, "http://example.com");

    for _ in 0..3 {
        state.click_sender.record(first.link.id.clone());
    }
    assert!(state.click_sender.flush().await);

    let stats = state.stats_service.get_stats(&first.link.id).await.unwrap();
    assert_eq!(stats.clicks, 3);
    assert_eq!(stats.link, first.link);
}

#[tokio::test]
async fn test_unknown_identifier_is_absent_not_error() {
    let (state, _worker, _repo) = common::create_running_state();

    assert!(state.link_service.resolve("doesnotexist").await.unwrap().is_none());
    assert!(
        state
            .stats_service
            .stats_by_id("doesnotexist")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_validation_boundary() {
    let (state, _worker, repo) = common::create_running_state();

    assert!(state.link_service.find_or_create("not a url").await.is_err());
    assert!(
        state
            .link_service
            .find_or_create("http://example.com/path")
            .await
            .is_ok()
    );
    assert_eq!(repo.count_links().await.unwrap(), 1);
}

#[tokio::test]
async fn test_round_trip_many_targets() {
    let (state, _worker, _repo) = common::create_running_state();

    for i in 0..100 {
        let target = format!("https://example.com/page/{i}?q={i}");
        let shortened = state.link_service.find_or_create(&target).await.unwrap();
        let resolved = state
            .link_service
            .resolve(&shortened.link.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.target, target);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_click_counts_match_submissions_across_producers() {
    let (state, worker, repo) = common::create_running_state();

    let ids = ["aaaaa", "bbbbb", "ccccc"];
    let mut handles = Vec::new();

    for producer in 0..6 {
        let sender = state.click_sender.clone();
        handles.push(tokio::spawn(async move {
            for n in 0..100 {
                // Each producer spreads its clicks unevenly over the ids.
                sender.record(ids[(producer + n) % ids.len()]);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    drop(state);
    let applied = worker.join().await.unwrap();

    assert_eq!(applied, 600);
    let total: u64 = [
        repo.fetch_click_stats("aaaaa").await.unwrap(),
        repo.fetch_click_stats("bbbbb").await.unwrap(),
        repo.fetch_click_stats("ccccc").await.unwrap(),
    ]
    .iter()
    .sum();
    assert_eq!(total, 600);
    assert_eq!(repo.fetch_click_stats("aaaaa").await.unwrap(), 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_shortening_yields_one_identifier() {
    let repo = Arc::new(MemoryUrlRepository::new());
    let service = Arc::new(LinkService::new(repo.clone(), IdGenerator::default()));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .find_or_create("https://example.com/popular")
                .await
                .unwrap()
        }));
    }

    let mut ids = HashSet::new();
    let mut created = 0;
    for handle in handles {
        let shortened = handle.await.unwrap();
        if shortened.is_new {
            created += 1;
        }
        ids.insert(shortened.link.id);
    }

    assert_eq!(ids.len(), 1);
    assert_eq!(created, 1);
    assert_eq!(repo.count_links().await.unwrap(), 1);
}

#[tokio::test]
async fn test_seeded_generators_never_reuse_stored_ids() {
    let repo = Arc::new(MemoryUrlRepository::new());

    // Same seed: the second service's first candidate collides with the
    // first service's link and has to be retried.
    let a = LinkService::new(repo.clone(), IdGenerator::with_seed(99, 5, 10));
    let b = LinkService::new(repo.clone(), IdGenerator::with_seed(99, 5, 10));

    let first = a.find_or_create("https://a.example").await.unwrap();
    let second = b.find_or_create("https://b.example").await.unwrap();

    assert_ne!(first.link.id, second.link.id);
    assert_eq!(repo.count_links().await.unwrap(), 2);
}
