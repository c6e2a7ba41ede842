use chrono::Utc;
use std::sync::Arc;
use tinylink::domain::entities::Link;
use tinylink::domain::repositories::UrlRepository;
use tinylink::infrastructure::persistence::MemoryUrlRepository;

fn link(id: &str, target: &str) -> Link {
    Link::new(id.to_string(), target.to_string(), Utc::now())
}

#[tokio::test]
async fn test_save_and_find_by_id() {
    let repo = MemoryUrlRepository::new();
    let saved = link("ab12_", "http://example.com");

    repo.save(saved.clone()).await.unwrap();

    assert!(repo.id_exists("ab12_").await.unwrap());
    assert_eq!(repo.find_by_id("ab12_").await.unwrap(), Some(saved));
}

#[tokio::test]
async fn test_find_by_id_not_found() {
    let repo = MemoryUrlRepository::new();

    assert!(!repo.id_exists("missing").await.unwrap());
    assert!(repo.find_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_by_target() {
    let repo = MemoryUrlRepository::new();
    repo.save(link("xyz78", "https://unique-url.com")).await.unwrap();

    let found = repo.find_by_target("https://unique-url.com").await.unwrap();
    assert_eq!(found.unwrap().id, "xyz78");

    assert!(
        repo.find_by_target("https://other-url.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_find_by_target_is_exact_match() {
    let repo = MemoryUrlRepository::new();
    repo.save(link("a1", "http://example.com")).await.unwrap();

    assert!(repo.find_by_target("http://example.com/").await.unwrap().is_none());
    assert!(repo.find_by_target("HTTP://EXAMPLE.COM").await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_if_target_absent_inserts_once() {
    let repo = MemoryUrlRepository::new();

    let first = repo
        .save_if_target_absent(link("first", "https://example.com"))
        .await
        .unwrap();
    let second = repo
        .save_if_target_absent(link("second", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(first.id, "first");
    assert_eq!(second.id, "first");
    assert!(!repo.id_exists("second").await.unwrap());
    assert_eq!(repo.count_links().await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_click_without_link() {
    let repo = MemoryUrlRepository::new();

    repo.register_click("ghost").await.unwrap();
    repo.register_click("ghost").await.unwrap();

    assert_eq!(repo.fetch_click_stats("ghost").await.unwrap(), 2);
    assert!(!repo.id_exists("ghost").await.unwrap());
}

#[tokio::test]
async fn test_fetch_click_stats_defaults_to_zero() {
    let repo = MemoryUrlRepository::new();
    repo.save(link("fresh", "https://example.com")).await.unwrap();

    assert_eq!(repo.fetch_click_stats("fresh").await.unwrap(), 0);
    assert_eq!(repo.fetch_click_stats("unknown").await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_clicks_are_all_counted() {
    let repo = Arc::new(MemoryUrlRepository::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..250 {
                repo.register_click("hot").await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(repo.fetch_click_stats("hot").await.unwrap(), 2_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_save_if_target_absent_has_one_winner() {
    let repo = Arc::new(MemoryUrlRepository::new());

    let mut handles = Vec::new();
    for i in 0..16 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.save_if_target_absent(link(&format!("id{i}"), "https://race.example"))
                .await
                .unwrap()
        }));
    }

    let mut winners = std::collections::HashSet::new();
    for handle in handles {
        winners.insert(handle.await.unwrap().id);
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(repo.count_links().await.unwrap(), 1);
}
