#![allow(dead_code)]

use std::sync::Arc;

use tinylink::application::services::{LinkService, StatsService};
use tinylink::domain::click_worker::{
    ClickPipeline, ClickReceiver, ClickWorkerHandle, click_channel,
};
use tinylink::domain::repositories::UrlRepository;
use tinylink::infrastructure::persistence::MemoryUrlRepository;
use tinylink::state::AppState;
use tinylink::utils::id_generator::IdGenerator;

pub const BASE_URL: &str = "http://short.test";

fn services(
    repository: Arc<MemoryUrlRepository>,
) -> (
    Arc<LinkService<MemoryUrlRepository>>,
    Arc<StatsService<MemoryUrlRepository>>,
) {
    let link_service = Arc::new(LinkService::new(repository.clone(), IdGenerator::default()));
    let stats_service = Arc::new(StatsService::new(repository));
    (link_service, stats_service)
}

/// State whose click queue is not consumed; tests read the receiver directly.
pub fn create_test_state() -> (AppState, ClickReceiver, Arc<MemoryUrlRepository>) {
    let repository = Arc::new(MemoryUrlRepository::new());
    let (link_service, stats_service) = services(repository.clone());
    let (tx, rx) = click_channel(None);

    let state = AppState::new(link_service, stats_service, tx, BASE_URL);

    (state, rx, repository)
}

/// State with a running click worker.
pub fn create_running_state() -> (AppState, ClickWorkerHandle, Arc<MemoryUrlRepository>) {
    let repository = Arc::new(MemoryUrlRepository::new());
    let (link_service, stats_service) = services(repository.clone());

    let click_repository: Arc<dyn UrlRepository> = repository.clone();
    let (tx, worker) = ClickPipeline::spawn(click_repository, None);

    let state = AppState::new(link_service, stats_service, tx, BASE_URL);

    (state, worker, repository)
}
