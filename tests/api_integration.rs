use hacky_news_tui::api::ApiService;
use hacky_news_tui::internal::stats::StatsTab;
use hacky_news_tui::internal::update::UpdateOutcome;
use mockito::Matcher;

#[tokio::test]
async fn test_integration_search_with_category() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "rust".into()),
            Matcher::UrlEncoded("category".into(), "Ask HN".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": 1, "title": "Ask HN: Learning Rust?", "by": "alice", "score": 12,
                 "time": 1700000000, "descendants": 4, "category": "Ask HN"}
            ]"#,
        )
        .create_async()
        .await;

    let service = ApiService::with_base_url(server.url());
    let results = service.search("rust", "Ask HN").await.expect("search failed");

    m.assert_async().await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].by.as_deref(), Some("alice"));
    assert_eq!(results[0].descendants, Some(4));
}

#[tokio::test]
async fn test_integration_search_all_omits_category() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/search")
        .match_query(Matcher::Regex("^q=tokio$".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let service = ApiService::with_base_url(server.url());
    let results = service.search("tokio", "all").await;

    m.assert_async().await;
    assert_eq!(results, Some(Vec::new()));
}

#[tokio::test]
async fn test_integration_categories_and_stats() {
    let mut server = mockito::Server::new_async().await;
    let _cats = server
        .mock("GET", "/categories")
        .with_status(200)
        .with_body(r#"[{"name": "Programming", "count": 50}, {"name": "Ask HN", "count": 10}]"#)
        .create_async()
        .await;
    let _stats = server
        .mock("GET", "/stats")
        .with_status(200)
        .with_body(r#"{"total_stories": 60, "categories": [{"name": "Show HN", "count": 7}]}"#)
        .create_async()
        .await;

    let service = ApiService::with_base_url(server.url());
    let categories = service.categories().await.expect("categories failed");
    assert_eq!(categories[0].name, "Programming");
    assert_eq!(categories[1].count, 10);

    let stats = service.stats().await.expect("stats failed");
    assert_eq!(stats.total_stories, 60);
    assert_eq!(stats.count_for("Show HN"), 7);
}

#[tokio::test]
async fn test_integration_autocomplete() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/autocomplete")
        .match_query(Matcher::UrlEncoded("q".into(), "ru".into()))
        .with_status(200)
        .with_body(r#"[{"value": "rust"}, {"value": "ruby"}]"#)
        .create_async()
        .await;

    let service = ApiService::with_base_url(server.url());
    let suggestions = service.autocomplete("ru").await.expect("autocomplete failed");
    let values: Vec<_> = suggestions.iter().map(|s| s.value.as_str()).collect();
    assert_eq!(values, vec!["rust", "ruby"]);
}

#[tokio::test]
async fn test_integration_top_recent() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/stats/top-recent")
        .with_status(200)
        .with_body(r#"[{"title": "Big launch", "score": 900, "time": 1}]"#)
        .create_async()
        .await;

    let service = ApiService::with_base_url(server.url());
    let stories = service.top_stories(StatsTab::Recent).await.expect("top failed");
    m.assert_async().await;
    assert_eq!(stories[0].score, Some(900));
}

#[tokio::test]
async fn test_integration_update_outcomes() {
    let mut server = mockito::Server::new_async().await;
    let _ok = server
        .mock("GET", "/update")
        .with_status(200)
        .with_body(r#"{"status": "success", "message": "Successfully updated news data."}"#)
        .create_async()
        .await;

    let service = ApiService::with_base_url(server.url());
    let outcome = UpdateOutcome::from_response(service.update().await);
    assert_eq!(
        outcome,
        UpdateOutcome::Success("Successfully updated news data.".to_string())
    );

    server.reset_async().await;
    let _err = server
        .mock("GET", "/update")
        .with_status(200)
        .with_body(r#"{"status": "error", "message": "rate limited"}"#)
        .create_async()
        .await;

    let outcome = UpdateOutcome::from_response(service.update().await);
    assert_eq!(outcome.notice(), "Error updating: rate limited");
}

#[tokio::test]
async fn test_integration_news_with_undated_story() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/news")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": 1, "title": "ok", "time": 1700000000},
                {"id": 2, "title": "no time", "time": null}
            ]"#,
        )
        .create_async()
        .await;

    let service = ApiService::with_base_url(server.url());
    let stories = service.news("all").await.expect("listing rejected");

    assert_eq!(stories.len(), 2);
    assert_eq!(stories[1].time, None);
}
