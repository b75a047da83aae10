use serde_json::json;
use streamfind_core::catalog::{
    CatalogError, MediaType, MetadataCatalog, TmdbClient, TmdbConfig,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TmdbClient {
    TmdbClient::new(TmdbConfig {
        api_key: "tmdb-key".to_string(),
        languages: vec!["cs-CZ".to_string(), "en-US".to_string()],
        base_url: Some(server.uri()),
        image_base_url: None,
    })
    .unwrap()
}

fn empty() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "page": 1, "results": [] }))
}

#[tokio::test]
async fn test_search_falls_through_languages() {
    let server = MockServer::start().await;

    // Czech results only contain a person, which does not count.
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("query", "Nolan"))
        .and(query_param("language", "cs-CZ"))
        .and(query_param("api_key", "tmdb-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 525, "media_type": "person", "name": "Christopher Nolan" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "id": 525, "media_type": "person", "name": "Christopher Nolan" },
                {
                    "id": 27205,
                    "media_type": "movie",
                    "title": "Inception",
                    "original_title": "Inception",
                    "release_date": "2010-07-15",
                    "poster_path": "/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg"
                },
                {
                    "id": 1396,
                    "media_type": "tv",
                    "name": "Breaking Bad",
                    "first_air_date": "2008-01-20"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server).search("Nolan").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind, MediaType::Movie);
    assert_eq!(records[0].year(), Some(2010));
    assert_eq!(
        records[0].poster_path.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg")
    );
    assert_eq!(records[1].kind, MediaType::Tv);
    assert!(records[1].poster_path.is_none());
    assert_eq!(records[1].title, "Breaking Bad");
}

#[tokio::test]
async fn test_search_stops_at_first_language_with_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("language", "cs-CZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": 27205,
                "media_type": "movie",
                "title": "Počátek",
                "original_title": "Inception",
                "release_date": "2010-07-15"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("language", "en-US"))
        .respond_with(empty())
        .expect(0)
        .mount(&server)
        .await;

    let records = client(&server).search("Inception").await.unwrap();
    assert_eq!(records[0].title, "Počátek");
    assert_eq!(records[0].original_title.as_deref(), Some("Inception"));
}

#[tokio::test]
async fn test_search_alias_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("query", "Pat a Mat"))
        .respond_with(empty())
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("query", "Pat and Mat"))
        .and(query_param("language", "cs-CZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": 12,
                "media_type": "tv",
                "name": "Pat a Mat",
                "first_air_date": "1976-01-01"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server).search("Pat a Mat").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, MediaType::Tv);
}

#[tokio::test]
async fn test_search_without_alias_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .respond_with(empty())
        .expect(2)
        .mount(&server)
        .await;

    assert!(client(&server).search("Nothing Here").await.unwrap().is_empty());
    // Blank queries never reach the API.
    assert!(client(&server).search("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_error_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/1"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let tmdb = client(&server);
    assert!(matches!(
        tmdb.search("x").await,
        Err(CatalogError::NotConfigured(_))
    ));
    assert!(matches!(
        tmdb.seasons(1).await,
        Err(CatalogError::RateLimitExceeded)
    ));
    assert!(matches!(tmdb.seasons(2).await, Err(CatalogError::NotFound(_))));
    assert!(matches!(
        tmdb.seasons(3).await,
        Err(CatalogError::ApiError { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_seasons_and_episodes_in_primary_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/70523"))
        .and(query_param("language", "cs-CZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 70523,
            "name": "Dark",
            "seasons": [
                { "season_number": 0, "name": "Speciály", "episode_count": 2 },
                { "season_number": 1, "name": "Řada 1", "episode_count": 10, "air_date": "2017-12-01" },
                { "season_number": 2, "episode_count": 8 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/70523/season/1"))
        .and(query_param("language", "cs-CZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "episodes": [
                {
                    "episode_number": 1,
                    "name": "Tajemství",
                    "overview": "",
                    "air_date": "2017-12-01",
                    "still_path": "/still.jpg",
                    "vote_average": 7.9
                },
                { "episode_number": 2 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmdb = client(&server);
    let seasons = tmdb.seasons(70523).await.unwrap();
    assert_eq!(seasons.len(), 3);
    assert_eq!(seasons[1].name, "Řada 1");
    assert_eq!(seasons[2].name, "Season 2");

    let episodes = tmdb.episodes(70523, 1).await.unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].name, "Tajemství");
    assert_eq!(
        episodes[0].still_path.as_deref(),
        Some("https://image.tmdb.org/t/p/w300/still.jpg")
    );
    assert!(episodes[0].overview.is_none());
    assert_eq!(episodes[1].name, "Episode 2");
    assert!(episodes[1].vote_average.is_none());
}
