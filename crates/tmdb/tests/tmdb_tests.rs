use cinevisor_tmdb::{TmdbClient, TmdbError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup_client(server_uri: &str) -> TmdbClient {
    TmdbClient::new(server_uri, "fake-token", reqwest::Client::new())
}

#[tokio::test]
async fn test_popular_sends_bearer_and_language() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(header("Authorization", "Bearer fake-token"))
        .and(query_param("language", "ko-KR"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [
                { "id": 42, "title": "X", "poster_path": "/p.jpg", "vote_average": 7.5 },
                { "id": 7, "title": "Y", "poster_path": null, "vote_average": 8.2, "adult": true }
            ],
            "total_pages": 3,
            "total_results": 60
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = setup_client(&server.uri()).popular(1).await.unwrap();
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].title, "X");

    let visible = page.without_adult();
    assert_eq!(visible.results.len(), 1);
}

#[tokio::test]
async fn test_details_decodes_genres() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "title": "X",
            "poster_path": "/p.jpg",
            "vote_average": 7.456,
            "overview": "",
            "genres": [{ "id": 18, "name": "드라마" }],
            "runtime": 121
        })))
        .mount(&server)
        .await;

    let detail = setup_client(&server.uri()).details(42).await.unwrap();
    assert_eq!(detail.id, 42);
    assert_eq!(detail.genres[0].name, "드라마");
    assert_eq!(detail.runtime, Some(121));
}

#[tokio::test]
async fn test_search_blank_query_skips_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let page = setup_client(&server.uri()).search("   ", 1).await.unwrap();
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn test_search_passes_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "기생충"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [{ "id": 496243, "title": "기생충", "vote_average": 8.5 }],
            "total_pages": 1,
            "total_results": 1
        })))
        .mount(&server)
        .await;

    let page = setup_client(&server.uri()).search(" 기생충 ", 1).await.unwrap();
    assert_eq!(page.results[0].id, 496243);
}

#[tokio::test]
async fn test_genre_list_and_discover() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [{ "id": 28, "name": "액션" }, { "id": 35, "name": "코미디" }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "results": [{ "id": 1, "title": "A" }],
            "total_pages": 5,
            "total_results": 100
        })))
        .mount(&server)
        .await;

    let client = setup_client(&server.uri());
    let genres = client.genres().await.unwrap();
    assert_eq!(genres.len(), 2);

    let page = client.discover_by_genre(28, 2).await.unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.results[0].title, "A");
}

#[tokio::test]
async fn test_api_error_carries_status_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/0"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let result = setup_client(&server.uri()).details(0).await;
    match result {
        Err(TmdbError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains("could not be found"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}
