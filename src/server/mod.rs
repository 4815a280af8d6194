//! Listing proxy server.
//!
//! Exposes Coupang and Naver Shopping listings as JSON for browser clients
//! that cannot fetch the storefronts directly. Every request performs exactly
//! one outbound fetch; nothing is cached.

mod handlers;
mod routes;

pub use handlers::{ApiError, ListingParams};
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::scrapers::{HttpClient, ListingSource};

/// Shared state for the proxy server.
#[derive(Clone)]
pub struct AppState {
    pub client: HttpClient,
    pub coupang: Arc<ListingSource>,
    pub naver: Arc<ListingSource>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client =
            HttpClient::with_user_agent(settings.http.timeout(), settings.http.user_agent.as_deref())?;

        Ok(Self {
            client,
            coupang: Arc::new(ListingSource::coupang()),
            naver: Arc::new(ListingSource::naver()),
        })
    }
}

/// Start the proxy server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Html;
    use axum::routing::get;
    use axum::Router;
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::scrapers::listing::ListingTarget;

    const COUPANG_FIXTURE: &str = r#"
        <html><body><ul>
          <li class="baby-product">
            <a href="/vp/products/1"><div class="name">아기 로션</div></a>
            <img src="//thumbnail.coupangcdn.com/1.jpg">
            <strong class="price-value">9,900</strong>
          </li>
          <li class="baby-product">
            <a href="/vp/products/2"><div class="name">젖병 세트</div></a>
            <img src="//thumbnail.coupangcdn.com/2.jpg">
            <strong class="price-value">24,000</strong>
          </li>
        </ul></body></html>
    "#;

    const NAVER_FIXTURE: &str = r#"
        <div class="basicList_item">
          <a href="/catalog/7"><div class="basicList_title">기계식 키보드</div></a>
          <img data-src="https://shopping-phinf.pstatic.net/7.jpg">
          <span class="price_num">89,000원</span>
        </div>
    "#;

    /// Local stand-in for the storefronts, bound to an ephemeral port.
    async fn spawn_storefront() -> SocketAddr {
        let app = Router::new()
            .route("/listing", get(|| async { Html(COUPANG_FIXTURE) }))
            .route("/search", get(|| async { Html(NAVER_FIXTURE) }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn test_app(storefront: SocketAddr, coupang_path: &str) -> Router {
        let coupang = ListingSource {
            target: ListingTarget::Rotating(vec![format!("http://{}{}", storefront, coupang_path)]),
            ..ListingSource::coupang()
        };
        let naver = ListingSource {
            target: ListingTarget::Search {
                template: format!(
                    "http://{}/search?query={{keyword}}&pagingIndex={{page}}&pagingSize={{limit}}",
                    storefront
                ),
                default_keyword: "노트북".to_string(),
            },
            ..ListingSource::naver()
        };

        let state = AppState {
            client: HttpClient::new(Duration::from_secs(5)).unwrap(),
            coupang: Arc::new(coupang),
            naver: Arc::new(naver),
        };
        create_router(state)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let storefront = spawn_storefront().await;
        let app = test_app(storefront, "/listing");

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_coupang_listing() {
        let storefront = spawn_storefront().await;
        let app = test_app(storefront, "/listing");

        let response = app
            .oneshot(get_request("/api/coupang?page=0&limit=10"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        let products = json.as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["title"], "아기 로션");
        assert_eq!(products[0]["currentPrice"], 9900);
        assert_eq!(products[0]["averagePrice"], 10890);
        assert_eq!(products[0]["priceChangePercent"], -10.0);
        assert_eq!(products[0]["source"], "coupang");
        assert_eq!(products[0]["imageUrl"], "https://thumbnail.coupangcdn.com/1.jpg");
        assert_eq!(products[0]["productUrl"], "https://www.coupang.com/vp/products/1");
    }

    #[tokio::test]
    async fn test_limit_truncates_listing() {
        let storefront = spawn_storefront().await;
        let app = test_app(storefront, "/listing");

        let response = app.oneshot(get_request("/api/coupang?limit=1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_naver_listing() {
        let storefront = spawn_storefront().await;
        let app = test_app(storefront, "/listing");

        let response = app
            .oneshot(get_request("/api/naver?keyword=%ED%82%A4%EB%B3%B4%EB%93%9C&page=0"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json[0]["title"], "기계식 키보드");
        assert_eq!(json[0]["source"], "naver");
        assert_eq!(json[0]["currentPrice"], 89000);
        assert_eq!(json[0]["productUrl"], "https://shopping.naver.com/catalog/7");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500_with_message() {
        let storefront = spawn_storefront().await;
        let app = test_app(storefront, "/gone");

        let response = app.oneshot(get_request("/api/coupang")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_invalid_page_is_500_with_message() {
        let storefront = spawn_storefront().await;
        let app = test_app(storefront, "/listing");

        let response = app.oneshot(get_request("/api/coupang?page=abc")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("page"));
    }

    #[tokio::test]
    async fn test_undecodable_query_is_500_with_message() {
        let storefront = spawn_storefront().await;
        let app = test_app(storefront, "/listing");

        let response = app
            .clone()
            .oneshot(get_request("/api/coupang?page=1&page=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("page"));

        let response = app
            .oneshot(get_request("/api/naver?keyword=a&keyword=b"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let storefront = spawn_storefront().await;
        let app = test_app(storefront, "/listing");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
