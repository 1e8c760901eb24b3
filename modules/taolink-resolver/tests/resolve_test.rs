//! End-to-end resolution tests — MOCK → FUNCTION → OUTPUT.
//!
//! Every test sets up a MockFetcher, calls `Resolver::resolve_message`, and
//! asserts on the settled outcome. No network.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use taopass_client::TaoPassData;

use taolink_resolver::testing::{taopass_data, MockFetcher};
use taolink_resolver::{ResolveError, Resolver};

const DEADLINE: Duration = Duration::from_secs(15);

fn resolver(fetcher: Arc<MockFetcher>) -> Resolver {
    Resolver::with_fetcher(fetcher, DEADLINE)
}

const SKU_PAGE: &str = r#"skuMap : {"a":{"price":"10.00"},"b":{"price":"30.00"},"c":{"price":"20.00"}} ,"#;

// ---------------------------------------------------------------------------
// API-lookup strategy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn symbol_code_resolves_through_promo_api() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .on_taopass(
                "ABCDEFGHIJ",
                TaoPassData {
                    url: "https://detail.m.tmall.com/item.htm?id=98765&spm=a21".to_string(),
                    content: Some("好茶叶".to_string()),
                    pic_url: Some("https://img.example.com/tea.jpg".to_string()),
                    expire: Some("2024-06-01 20:00:00".to_string()),
                },
            )
            .on_product_page("https://detail.tmall.com/item.htm?id=98765", SKU_PAGE),
    );

    let product = resolver(fetcher)
        .resolve_message(Some("¥ABCDEFGHIJ¥"))
        .await
        .unwrap()
        .expect("should resolve");

    assert_eq!(product.url, "https://detail.tmall.com/item.htm?id=98765");
    assert_eq!(product.title.as_deref(), Some("好茶叶"));
    assert_eq!(product.pic_url.as_deref(), Some("https://img.example.com/tea.jpg"));
    assert_eq!(
        product.price_summary.as_deref(),
        Some("10.00 CNY (10.00 CNY - 30.00 CNY)")
    );
    assert_eq!(
        product.expiry,
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn rejected_promo_code_is_product_unavailable() {
    let fetcher = Arc::new(MockFetcher::new().on_taopass_rejected("ABCDEFGHIJ", 1));

    let err = resolver(fetcher)
        .resolve_message(Some("¥ABCDEFGHIJ¥"))
        .await
        .unwrap_err();

    match err {
        ResolveError::ProductUnavailable(msg) => assert!(msg.contains("taodaxiang.com")),
        other => panic!("expected ProductUnavailable, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Shortlink strategy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shortlink_resolves_with_extra_data() {
    let html = r#"
        var url = 'https://h5.m.taobao.com/detail.htm?id=123456&spm=a1z';
        var extraData = {"title":"保温杯","pic":"https://img.example.com/cup.jpg"};
    "#;
    let fetcher = Arc::new(
        MockFetcher::new()
            .on_shortlink_page("h.AbCdEfG", html)
            .on_product_page(
                "https://item.taobao.com/item.htm?id=123456",
                r#"<input name="current_price" value = "59.90">"#,
            ),
    );

    let product = resolver(fetcher)
        .resolve_message(Some("look: m.tb.cn/h.AbCdEfG"))
        .await
        .unwrap()
        .expect("should resolve");

    assert_eq!(product.url, "https://item.taobao.com/item.htm?id=123456");
    assert_eq!(product.title.as_deref(), Some("保温杯"));
    assert_eq!(product.pic_url.as_deref(), Some("https://img.example.com/cup.jpg"));
    assert_eq!(product.price_summary.as_deref(), Some("59.90 CNY"));
    assert!(product.expiry.is_none());
}

#[tokio::test]
async fn shortlink_without_extra_data_omits_title_and_pic() {
    let html = "var url = 'https://item.taobao.com/item.htm?id=7';";
    let fetcher = Arc::new(
        MockFetcher::new()
            .on_shortlink_page("h.AbCdEfG", html)
            .on_product_page("https://item.taobao.com/item.htm?id=7", "<html></html>"),
    );

    let product = resolver(fetcher)
        .resolve_message(Some("m.tb.cn/h.AbCdEfG"))
        .await
        .unwrap()
        .expect("should resolve");

    assert!(product.title.is_none());
    assert!(product.pic_url.is_none());
    assert!(product.price_summary.is_none());
}

#[tokio::test]
async fn shortlink_page_without_url_assignment_is_product_unavailable() {
    let fetcher = Arc::new(
        MockFetcher::new().on_shortlink_page("h.AbCdEfG", "<html>gone</html>"),
    );

    let err = resolver(fetcher)
        .resolve_message(Some("m.tb.cn/h.AbCdEfG"))
        .await
        .unwrap_err();

    match err {
        ResolveError::ProductUnavailable(msg) => assert!(msg.contains("shortlink parsing")),
        other => panic!("expected ProductUnavailable, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Race semantics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_candidate_resolves_silently_with_zero_network_calls() {
    let fetcher = Arc::new(MockFetcher::new());

    let outcome = resolver(fetcher.clone())
        .resolve_message(Some("just a normal chat message"))
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert_eq!(fetcher.fetch_count(), 0);
}

#[tokio::test]
async fn absent_text_resolves_silently() {
    let fetcher = Arc::new(MockFetcher::new());

    let outcome = resolver(fetcher.clone()).resolve_message(None).await.unwrap();

    assert!(outcome.is_none());
    assert_eq!(fetcher.fetch_count(), 0);
}

#[tokio::test]
async fn both_patterns_race_and_the_faster_strategy_wins() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .on_taopass("ABCDEFGHIJ", taopass_data("https://item.taobao.com/item.htm?id=1"))
            .on_product_page("https://item.taobao.com/item.htm?id=1", "<html></html>")
            .on_shortlink_page("h.AbCdEfG", "var url = 'https://item.taobao.com/item.htm?id=2';")
            .on_product_page("https://item.taobao.com/item.htm?id=2", "<html></html>")
            .taopass_delay(Duration::from_millis(10))
            .shortlink_delay(Duration::from_millis(200)),
    );

    let product = resolver(fetcher.clone())
        .resolve_message(Some("¥ABCDEFGHIJ¥ m.tb.cn/h.AbCdEfG"))
        .await
        .unwrap()
        .expect("should resolve");

    assert_eq!(product.url, "https://item.taobao.com/item.htm?id=1");
    // Both strategies actually started before the race settled.
    assert!(fetcher.fetch_count() >= 2);
}

#[tokio::test]
async fn fast_failure_beats_slow_success() {
    // Shortlink settles instantly with a deleted-product failure; the
    // promo lookup would have succeeded 100ms later. Fail-fast means the
    // caller sees the failure.
    let fetcher = Arc::new(
        MockFetcher::new()
            .on_taopass("ABCDEFGHIJ", taopass_data("https://item.taobao.com/item.htm?id=1"))
            .on_product_page("https://item.taobao.com/item.htm?id=1", "<html></html>")
            .on_shortlink_page("h.AbCdEfG", "<html>no assignment here</html>")
            .taopass_delay(Duration::from_millis(100)),
    );

    let err = resolver(fetcher)
        .resolve_message(Some("¥ABCDEFGHIJ¥ m.tb.cn/h.AbCdEfG"))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::ProductUnavailable(_)));
}

#[tokio::test]
async fn deadline_elapsing_resolves_silently() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .on_taopass("ABCDEFGHIJ", taopass_data("https://item.taobao.com/item.htm?id=1"))
            .taopass_delay(Duration::from_secs(60)),
    );

    let outcome = Resolver::with_fetcher(fetcher, Duration::from_millis(50))
        .resolve_message(Some("¥ABCDEFGHIJ¥"))
        .await
        .unwrap();

    assert!(outcome.is_none());
}

// ---------------------------------------------------------------------------
// Canonicalization through the pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn discovered_urls_are_canonicalized_before_the_price_lookup() {
    // The product page is only registered under the canonical URL, so the
    // price summary proves the lookup used the canonical form.
    let fetcher = Arc::new(
        MockFetcher::new()
            .on_taopass("ABCDEFGHIJ", taopass_data("https://a.m.taobao.com/i577629462864.htm"))
            .on_product_page(
                "https://item.taobao.com/item.htm?id=577629462864",
                r#"skuMap : {"a":{"price":"88.00"}} ,"#,
            ),
    );

    let product = resolver(fetcher)
        .resolve_message(Some("¥ABCDEFGHIJ¥"))
        .await
        .unwrap()
        .expect("should resolve");

    assert_eq!(product.url, "https://item.taobao.com/item.htm?id=577629462864");
    assert_eq!(product.price_summary.as_deref(), Some("88.00 CNY"));
}
