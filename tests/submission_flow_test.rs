use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;
use wiremock::matchers::{any, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use service_studio::config::Config;
use service_studio::error::Error;
use service_studio::models::draft::{Extra, ServiceDraft};
use service_studio::models::localized::Locale;
use service_studio::models::media::{MediaFile, MediaKind};
use service_studio::models::service::ServiceStatus;
use service_studio::session::{EditSession, PresentationMode};
use service_studio::Studio;

fn studio(server: &MockServer) -> Studio {
    let mut config = Config::for_base_url(server.uri());
    config.api_token = Some("test-token".to_string());
    config.default_locale = Locale::En;
    Studio::new(&config).expect("studio")
}

fn eur_draft() -> ServiceDraft {
    ServiceDraft {
        title: "Web Design Service".into(),
        short_description: "I build sites".into(),
        base_price_minor: 10_000,
        display_currency: "EUR".into(),
        ..Default::default()
    }
}

fn publishable_draft() -> ServiceDraft {
    ServiceDraft {
        title: "Complete brand identity".into(),
        description: "Logo, palette and typography guide".into(),
        base_price_minor: 25_000,
        display_currency: "USD".into(),
        cover_image: Some("https://cdn.test/cover.jpg".into()),
        categories: vec!["design".into()],
        ..Default::default()
    }
}

#[tokio::test]
async fn draft_save_posts_canonical_cents() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/currencies/convert"))
        .and(query_param("amount", "100.00"))
        .and(query_param("from", "EUR"))
        .and(query_param("to", "USD"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {"converted_amount": 108}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/services"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "base_price_cents": 10800,
            "currency": "USD",
            "status": "draft",
            "title": {"fr": "Web Design Service", "en": "Web Design Service"},
            "max_revisions": null
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"success": true, "service": {"id": id}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let studio = studio(&server);
    let saved = assert_ok!(
        studio
            .dispatcher
            .submit(&eur_draft(), ServiceStatus::Draft, None)
            .await
    );
    assert_eq!(saved, id);
}

#[tokio::test]
async fn invalid_publish_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let studio = studio(&server);
    let err = assert_err!(
        studio
            .dispatcher
            .submit(&eur_draft(), ServiceStatus::Published, None)
            .await
    );
    match err {
        Error::Validation(errors) => {
            assert_eq!(errors.get("cover_image").map(String::as_str), Some("A cover image is required"));
            assert!(errors.contains_key("categories"));
            assert!(errors.contains_key("description"));
            assert!(!errors.contains_key("title"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn missing_rate_blocks_persistence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/currencies/convert"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {"converted_amount": null}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let studio = studio(&server);
    let err = assert_err!(
        studio
            .dispatcher
            .submit(&eur_draft(), ServiceStatus::Draft, None)
            .await
    );
    assert!(matches!(err, Error::ConversionUnavailable { ref currency, .. } if currency == "EUR"));
}

#[tokio::test]
async fn failing_extra_conversion_is_reported_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/currencies/convert"))
        .and(query_param("amount", "100.00"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {"converted_amount": 108}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/currencies/convert"))
        .and(query_param("amount", "15.00"))
        .respond_with(ResponseTemplate::new(503).set_body_string("rates offline"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut draft = eur_draft();
    draft.add_extra(Extra {
        title: "Express delivery".into(),
        price_minor: 1_500,
        additional_days: 0,
    });

    let studio = studio(&server);
    let err = assert_err!(
        studio
            .dispatcher
            .submit(&draft, ServiceStatus::Draft, None)
            .await
    );
    assert!(err.user_message(Locale::En).contains("Express delivery"));
}

#[tokio::test]
async fn server_rejection_surfaces_its_message() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("PATCH"))
        .and(path(format!("/services/{}", id)))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"error": "Title already used"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let studio = studio(&server);
    let err = assert_err!(
        studio
            .dispatcher
            .submit(&publishable_draft(), ServiceStatus::Published, Some(id))
            .await
    );
    assert_eq!(err.user_message(Locale::En), "Title already used");
}

#[tokio::test]
async fn publish_updates_existing_service() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("PATCH"))
        .and(path(format!("/services/{}", id)))
        .and(body_partial_json(json!({
            "status": "published",
            "base_price_cents": 25000,
            "categories": ["design"],
            "location_type": ["remote"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let studio = studio(&server);
    let saved = assert_ok!(
        studio
            .dispatcher
            .submit(&publishable_draft(), ServiceStatus::Published, Some(id))
            .await
    );
    assert_eq!(saved, id);
}

#[tokio::test]
async fn uploaded_document_is_referenced_by_the_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"url": "https://cdn.test/brief.pdf"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let studio = studio(&server);
    let mut draft = ServiceDraft::default();
    let file = MediaFile::new("brief.pdf", "application/pdf", b"%PDF-1.4".to_vec());
    let url = assert_ok!(studio.media.add_media(&mut draft, MediaKind::Document, file).await);

    assert_eq!(url, "https://cdn.test/brief.pdf");
    assert_eq!(draft.documents, vec![url]);
}

#[tokio::test]
async fn rejected_upload_keeps_the_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(413).set_body_json(json!({"error": "File too large"})))
        .mount(&server)
        .await;

    let studio = studio(&server);
    let mut draft = ServiceDraft::default();
    let file = MediaFile::new("clip.mp4", "video/mp4", vec![0u8; 2048]);
    let err = assert_err!(studio.media.add_media(&mut draft, MediaKind::Video, file).await);

    assert!(matches!(err, Error::UploadFailed(ref m) if m == "File too large"));
    assert!(draft.videos.is_empty());
}

#[tokio::test]
async fn editing_converts_prices_for_display() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/services/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "service": {
                "id": id,
                "title": {"fr": "Traduction technique", "en": "Technical translation"},
                "base_price_cents": 10800,
                "price_min_cents": null,
                "price_max_cents": null,
                "max_revisions": null,
                "cover_image": null,
                "images": ["https://cdn.test/sample.pdf"],
                "status": "published"
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/currencies/convert"))
        .and(query_param("amount", "108.00"))
        .and(query_param("from", "USD"))
        .and(query_param("to", "EUR"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {"converted_amount": 100}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let studio = studio(&server);
    let service = assert_ok!(studio.catalog.get_service(id).await);
    let session = EditSession::hydrate(
        &service,
        PresentationMode::Standalone,
        "EUR",
        &studio.normalizer,
        Locale::Fr,
    )
    .await;

    assert_eq!(session.service_id(), Some(id));
    assert_eq!(session.draft().title, "Traduction technique");
    assert_eq!(session.draft().display_currency, "EUR");
    assert_eq!(session.draft().base_price_minor, 10_000);
    assert_eq!(session.draft().documents, vec!["https://cdn.test/sample.pdf".to_string()]);
    assert_eq!(session.draft().status, ServiceStatus::Published);
}

#[tokio::test]
async fn negative_price_is_never_persisted() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let draft = ServiceDraft {
        base_price_minor: -500,
        display_currency: "usd".into(),
        ..eur_draft()
    };
    let studio = studio(&server);
    let err = assert_err!(
        studio
            .dispatcher
            .submit(&draft, ServiceStatus::Draft, None)
            .await
    );
    assert!(matches!(err, Error::NegativeAmount { .. }));
    assert_eq!(err.user_message(Locale::En), "The base price cannot be negative");
}
