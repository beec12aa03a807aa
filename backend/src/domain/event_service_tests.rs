//! Tests for the event service.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    AnalyticsSinkError, ImageUpload, MockAnalyticsSink, MockEventRepository, MockImageStore,
    NoOpAnalyticsSink,
};
use crate::domain::{EventPatch, Slug};
use crate::test_support::{sample_draft, sample_event};

const IMAGE_URL: &str = "https://img.example/devevent/banner.png";

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn clock(now: DateTime<Utc>) -> Arc<MockClock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(now);
    Arc::new(clock)
}

fn uploading_images() -> MockImageStore {
    let mut images = MockImageStore::new();
    images
        .expect_upload()
        .returning(|_| Ok(IMAGE_URL.to_owned()));
    images
}

fn make_service(
    repo: MockEventRepository,
    images: MockImageStore,
    analytics: Arc<dyn AnalyticsSink>,
    now: DateTime<Utc>,
) -> EventService<MockEventRepository> {
    EventService::new(Arc::new(repo), Arc::new(images), analytics, clock(now))
}

fn create_request(title: &str) -> CreateEventRequest {
    CreateEventRequest {
        draft: sample_draft(title),
        image: ImageUpload {
            filename: "banner.png".to_owned(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        },
    }
}

fn slug(value: &str) -> Slug {
    Slug::new(value).expect("valid slug")
}

#[rstest]
#[tokio::test]
async fn create_uploads_image_and_stores_event(now: DateTime<Utc>) {
    let mut repo = MockEventRepository::new();
    repo.expect_exists_by_slug_excluding()
        .returning(|_, _| Ok(false));
    repo.expect_insert().times(1).returning(|_| Ok(()));
    let mut analytics = MockAnalyticsSink::new();
    analytics
        .expect_capture()
        .withf(|event| event.name == "event_created")
        .times(1)
        .returning(|_| Ok(()));

    let service = make_service(repo, uploading_images(), Arc::new(analytics), now);
    let event = service
        .create(create_request("Go Meetup"))
        .await
        .expect("create succeeds");

    assert_eq!(event.slug.as_ref(), "go-meetup");
    assert_eq!(event.image, IMAGE_URL);
    assert_eq!(event.created_at, now);
}

#[rstest]
#[tokio::test]
async fn create_rejects_invalid_fields_before_upload(now: DateTime<Utc>) {
    let repo = MockEventRepository::new();
    let mut images = MockImageStore::new();
    images.expect_upload().never();
    let mut request = create_request("Go Meetup");
    request.draft.time = "9:30".to_owned();

    let service = make_service(repo, images, Arc::new(NoOpAnalyticsSink), now);
    let error = service.create(request).await.expect_err("invalid time");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn create_rejects_empty_image(now: DateTime<Utc>) {
    let mut request = create_request("Go Meetup");
    request.image.bytes.clear();
    let service = make_service(
        MockEventRepository::new(),
        MockImageStore::new(),
        Arc::new(NoOpAnalyticsSink),
        now,
    );

    let error = service.create(request).await.expect_err("image required");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Image file required");
}

#[rstest]
#[tokio::test]
async fn create_retries_with_next_suffix_after_conflict(now: DateTime<Utc>) {
    let mut repo = MockEventRepository::new();
    repo.expect_exists_by_slug_excluding()
        .returning(|_, _| Ok(false));
    let inserts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&inserts);
    repo.expect_insert().times(2).returning(move |event| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(EventRepositoryError::slug_taken(event.slug.to_string()))
        } else {
            Ok(())
        }
    });

    let service = make_service(repo, uploading_images(), Arc::new(NoOpAnalyticsSink), now);
    let event = service
        .create(create_request("Go Meetup"))
        .await
        .expect("retry succeeds");

    assert_eq!(event.slug.as_ref(), "go-meetup-1");
    assert_eq!(inserts.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn create_gives_up_after_repeated_conflicts(now: DateTime<Utc>) {
    let mut repo = MockEventRepository::new();
    repo.expect_exists_by_slug_excluding()
        .returning(|_, _| Ok(false));
    repo.expect_insert()
        .times(MAX_SLUG_ATTEMPTS as usize)
        .returning(|event| Err(EventRepositoryError::slug_taken(event.slug.to_string())));

    let service = make_service(repo, uploading_images(), Arc::new(NoOpAnalyticsSink), now);
    let error = service
        .create(create_request("Go Meetup"))
        .await
        .expect_err("conflict");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_survives_analytics_failure(now: DateTime<Utc>) {
    let mut repo = MockEventRepository::new();
    repo.expect_exists_by_slug_excluding()
        .returning(|_, _| Ok(false));
    repo.expect_insert().returning(|_| Ok(()));
    let mut analytics = MockAnalyticsSink::new();
    analytics
        .expect_capture()
        .returning(|_| Err(AnalyticsSinkError::dispatch("offline")));

    let service = make_service(repo, uploading_images(), Arc::new(analytics), now);
    assert!(service.create(create_request("Go Meetup")).await.is_ok());
}

#[rstest]
#[tokio::test]
async fn create_maps_upload_failure_to_unavailable(now: DateTime<Utc>) {
    let mut images = MockImageStore::new();
    images
        .expect_upload()
        .returning(|_| Err(ImageStoreError::transport("timeout")));
    let mut repo = MockEventRepository::new();
    repo.expect_insert().never();

    let service = make_service(repo, images, Arc::new(NoOpAnalyticsSink), now);
    let error = service
        .create(create_request("Go Meetup"))
        .await
        .expect_err("upload fails");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(error.message(), "Image upload failed");
}

#[rstest]
#[tokio::test]
async fn create_hides_image_host_response(now: DateTime<Utc>) {
    let mut images = MockImageStore::new();
    images.expect_upload().returning(|_| {
        Err(ImageStoreError::rejected(
            401_u16,
            "Invalid upload preset for https://api.cloudinary.example/v1_1/acme",
        ))
    });
    let mut repo = MockEventRepository::new();
    repo.expect_insert().never();

    let service = make_service(repo, images, Arc::new(NoOpAnalyticsSink), now);
    let error = service
        .create(create_request("Go Meetup"))
        .await
        .expect_err("upload rejected");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert!(!error.message().contains("cloudinary"));
}

#[rstest]
#[tokio::test]
async fn update_unknown_slug_is_not_found(now: DateTime<Utc>) {
    let mut repo = MockEventRepository::new();
    repo.expect_find_by_slug().returning(|_| Ok(None));
    let service = make_service(repo, MockImageStore::new(), Arc::new(NoOpAnalyticsSink), now);

    let error = service
        .update(UpdateEventRequest {
            slug: slug("missing"),
            patch: EventPatch {
                venue: Some("Hall B".to_owned()),
                ..EventPatch::default()
            },
        })
        .await
        .expect_err("not found");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_keeps_slug_when_title_untouched(now: DateTime<Utc>) {
    let stored = sample_event("Go Meetup", "go-meetup");
    let stored_slug = stored.slug.clone();
    let mut repo = MockEventRepository::new();
    repo.expect_find_by_slug()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_exists_by_slug_excluding().never();
    repo.expect_update().times(1).returning(|_| Ok(()));

    let service = make_service(repo, MockImageStore::new(), Arc::new(NoOpAnalyticsSink), now);
    let event = service
        .update(UpdateEventRequest {
            slug: slug("go-meetup"),
            patch: EventPatch {
                audience: Some("Gophers".to_owned()),
                ..EventPatch::default()
            },
        })
        .await
        .expect("update succeeds");

    assert_eq!(event.slug, stored_slug);
    assert_eq!(event.audience, "Gophers");
    assert_eq!(event.updated_at, now);
}

#[rstest]
#[tokio::test]
async fn get_event_maps_connection_failure(now: DateTime<Utc>) {
    let mut repo = MockEventRepository::new();
    repo.expect_find_by_slug()
        .returning(|_| Err(EventRepositoryError::connection("refused")));
    let service = make_service(repo, MockImageStore::new(), Arc::new(NoOpAnalyticsSink), now);

    let error = service
        .get_event(&slug("go-meetup"))
        .await
        .expect_err("store down");
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Failed to fetch event");
}

#[rstest]
#[case::connection(EventRepositoryError::connection("connect to db.internal:5432 user=devevent failed"))]
#[case::query(EventRepositoryError::query("relation \"events\" does not exist"))]
#[tokio::test]
async fn update_hides_store_failure_details(
    now: DateTime<Utc>,
    #[case] failure: EventRepositoryError,
) {
    let mut repo = MockEventRepository::new();
    repo.expect_find_by_slug().return_once(move |_| Err(failure));
    let service = make_service(repo, MockImageStore::new(), Arc::new(NoOpAnalyticsSink), now);

    let error = service
        .update(UpdateEventRequest {
            slug: slug("go-meetup"),
            patch: EventPatch {
                venue: Some("Hall B".to_owned()),
                ..EventPatch::default()
            },
        })
        .await
        .expect_err("store down");
    assert!(!error.message().contains("db.internal"));
    assert!(!error.message().contains("relation"));
}

#[rstest]
#[tokio::test]
async fn fallback_slug_base_is_stable_across_retries(now: DateTime<Utc>) {
    let mut clock = MockClock::new();
    clock.expect_utc().times(1).return_const(now);
    let mut repo = MockEventRepository::new();
    repo.expect_exists_by_slug_excluding()
        .returning(|_, _| Ok(false));
    let inserts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&inserts);
    repo.expect_insert().times(2).returning(move |event| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(EventRepositoryError::slug_taken(event.slug.to_string()))
        } else {
            Ok(())
        }
    });
    let service = EventService::new(
        Arc::new(repo),
        Arc::new(uploading_images()),
        Arc::new(NoOpAnalyticsSink),
        Arc::new(clock),
    );

    let event = service
        .create(create_request("!!!"))
        .await
        .expect("retry succeeds");

    assert_eq!(
        event.slug.as_ref(),
        format!("{}-1", now.timestamp_millis())
    );
    assert_eq!(event.created_at, now);
}

#[rstest]
#[tokio::test]
async fn similar_events_excludes_source_and_caps_results(now: DateTime<Utc>) {
    let mut source = sample_event("Go Meetup", "go-meetup");
    source.tags = vec!["go".to_owned(), "rust".to_owned()];
    let source_id = source.id;
    let mut repo = MockEventRepository::new();
    repo.expect_find_by_slug()
        .return_once(move |_| Ok(Some(source)));
    repo.expect_find_by_tags_excluding()
        .withf(move |tags, excluding, limit| {
            tags == ["go".to_owned(), "rust".to_owned()].as_slice()
                && *excluding == source_id
                && *limit == SIMILAR_EVENTS_LIMIT
        })
        .return_once(|_, _, _| {
            Ok((0..5)
                .map(|n| sample_event("Rust Night", &format!("rust-night-{n}")))
                .collect())
        });

    let service = make_service(repo, MockImageStore::new(), Arc::new(NoOpAnalyticsSink), now);
    let similar = service.similar_events(&slug("go-meetup")).await;

    assert_eq!(similar.len(), SIMILAR_EVENTS_LIMIT);
    assert!(similar.iter().all(|event| event.id != source_id));
}

#[rstest]
#[case::unknown_slug(Ok(None))]
#[case::store_failure(Err(EventRepositoryError::query("boom")))]
#[tokio::test]
async fn similar_events_swallows_lookup_failures(
    now: DateTime<Utc>,
    #[case] lookup: Result<Option<Event>, EventRepositoryError>,
) {
    let mut repo = MockEventRepository::new();
    repo.expect_find_by_slug().return_once(move |_| lookup);
    repo.expect_find_by_tags_excluding().never();
    let service = make_service(repo, MockImageStore::new(), Arc::new(NoOpAnalyticsSink), now);

    assert!(service.similar_events(&slug("go-meetup")).await.is_empty());
}

#[rstest]
#[tokio::test]
async fn similar_events_swallows_tag_query_failure(now: DateTime<Utc>) {
    let source = sample_event("Go Meetup", "go-meetup");
    let mut repo = MockEventRepository::new();
    repo.expect_find_by_slug()
        .return_once(move |_| Ok(Some(source)));
    repo.expect_find_by_tags_excluding()
        .returning(|_, _, _| Err(EventRepositoryError::connection("reset")));
    let service = make_service(repo, MockImageStore::new(), Arc::new(NoOpAnalyticsSink), now);

    assert!(service.similar_events(&slug("go-meetup")).await.is_empty());
}
