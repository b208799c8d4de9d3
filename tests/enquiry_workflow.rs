//! Workflow tests for the enquiry services: snapshot immutability, derived
//! priority on update, best-effort notification, and media cleanup.

mod support;

use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use filato::application::enquiries::{
    DesignEnquiryService, EnquiryService, NewDesignEnquiry, NewEnquiry,
};
use filato::application::notify::NotificationKind;
use filato::application::repos::{
    ClothingTypesRepo, DesignEnquiriesRepo, UpdateClothingTypeParams, UpdateEnquiryParams,
};
use filato::domain::types::EnquiryPriority;
use support::{MemoryStore, RecordingNotifier, RecordingPurge, seed_clothing_type, seed_fabric};

fn enquiry_service(
    store: &Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
) -> EnquiryService {
    EnquiryService::new(store.clone(), store.clone(), store.clone(), notifier)
}

fn design_service(
    store: &Arc<MemoryStore>,
    purge: Arc<RecordingPurge>,
    notifier: Arc<RecordingNotifier>,
) -> DesignEnquiryService {
    DesignEnquiryService::new(store.clone(), store.clone(), purge, notifier)
}

fn new_enquiry(clothing_type_id: Option<Uuid>, fabric_id: Option<Uuid>) -> NewEnquiry {
    NewEnquiry {
        clothing_type_id,
        fabric_id,
        clothing_type_name: Some("Hoodies".to_string()),
        fabric_name: Some("Cotton".to_string()),
        name: "Ada".to_string(),
        company: None,
        email: "ada@example.com".to_string(),
        phone: None,
        quantity: 100,
        is_sample_request: false,
        size_range: None,
        notes: None,
        priority: None,
        deadline: None,
    }
}

fn new_design_enquiry(logo_urls: Vec<String>) -> NewDesignEnquiry {
    NewDesignEnquiry {
        fabric_id: None,
        fabric_name: Some("Cotton".to_string()),
        print_type: "screen".to_string(),
        name: "Ada".to_string(),
        company: None,
        email: "ada@example.com".to_string(),
        phone: None,
        quantity: 200,
        front_image_url: "/uploads/images/front.png".to_string(),
        back_image_url: "/uploads/images/back.png".to_string(),
        side_image_url: "/uploads/images/side.png".to_string(),
        logo_urls,
        notes: None,
        priority: None,
        deadline: None,
    }
}

#[tokio::test]
async fn snapshot_survives_catalogue_renames() {
    let store = Arc::new(MemoryStore::default());
    let clothing_type = seed_clothing_type(&store, "Zip Hoodies", "zip-hoodies", true).await;
    let fabric = seed_fabric(&store, "Organic Cotton", "organic-cotton").await;
    let service = enquiry_service(&store, Arc::new(RecordingNotifier::default()));

    let record = service
        .create(new_enquiry(Some(clothing_type.id), Some(fabric.id)))
        .await
        .expect("created");
    assert_eq!(record.clothing_type_name, "Zip Hoodies");
    assert_eq!(record.fabric_name, "Organic Cotton");

    ClothingTypesRepo::update_clothing_type(
        store.as_ref(),
        clothing_type.id,
        UpdateClothingTypeParams {
            name: Some("Premium Zip Hoodies".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("renamed");

    let fetched = service.get(record.id).await.expect("fetched");
    assert_eq!(fetched.clothing_type_name, "Zip Hoodies");
}

#[tokio::test]
async fn unknown_reference_fails_before_any_write() {
    let store = Arc::new(MemoryStore::default());
    let service = enquiry_service(&store, Arc::new(RecordingNotifier::default()));

    let result = service
        .create(new_enquiry(Some(Uuid::new_v4()), None))
        .await;
    assert!(result.is_err());
    assert!(store.enquiries.lock().await.is_empty());
}

#[tokio::test]
async fn creation_sends_a_notification() {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = enquiry_service(&store, notifier.clone());

    let record = service.create(new_enquiry(None, None)).await.expect("created");

    let sent = notifier.sent.lock().expect("notifier lock");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].enquiry_id, record.id);
    assert_eq!(sent[0].kind, NotificationKind::Enquiry);
    assert_eq!(sent[0].priority, EnquiryPriority::Medium);
}

#[tokio::test]
async fn notification_failure_does_not_block_creation() {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(RecordingNotifier {
        fail: true,
        ..Default::default()
    });
    let service = enquiry_service(&store, notifier);

    let record = service.create(new_enquiry(None, None)).await.expect("created");
    assert_eq!(store.enquiries.lock().await.len(), 1);
    assert_eq!(record.name, "Ada");
}

#[tokio::test]
async fn updating_the_deadline_rederives_priority() {
    let store = Arc::new(MemoryStore::default());
    let service = enquiry_service(&store, Arc::new(RecordingNotifier::default()));
    let record = service.create(new_enquiry(None, None)).await.expect("created");

    let tomorrow = OffsetDateTime::now_utc().date() + Duration::days(1);
    let updated = service
        .update(
            record.id,
            UpdateEnquiryParams {
                priority: Some(EnquiryPriority::Low),
                deadline: Some(Some(tomorrow)),
                ..Default::default()
            },
        )
        .await
        .expect("updated");
    assert_eq!(updated.priority, EnquiryPriority::High);
    assert_eq!(updated.deadline, Some(tomorrow));

    let cleared = service
        .update(
            record.id,
            UpdateEnquiryParams {
                deadline: Some(None),
                ..Default::default()
            },
        )
        .await
        .expect("cleared");
    assert_eq!(cleared.priority, EnquiryPriority::Medium);
    assert_eq!(cleared.deadline, None);
}

#[tokio::test]
async fn design_delete_purges_mockups_then_logos() {
    let store = Arc::new(MemoryStore::default());
    let purge = Arc::new(RecordingPurge::default());
    let service = design_service(
        &store,
        purge.clone(),
        Arc::new(RecordingNotifier::default()),
    );

    let record = service
        .create(new_design_enquiry(vec![
            "/uploads/logos/a.png".to_string(),
            "/uploads/logos/b.png".to_string(),
        ]))
        .await
        .expect("created");

    service.delete(record.id).await.expect("deleted");

    let deleted = purge.deleted.lock().expect("purge lock");
    let deleted: Vec<&str> = deleted.iter().map(String::as_str).collect();
    assert_eq!(
        deleted,
        [
            "/uploads/images/front.png",
            "/uploads/images/back.png",
            "/uploads/images/side.png",
            "/uploads/logos/a.png",
            "/uploads/logos/b.png",
        ]
    );
    assert!(store.design_enquiries.lock().await.is_empty());
}

#[tokio::test]
async fn purge_failure_does_not_block_delete() {
    let store = Arc::new(MemoryStore::default());
    let purge = Arc::new(RecordingPurge {
        fail: true,
        ..Default::default()
    });
    let service = design_service(&store, purge, Arc::new(RecordingNotifier::default()));

    let record = service
        .create(new_design_enquiry(Vec::new()))
        .await
        .expect("created");
    service.delete(record.id).await.expect("deleted despite purge failure");
    assert!(store.design_enquiries.lock().await.is_empty());
}

#[tokio::test]
async fn bulk_delete_purges_every_record() {
    let store = Arc::new(MemoryStore::default());
    let purge = Arc::new(RecordingPurge::default());
    let service = design_service(
        &store,
        purge.clone(),
        Arc::new(RecordingNotifier::default()),
    );

    service
        .create(new_design_enquiry(vec!["/uploads/logos/a.png".to_string()]))
        .await
        .expect("first");
    service
        .create(new_design_enquiry(Vec::new()))
        .await
        .expect("second");

    let deleted = service.delete_all().await.expect("bulk delete");
    assert_eq!(deleted, 2);
    // 3 mockups + 1 logo for the first record, 3 mockups for the second.
    assert_eq!(purge.deleted.lock().expect("purge lock").len(), 7);
    assert!(
        DesignEnquiriesRepo::list_all_design_enquiries(store.as_ref())
            .await
            .expect("list")
            .is_empty()
    );
}
