/// Version lifecycle: list, create, fetch, update, archive, with
/// owner-or-admin authorization on mutations.
mod common;

use assetver_core::errors::{ExErrorKind, VersioningError};
use assetver_core::{AssetId, AssetVersionType, AssetVersionUpdate, VersionId};
use common::{acting, acting_admin, draft, memory_service};
use serde_json::json;

#[test]
fn test_create_then_list_returns_versions_in_order() {
    // GIVEN a service acting as alice
    let service = memory_service("alice", 10);

    // WHEN three versions of one asset are created
    for comment in ["first", "second", "third"] {
        service
            .create(AssetVersionType::Cohort, draft(42).with_comment(comment))
            .expect("Should create version");
    }

    // THEN they list in ascending version order
    let versions = service
        .list_versions(AssetVersionType::Cohort, AssetId(42))
        .unwrap();
    let numbers: Vec<u32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(versions[2].comment.as_deref(), Some("third"));
}

#[test]
fn test_list_of_unknown_asset_is_empty() {
    let service = memory_service("alice", 10);
    let versions = service
        .list_versions(AssetVersionType::Pathway, AssetId(999))
        .unwrap();
    assert!(versions.is_empty());
}

#[test]
fn test_versions_are_isolated_by_asset_and_type() {
    // GIVEN versions of asset 1 under two types, and of asset 2
    let service = memory_service("alice", 10);
    service.create(AssetVersionType::Cohort, draft(1)).unwrap();
    service.create(AssetVersionType::Cohort, draft(1)).unwrap();
    service.create(AssetVersionType::ConceptSet, draft(1)).unwrap();
    service.create(AssetVersionType::Cohort, draft(2)).unwrap();

    // THEN numbering is independent per (type, asset)
    let latest_cohort_1 = service
        .get_latest(AssetVersionType::Cohort, AssetId(1))
        .unwrap();
    let latest_concept_1 = service
        .get_latest(AssetVersionType::ConceptSet, AssetId(1))
        .unwrap();
    let latest_cohort_2 = service
        .get_latest(AssetVersionType::Cohort, AssetId(2))
        .unwrap();
    assert_eq!(latest_cohort_1.version, 2);
    assert_eq!(latest_concept_1.version, 1);
    assert_eq!(latest_cohort_2.version, 1);
}

#[test]
fn test_get_by_id_round_trips_saved_fields() {
    // GIVEN a created version with a payload
    let service = memory_service("alice", 10);
    let payload = json!({"expression": {"criteria": [1, 2, 3]}});
    let created = service
        .create(
            AssetVersionType::Characterization,
            draft(5).with_comment("baseline").with_payload(payload.clone()),
        )
        .unwrap();

    // WHEN fetching it by id
    let fetched = service
        .get_by_id(AssetVersionType::Characterization, created.id)
        .unwrap();

    // THEN every field is preserved
    assert_eq!(fetched, created);
    assert_eq!(fetched.payload, payload);
    assert_eq!(fetched.created_by.as_str(), "alice");
    assert!(!fetched.archived);
}

#[test]
fn test_get_by_id_missing_is_not_found() {
    let service = memory_service("alice", 10);
    let err = service
        .get_by_id(AssetVersionType::Cohort, VersionId(12345))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.op(), Some("get_version"));
    assert_eq!(err.version_id(), Some(VersionId(12345)));
}

#[test]
fn test_get_by_id_does_not_cross_types() {
    // GIVEN a cohort version
    let service = memory_service("alice", 10);
    let created = service.create(AssetVersionType::Cohort, draft(1)).unwrap();

    // WHEN fetching its id under another type
    let err = service
        .get_by_id(AssetVersionType::IncidenceRate, created.id)
        .unwrap_err();

    // THEN it is not found there
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_get_latest_of_empty_asset_is_not_found() {
    let service = memory_service("alice", 10);
    let err = service
        .get_latest(AssetVersionType::Cohort, AssetId(77))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.asset_id(), Some(AssetId(77)));
}

#[test]
fn test_owner_updates_comment_and_version_is_unchanged() {
    // GIVEN a version created by alice
    let service = memory_service("alice", 10);
    let created = service
        .create(AssetVersionType::Cohort, draft(1).with_comment("draft"))
        .unwrap();

    // WHEN alice updates the comment
    let updated = service
        .update(
            AssetVersionType::Cohort,
            AssetVersionUpdate {
                id: created.id,
                comment: Some("reviewed".to_string()),
                archived: false,
            },
        )
        .expect("Should update own version");

    // THEN only the comment changes
    assert_eq!(updated.comment.as_deref(), Some("reviewed"));
    assert_eq!(updated.version, created.version);
    assert_eq!(updated.asset_id, created.asset_id);
    assert_eq!(updated.created_by, created.created_by);
    assert_eq!(updated.created_date, created.created_date);
    assert_eq!(updated.payload, created.payload);

    // AND a re-read agrees
    let reread = service
        .get_by_id(AssetVersionType::Cohort, created.id)
        .unwrap();
    assert_eq!(reread, updated);
}

#[test]
fn test_non_owner_update_is_forbidden_and_record_unchanged() {
    // GIVEN a version created by alice
    let service = memory_service("alice", 10);
    let created = service
        .create(AssetVersionType::Cohort, draft(1).with_comment("mine"))
        .unwrap();

    // WHEN bob, not an admin, tries to update it
    let err = acting(&service, "bob")
        .update(
            AssetVersionType::Cohort,
            AssetVersionUpdate {
                id: created.id,
                comment: Some("hijacked".to_string()),
                archived: true,
            },
        )
        .unwrap_err();

    // THEN the update is forbidden
    assert_eq!(err.kind(), ExErrorKind::Forbidden);
    assert_eq!(err.code(), "ERR_FORBIDDEN");
    assert_eq!(err.op(), Some("update_version"));

    // AND the record is untouched
    let reread = service
        .get_by_id(AssetVersionType::Cohort, created.id)
        .unwrap();
    assert_eq!(reread, created);
}

#[test]
fn test_admin_may_update_foreign_version() {
    let service = memory_service("alice", 10);
    let created = service.create(AssetVersionType::Pathway, draft(3)).unwrap();

    let updated = acting_admin(&service, "root")
        .update(
            AssetVersionType::Pathway,
            AssetVersionUpdate {
                id: created.id,
                comment: Some("moderated".to_string()),
                archived: false,
            },
        )
        .expect("Admin should update any version");

    assert_eq!(updated.comment.as_deref(), Some("moderated"));
    // authorship stays with the creator
    assert_eq!(updated.created_by.as_str(), "alice");
}

#[test]
fn test_update_clears_comment_when_absent() {
    let service = memory_service("alice", 10);
    let created = service
        .create(AssetVersionType::Cohort, draft(1).with_comment("temp"))
        .unwrap();

    let updated = service
        .update(
            AssetVersionType::Cohort,
            AssetVersionUpdate {
                id: created.id,
                comment: None,
                archived: false,
            },
        )
        .unwrap();

    assert_eq!(updated.comment, None);
}

#[test]
fn test_update_missing_version_is_not_found() {
    let service = memory_service("alice", 10);
    let err = service
        .update(
            AssetVersionType::Cohort,
            AssetVersionUpdate {
                id: VersionId(404),
                comment: None,
                archived: false,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_archive_is_soft_and_restorable() {
    // GIVEN a version created by alice
    let service = memory_service("alice", 10);
    let created = service.create(AssetVersionType::ConceptSet, draft(9)).unwrap();

    // WHEN alice archives it
    service
        .archive(AssetVersionType::ConceptSet, created.id)
        .expect("Should archive own version");

    // THEN it is still readable and listed, with archived set
    let archived = service
        .get_by_id(AssetVersionType::ConceptSet, created.id)
        .unwrap();
    assert!(archived.archived);
    let listed = service
        .list_versions(AssetVersionType::ConceptSet, AssetId(9))
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].archived);

    // WHEN alice restores it through update
    let restored = service
        .update(
            AssetVersionType::ConceptSet,
            AssetVersionUpdate {
                id: created.id,
                comment: archived.comment.clone(),
                archived: false,
            },
        )
        .unwrap();

    // THEN it is active again
    assert!(!restored.archived);
}

#[test]
fn test_archive_twice_is_idempotent() {
    let service = memory_service("alice", 10);
    let created = service.create(AssetVersionType::Cohort, draft(1)).unwrap();

    service.archive(AssetVersionType::Cohort, created.id).unwrap();
    service.archive(AssetVersionType::Cohort, created.id).unwrap();

    let reread = service
        .get_by_id(AssetVersionType::Cohort, created.id)
        .unwrap();
    assert!(reread.archived);
}

#[test]
fn test_non_owner_archive_is_forbidden() {
    // GIVEN a version created by alice
    let service = memory_service("alice", 10);
    let created = service.create(AssetVersionType::Cohort, draft(1)).unwrap();

    // WHEN bob tries to archive it
    let err = acting(&service, "bob")
        .archive(AssetVersionType::Cohort, created.id)
        .unwrap_err();

    // THEN it is forbidden and the version stays active
    assert_eq!(err.kind(), ExErrorKind::Forbidden);
    assert!(
        !service
            .get_by_id(AssetVersionType::Cohort, created.id)
            .unwrap()
            .archived
    );
}

#[test]
fn test_admin_may_archive_foreign_version() {
    let service = memory_service("alice", 10);
    let created = service.create(AssetVersionType::Cohort, draft(1)).unwrap();

    acting_admin(&service, "root")
        .archive(AssetVersionType::Cohort, created.id)
        .expect("Admin should archive any version");

    assert!(
        service
            .get_by_id(AssetVersionType::Cohort, created.id)
            .unwrap()
            .archived
    );
}

#[test]
fn test_archive_missing_version_is_not_found() {
    let service = memory_service("alice", 10);
    let err = service
        .archive(AssetVersionType::Cohort, VersionId(1))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_new_versions_are_created_by_acting_identity() {
    // GIVEN alice created version 1
    let service = memory_service("alice", 10);
    service.create(AssetVersionType::Cohort, draft(1)).unwrap();

    // WHEN bob creates the next version of the same asset
    let bobs = acting(&service, "bob")
        .create(AssetVersionType::Cohort, draft(1))
        .unwrap();

    // THEN bob owns version 2, and alice may not archive it
    assert_eq!(bobs.version, 2);
    assert_eq!(bobs.created_by.as_str(), "bob");
    let err = service
        .archive(AssetVersionType::Cohort, bobs.id)
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);
}

#[test]
fn test_zero_initial_version_is_invalid_input() {
    // GIVEN a service over memory stores
    let service = memory_service("alice", 10);

    // WHEN creating with an initial version of 0
    let err = service
        .create(AssetVersionType::Cohort, draft(1).with_initial_version(0))
        .unwrap_err();

    // THEN the request is rejected and nothing is stored
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.code(), "ERR_INVALID_INPUT");
    assert!(service
        .list_versions(AssetVersionType::Cohort, AssetId(1))
        .unwrap()
        .is_empty());
}

#[test]
fn test_forbidden_maps_from_domain_error() {
    let err: assetver_core::ExError = VersioningError::NotOwnerOrAdmin {
        actor: "bob".into(),
        owner: "alice".into(),
    }
    .into();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);
}
