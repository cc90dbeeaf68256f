use santiye_application::{AuditLogQuery, AuditLogRepository, AuditRecord, AuditRepository};
use santiye_core::UserId;
use santiye_domain::{AuditAction, AuditChange};

use super::PostgresAuditLogRepository;
use crate::PostgresAuditRepository;
use crate::test_support::test_pool;

fn record(actor_id: UserId, action: AuditAction, record_id: &str) -> AuditRecord {
    AuditRecord {
        actor_id,
        actor_name: "Depo Sorumlusu".to_owned(),
        action,
        entity_name: "materials".to_owned(),
        record_id: Some(record_id.to_owned()),
        change: AuditChange::message(format!("{} {record_id}", action.as_str())),
        ip_address: Some("10.0.4.17".to_owned()),
        user_agent: Some("santiye-admin/1.0".to_owned()),
    }
}

#[tokio::test]
async fn appended_entries_are_listed_newest_first_with_filters() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let writer = PostgresAuditRepository::new(pool.clone());
    let reader = PostgresAuditLogRepository::new(pool.clone());
    let actor_id = UserId::new();

    for (action, record_id) in [
        (AuditAction::Create, "record-1"),
        (AuditAction::Update, "record-1"),
        (AuditAction::Delete, "record-2"),
    ] {
        assert!(
            writer
                .append_entry(record(actor_id, action, record_id))
                .await
                .is_ok()
        );
    }

    let listed = reader
        .list_entries(AuditLogQuery {
            limit: 10,
            actor_id: Some(actor_id),
            ..AuditLogQuery::default()
        })
        .await;
    assert!(listed.is_ok());
    let listed = listed.unwrap_or_default();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].action, AuditAction::Delete);
    assert_eq!(listed[0].ip_address.as_deref(), Some("10.0.4.17"));
    assert_eq!(listed[0].change, AuditChange::message("DELETE record-2"));

    let filtered = reader
        .list_entries(AuditLogQuery {
            limit: 10,
            actor_id: Some(actor_id),
            record_id: Some("record-1".to_owned()),
            action: Some(AuditAction::Update),
            ..AuditLogQuery::default()
        })
        .await;
    assert_eq!(filtered.map(|entries| entries.len()).unwrap_or_default(), 1);
}

#[tokio::test]
async fn audit_rows_cannot_be_rewritten() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let writer = PostgresAuditRepository::new(pool.clone());
    let actor_id = UserId::new();
    assert!(
        writer
            .append_entry(record(actor_id, AuditAction::Create, "record-9"))
            .await
            .is_ok()
    );

    let deleted = sqlx::query("DELETE FROM audit_logs WHERE user_id = $1")
        .bind(actor_id.as_uuid())
        .execute(&pool)
        .await;
    assert!(deleted.is_err());
}
