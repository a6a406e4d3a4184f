//! SurrealDB implementation of [`AuditLogStore`].

use brickvest_core::error::CoreResult;
use brickvest_core::models::audit::{AuditLogEntry, NewAuditLogEntry};
use brickvest_core::storage::AuditLogStore;
use chrono::{DateTime, Utc};
use surrealdb::Connection;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{SurrealStorage, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AuditRow {
    admin_id: String,
    action: String,
    entity_type: String,
    entity_id: Option<String>,
    details: serde_json::Value,
    ip_address: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AuditRowWithId {
    record_id: String,
    admin_id: String,
    action: String,
    entity_type: String,
    entity_id: Option<String>,
    details: serde_json::Value,
    ip_address: Option<String>,
    created_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_entry(self, id: Uuid) -> Result<AuditLogEntry, DbError> {
        Ok(AuditLogEntry {
            id,
            admin_id: parse_uuid(&self.admin_id, "audit admin")?,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self
                .entity_id
                .as_deref()
                .map(|s| parse_uuid(s, "audit entity"))
                .transpose()?,
            details: self.details,
            ip_address: self.ip_address,
            created_at: self.created_at,
        })
    }
}

impl AuditRowWithId {
    fn try_into_entry(self) -> Result<AuditLogEntry, DbError> {
        let id = parse_uuid(&self.record_id, "audit entry")?;
        let row = AuditRow {
            admin_id: self.admin_id,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            details: self.details,
            ip_address: self.ip_address,
            created_at: self.created_at,
        };
        row.into_entry(id)
    }
}

impl<C: Connection> AuditLogStore for SurrealStorage<C> {
    async fn add_audit_log(&self, input: NewAuditLogEntry) -> CoreResult<AuditLogEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db()
            .query(
                "CREATE type::record('audit_log', $id) SET \
                 admin_id = $admin_id, \
                 action = $action, \
                 entity_type = $entity_type, \
                 entity_id = $entity_id, \
                 details = $details, \
                 ip_address = $ip_address",
            )
            .bind(("id", id_str.clone()))
            .bind(("admin_id", input.admin_id.to_string()))
            .bind(("action", input.action))
            .bind(("entity_type", input.entity_type))
            .bind(("entity_id", input.entity_id.map(|id| id.to_string())))
            .bind(("details", input.details))
            .bind(("ip_address", input.ip_address))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_log".into(),
            id: id_str,
        })?;

        Ok(row.into_entry(id)?)
    }

    async fn get_audit_logs(&self) -> CoreResult<Vec<AuditLogEntry>> {
        let mut result = self
            .db()
            .query(
                "SELECT meta::id(id) AS record_id, * FROM audit_log \
                 ORDER BY created_at DESC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;
        let entries = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(entries)
    }
}
