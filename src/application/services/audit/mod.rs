use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};

/// Writes an audit entry. Failures are logged and swallowed so they never
/// fail the surrounding request.
pub async fn record<A: AuditLogRepository + ?Sized>(repo: &A, event: AuditEvent) {
    if let Err(err) = repo.record(&event).await {
        tracing::warn!(
            event = event.event,
            entity_type = ?event.entity_type,
            entity_id = ?event.entity_id,
            error = ?err,
            "audit_log_write_failed"
        );
    }
}
