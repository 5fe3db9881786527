use serde_json::Value;

/// Structured record of a domain event on the `audit` tracing target.
pub fn log_audit(
    user_id: Option<i64>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) {
    tracing::info!(
        target: "audit",
        user_id = ?user_id,
        action,
        resource = resource.unwrap_or("-"),
        metadata = %metadata.unwrap_or(serde_json::Value::Null),
        "audit event"
    );
}
