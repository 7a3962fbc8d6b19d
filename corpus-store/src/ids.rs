use uuid::Uuid;

/// Deterministic UUIDv5 from an arbitrary string id.
///
/// Qdrant point ids must be UUIDs or integers; deriving them from the
/// record id keeps upserts idempotent across ingestion runs.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_id_same_uuid() {
        assert_eq!(stable_uuid("chunk_0"), stable_uuid("chunk_0"));
        assert_ne!(stable_uuid("chunk_0"), stable_uuid("chunk_1"));
    }
}
