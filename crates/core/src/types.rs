/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Check whether a value is a well-formed entity id.
///
/// BIGSERIAL keys start at 1, so anything non-positive can be rejected
/// before touching the database.
pub fn is_valid_id(id: DbId) -> bool {
    id > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_ids_are_valid() {
        assert!(is_valid_id(1));
        assert!(is_valid_id(i64::MAX));
    }

    #[test]
    fn zero_and_negative_ids_are_invalid() {
        assert!(!is_valid_id(0));
        assert!(!is_valid_id(-7));
    }
}
