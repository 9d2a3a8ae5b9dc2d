use rand::{distributions::Alphanumeric, thread_rng, Rng};

const DOCUMENT_ID_LEN: usize = 20;

fn random_alphanumeric(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Opaque store-assigned identifier for new documents.
pub fn generate_document_id() -> String {
    random_alphanumeric(DOCUMENT_ID_LEN)
}

/// Identity uid for a newly created sign-in account.
pub fn generate_uid() -> String {
    random_alphanumeric(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_alphanumeric_and_distinct() {
        let a = generate_document_id();
        let b = generate_document_id();
        assert_eq!(a.len(), DOCUMENT_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
