use sha2::{Digest, Sha256};

use crate::JobRecord;

/// Unit separator keeps `("a", "bc")` and `("ab", "c")` from colliding.
const FIELD_SEP: char = '\u{1f}';

/// Derives the stable identifier used for deduplication.
///
/// Prefers the posting link; falls back to title plus company when the link
/// is empty. The identifier is a truncated SHA-256 digest, so the same record
/// always yields the same identifier across runs.
pub fn job_identifier(record: &JobRecord) -> String {
    let link = record.link.trim();
    if !link.is_empty() {
        return short_digest(link);
    }
    let key = format!("{}{FIELD_SEP}{}", record.title.trim(), record.company.trim());
    short_digest(&key)
}

/// Fills in a source identifier for records the extraction API returned
/// without one, derived from title, company and link.
pub fn synthesize_record_id(record: &JobRecord) -> String {
    let key = format!(
        "{}{FIELD_SEP}{}{FIELD_SEP}{}",
        record.title, record.company, record.link
    );
    short_digest(&key)
}

fn short_digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{UNKNOWN_COMPANY, UNSPECIFIED_LOCATION};

    fn record(title: &str, company: &str, link: &str) -> JobRecord {
        JobRecord {
            id: None,
            title: title.to_string(),
            company: company.to_string(),
            location: UNSPECIFIED_LOCATION.to_string(),
            link: link.to_string(),
            description: None,
        }
    }

    #[test]
    fn identifier_is_deterministic() {
        let a = record("React Developer", "Acme", "https://it.pracuj.pl/praca/1");
        let b = a.clone();
        assert_eq!(job_identifier(&a), job_identifier(&b));
    }

    #[test]
    fn link_takes_precedence_over_title_and_company() {
        let a = record("React Developer", "Acme", "https://it.pracuj.pl/praca/1");
        let b = record("Frontend Engineer", "Other", "https://it.pracuj.pl/praca/1");
        assert_eq!(job_identifier(&a), job_identifier(&b));
    }

    #[test]
    fn falls_back_to_title_and_company_without_link() {
        let a = record("React Developer", "Acme", "");
        let b = record("React Developer", "Acme", "  ");
        let c = record("React Developer", UNKNOWN_COMPANY, "");
        assert_eq!(job_identifier(&a), job_identifier(&b));
        assert_ne!(job_identifier(&a), job_identifier(&c));
    }

    #[test]
    fn identifier_is_fixed_width_hex() {
        let id = job_identifier(&record("React Developer", "Acme", "/praca/1"));
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
