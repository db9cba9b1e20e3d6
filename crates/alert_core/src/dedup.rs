use crate::{job_identifier, JobRecord, SeenSet};

/// Filters out records whose identifier is already in `seen`, inserting new
/// identifiers as they are encountered.
///
/// Insertion happens per record, not at the end of the batch, so two records
/// in the same batch sharing an identifier are reported once. Persisting the
/// updated set is the caller's responsibility.
pub fn filter_new(records: Vec<JobRecord>, seen: &mut SeenSet) -> Vec<JobRecord> {
    let mut new_records = Vec::new();
    for record in records {
        let id = job_identifier(&record);
        if seen.insert(id) {
            new_records.push(record);
        }
    }
    new_records
}
