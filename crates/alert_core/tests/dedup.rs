use alert_core::{filter_new, job_identifier, JobRecord, SeenSet};

fn record(title: &str, link: &str) -> JobRecord {
    JobRecord {
        id: None,
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Warszawa".to_string(),
        link: link.to_string(),
        description: None,
    }
}

#[test]
fn known_identifier_is_filtered_and_new_one_kept() {
    let known = record("React Developer", "https://it.pracuj.pl/praca/111");
    let fresh = record("Frontend Engineer", "https://it.pracuj.pl/praca/222");
    let known_id = job_identifier(&known);
    let fresh_id = job_identifier(&fresh);

    let mut seen = SeenSet::from_ids([known_id.clone()]);
    let new_records = filter_new(vec![known, fresh.clone()], &mut seen);

    assert_eq!(new_records, vec![fresh]);
    assert_eq!(seen.len(), 2);
    assert!(seen.contains(&known_id));
    assert!(seen.contains(&fresh_id));
}

#[test]
fn second_run_over_same_batch_yields_nothing() {
    let batch = vec![
        record("React Developer", "https://it.pracuj.pl/praca/1"),
        record("Frontend Engineer", "https://it.pracuj.pl/praca/2"),
    ];
    let mut seen = SeenSet::new();

    let first = filter_new(batch.clone(), &mut seen);
    assert_eq!(first.len(), 2);

    let second = filter_new(batch, &mut seen);
    assert!(second.is_empty());
}

#[test]
fn duplicates_within_one_batch_are_reported_once() {
    let a = record("React Developer", "https://it.pracuj.pl/praca/1");
    let b = record("React Developer (repost)", "https://it.pracuj.pl/praca/1");
    let mut seen = SeenSet::new();

    // Same link, therefore same identifier.
    let new_records = filter_new(vec![a.clone(), b], &mut seen);

    assert_eq!(new_records, vec![a]);
    assert_eq!(seen.len(), 1);
}

#[test]
fn empty_batch_leaves_seen_untouched() {
    let mut seen = SeenSet::from_ids(["abc".to_string()]);
    let new_records = filter_new(Vec::new(), &mut seen);
    assert!(new_records.is_empty());
    assert_eq!(seen.len(), 1);
}
