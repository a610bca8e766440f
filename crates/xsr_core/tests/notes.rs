use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;
use xsr_core::{
    parse_report, Actor, FastenerReport, MutationOutcome, Project, TaskStateStore,
    TaskStoreError, TaskTemplate,
};

fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 6, 10, 15, 0).unwrap()
}

fn project() -> Project {
    let template = TaskTemplate::new(["Drilling"]).unwrap();
    let report = parse_report(
        "B/1  2  412.6\np101  1  HEA200  S355JR  4000  169.2\nTotal:  412.6\n",
        &template,
    );
    Project::new(
        "Warehouse Frame",
        report,
        FastenerReport::default(),
        fixed_clock(),
    )
    .unwrap()
}

#[test]
fn add_note_records_author_time_and_trimmed_text() {
    let mut project = project();
    let worker = Actor::new("Ayse", "Kaya");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);

    let first = store
        .add_note("p101", "B/1", 2, "  flange bent  ", &worker)
        .unwrap();
    let second = store
        .add_note("p101", "B/1", 2, "re-checked", &worker)
        .unwrap();
    assert_ne!(first, second);

    let instance = &store.project().part("p101").unwrap().instances("B/1").unwrap()[1];
    assert_eq!(instance.notes.len(), 2);
    let note = instance.note(&first).unwrap();
    assert_eq!(note.string_value, "flange bent");
    assert_eq!(note.added_by, "Ayse Kaya");
    assert_eq!(note.added_at, fixed_clock());
}

#[test]
fn blank_note_is_rejected() {
    let mut project = project();
    let worker = Actor::new("Ayse", "Kaya");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);

    assert_eq!(
        store.add_note("p101", "B/1", 1, " \n ", &worker).unwrap_err(),
        TaskStoreError::EmptyNote
    );
    let note_id = store.add_note("p101", "B/1", 1, "ok", &worker).unwrap();
    assert_eq!(
        store
            .edit_note("p101", "B/1", 1, &note_id, "", &worker)
            .unwrap_err(),
        TaskStoreError::EmptyNote
    );
}

#[test]
fn only_author_or_admin_may_edit() {
    let mut project = project();
    let author = Actor::new("Ayse", "Kaya");
    let other = Actor::new("Mehmet", "Demir");
    let admin = Actor::admin("Ali", "Can");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);
    let note_id = store
        .add_note("p101", "B/1", 1, "weld porosity", &author)
        .unwrap();

    let refused = store
        .edit_note("p101", "B/1", 1, &note_id, "looks fine", &other)
        .unwrap();
    assert_eq!(refused, MutationOutcome::Refused);
    let instance = &store.project().part("p101").unwrap().instances("B/1").unwrap()[0];
    assert_eq!(instance.note(&note_id).unwrap().string_value, "weld porosity");

    let edited = store
        .edit_note("p101", "B/1", 1, &note_id, "weld porosity, ground out", &author)
        .unwrap();
    assert!(edited.is_applied());
    let by_admin = store
        .edit_note("p101", "B/1", 1, &note_id, "repaired", &admin)
        .unwrap();
    assert!(by_admin.is_applied());

    let note = store.project().part("p101").unwrap().instances("B/1").unwrap()[0]
        .note(&note_id)
        .unwrap();
    assert_eq!(note.string_value, "repaired");
    assert_eq!(note.added_by, "Ayse Kaya");
}

#[test]
fn only_author_or_admin_may_delete() {
    let mut project = project();
    let author = Actor::new("Ayse", "Kaya");
    let other = Actor::new("Mehmet", "Demir");
    let admin = Actor::admin("Ali", "Can");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);
    let kept = store.add_note("p101", "B/1", 1, "keep", &author).unwrap();
    let dropped = store.add_note("p101", "B/1", 1, "drop", &author).unwrap();

    let refused = store
        .delete_note("p101", "B/1", 1, &dropped, &other)
        .unwrap();
    assert_eq!(refused, MutationOutcome::Refused);

    let deleted = store
        .delete_note("p101", "B/1", 1, &dropped, &admin)
        .unwrap();
    assert_eq!(deleted, MutationOutcome::Applied);

    let instance = &store.project().part("p101").unwrap().instances("B/1").unwrap()[0];
    let remaining: Vec<&str> = instance
        .notes
        .iter()
        .map(|note| note.string_value.as_str())
        .collect();
    assert_eq!(remaining, vec!["keep"]);

    assert!(store
        .delete_note("p101", "B/1", 1, &kept, &author)
        .unwrap()
        .is_applied());
}

#[test]
fn unknown_note_is_an_error() {
    let mut project = project();
    let author = Actor::new("Ayse", "Kaya");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);
    let missing = Uuid::new_v4().to_string();

    assert_eq!(
        store
            .delete_note("p101", "B/1", 1, &missing, &author)
            .unwrap_err(),
        TaskStoreError::NoteNotFound(missing)
    );
    assert_eq!(
        store
            .add_note("p101", "K/9", 1, "text", &author)
            .unwrap_err(),
        TaskStoreError::AssemblyNotFound {
            part: "p101".to_string(),
            assembly: "K/9".to_string(),
        }
    );
}
