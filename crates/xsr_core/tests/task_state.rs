use chrono::{DateTime, TimeZone, Utc};
use xsr_core::{
    parse_report, Actor, FastenerReport, MutationOutcome, Project, TaskStateStore, TaskStatus,
    TaskStoreError, TaskTemplate,
};

const REPORT: &str = "\
B/1  2  412.6
p101  1  HEA200  S355JR  4000  169.2
p102  2  PL10*200  S355JR  400  6.3
C/2  3  88.0
p102  4  PL10*200  S355JR  400  6.3
Total:  1234.5
";

fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap()
}

fn task_status<'p>(
    project: &'p Project,
    part_id: &str,
    assembly_id: &str,
    instance_id: u32,
    task: &str,
) -> &'p TaskStatus {
    project
        .part(part_id)
        .unwrap()
        .instances(assembly_id)
        .unwrap()
        .iter()
        .find(|instance| instance.id == instance_id)
        .unwrap()
        .tasks
        .get(task)
        .unwrap()
}

fn project() -> Project {
    let template = TaskTemplate::new(["Drilling", "Painting", "Primer"]).unwrap();
    Project::new(
        "Warehouse Frame",
        parse_report(REPORT, &template),
        FastenerReport::default(),
        fixed_clock(),
    )
    .unwrap()
}

#[test]
fn assign_reaches_every_instance_in_every_assembly() {
    let mut project = project();
    let foreman = Actor::new("Mehmet", "Demir");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);

    let written = store
        .assign_tasks("p102", ["Drilling", "Painting"], &foreman)
        .unwrap();
    // Two tasks on 2 + 3 instances.
    assert_eq!(written, 10);

    let plate = store.project().part("p102").unwrap();
    for instance in plate.assembly_instances.values().flatten() {
        assert!(instance.tasks["Drilling"].set);
        assert!(instance.tasks["Painting"].set);
        assert!(!instance.tasks["Primer"].set);
    }
    let beam = store.project().part("p101").unwrap();
    assert!(!beam.instances("B/1").unwrap()[0].tasks["Drilling"].set);
}

#[test]
fn assign_creates_instances_a_part_is_missing() {
    let mut project = project();
    project.part_mut("p101").unwrap().assembly_instances.clear();
    project
        .part_mut("p102")
        .unwrap()
        .assembly_instances
        .get_mut("C/2")
        .unwrap()
        .truncate(1);
    let foreman = Actor::new("Mehmet", "Demir");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);

    let written = store.assign_tasks("p101", ["Drilling"], &foreman).unwrap();
    assert_eq!(written, 2);
    let beam = store.project().part("p101").unwrap().instances("B/1").unwrap();
    let ids: Vec<u32> = beam.iter().map(|instance| instance.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(beam.iter().all(|instance| instance.tasks["Drilling"].set));

    store.assign_tasks("p102", ["Primer"], &foreman).unwrap();
    let plate = store.project().part("p102").unwrap().instances("C/2").unwrap();
    assert_eq!(plate.len(), 3);
    let names: Vec<&str> = plate[2].tasks.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Drilling", "Painting", "Primer"]);
    assert!(plate[2].tasks["Primer"].set);
    assert!(!plate[2].tasks["Drilling"].set);
}

#[test]
fn reassigning_a_done_task_resets_completion() {
    let mut project = project();
    let worker = Actor::new("Ayse", "Kaya");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);

    store.assign_tasks("p101", ["Drilling"], &worker).unwrap();
    store
        .set_task_done("p101", "B/1", 1, "Drilling", true, &worker)
        .unwrap();
    store.assign_tasks("p101", ["Drilling"], &worker).unwrap();

    let status = task_status(store.project(), "p101", "B/1", 1, "Drilling");
    assert!(status.set);
    assert!(!status.is_done);
    assert_eq!(status.done_by, None);
    assert_eq!(status.done_at, None);
}

#[test]
fn unassign_keeps_completion_metadata() {
    let mut project = project();
    let worker = Actor::new("Ayse", "Kaya");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);

    store.assign_tasks("p101", ["Drilling"], &worker).unwrap();
    store
        .set_task_done("p101", "B/1", 2, "Drilling", true, &worker)
        .unwrap();
    let touched = store.unassign_tasks("p101", ["Drilling"], &worker).unwrap();
    assert_eq!(touched, 2);

    let status = task_status(store.project(), "p101", "B/1", 2, "Drilling");
    assert!(!status.set);
    assert!(status.is_done);
    assert_eq!(status.done_by.as_deref(), Some("Ayse Kaya"));
    assert_eq!(status.done_at, Some(fixed_clock()));
    assert!(!status.is_completed());
}

#[test]
fn completion_records_author_and_time() {
    let mut project = project();
    let worker = Actor::new("Ayse", "Kaya");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);
    store.assign_tasks("p102", ["Primer"], &worker).unwrap();

    let outcome = store
        .set_task_done("p102", "C/2", 2, "Primer", true, &worker)
        .unwrap();
    assert!(outcome.is_applied());
    let status = task_status(store.project(), "p102", "C/2", 2, "Primer");
    assert!(status.is_completed());
    assert_eq!(status.done_by.as_deref(), Some("Ayse Kaya"));
    assert_eq!(status.done_at, Some(fixed_clock()));

    let undone = store
        .set_task_done("p102", "C/2", 2, "Primer", false, &worker)
        .unwrap();
    assert_eq!(undone, MutationOutcome::Applied);
    let status = task_status(store.project(), "p102", "C/2", 2, "Primer");
    assert!(!status.is_done);
    assert_eq!(status.done_by, None);
    assert_eq!(status.done_at, None);
}

#[test]
fn other_workers_cannot_touch_someone_elses_completion() {
    let mut project = project();
    let owner = Actor::new("Ayse", "Kaya");
    let other = Actor::new("Mehmet", "Demir");
    {
        let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);
        store.assign_tasks("p101", ["Painting"], &owner).unwrap();
        store
            .set_task_done("p101", "B/1", 1, "Painting", true, &owner)
            .unwrap();
    }
    let before = project.clone();

    let mut store = TaskStateStore::new(&mut project);
    let undo = store
        .set_task_done("p101", "B/1", 1, "Painting", false, &other)
        .unwrap();
    let redo = store
        .set_task_done("p101", "B/1", 1, "Painting", true, &other)
        .unwrap();
    assert_eq!(undo, MutationOutcome::Refused);
    assert_eq!(redo, MutationOutcome::Refused);
    assert_eq!(store.project(), &before);
}

#[test]
fn admin_can_undo_any_completion() {
    let mut project = project();
    let owner = Actor::new("Ayse", "Kaya");
    let admin = Actor::admin("Ali", "Can");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);
    store.assign_tasks("p101", ["Painting"], &owner).unwrap();
    store
        .set_task_done("p101", "B/1", 1, "Painting", true, &owner)
        .unwrap();

    let outcome = store
        .set_task_done("p101", "B/1", 1, "Painting", false, &admin)
        .unwrap();
    assert_eq!(outcome, MutationOutcome::Applied);
    let status = task_status(store.project(), "p101", "B/1", 1, "Painting");
    assert!(!status.is_done);
    assert_eq!(status.done_by, None);
}

#[test]
fn override_is_reserved_for_admins() {
    let mut project = project();
    let worker = Actor::new("Ayse", "Kaya");
    let admin = Actor::admin("Ali", "Can");
    let done_at = Utc.with_ymd_and_hms(2026, 2, 27, 16, 0, 0).unwrap();
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);

    let refused = store
        .override_completion("p102", "B/1", 2, "Drilling", "Ayse Kaya", done_at, &worker)
        .unwrap();
    assert_eq!(refused, MutationOutcome::Refused);
    assert!(!task_status(store.project(), "p102", "B/1", 2, "Drilling").is_done);

    let applied = store
        .override_completion("p102", "B/1", 2, "Drilling", "Hasan Yilmaz", done_at, &admin)
        .unwrap();
    assert_eq!(applied, MutationOutcome::Applied);
    let status = task_status(store.project(), "p102", "B/1", 2, "Drilling");
    assert!(status.is_completed());
    assert_eq!(status.done_by.as_deref(), Some("Hasan Yilmaz"));
    assert_eq!(status.done_at, Some(done_at));

    // The recorded author can now undo it themselves.
    let hasan = Actor::new("Hasan", "Yilmaz");
    let undone = store
        .set_task_done("p102", "B/1", 2, "Drilling", false, &hasan)
        .unwrap();
    assert!(undone.is_applied());
}

#[test]
fn unknown_targets_are_typed_errors() {
    let mut project = project();
    let worker = Actor::new("Ayse", "Kaya");
    let mut store = TaskStateStore::with_clock(&mut project, fixed_clock);

    assert_eq!(
        store.assign_tasks("p404", ["Drilling"], &worker).unwrap_err(),
        TaskStoreError::PartNotFound("p404".to_string())
    );
    assert_eq!(
        store
            .set_task_done("p101", "C/2", 1, "Drilling", true, &worker)
            .unwrap_err(),
        TaskStoreError::AssemblyNotFound {
            part: "p101".to_string(),
            assembly: "C/2".to_string(),
        }
    );
    assert_eq!(
        store
            .set_task_done("p101", "B/1", 9, "Drilling", true, &worker)
            .unwrap_err(),
        TaskStoreError::InstanceNotFound {
            part: "p101".to_string(),
            assembly: "B/1".to_string(),
            instance: 9,
        }
    );
    assert_eq!(
        store
            .set_task_done("p101", "B/1", 1, "Galvanizing", true, &worker)
            .unwrap_err(),
        TaskStoreError::TaskNotFound {
            part: "p101".to_string(),
            task: "Galvanizing".to_string(),
        }
    );
}
