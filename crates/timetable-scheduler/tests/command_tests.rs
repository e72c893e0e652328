//! Tests for the scheduling commands: create / update / move / delete.

use timetable_engine::grid::{Day, Hour};
use timetable_engine::occurrence::{
    AcademicYearId, ClassroomId, DisciplineId, EventType, GroupId, LearningId, OccurrenceId,
    Semester, TeacherId, UserId,
};
use timetable_engine::recurrence::Recurrence;
use timetable_scheduler::{
    CreateOccurrence, DeleteOccurrence, MemoryStore, MoveOccurrence, OccurrenceStore, Scheduler,
    StaticDirectory, UpdateOccurrence,
};

const ACTOR: UserId = UserId(9);

fn hour(h: u8) -> Hour {
    Hour::new(h).unwrap()
}

fn directory() -> StaticDirectory {
    let mut dir = StaticDirectory::new();
    dir.add_teacher(TeacherId(1), "Prof.", "Ada", "Lovelace");
    dir.add_teacher(TeacherId(2), "Dr.", "Alan", "Turing");
    dir.add_teacher(TeacherId(3), "Dr.", "Grace", "Hopper");
    dir.add_classroom(ClassroomId(1), "A-101");
    dir.add_classroom(ClassroomId(2), "A-102");
    dir.add_classroom(ClassroomId(3), "B-201");
    dir.add_classroom(ClassroomId(4), "B-202");
    dir.add_discipline(DisciplineId(1), "Algorithms");
    dir.add_group(GroupId(1), "CS-201");
    dir.add_group(GroupId(2), "CS-202");
    dir.add_academic_year(AcademicYearId(1), "2025-2026");
    dir.add_learning(LearningId(1), "Undergraduate");
    dir
}

fn scheduler() -> Scheduler<MemoryStore, StaticDirectory> {
    Scheduler::new(MemoryStore::new(), directory())
}

fn create_request(
    day: Day,
    start: u8,
    end: u8,
    teacher: u64,
    room: u64,
    recurrence: Recurrence,
) -> CreateOccurrence {
    CreateOccurrence {
        day,
        start_hour: hour(start),
        end_hour: hour(end),
        event_type: EventType::Course,
        event_recurrence: recurrence,
        semester: Semester::ONE,
        academic_year_id: AcademicYearId(1),
        learning_id: LearningId(1),
        teacher_id: TeacherId(teacher),
        discipline_id: DisciplineId(1),
        classroom_id: ClassroomId(room),
        group_ids: vec![GroupId(1)],
    }
}

fn update_request(id: OccurrenceId) -> UpdateOccurrence {
    UpdateOccurrence {
        id,
        day: None,
        start_hour: None,
        end_hour: None,
        event_type: None,
        event_recurrence: None,
        semester: None,
        academic_year_id: None,
        learning_id: None,
        teacher_id: None,
        discipline_id: None,
        classroom_id: None,
        group_ids: None,
    }
}

#[test]
fn create_returns_the_new_id() {
    let mut scheduler = scheduler();
    let response = scheduler.create(
        create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All),
        ACTOR,
    );

    assert!(response.success);
    let id = response.id.unwrap();
    let stored = scheduler.store().find_by_id(id).unwrap().unwrap();
    assert_eq!(stored.day, Day::Monday);
    assert_eq!(stored.duration(), 2);
    assert_eq!(stored.created_by, ACTOR);
}

#[test]
fn teacher_double_booking_is_rejected() {
    let mut scheduler = scheduler();
    assert!(
        scheduler
            .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
            .success
    );

    // Same teacher, different room, same slot.
    let response = scheduler.create(
        create_request(Day::Monday, 8, 10, 1, 2, Recurrence::All),
        ACTOR,
    );

    assert!(!response.success);
    let message = response.message.unwrap();
    assert!(
        message.contains("teacher already booked on Monday 08:00-10:00"),
        "message should name the resource and interval: {message}"
    );
    assert_eq!(scheduler.store().len(), 1, "no partial write");
}

#[test]
fn room_conflict_with_an_every_week_booking() {
    let mut scheduler = scheduler();
    assert!(
        scheduler
            .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
            .success
    );

    // Different teacher, same room; even weeks still collide with all-weeks.
    let response = scheduler.create(
        create_request(Day::Monday, 8, 10, 2, 1, Recurrence::Even),
        ACTOR,
    );

    assert!(!response.success);
    assert!(response.message.unwrap().contains("room already booked"));
}

#[test]
fn opposite_parities_share_teacher_and_slot() {
    let mut scheduler = scheduler();
    let odd = scheduler.create(
        create_request(Day::Monday, 8, 10, 3, 3, Recurrence::Odd),
        ACTOR,
    );
    let even = scheduler.create(
        create_request(Day::Monday, 8, 10, 3, 4, Recurrence::Even),
        ACTOR,
    );

    assert!(odd.success);
    assert!(even.success, "disjoint weeks never conflict");
}

#[test]
fn back_to_back_bookings_both_succeed() {
    let mut scheduler = scheduler();
    assert!(
        scheduler
            .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
            .success
    );
    assert!(
        scheduler
            .create(create_request(Day::Monday, 10, 12, 1, 1, Recurrence::All), ACTOR)
            .success
    );
}

#[test]
fn validation_accumulates_field_errors() {
    let mut scheduler = scheduler();
    let mut request = create_request(Day::Monday, 10, 10, 99, 1, Recurrence::All);
    request.group_ids = vec![];

    let response = scheduler.create(request, ACTOR);

    assert!(!response.success);
    let errors = response.errors.unwrap();
    assert!(errors.contains_key("startHour"), "empty window");
    assert!(errors.contains_key("groupIds"), "empty group set");
    assert!(errors.contains_key("teacherId"), "unknown teacher");
    assert!(scheduler.store().is_empty(), "no store access on bad input");
}

#[test]
fn the_duration_cap_is_enforced() {
    let mut scheduler = scheduler();
    let response = scheduler.create(
        create_request(Day::Monday, 8, 15, 1, 1, Recurrence::All),
        ACTOR,
    );

    assert!(!response.success);
    assert!(response.errors.unwrap().contains_key("duration"));
}

#[test]
fn update_merges_supplied_fields_over_stored() {
    let mut scheduler = scheduler();
    let id = scheduler
        .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
        .id
        .unwrap();

    let mut request = update_request(id);
    request.classroom_id = Some(ClassroomId(2));
    let response = scheduler.update(request, UserId(5));

    assert!(response.success);
    let stored = scheduler.store().find_by_id(id).unwrap().unwrap();
    assert_eq!(stored.classroom_id, ClassroomId(2));
    assert_eq!(stored.day, Day::Monday, "omitted fields keep stored values");
    assert_eq!(stored.teacher_id, TeacherId(1));
    assert_eq!(stored.created_by, ACTOR);
    assert_eq!(stored.updated_by, UserId(5));
}

#[test]
fn update_at_an_unchanged_position_is_not_a_self_conflict() {
    let mut scheduler = scheduler();
    let id = scheduler
        .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
        .id
        .unwrap();

    let mut request = update_request(id);
    request.event_type = Some(EventType::Seminar);
    let response = scheduler.update(request, ACTOR);

    assert!(response.success, "self must be excluded from comparison");
}

#[test]
fn update_conflict_leaves_the_stored_occurrence_untouched() {
    let mut scheduler = scheduler();
    assert!(
        scheduler
            .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
            .success
    );
    let id = scheduler
        .create(create_request(Day::Monday, 12, 14, 1, 1, Recurrence::All), ACTOR)
        .id
        .unwrap();

    // Drag the second booking onto the first one's window.
    let mut request = update_request(id);
    request.start_hour = Some(hour(9));
    request.end_hour = Some(hour(11));
    let response = scheduler.update(request, ACTOR);

    assert!(!response.success);
    let stored = scheduler.store().find_by_id(id).unwrap().unwrap();
    assert_eq!(stored.start_hour, hour(12), "rejected update must not mutate");
    assert_eq!(stored.end_hour, hour(14));
}

#[test]
fn update_replaces_the_group_set_wholesale() {
    let mut scheduler = scheduler();
    let id = scheduler
        .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
        .id
        .unwrap();

    let mut request = update_request(id);
    request.group_ids = Some(vec![GroupId(2)]);
    assert!(scheduler.update(request, ACTOR).success);

    let stored = scheduler.store().find_by_id(id).unwrap().unwrap();
    assert_eq!(stored.group_ids, vec![GroupId(2)]);
}

#[test]
fn update_cannot_empty_the_group_set() {
    let mut scheduler = scheduler();
    let id = scheduler
        .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
        .id
        .unwrap();

    let mut request = update_request(id);
    request.group_ids = Some(vec![]);
    let response = scheduler.update(request, ACTOR);

    assert!(!response.success);
    assert!(response.errors.unwrap().contains_key("groupIds"));
}

#[test]
fn update_of_a_missing_occurrence_is_not_found() {
    let mut scheduler = scheduler();
    let response = scheduler.update(update_request(OccurrenceId(404)), ACTOR);

    assert!(!response.success);
    assert!(response.message.unwrap().contains("not found"));
}

#[test]
fn move_keeps_the_stored_duration() {
    let mut scheduler = scheduler();
    let id = scheduler
        .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
        .id
        .unwrap();

    let response = scheduler.move_occurrence(
        MoveOccurrence {
            id,
            day: Day::Tuesday,
            start_hour: hour(8),
            academic_year_id: AcademicYearId(1),
        },
        ACTOR,
    );

    assert!(response.success);
    let stored = scheduler.store().find_by_id(id).unwrap().unwrap();
    assert_eq!(stored.day, Day::Tuesday);
    assert_eq!(stored.start_hour, hour(8));
    assert_eq!(stored.end_hour, hour(10), "2h duration re-derived server-side");
}

#[test]
fn move_onto_an_occupied_slot_is_rejected() {
    let mut scheduler = scheduler();
    let id = scheduler
        .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
        .id
        .unwrap();
    assert!(
        scheduler
            .create(create_request(Day::Tuesday, 8, 10, 1, 2, Recurrence::All), ACTOR)
            .success
    );

    let response = scheduler.move_occurrence(
        MoveOccurrence {
            id,
            day: Day::Tuesday,
            start_hour: hour(8),
            academic_year_id: AcademicYearId(1),
        },
        ACTOR,
    );

    assert!(!response.success);
    assert!(response.message.unwrap().contains("teacher already booked"));
    let stored = scheduler.store().find_by_id(id).unwrap().unwrap();
    assert_eq!(stored.day, Day::Monday, "rejected move must not mutate");
    assert_eq!(stored.start_hour, hour(8));
}

#[test]
fn move_past_the_end_of_the_day_is_rejected() {
    let mut scheduler = scheduler();
    let id = scheduler
        .create(create_request(Day::Monday, 14, 20, 1, 1, Recurrence::All), ACTOR)
        .id
        .unwrap();

    // 6h starting at 16:00 would end at 22:00, off the grid.
    let response = scheduler.move_occurrence(
        MoveOccurrence {
            id,
            day: Day::Monday,
            start_hour: hour(16),
            academic_year_id: AcademicYearId(1),
        },
        ACTOR,
    );

    assert!(!response.success);
    assert!(response.errors.unwrap().contains_key("startHour"));
    let stored = scheduler.store().find_by_id(id).unwrap().unwrap();
    assert_eq!(stored.start_hour, hour(14), "rejected move must not mutate");
}

#[test]
fn delete_frees_the_slot_for_recreation() {
    let mut scheduler = scheduler();
    let id = scheduler
        .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
        .id
        .unwrap();

    // Occupied: the same teacher cannot be booked again.
    let rejected = scheduler.create(
        create_request(Day::Monday, 8, 10, 1, 2, Recurrence::All),
        ACTOR,
    );
    assert!(!rejected.success);

    let deleted = scheduler.delete(DeleteOccurrence {
        id,
        academic_year_id: AcademicYearId(1),
    });
    assert!(deleted.success);
    assert_eq!(scheduler.store().find_by_id(id).unwrap(), None);

    // The originally rejected request now goes through.
    let retried = scheduler.create(
        create_request(Day::Monday, 8, 10, 1, 2, Recurrence::All),
        ACTOR,
    );
    assert!(retried.success);
}

#[test]
fn deleting_a_missing_occurrence_is_not_found() {
    let mut scheduler = scheduler();
    let response = scheduler.delete(DeleteOccurrence {
        id: OccurrenceId(404),
        academic_year_id: AcademicYearId(1),
    });

    assert!(!response.success);
    assert!(response.message.unwrap().contains("not found"));
}

#[test]
fn different_scopes_never_collide() {
    let mut scheduler = scheduler();
    let mut dir_request = create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All);
    assert!(scheduler.create(dir_request.clone(), ACTOR).success);

    // Same teacher, room, day, and hours, but the other semester.
    dir_request.semester = Semester::TWO;
    assert!(scheduler.create(dir_request, ACTOR).success);
}

#[test]
fn calendar_lists_the_scope_sorted_and_resolved() {
    let mut scheduler = scheduler();
    assert!(
        scheduler
            .create(create_request(Day::Tuesday, 10, 12, 2, 2, Recurrence::All), ACTOR)
            .success
    );
    assert!(
        scheduler
            .create(create_request(Day::Monday, 8, 10, 1, 1, Recurrence::All), ACTOR)
            .success
    );
    assert!(
        scheduler
            .create(create_request(Day::Monday, 12, 14, 3, 3, Recurrence::Even), ACTOR)
            .success
    );

    let entries = scheduler
        .calendar(AcademicYearId(1), Semester::ONE)
        .unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].day, Day::Monday);
    assert_eq!(entries[0].start_hour, hour(8));
    assert_eq!(entries[1].day, Day::Monday);
    assert_eq!(entries[1].start_hour, hour(12));
    assert_eq!(entries[2].day, Day::Tuesday);

    assert_eq!(entries[0].teacher, "Prof. Ada Lovelace");
    assert_eq!(entries[0].room, "A-101");
    assert_eq!(entries[0].subject, "Algorithms");
    assert_eq!(entries[0].groups, vec!["CS-201".to_string()]);
    assert_eq!(entries[1].week_type, Recurrence::Even);
}
