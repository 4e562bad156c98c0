mod common;

use common::{PAST_DEADLINE, deadline_in, run_session, stdout_of};
use time::Duration;

#[test]
fn elapsed_deadline_prompts_and_delete_removes_task() {
    let input = format!("add \"Submit report\" -d {PAST_DEADLINE}\ndelete\nshow all\nexit\n");
    let output = run_session(&[], &input);
    let stdout = stdout_of(&output);

    assert!(output.status.success());
    assert!(stdout.contains("? Deadline passed for \"Submit report (Deadline: 2000-01-01 00:00)\""));
    assert!(stdout.contains("- change"));
    assert!(stdout.contains("Deleted task: task-1"));
    assert!(stdout.contains("No tasks here ✨"));
}

#[test]
fn keep_is_not_asked_again() {
    let input = format!("add x -d {PAST_DEADLINE}\nkeep\ntick\ntick\nshow all\nexit\n");
    let output = run_session(&[], &input);
    let stdout = stdout_of(&output);

    assert_eq!(stdout.matches("? Deadline passed").count(), 1);
    assert_eq!(stdout.matches("No elapsed deadlines").count(), 2);
    assert!(stdout.contains("task-1"));
}

#[test]
fn unrecognized_answer_keeps_task() {
    let input = format!("add x -d {PAST_DEADLINE}\nlater maybe\ntick\nexit\n");
    let output = run_session(&[], &input);
    let stdout = stdout_of(&output);

    assert!(!stdout.contains("Deleted task"));
    assert!(stdout.contains("No elapsed deadlines"));
}

#[test]
fn change_reschedules_with_a_future_deadline() {
    let next = deadline_in(Duration::hours(2));
    let input = format!("add x -d {PAST_DEADLINE}\nchange\n{next}\nshow upcoming\ntick\nexit\n");
    let output = run_session(&[], &input);
    let stdout = stdout_of(&output);

    assert!(stdout.contains("? Enter new deadline"));
    assert!(stdout.contains("Updated task: x (Deadline:"));
    let upcoming = stdout.split("Upcoming Deadlines").nth(1).unwrap();
    assert!(upcoming.contains("task-1"));
    assert!(stdout.contains("No elapsed deadlines"));
}

#[test]
fn change_refuses_past_deadline_then_accepts_cancel() {
    let input = format!("add x -d {PAST_DEADLINE}\nchange\n{PAST_DEADLINE}\n\ntick\nexit\n");
    let output = run_session(&[], &input);
    let stdout = stdout_of(&output);

    assert!(stdout.contains("must be a future"));
    assert!(!stdout.contains("Updated task"));
    assert!(stdout.contains("No elapsed deadlines"));
}

#[test]
fn completed_task_with_elapsed_deadline_asks_to_delete() {
    let input = format!("add x\ndone task-1\ndeadline task-1 {PAST_DEADLINE}\ny\nshow all\nexit\n");
    let output = run_session(&[], &input);
    let stdout = stdout_of(&output);

    assert!(stdout.contains("is complete. Delete this task? [y/N]"));
    assert!(stdout.contains("Deleted task: task-1"));
    assert!(stdout.contains("No tasks here ✨"));
}

#[test]
fn declined_delete_leaves_completed_task() {
    let input = format!("add x\ndone task-1\ndeadline task-1 {PAST_DEADLINE}\nn\ntick\nshow all\nexit\n");
    let output = run_session(&[], &input);
    let stdout = stdout_of(&output);

    assert!(!stdout.contains("Deleted task"));
    assert!(stdout.contains("No elapsed deadlines"));
    assert!(stdout.contains("✅"));
}

#[test]
fn closing_input_during_a_prompt_ends_the_session() {
    let input = format!("add x -d {PAST_DEADLINE}\n");
    let output = run_session(&[], &input);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("? Deadline passed"));
}

#[test]
fn future_deadline_is_not_prompted() {
    let due = deadline_in(Duration::days(2));
    let input = format!("add x -d {due}\ntick\nexit\n");
    let output = run_session(&[], &input);
    let stdout = stdout_of(&output);

    assert!(!stdout.contains("? Deadline passed"));
    assert!(stdout.contains("No elapsed deadlines"));
}
