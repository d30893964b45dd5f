//! Tests for the transcript.

use sqlchat_session::{GREETING, Role, Transcript, Turn};

#[test]
fn starts_with_the_greeting() {
    let transcript = Transcript::new();
    assert_eq!(transcript.len(), 1);
    assert!(!transcript.is_empty());
    assert_eq!(transcript.turns()[0], Turn::assistant(GREETING));
    assert_eq!(GREETING, "How can I help you");
}

#[test]
fn appends_in_order() {
    let mut transcript = Transcript::default();
    transcript.push_user("how many rows");
    let last = transcript.push_assistant("3");
    assert_eq!(last.role, Role::Assistant);

    let roles: Vec<_> = transcript.turns().iter().map(|turn| turn.role).collect();
    assert_eq!(roles, [Role::Assistant, Role::User, Role::Assistant]);
    assert_eq!(transcript.last().text, "3");
}

#[test]
fn reset_leaves_only_the_greeting() {
    let mut transcript = Transcript::new();
    for i in 0..5 {
        transcript.push_user(format!("question {i}"));
        transcript.push_assistant(format!("answer {i}"));
    }

    transcript.reset();
    assert_eq!(transcript.turns(), [Turn::assistant(GREETING)]);

    transcript.reset();
    assert_eq!(transcript.len(), 1);
    assert!(!transcript.is_empty());
}
