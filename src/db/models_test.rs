//! Tests for domain models.

use std::str::FromStr;

use crate::db::models::*;

#[test]
fn task_status_roundtrip() {
    for status in [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ] {
        let parsed = TaskStatus::from_str(&status.to_string()).unwrap();
        assert_eq!(parsed, status);
    }
    assert!(TaskStatus::from_str("done").is_err());
}

#[test]
fn task_priority_roundtrip() {
    for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
        let parsed = TaskPriority::from_str(&priority.to_string()).unwrap();
        assert_eq!(parsed, priority);
    }
    assert!(TaskPriority::from_str("urgent").is_err());
    assert_eq!(TaskPriority::default(), TaskPriority::Medium);
}

#[test]
fn sender_type_roundtrip() {
    assert_eq!(SenderType::from_str("assistant").unwrap(), SenderType::Assistant);
    assert_eq!(SenderType::from_str("user").unwrap(), SenderType::User);
    assert!(SenderType::from_str("system").is_err());
}

#[test]
fn conversation_status_roundtrip() {
    assert_eq!(
        ConversationStatus::from_str("active").unwrap(),
        ConversationStatus::Active
    );
    assert_eq!(
        ConversationStatus::from_str("archived").unwrap(),
        ConversationStatus::Archived
    );
    assert!(ConversationStatus::from_str("open").is_err());
}

#[test]
fn set_status_maintains_completed_at() {
    let mut task = Task {
        id: "t1".to_string(),
        user_id: "u1".to_string(),
        conversation_id: None,
        title: "Buy milk".to_string(),
        description: String::new(),
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        deadline: None,
        tags: vec![],
        created_at: "2026-01-01 00:00:00".to_string(),
        updated_at: "2026-01-01 00:00:00".to_string(),
        completed_at: None,
    };

    task.set_status(TaskStatus::Completed);
    assert_eq!(task.status, TaskStatus::Completed);
    assert!(task.completed_at.is_some());

    task.set_status(TaskStatus::InProgress);
    assert_eq!(task.status, TaskStatus::InProgress);
    assert!(task.completed_at.is_none());
}

#[test]
fn task_status_serde_uses_snake_case() {
    let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
    assert_eq!(json, "\"in_progress\"");
    let back: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
    assert_eq!(back, TaskStatus::Completed);
}

#[test]
fn list_result_empty_echoes_page() {
    let page = PageSort {
        limit: Some(10),
        offset: Some(5),
        ..Default::default()
    };
    let empty: ListResult<Message> = ListResult::empty(&page);
    assert!(empty.items.is_empty());
    assert_eq!(empty.total, 0);
    assert_eq!(empty.limit, Some(10));
    assert_eq!(empty.offset, 5);
}
