//! Agile boards and sprints.

use chrono::{DateTime, Utc};

use crate::entity;

use super::common::{Project, User, UserGroup};
use super::issue::Issue;

entity! {
    /// Board reference embedded in a sprint.
    pub struct AgileRef: "Agile" {
        id: Option<String>,
        name: Option<String>,
    }
}

entity! {
    /// Sprint reference embedded in a board.
    pub struct SprintRef: "Sprint" {
        id: Option<String>,
        name: Option<String>,
    }
}

entity! {
    pub struct Agile: "Agile" {
        id: Option<String>,
        name: Option<String>,
        owner: Option<User>,
        visible_for as "visibleFor": Option<UserGroup>,
        projects: Option<Vec<Project>>,
        sprints: Option<Vec<SprintRef>>,
        current_sprint as "currentSprint": Option<SprintRef>,
    }
}

entity! {
    pub struct Sprint: "Sprint" {
        id: Option<String>,
        name: Option<String>,
        agile: Option<AgileRef>,
        goal: Option<String>,
        start: Option<DateTime<Utc>>,
        finish: Option<DateTime<Utc>>,
        archived: Option<bool>,
        is_default as "isDefault": Option<bool>,
        issues: Option<Vec<Issue>>,
        unresolved_issues_count as "unresolvedIssuesCount": Option<i64>,
        previous_sprint as "previousSprint": Option<SprintRef>,
    }
}
