//! Issues and the records attached to them.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::codec::{DecodeError, View, WireField, WireValue};
use crate::entity;
use crate::schema::{Schema, TypeDescriptor};

use super::common::{DurationValue, Project, Tag, User};
use super::custom_fields::IssueCustomFieldType;

entity! {
    pub struct Issue: "Issue" {
        id: Option<String>,
        /// Human readable id such as `HD-25`.
        id_readable as "idReadable": Option<String>,
        created: Option<DateTime<Utc>>,
        updated: Option<DateTime<Utc>>,
        resolved: Option<DateTime<Utc>>,
        project: Option<Project>,
        reporter: Option<User>,
        updater: Option<User>,
        summary: Option<String>,
        description: Option<String>,
        wikified_description as "wikifiedDescription": Option<String>,
        comments_count as "commentsCount": Option<i64>,
        tags: Option<Vec<Tag>>,
        custom_fields as "customFields": Option<Vec<IssueCustomFieldType>>,
    }
}

impl Issue {
    /// Path of the issue in the web UI, relative to the server root.
    ///
    /// Combine with [`UrlBuilder::get_absolute_url`](crate::api::UrlBuilder::get_absolute_url)
    /// to get a link.
    pub fn url(&self) -> String {
        format!("/issue/{}", self.id_readable.as_deref().unwrap_or_default())
    }
}

entity! {
    pub struct IssueAttachment: "IssueAttachment" {
        id: Option<String>,
        name: Option<String>,
        author: Option<User>,
        created: Option<DateTime<Utc>>,
        updated: Option<DateTime<Utc>>,
        mime_type as "mimeType": Option<String>,
        /// Download path relative to the server root.
        url: Option<String>,
    }
}

entity! {
    pub struct IssueComment: "IssueComment" {
        id: Option<String>,
        text: Option<String>,
        text_preview as "textPreview": Option<String>,
        created: Option<DateTime<Utc>>,
        updated: Option<DateTime<Utc>>,
        author: Option<User>,
        attachments: Option<Vec<IssueAttachment>>,
        /// Set when the comment was hidden.
        deleted: Option<bool>,
    }
}

entity! {
    pub struct IssueLinkType: "IssueLinkType" {
        id: Option<String>,
        name: Option<String>,
        localized_name as "localizedName": Option<String>,
        source_to_target as "sourceToTarget": Option<String>,
        localized_source_to_target as "localizedSourceToTarget": Option<String>,
        target_to_source as "targetToSource": Option<String>,
        localized_target_to_source as "localizedTargetToSource": Option<String>,
        directed: Option<bool>,
        aggregation: Option<bool>,
        read_only as "readOnly": Option<bool>,
    }
}

/// Direction of a link as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Outward,
    Inward,
    Both,
}

impl LinkDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkDirection::Outward => "OUTWARD",
            LinkDirection::Inward => "INWARD",
            LinkDirection::Both => "BOTH",
        }
    }
}

impl Schema for LinkDirection {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar("link direction")
    }
}

impl WireField for LinkDirection {
    fn to_wire(&self, _view: View) -> WireValue {
        WireValue::String(self.as_str().to_string())
    }

    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        match value.as_str() {
            Some("OUTWARD") => Ok(LinkDirection::Outward),
            Some("INWARD") => Ok(LinkDirection::Inward),
            Some("BOTH") => Ok(LinkDirection::Both),
            _ => Err(DecodeError::invalid_type(
                key,
                "OUTWARD, INWARD or BOTH",
                value,
            )),
        }
    }
}

/// Direction used when creating a link between two issues.
///
/// Selects the suffix appended to the link type id in the request path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IssueLinkDirection {
    /// Source is the outward end, e.g. "depends on".
    Outward,
    /// Source is the inward end, e.g. "is required for".
    Inward,
    /// Undirected link types.
    #[default]
    Both,
}

impl IssueLinkDirection {
    pub fn path_suffix(&self) -> &'static str {
        match self {
            IssueLinkDirection::Outward => "s",
            IssueLinkDirection::Inward => "t",
            IssueLinkDirection::Both => "",
        }
    }
}

entity! {
    /// Links of one type between an issue and other issues.
    pub struct IssueLink {
        id: Option<String>,
        direction: Option<LinkDirection>,
        link_type as "linkType": Option<IssueLinkType>,
        issues: Option<Vec<Issue>>,
        trimmed_issues as "trimmedIssues": Option<Vec<Issue>>,
    }
}

entity! {
    pub struct WorkItemType: "WorkItemType" {
        id: Option<String>,
        name: Option<String>,
    }
}

entity! {
    /// Time spent on an issue.
    pub struct IssueWorkItem: "IssueWorkItem" {
        id: Option<String>,
        author: Option<User>,
        creator: Option<User>,
        text: Option<String>,
        text_preview as "textPreview": Option<String>,
        work_item_type as "type": Option<WorkItemType>,
        created: Option<DateTime<Utc>>,
        updated: Option<DateTime<Utc>>,
        duration: Option<DurationValue>,
        date: Option<DateTime<Utc>>,
    }
}
