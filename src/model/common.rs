//! Small shared entities: users, projects, tags and field values.

use crate::entity;

entity! {
    /// A YouTrack user. The current user is reported with the `Me` tag.
    pub struct User: "User" | "Me" {
        id: Option<String>,
        name: Option<String>,
        ring_id as "ringId": Option<String>,
        login: Option<String>,
        email: Option<String>,
    }
}

entity! {
    pub struct UserGroup: "UserGroup" {
        id: Option<String>,
        name: Option<String>,
        ring_id as "ringId": Option<String>,
    }
}

entity! {
    /// Value of a text custom field.
    pub struct TextFieldValue: "TextFieldValue" {
        id: Option<String>,
        text: Option<String>,
        /// Source text in markdown.
        markdown_text as "markdownText": Option<String>,
    }
}

entity! {
    /// Value of a period custom field.
    pub struct PeriodValue: "PeriodValue" {
        id: Option<String>,
        minutes: Option<i64>,
        /// Human readable form, e.g. `1w 2d`.
        presentation: Option<String>,
    }
}

entity! {
    /// Duration of a work item.
    pub struct DurationValue: "DurationValue" {
        id: Option<String>,
        minutes: Option<i64>,
        presentation: Option<String>,
    }
}

entity! {
    /// Type of a custom field, e.g. `enum[1]` or `date and time`.
    pub struct FieldType: "FieldType" {
        id: Option<String>,
    }
}

entity! {
    /// A custom field prototype shared between projects.
    pub struct CustomField: "CustomField" {
        id: Option<String>,
        name: Option<String>,
        field_type as "fieldType": Option<FieldType>,
    }
}

entity! {
    pub struct Project: "Project" {
        id: Option<String>,
        name: Option<String>,
        short_name as "shortName": Option<String>,
    }
}

entity! {
    pub struct Tag: "Tag" {
        id: Option<String>,
        name: Option<String>,
    }
}
