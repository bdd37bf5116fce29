//! One request builder per REST resource.
//!
//! Both clients share these builders, so the URL, projection and body of a
//! call are identical whether it runs blocking or async.

use super::request::{discard, expect_json, Call, FilePart, Request};
use super::url::{QueryValue, UrlBuilder};
use crate::codec::{self, WireValue};
use crate::model::{
    Agile, Entity, Issue, IssueAttachment, IssueComment, IssueCustomFieldType, IssueLink,
    IssueLinkDirection, IssueLinkType, IssueWorkItem, Project, ProjectCustomFieldType, Sprint, Tag,
    User, WorkItemType,
};
use crate::projection::{field_selector, field_tree, FieldTree};
use crate::schema::Schema;
use crate::Result;

/// Extra fields requested for project custom fields so that their name, type
/// and bundle values are always available.
const PROJECT_CUSTOM_FIELD_EXTRA: &str = "field(name,fieldType(id)),bundle(values(id,name))";

/// Offset and page size of a list request.
///
/// A `count` of -1 asks the server for every remaining item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub count: i64,
}

impl Page {
    pub fn new(offset: i64, count: i64) -> Self {
        Self { offset, count }
    }

    /// The first `count` items.
    pub fn first(count: i64) -> Self {
        Self { offset: 0, count }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            count: -1,
        }
    }
}

fn selector<T: Schema>() -> Result<Option<String>> {
    Ok(field_selector::<T>()?)
}

fn entity_body<E: Entity>(entity: &E) -> Result<Vec<u8>> {
    Ok(codec::encode_entity(entity)?)
}

/// Builds the [`Call`] for every supported resource.
#[derive(Debug, Clone)]
pub struct Endpoints {
    urls: UrlBuilder,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            urls: UrlBuilder::new(base_url),
        }
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    fn get_one<T: Entity>(&self, path: &str) -> Result<Call<T>> {
        let fields = selector::<T>()?;
        let url = self.urls.build_url(path, fields.as_deref(), None, None, &[]);
        Ok(Call::new(Request::get(url), expect_json::<T>))
    }

    fn get_list<T: Entity>(&self, path: &str, page: Page) -> Result<Call<Vec<T>>> {
        let fields = selector::<T>()?;
        let url = self.urls.build_url(
            path,
            fields.as_deref(),
            Some(page.offset),
            Some(page.count),
            &[],
        );
        Ok(Call::new(Request::get(url), expect_json::<Vec<T>>))
    }

    fn post_entity<T: Entity, B: Entity>(
        &self,
        path: &str,
        body: &B,
        extra: &[(&str, QueryValue)],
    ) -> Result<Call<T>> {
        let fields = selector::<T>()?;
        let url = self.urls.build_url(path, fields.as_deref(), None, None, extra);
        Ok(Call::new(
            Request::post(url, Some(entity_body(body)?)),
            expect_json::<T>,
        ))
    }

    fn post_files(&self, path: &str, files: Vec<FilePart>) -> Result<Call<Vec<IssueAttachment>>> {
        let fields = selector::<IssueAttachment>()?;
        let url = self.urls.build_url(path, fields.as_deref(), None, None, &[]);
        Ok(Call::new(
            Request::post(url, None).with_files(files),
            expect_json::<Vec<IssueAttachment>>,
        ))
    }

    fn delete(&self, path: &str) -> Call<()> {
        let url = self.urls.build_url(path, None, None, None, &[]);
        Call::new(Request::delete(url), discard)
    }

    pub fn get_issue(&self, issue_id: &str) -> Result<Call<Issue>> {
        self.get_one(&format!("/issues/{}", issue_id))
    }

    /// Issues matching `query`, projected onto `T`.
    ///
    /// `custom_fields` restricts the returned custom fields by name.
    pub fn get_issues<T: Entity>(
        &self,
        query: Option<&str>,
        custom_fields: &[&str],
        page: Page,
    ) -> Result<Call<Vec<T>>> {
        let fields = selector::<T>()?;
        let custom_fields: Vec<String> = custom_fields.iter().map(|name| name.to_string()).collect();
        let url = self.urls.build_url(
            "/issues/",
            fields.as_deref(),
            Some(page.offset),
            Some(page.count),
            &[
                ("query", QueryValue::from(query)),
                ("customFields", QueryValue::from(custom_fields)),
            ],
        );
        Ok(Call::new(Request::get(url), expect_json::<Vec<T>>))
    }

    pub fn create_issue(&self, issue: &Issue) -> Result<Call<Issue>> {
        self.post_entity("/issues", issue, &[])
    }

    pub fn update_issue(
        &self,
        issue_id: &str,
        issue: &Issue,
        mute_update_notifications: bool,
    ) -> Result<Call<Issue>> {
        self.post_entity(
            &format!("/issues/{}", issue_id),
            issue,
            &[(
                "muteUpdateNotifications",
                QueryValue::from(mute_update_notifications),
            )],
        )
    }

    pub fn delete_issue(&self, issue_id: &str) -> Call<()> {
        self.delete(&format!("/issues/{}", issue_id))
    }

    pub fn get_issue_custom_fields(
        &self,
        issue_id: &str,
        page: Page,
    ) -> Result<Call<Vec<IssueCustomFieldType>>> {
        let fields = selector::<IssueCustomFieldType>()?;
        let url = self.urls.build_url(
            &format!("/issues/{}/customFields", issue_id),
            fields.as_deref(),
            Some(page.offset),
            Some(page.count),
            &[],
        );
        Ok(Call::new(
            Request::get(url),
            expect_json::<Vec<IssueCustomFieldType>>,
        ))
    }

    /// Update one custom field of an issue. The field is addressed by its id.
    pub fn update_issue_custom_field(
        &self,
        issue_id: &str,
        field: &IssueCustomFieldType,
        mute_update_notifications: bool,
    ) -> Result<Call<IssueCustomFieldType>> {
        let fields = selector::<IssueCustomFieldType>()?;
        let url = self.urls.build_url(
            &format!(
                "/issues/{}/customFields/{}",
                issue_id,
                field.id().unwrap_or_default()
            ),
            fields.as_deref(),
            None,
            None,
            &[(
                "muteUpdateNotifications",
                QueryValue::from(mute_update_notifications),
            )],
        );
        let body = codec::to_wire_bytes(&WireValue::Map(field.wire_map()?))?;
        Ok(Call::new(
            Request::post(url, Some(body)),
            expect_json::<IssueCustomFieldType>,
        ))
    }

    /// Custom fields attached to a project.
    ///
    /// The field name, field type id and bundle values are always requested
    /// on top of the projection. `$top` is only sent for a bounded page.
    pub fn get_project_custom_fields(
        &self,
        project_id: &str,
        page: Page,
    ) -> Result<Call<Vec<ProjectCustomFieldType>>> {
        let mut tree = field_tree(&ProjectCustomFieldType::type_descriptor())?;
        tree.merge(FieldTree::parse(PROJECT_CUSTOM_FIELD_EXTRA));
        let fields = tree.to_string();
        let count = (page.count != -1).then_some(page.count);
        let url = self.urls.build_url(
            &format!("/admin/projects/{}/customFields", project_id),
            Some(&fields),
            Some(page.offset),
            count,
            &[],
        );
        Ok(Call::new(
            Request::get(url),
            expect_json::<Vec<ProjectCustomFieldType>>,
        ))
    }

    pub fn get_issue_comments(&self, issue_id: &str, page: Page) -> Result<Call<Vec<IssueComment>>> {
        self.get_list(&format!("/issues/{}/comments", issue_id), page)
    }

    pub fn create_issue_comment(
        &self,
        issue_id: &str,
        comment: &IssueComment,
    ) -> Result<Call<IssueComment>> {
        self.post_entity(&format!("/issues/{}/comments", issue_id), comment, &[])
    }

    /// Update a comment. The comment is addressed by its id.
    pub fn update_issue_comment(
        &self,
        issue_id: &str,
        comment: &IssueComment,
        mute_update_notifications: bool,
    ) -> Result<Call<IssueComment>> {
        self.post_entity(
            &format!(
                "/issues/{}/comments/{}",
                issue_id,
                comment.id().as_deref().unwrap_or_default()
            ),
            comment,
            &[(
                "muteUpdateNotifications",
                QueryValue::from(mute_update_notifications),
            )],
        )
    }

    /// Hide a comment by marking it deleted.
    pub fn hide_issue_comment(&self, issue_id: &str, comment_id: &str) -> Result<Call<()>> {
        let comment = IssueComment::new()
            .with_id(Some(comment_id.to_string()))
            .with_deleted(Some(true));
        let call: Call<IssueComment> = self.update_issue_comment(issue_id, &comment, false)?;
        Ok(Call::new(call.request, |request, body| {
            expect_json::<IssueComment>(request, body).map(|_| ())
        }))
    }

    pub fn delete_issue_comment(&self, issue_id: &str, comment_id: &str) -> Call<()> {
        self.delete(&format!("/issues/{}/comments/{}", issue_id, comment_id))
    }

    pub fn get_issue_attachments(
        &self,
        issue_id: &str,
        page: Page,
    ) -> Result<Call<Vec<IssueAttachment>>> {
        self.get_list(&format!("/issues/{}/attachments", issue_id), page)
    }

    pub fn create_issue_attachments(
        &self,
        issue_id: &str,
        files: Vec<FilePart>,
    ) -> Result<Call<Vec<IssueAttachment>>> {
        self.post_files(&format!("/issues/{}/attachments", issue_id), files)
    }

    pub fn create_comment_attachments(
        &self,
        issue_id: &str,
        comment_id: &str,
        files: Vec<FilePart>,
    ) -> Result<Call<Vec<IssueAttachment>>> {
        self.post_files(
            &format!("/issues/{}/comments/{}/attachments", issue_id, comment_id),
            files,
        )
    }

    pub fn get_issue_work_items(
        &self,
        issue_id: &str,
        page: Page,
    ) -> Result<Call<Vec<IssueWorkItem>>> {
        self.get_list(&format!("/issues/{}/timeTracking/workItems", issue_id), page)
    }

    pub fn create_issue_work_item(
        &self,
        issue_id: &str,
        work_item: &IssueWorkItem,
    ) -> Result<Call<IssueWorkItem>> {
        self.post_entity(
            &format!("/issues/{}/timeTracking/workItems", issue_id),
            work_item,
            &[],
        )
    }

    pub fn get_projects(&self, page: Page) -> Result<Call<Vec<Project>>> {
        self.get_list("/admin/projects", page)
    }

    pub fn get_project_work_item_types(
        &self,
        project_id: &str,
        page: Page,
    ) -> Result<Call<Vec<WorkItemType>>> {
        self.get_list(
            &format!("/admin/projects/{}/timeTrackingSettings/workItemTypes", project_id),
            page,
        )
    }

    pub fn get_tags(&self, page: Page) -> Result<Call<Vec<Tag>>> {
        self.get_list("/tags", page)
    }

    /// Tag an issue with an existing tag. The response is ignored.
    pub fn add_issue_tag(&self, issue_id: &str, tag: &Tag) -> Result<Call<()>> {
        let url = self
            .urls
            .build_url(&format!("/issues/{}/tags", issue_id), None, None, None, &[]);
        Ok(Call::new(Request::post(url, Some(entity_body(tag)?)), discard))
    }

    pub fn get_users(&self, page: Page) -> Result<Call<Vec<User>>> {
        self.get_list("/users", page)
    }

    pub fn get_issue_links(&self, issue_id: &str, page: Page) -> Result<Call<Vec<IssueLink>>> {
        self.get_list(&format!("/issues/{}/links", issue_id), page)
    }

    pub fn get_issue_link_types(&self, page: Page) -> Result<Call<Vec<IssueLinkType>>> {
        self.get_list("/issueLinkTypes", page)
    }

    /// Link `source_issue_id` to `target_issue_id`.
    ///
    /// The link type id gets a `s` (outward) or `t` (inward) suffix for
    /// directed link types.
    pub fn link_issues(
        &self,
        source_issue_id: &str,
        target_issue_id: &str,
        link_type_id: &str,
        direction: IssueLinkDirection,
    ) -> Result<Call<Issue>> {
        let target = Issue::new().with_id(Some(target_issue_id.to_string()));
        self.post_entity(
            &format!(
                "/issues/{}/links/{}{}/issues",
                source_issue_id,
                link_type_id,
                direction.path_suffix()
            ),
            &target,
            &[],
        )
    }

    pub fn delete_issue_link(
        &self,
        source_issue_id: &str,
        target_issue_id: &str,
        link_type_id: &str,
    ) -> Call<()> {
        self.delete(&format!(
            "/issues/{}/links/{}/issues/{}",
            source_issue_id, link_type_id, target_issue_id
        ))
    }

    pub fn get_agiles(&self, page: Page) -> Result<Call<Vec<Agile>>> {
        self.get_list("/agiles", page)
    }

    pub fn get_agile(&self, agile_id: &str) -> Result<Call<Agile>> {
        self.get_one(&format!("/agiles/{}", agile_id))
    }

    pub fn get_sprints(&self, agile_id: &str, page: Page) -> Result<Call<Vec<Sprint>>> {
        self.get_list(&format!("/agiles/{}/sprints", agile_id), page)
    }

    pub fn get_sprint(&self, agile_id: &str, sprint_id: &str) -> Result<Call<Sprint>> {
        self.get_one(&format!("/agiles/{}/sprints/{}", agile_id, sprint_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use serde_json::{json, Value};

    fn endpoints() -> Endpoints {
        Endpoints::new("https://server")
    }

    fn body_json(request: &Request) -> Value {
        serde_json::from_slice(request.body.as_ref().unwrap()).unwrap()
    }

    #[test]
    fn test_page_default() {
        assert_eq!(Page::default(), Page::new(0, -1));
        assert_eq!(Page::first(1), Page::new(0, 1));
    }

    #[test]
    fn test_get_issue_url() {
        let call = endpoints().get_issue("HD-1").unwrap();
        assert_eq!(call.request.method, Method::Get);
        assert!(call
            .request
            .url
            .starts_with("https://server/api/issues/HD-1?fields=%24type%2Cid%2CidReadable"));
    }

    #[test]
    fn test_list_sends_default_page() {
        let call = endpoints().get_tags(Page::default()).unwrap();
        assert_eq!(
            call.request.url,
            "https://server/api/tags?fields=%24type%2Cid%2Cname&%24skip=0&%24top=-1"
        );
    }

    #[test]
    fn test_get_issues_query_parameters() {
        let call = endpoints()
            .get_issues::<Project>(Some("project: HD"), &["State"], Page::new(5, 10))
            .unwrap();
        assert_eq!(
            call.request.url,
            "https://server/api/issues/?fields=%24type%2Cid%2Cname%2CshortName&%24skip=5&%24top=10&query=project%3A%20HD&customFields=State"
        );
    }

    #[test]
    fn test_project_custom_fields_top_omitted() {
        let call = endpoints()
            .get_project_custom_fields("0-0", Page::default())
            .unwrap();
        assert!(call.request.url.contains("&%24skip=0"));
        assert!(!call.request.url.contains("%24top"));

        let encoded = call.request.url.split("fields=").nth(1).unwrap();
        let encoded = encoded.split('&').next().unwrap();
        let selector = urlencoding::decode(encoded).unwrap();
        let names: Vec<&str> = selector.split([',', '(', ')']).collect();
        assert_eq!(names.iter().filter(|n| **n == "field").count(), 1, "{}", selector);
        assert_eq!(names.iter().filter(|n| **n == "bundle").count(), 1, "{}", selector);
        assert_eq!(names.iter().filter(|n| **n == "fieldType").count(), 1, "{}", selector);
        assert!(selector.starts_with("$type,id,"));

        let call = endpoints()
            .get_project_custom_fields("0-0", Page::first(3))
            .unwrap();
        assert!(call.request.url.ends_with("&%24skip=0&%24top=3"));
    }

    #[test]
    fn test_hide_comment_body() {
        let call = endpoints().hide_issue_comment("HD-1", "4-17").unwrap();
        assert_eq!(call.request.method, Method::Post);
        assert!(call
            .request
            .url
            .starts_with("https://server/api/issues/HD-1/comments/4-17?fields="));
        assert!(call.request.url.ends_with("&muteUpdateNotifications=false"));
        assert_eq!(
            body_json(&call.request),
            json!({"id": "4-17", "deleted": true, "$type": "IssueComment"})
        );
    }

    #[test]
    fn test_link_issues_path_and_body() {
        let call = endpoints()
            .link_issues("HD-1", "HD-2", "77-1", IssueLinkDirection::Inward)
            .unwrap();
        assert!(call
            .request
            .url
            .starts_with("https://server/api/issues/HD-1/links/77-1t/issues?fields="));
        assert_eq!(body_json(&call.request), json!({"id": "HD-2", "$type": "Issue"}));
    }

    #[test]
    fn test_delete_issue_link() {
        let call = endpoints().delete_issue_link("HD-1", "HD-2", "77-1");
        assert_eq!(call.request.method, Method::Delete);
        assert_eq!(
            call.request.url,
            "https://server/api/issues/HD-1/links/77-1/issues/HD-2"
        );
    }

    #[test]
    fn test_add_issue_tag_has_no_fields() {
        let tag = Tag::new().with_id(Some("6-0".into()));
        let call = endpoints().add_issue_tag("HD-1", &tag).unwrap();
        assert_eq!(call.request.url, "https://server/api/issues/HD-1/tags");
        assert_eq!(body_json(&call.request), json!({"id": "6-0", "$type": "Tag"}));
        assert!(call.parse(None).is_ok());
    }

    #[test]
    fn test_attachments_are_multipart() {
        let call = endpoints()
            .create_issue_attachments("HD-1", vec![FilePart::new("a.txt", b"a".to_vec())])
            .unwrap();
        assert!(call.request.body.is_none());
        assert_eq!(call.request.files.len(), 1);
    }
}
