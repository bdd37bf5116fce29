//! Blocking YouTrack client.
//!
//! Mirrors [`crate::api::YouTrackClient`] method for method, running each
//! request on the calling thread.

use tracing::{debug, info, instrument, warn};

use super::auth::Auth;
use super::endpoints::{Endpoints, Page};
use super::request::{check_response, Call, FilePart, Request};
use super::transport::{BlockingReqwestTransport, Timeouts, Transport};
use crate::config::{Profile, Settings};
use crate::model::{
    Agile, Entity, Issue, IssueAttachment, IssueComment, IssueCustomFieldType, IssueLink,
    IssueLinkDirection, IssueLinkType, IssueWorkItem, Project, ProjectCustomFieldType, Sprint, Tag,
    User, WorkItemType,
};
use crate::Result;

/// The blocking YouTrack REST client.
#[derive(Debug)]
pub struct YouTrackClient<T = BlockingReqwestTransport> {
    transport: T,
    auth: Auth,
    endpoints: Endpoints,
}

impl YouTrackClient<BlockingReqwestTransport> {
    /// Create a client for `base_url` authenticated with a permanent token.
    ///
    /// Must not be called from within an async runtime.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        Self::with_timeouts(base_url, token, Timeouts::default())
    }

    pub fn with_timeouts(base_url: &str, token: &str, timeouts: Timeouts) -> Result<Self> {
        let transport = BlockingReqwestTransport::new(timeouts)?;
        Ok(Self::with_transport(base_url, token, transport))
    }

    #[instrument(skip(profile, settings), fields(profile_name = %profile.name))]
    pub fn from_profile(profile: &Profile, settings: &Settings) -> Result<Self> {
        info!("Creating blocking YouTrack client for profile");
        let token = profile.resolve_token()?;
        Self::with_timeouts(&profile.url, &token, settings.timeouts())
    }
}

impl<T: Transport> YouTrackClient<T> {
    pub fn with_transport(base_url: &str, token: &str, transport: T) -> Self {
        Self {
            transport,
            auth: Auth::new(token),
            endpoints: Endpoints::new(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.endpoints.urls().base_url()
    }

    pub fn get_absolute_url(&self, path: &str) -> String {
        self.endpoints.urls().get_absolute_url(path)
    }

    /// Send a request and return the body of a successful response.
    #[instrument(
        name = "request",
        skip_all,
        fields(method = %request.method, url = %request.url)
    )]
    pub fn send(&self, request: &Request) -> Result<Option<Vec<u8>>> {
        debug!("Sending request");
        let response = self
            .transport
            .execute(request, &self.auth)
            .inspect_err(|e| warn!(error = %e, "Transport error"))?;
        Ok(check_response(request, response)?)
    }

    fn run<R>(&self, call: Call<R>) -> Result<R> {
        let body = self.send(&call.request)?;
        call.parse(body)
            .inspect_err(|e| warn!(error = %e, url = %call.request.url, "Failed to decode response"))
    }

    #[instrument(skip(self))]
    pub fn get_issue(&self, issue_id: &str) -> Result<Issue> {
        self.run(self.endpoints.get_issue(issue_id)?)
    }

    #[instrument(skip(self, custom_fields))]
    pub fn get_issues<E: Entity>(
        &self,
        query: Option<&str>,
        custom_fields: &[&str],
        page: Page,
    ) -> Result<Vec<E>> {
        let issues = self.run(self.endpoints.get_issues::<E>(query, custom_fields, page)?)?;
        debug!("Found {} issues", issues.len());
        Ok(issues)
    }

    #[instrument(skip(self, issue))]
    pub fn create_issue(&self, issue: &Issue) -> Result<Issue> {
        self.run(self.endpoints.create_issue(issue)?)
    }

    #[instrument(skip(self, issue))]
    pub fn update_issue(
        &self,
        issue_id: &str,
        issue: &Issue,
        mute_update_notifications: bool,
    ) -> Result<Issue> {
        self.run(
            self.endpoints
                .update_issue(issue_id, issue, mute_update_notifications)?,
        )
    }

    #[instrument(skip(self))]
    pub fn delete_issue(&self, issue_id: &str) -> Result<()> {
        self.run(self.endpoints.delete_issue(issue_id))
    }

    #[instrument(skip(self))]
    pub fn get_issue_custom_fields(
        &self,
        issue_id: &str,
        page: Page,
    ) -> Result<Vec<IssueCustomFieldType>> {
        self.run(self.endpoints.get_issue_custom_fields(issue_id, page)?)
    }

    #[instrument(skip(self, field), fields(field_id = ?field.id()))]
    pub fn update_issue_custom_field(
        &self,
        issue_id: &str,
        field: &IssueCustomFieldType,
        mute_update_notifications: bool,
    ) -> Result<IssueCustomFieldType> {
        self.run(self.endpoints.update_issue_custom_field(
            issue_id,
            field,
            mute_update_notifications,
        )?)
    }

    #[instrument(skip(self))]
    pub fn get_project_custom_fields(
        &self,
        project_id: &str,
        page: Page,
    ) -> Result<Vec<ProjectCustomFieldType>> {
        self.run(self.endpoints.get_project_custom_fields(project_id, page)?)
    }

    #[instrument(skip(self))]
    pub fn get_issue_comments(&self, issue_id: &str, page: Page) -> Result<Vec<IssueComment>> {
        self.run(self.endpoints.get_issue_comments(issue_id, page)?)
    }

    #[instrument(skip(self, comment))]
    pub fn create_issue_comment(
        &self,
        issue_id: &str,
        comment: &IssueComment,
    ) -> Result<IssueComment> {
        self.run(self.endpoints.create_issue_comment(issue_id, comment)?)
    }

    #[instrument(skip(self, comment), fields(comment_id = ?comment.id()))]
    pub fn update_issue_comment(
        &self,
        issue_id: &str,
        comment: &IssueComment,
        mute_update_notifications: bool,
    ) -> Result<IssueComment> {
        self.run(self.endpoints.update_issue_comment(
            issue_id,
            comment,
            mute_update_notifications,
        )?)
    }

    #[instrument(skip(self))]
    pub fn hide_issue_comment(&self, issue_id: &str, comment_id: &str) -> Result<()> {
        self.run(self.endpoints.hide_issue_comment(issue_id, comment_id)?)
    }

    #[instrument(skip(self))]
    pub fn delete_issue_comment(&self, issue_id: &str, comment_id: &str) -> Result<()> {
        self.run(self.endpoints.delete_issue_comment(issue_id, comment_id))
    }

    #[instrument(skip(self))]
    pub fn get_issue_attachments(&self, issue_id: &str, page: Page) -> Result<Vec<IssueAttachment>> {
        self.run(self.endpoints.get_issue_attachments(issue_id, page)?)
    }

    #[instrument(skip(self, files), fields(files = files.len()))]
    pub fn create_issue_attachments(
        &self,
        issue_id: &str,
        files: Vec<FilePart>,
    ) -> Result<Vec<IssueAttachment>> {
        self.run(self.endpoints.create_issue_attachments(issue_id, files)?)
    }

    #[instrument(skip(self, files), fields(files = files.len()))]
    pub fn create_comment_attachments(
        &self,
        issue_id: &str,
        comment_id: &str,
        files: Vec<FilePart>,
    ) -> Result<Vec<IssueAttachment>> {
        self.run(
            self.endpoints
                .create_comment_attachments(issue_id, comment_id, files)?,
        )
    }

    #[instrument(skip(self))]
    pub fn get_issue_work_items(&self, issue_id: &str, page: Page) -> Result<Vec<IssueWorkItem>> {
        self.run(self.endpoints.get_issue_work_items(issue_id, page)?)
    }

    #[instrument(skip(self, work_item))]
    pub fn create_issue_work_item(
        &self,
        issue_id: &str,
        work_item: &IssueWorkItem,
    ) -> Result<IssueWorkItem> {
        self.run(self.endpoints.create_issue_work_item(issue_id, work_item)?)
    }

    #[instrument(skip(self))]
    pub fn get_projects(&self, page: Page) -> Result<Vec<Project>> {
        self.run(self.endpoints.get_projects(page)?)
    }

    #[instrument(skip(self))]
    pub fn get_project_work_item_types(
        &self,
        project_id: &str,
        page: Page,
    ) -> Result<Vec<WorkItemType>> {
        self.run(self.endpoints.get_project_work_item_types(project_id, page)?)
    }

    #[instrument(skip(self))]
    pub fn get_tags(&self, page: Page) -> Result<Vec<Tag>> {
        self.run(self.endpoints.get_tags(page)?)
    }

    #[instrument(skip(self, tag), fields(tag_id = ?tag.id()))]
    pub fn add_issue_tag(&self, issue_id: &str, tag: &Tag) -> Result<()> {
        self.run(self.endpoints.add_issue_tag(issue_id, tag)?)
    }

    #[instrument(skip(self))]
    pub fn get_users(&self, page: Page) -> Result<Vec<User>> {
        self.run(self.endpoints.get_users(page)?)
    }

    #[instrument(skip(self))]
    pub fn get_issue_links(&self, issue_id: &str, page: Page) -> Result<Vec<IssueLink>> {
        self.run(self.endpoints.get_issue_links(issue_id, page)?)
    }

    #[instrument(skip(self))]
    pub fn get_issue_link_types(&self, page: Page) -> Result<Vec<IssueLinkType>> {
        self.run(self.endpoints.get_issue_link_types(page)?)
    }

    #[instrument(skip(self))]
    pub fn link_issues(
        &self,
        source_issue_id: &str,
        target_issue_id: &str,
        link_type_id: &str,
        direction: IssueLinkDirection,
    ) -> Result<Issue> {
        self.run(self.endpoints.link_issues(
            source_issue_id,
            target_issue_id,
            link_type_id,
            direction,
        )?)
    }

    #[instrument(skip(self))]
    pub fn delete_issue_link(
        &self,
        source_issue_id: &str,
        target_issue_id: &str,
        link_type_id: &str,
    ) -> Result<()> {
        self.run(
            self.endpoints
                .delete_issue_link(source_issue_id, target_issue_id, link_type_id),
        )
    }

    #[instrument(skip(self))]
    pub fn get_agiles(&self, page: Page) -> Result<Vec<Agile>> {
        self.run(self.endpoints.get_agiles(page)?)
    }

    #[instrument(skip(self))]
    pub fn get_agile(&self, agile_id: &str) -> Result<Agile> {
        self.run(self.endpoints.get_agile(agile_id)?)
    }

    #[instrument(skip(self))]
    pub fn get_sprints(&self, agile_id: &str, page: Page) -> Result<Vec<Sprint>> {
        self.run(self.endpoints.get_sprints(agile_id, page)?)
    }

    #[instrument(skip(self))]
    pub fn get_sprint(&self, agile_id: &str, sprint_id: &str) -> Result<Sprint> {
        self.run(self.endpoints.get_sprint(agile_id, sprint_id)?)
    }
}
