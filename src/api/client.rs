//! Async YouTrack client.
//!
//! Every method builds its request through [`Endpoints`], sends it through an
//! [`AsyncTransport`] and decodes the body with the entity codec.

use tracing::{debug, info, instrument, warn};

use super::auth::Auth;
use super::endpoints::{Endpoints, Page};
use super::request::{check_response, Call, FilePart, Request};
use super::transport::{AsyncTransport, ReqwestTransport, Timeouts};
use crate::config::{Profile, Settings};
use crate::model::{
    Agile, Entity, Issue, IssueAttachment, IssueComment, IssueCustomFieldType, IssueLink,
    IssueLinkDirection, IssueLinkType, IssueWorkItem, Project, ProjectCustomFieldType, Sprint, Tag,
    User, WorkItemType,
};
use crate::Result;

/// The YouTrack REST client.
///
/// Generic over the transport so tests can swap the network for a stub.
#[derive(Debug)]
pub struct YouTrackClient<T = ReqwestTransport> {
    transport: T,
    auth: Auth,
    endpoints: Endpoints,
}

impl YouTrackClient<ReqwestTransport> {
    /// Create a client for `base_url` (e.g. `https://example.com/youtrack`)
    /// authenticated with a permanent token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        Self::with_timeouts(base_url, token, Timeouts::default())
    }

    /// Like [`new`](Self::new) with connect and read timeouts.
    pub fn with_timeouts(base_url: &str, token: &str, timeouts: Timeouts) -> Result<Self> {
        let transport = ReqwestTransport::new(timeouts)?;
        Ok(Self::with_transport(base_url, token, transport))
    }

    /// Create a client from a configuration profile.
    ///
    /// # Errors
    ///
    /// Returns an error if no token can be resolved for the profile or the
    /// HTTP client cannot be built.
    #[instrument(skip(profile, settings), fields(profile_name = %profile.name))]
    pub fn from_profile(profile: &Profile, settings: &Settings) -> Result<Self> {
        info!("Creating YouTrack client for profile");
        let token = profile.resolve_token()?;
        Self::with_timeouts(&profile.url, &token, settings.timeouts())
    }
}

impl<T: AsyncTransport> YouTrackClient<T> {
    /// Create a client on top of a custom transport.
    pub fn with_transport(base_url: &str, token: &str, transport: T) -> Self {
        Self {
            transport,
            auth: Auth::new(token),
            endpoints: Endpoints::new(base_url),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        self.endpoints.urls().base_url()
    }

    /// `<base><path>`, e.g. the web link of an issue.
    pub fn get_absolute_url(&self, path: &str) -> String {
        self.endpoints.urls().get_absolute_url(path)
    }

    /// Send a request and return the body of a successful response.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-2xx status.
    #[instrument(
        name = "request",
        skip_all,
        fields(method = %request.method, url = %request.url)
    )]
    pub async fn send(&self, request: &Request) -> Result<Option<Vec<u8>>> {
        debug!("Sending request");
        let response = self
            .transport
            .execute(request, &self.auth)
            .await
            .inspect_err(|e| warn!(error = %e, "Transport error"))?;
        Ok(check_response(request, response)?)
    }

    async fn run<R>(&self, call: Call<R>) -> Result<R> {
        let body = self.send(&call.request).await?;
        call.parse(body)
            .inspect_err(|e| warn!(error = %e, url = %call.request.url, "Failed to decode response"))
    }

    #[instrument(skip(self))]
    pub async fn get_issue(&self, issue_id: &str) -> Result<Issue> {
        self.run(self.endpoints.get_issue(issue_id)?).await
    }

    /// Issues matching `query` (all issues when `None`), decoded as `E`.
    ///
    /// Use [`Issue`] or a narrower entity declared with [`entity!`](crate::entity).
    #[instrument(skip(self, custom_fields))]
    pub async fn get_issues<E: Entity + Send>(
        &self,
        query: Option<&str>,
        custom_fields: &[&str],
        page: Page,
    ) -> Result<Vec<E>> {
        let issues = self
            .run(self.endpoints.get_issues::<E>(query, custom_fields, page)?)
            .await?;
        debug!("Found {} issues", issues.len());
        Ok(issues)
    }

    #[instrument(skip(self, issue))]
    pub async fn create_issue(&self, issue: &Issue) -> Result<Issue> {
        self.run(self.endpoints.create_issue(issue)?).await
    }

    #[instrument(skip(self, issue))]
    pub async fn update_issue(
        &self,
        issue_id: &str,
        issue: &Issue,
        mute_update_notifications: bool,
    ) -> Result<Issue> {
        self.run(
            self.endpoints
                .update_issue(issue_id, issue, mute_update_notifications)?,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_issue(&self, issue_id: &str) -> Result<()> {
        self.run(self.endpoints.delete_issue(issue_id)).await
    }

    #[instrument(skip(self))]
    pub async fn get_issue_custom_fields(
        &self,
        issue_id: &str,
        page: Page,
    ) -> Result<Vec<IssueCustomFieldType>> {
        self.run(self.endpoints.get_issue_custom_fields(issue_id, page)?)
            .await
    }

    #[instrument(skip(self, field), fields(field_id = ?field.id()))]
    pub async fn update_issue_custom_field(
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
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_project_custom_fields(
        &self,
        project_id: &str,
        page: Page,
    ) -> Result<Vec<ProjectCustomFieldType>> {
        self.run(self.endpoints.get_project_custom_fields(project_id, page)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_issue_comments(&self, issue_id: &str, page: Page) -> Result<Vec<IssueComment>> {
        self.run(self.endpoints.get_issue_comments(issue_id, page)?)
            .await
    }

    #[instrument(skip(self, comment))]
    pub async fn create_issue_comment(
        &self,
        issue_id: &str,
        comment: &IssueComment,
    ) -> Result<IssueComment> {
        self.run(self.endpoints.create_issue_comment(issue_id, comment)?)
            .await
    }

    #[instrument(skip(self, comment), fields(comment_id = ?comment.id()))]
    pub async fn update_issue_comment(
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
        .await
    }

    #[instrument(skip(self))]
    pub async fn hide_issue_comment(&self, issue_id: &str, comment_id: &str) -> Result<()> {
        self.run(self.endpoints.hide_issue_comment(issue_id, comment_id)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_issue_comment(&self, issue_id: &str, comment_id: &str) -> Result<()> {
        self.run(self.endpoints.delete_issue_comment(issue_id, comment_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_issue_attachments(
        &self,
        issue_id: &str,
        page: Page,
    ) -> Result<Vec<IssueAttachment>> {
        self.run(self.endpoints.get_issue_attachments(issue_id, page)?)
            .await
    }

    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn create_issue_attachments(
        &self,
        issue_id: &str,
        files: Vec<FilePart>,
    ) -> Result<Vec<IssueAttachment>> {
        self.run(self.endpoints.create_issue_attachments(issue_id, files)?)
            .await
    }

    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn create_comment_attachments(
        &self,
        issue_id: &str,
        comment_id: &str,
        files: Vec<FilePart>,
    ) -> Result<Vec<IssueAttachment>> {
        self.run(
            self.endpoints
                .create_comment_attachments(issue_id, comment_id, files)?,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_issue_work_items(
        &self,
        issue_id: &str,
        page: Page,
    ) -> Result<Vec<IssueWorkItem>> {
        self.run(self.endpoints.get_issue_work_items(issue_id, page)?)
            .await
    }

    #[instrument(skip(self, work_item))]
    pub async fn create_issue_work_item(
        &self,
        issue_id: &str,
        work_item: &IssueWorkItem,
    ) -> Result<IssueWorkItem> {
        self.run(self.endpoints.create_issue_work_item(issue_id, work_item)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_projects(&self, page: Page) -> Result<Vec<Project>> {
        self.run(self.endpoints.get_projects(page)?).await
    }

    #[instrument(skip(self))]
    pub async fn get_project_work_item_types(
        &self,
        project_id: &str,
        page: Page,
    ) -> Result<Vec<WorkItemType>> {
        self.run(self.endpoints.get_project_work_item_types(project_id, page)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_tags(&self, page: Page) -> Result<Vec<Tag>> {
        self.run(self.endpoints.get_tags(page)?).await
    }

    #[instrument(skip(self, tag), fields(tag_id = ?tag.id()))]
    pub async fn add_issue_tag(&self, issue_id: &str, tag: &Tag) -> Result<()> {
        self.run(self.endpoints.add_issue_tag(issue_id, tag)?).await
    }

    #[instrument(skip(self))]
    pub async fn get_users(&self, page: Page) -> Result<Vec<User>> {
        self.run(self.endpoints.get_users(page)?).await
    }

    #[instrument(skip(self))]
    pub async fn get_issue_links(&self, issue_id: &str, page: Page) -> Result<Vec<IssueLink>> {
        self.run(self.endpoints.get_issue_links(issue_id, page)?).await
    }

    #[instrument(skip(self))]
    pub async fn get_issue_link_types(&self, page: Page) -> Result<Vec<IssueLinkType>> {
        self.run(self.endpoints.get_issue_link_types(page)?).await
    }

    #[instrument(skip(self))]
    pub async fn link_issues(
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
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_issue_link(
        &self,
        source_issue_id: &str,
        target_issue_id: &str,
        link_type_id: &str,
    ) -> Result<()> {
        self.run(
            self.endpoints
                .delete_issue_link(source_issue_id, target_issue_id, link_type_id),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_agiles(&self, page: Page) -> Result<Vec<Agile>> {
        self.run(self.endpoints.get_agiles(page)?).await
    }

    #[instrument(skip(self))]
    pub async fn get_agile(&self, agile_id: &str) -> Result<Agile> {
        self.run(self.endpoints.get_agile(agile_id)?).await
    }

    #[instrument(skip(self))]
    pub async fn get_sprints(&self, agile_id: &str, page: Page) -> Result<Vec<Sprint>> {
        self.run(self.endpoints.get_sprints(agile_id, page)?).await
    }

    #[instrument(skip(self))]
    pub async fn get_sprint(&self, agile_id: &str, sprint_id: &str) -> Result<Sprint> {
        self.run(self.endpoints.get_sprint(agile_id, sprint_id)?)
            .await
    }
}
