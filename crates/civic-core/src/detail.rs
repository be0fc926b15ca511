//! Report detail view model: one report and its comment thread

use parking_lot::RwLock;
use std::sync::Arc;
use url::Url;

use civic_client::{
    can_modify_comment, can_modify_report, ApiClient, Comment, NewComment, Report,
};
use civic_session::SessionState;

use crate::error::CoreError;
use crate::Result;

/// Name sent with comments from signed-out users
const ANONYMOUS: &str = "Anonymous";

pub struct ReportDetail {
    client: Arc<ApiClient>,
    session: SessionState,
    report_id: String,
    report: RwLock<Option<Report>>,
    comments: RwLock<Vec<Comment>>,
}

impl ReportDetail {
    pub fn new(client: Arc<ApiClient>, session: SessionState, report_id: impl Into<String>) -> Self {
        Self {
            client,
            session,
            report_id: report_id.into(),
            report: RwLock::new(None),
            comments: RwLock::new(Vec::new()),
        }
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    /// Fetch the report, then its comments.
    ///
    /// A failed comment fetch leaves an empty thread rather than failing the
    /// whole page.
    pub async fn load(&self) -> Result<Report> {
        let report = self.client.get_report(&self.report_id).await?;
        *self.report.write() = Some(report.clone());

        let comments = match self.client.list_comments(&self.report_id).await {
            Ok(comments) => comments,
            Err(e) => {
                tracing::warn!(report_id = %self.report_id, error = %e, "Failed to load comments");
                Vec::new()
            }
        };
        *self.comments.write() = comments;

        Ok(report)
    }

    pub fn report(&self) -> Option<Report> {
        self.report.read().clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.comments.read().clone()
    }

    /// `(latitude, longitude)` for placing the map marker
    pub fn map_position(&self) -> Option<(f64, f64)> {
        self.report
            .read()
            .as_ref()
            .and_then(|r| r.location.as_ref())
            .and_then(|l| l.position())
            .map(|(lng, lat)| (lat, lng))
    }

    /// Download URLs for the report's photos, thumbnails preferred
    pub fn photo_urls(&self) -> Vec<Url> {
        let report = self.report.read();
        let Some(report) = report.as_ref() else {
            return Vec::new();
        };

        report
            .photos
            .iter()
            .filter_map(|p| p.display_key())
            .filter_map(|key| self.client.photo_url(key).ok())
            .collect()
    }

    pub fn can_modify_comment(&self, comment_id: &str) -> bool {
        let user = self.session.user();
        self.comments
            .read()
            .iter()
            .find(|c| c.id == comment_id)
            .is_some_and(|c| can_modify_comment(user.as_ref(), c))
    }

    pub fn can_delete_report(&self) -> bool {
        let user = self.session.user();
        self.report
            .read()
            .as_ref()
            .is_some_and(|r| can_modify_report(user.as_ref(), r))
    }

    /// Post as the signed-in user, or anonymously
    pub async fn post_comment(&self, text: &str) -> Result<Comment> {
        let name = self
            .session
            .user()
            .map(|u| u.name)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| ANONYMOUS.to_string());

        let comment = NewComment::new(text).with_name(name);
        let posted = self.client.create_comment(&self.report_id, &comment).await?;

        self.comments.write().push(posted.clone());
        Ok(posted)
    }

    pub async fn edit_comment(&self, comment_id: &str, text: &str) -> Result<Comment> {
        self.ensure_can_modify_comment(comment_id)?;

        let updated = self.client.update_comment(comment_id, text).await?;

        if let Some(slot) = self
            .comments
            .write()
            .iter_mut()
            .find(|c| c.id == comment_id)
        {
            *slot = updated.clone();
        }

        Ok(updated)
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        self.ensure_can_modify_comment(comment_id)?;

        self.client.delete_comment(comment_id).await?;
        self.comments.write().retain(|c| c.id != comment_id);

        Ok(())
    }

    pub async fn delete_report(&self) -> Result<()> {
        if self.report.read().is_none() {
            return Err(CoreError::ReportNotLoaded);
        }
        if !self.can_delete_report() {
            return Err(CoreError::PermissionDenied(
                "only the reporter or an admin may delete this report".to_string(),
            ));
        }

        self.client.delete_report(&self.report_id).await?;
        *self.report.write() = None;
        self.comments.write().clear();

        Ok(())
    }

    fn ensure_can_modify_comment(&self, comment_id: &str) -> Result<()> {
        if !self.comments.read().iter().any(|c| c.id == comment_id) {
            return Err(CoreError::CommentNotFound(comment_id.to_string()));
        }
        if !self.can_modify_comment(comment_id) {
            return Err(CoreError::PermissionDenied(
                "only the author or an admin may change this comment".to_string(),
            ));
        }
        Ok(())
    }
}
