//! Typed wrappers over the reports API
//!
//! Every call goes through `ApiClient::request`, so each one gets the token
//! refresh-and-retry behaviour for free.

use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use civic_session::User;

use crate::client::{decode_json, ensure_success, ApiClient};
use crate::config::encode_component;
use crate::error::ClientError;
use crate::models::{
    Category, Comment, Envelope, Location, Paginated, ProfilePayload, Report, ReportPayload,
};
use crate::query::ReportQuery;
use crate::request::{ApiRequest, FilePart, MultipartForm};
use crate::Result;

const REPORTS_PATH: &str = "/api/v1/reports";
const DOWNLOAD_PATH: &str = "/api/v1/reports/download";
const COMMENTS_PATH: &str = "/api/v1/comments";
const CATEGORIES_PATH: &str = "/api/v1/categories";
const PROFILE_PATH: &str = "/api/v1/profile";
const AVATAR_PROXY_PATH: &str = "/api/v1/avatar/proxy";
const LOGIN_PATH: &str = "/auth/google";
const LOGOUT_PATH: &str = "/auth/logout";

/// Form field carrying the uploaded photo
pub const PHOTO_FIELD: &str = "file";

/// A report to submit
#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub description: String,
    pub location: Location,
    pub categories: Vec<String>,
    pub photo: Option<FilePart>,
}

impl NewReport {
    pub fn new(title: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            location: Location::new(longitude, latitude),
            categories: Vec::new(),
            photo: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Attach a photo; the form field name is always `file`
    pub fn with_photo(mut self, file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.photo = Some(FilePart::new(PHOTO_FIELD, file_name, bytes).with_mime(mime));
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ClientError::Validation("Title is required".to_string()));
        }
        if self.categories.iter().all(|c| c.trim().is_empty()) {
            return Err(ClientError::Validation(
                "Please select at least one category".to_string(),
            ));
        }

        let (lng, lat) = self.position()?;
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(ClientError::Validation(format!("Longitude out of range: {lng}")));
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ClientError::Validation(format!("Latitude out of range: {lat}")));
        }

        if let Some(photo) = &self.photo {
            photo.validate()?;
        }

        Ok(())
    }

    fn position(&self) -> Result<(f64, f64)> {
        self.location
            .position()
            .ok_or_else(|| ClientError::Validation("Location is required".to_string()))
    }

    /// Multipart body as the backend expects it; categories travel as a
    /// JSON array string.
    pub fn to_form(&self) -> Result<MultipartForm> {
        self.validate()?;

        let categories: Vec<&str> = self
            .categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();

        let (lng, lat) = self.position()?;

        let mut form = MultipartForm::new()
            .text("title", self.title.trim())
            .text("description", self.description.trim())
            .text("locationLng", lng.to_string())
            .text("locationLat", lat.to_string())
            .text("categories", serde_json::to_string(&categories)?);

        if let Some(photo) = &self.photo {
            form = form.file(photo.clone());
        }

        Ok(form)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub text: String,
    /// Display name; anonymous posters send "Anonymous"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NewComment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(ClientError::Validation("Comment required".to_string()));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct CommentEdit<'a> {
    text: &'a str,
}

fn segment(id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ClientError::Validation("Missing identifier".to_string()));
    }
    Ok(encode_component(id))
}

impl ApiClient {
    pub async fn list_reports(&self, query: &ReportQuery) -> Result<Paginated<Report>> {
        let request = ApiRequest::get(REPORTS_PATH).with_query(query.to_pairs());
        self.execute_json(&request).await
    }

    pub async fn get_report(&self, id: &str) -> Result<Report> {
        let request = ApiRequest::get(format!("{REPORTS_PATH}/{}", segment(id)?));
        let payload: Envelope<ReportPayload> = self.execute_json(&request).await?;
        Ok(payload.data.into_report())
    }

    pub async fn create_report(&self, report: &NewReport) -> Result<Report> {
        let request = ApiRequest::post(REPORTS_PATH).multipart(report.to_form()?);
        let payload: Envelope<ReportPayload> = self.execute_json(&request).await?;
        let created = payload.data.into_report();

        tracing::info!(report_id = %created.id, "Created report");

        Ok(created)
    }

    pub async fn delete_report(&self, id: &str) -> Result<()> {
        let request = ApiRequest::delete(format!("{REPORTS_PATH}/{}", segment(id)?));
        self.execute(&request).await?;

        tracing::info!(report_id = %id, "Deleted report");

        Ok(())
    }

    pub async fn list_comments(&self, report_id: &str) -> Result<Vec<Comment>> {
        let request = ApiRequest::get(format!("{COMMENTS_PATH}/report/{}", segment(report_id)?));
        let page: Paginated<Comment> = self.execute_json(&request).await?;
        Ok(page.data)
    }

    pub async fn create_comment(&self, report_id: &str, comment: &NewComment) -> Result<Comment> {
        comment.validate()?;

        let request = ApiRequest::post(format!("{COMMENTS_PATH}/report/{}", segment(report_id)?))
            .json(comment)?;
        let payload: Envelope<Comment> = self.execute_json(&request).await?;

        tracing::info!(report_id = %report_id, comment_id = %payload.data.id, "Posted comment");

        Ok(payload.data)
    }

    pub async fn update_comment(&self, id: &str, text: &str) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(ClientError::Validation("Comment required".to_string()));
        }

        let request = ApiRequest::patch(format!("{COMMENTS_PATH}/{}", segment(id)?))
            .json(&CommentEdit { text })?;
        let payload: Envelope<Comment> = self.execute_json(&request).await?;

        tracing::info!(comment_id = %id, "Updated comment");

        Ok(payload.data)
    }

    pub async fn delete_comment(&self, id: &str) -> Result<()> {
        let request = ApiRequest::delete(format!("{COMMENTS_PATH}/{}", segment(id)?));
        self.execute(&request).await?;

        tracing::info!(comment_id = %id, "Deleted comment");

        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let page: Paginated<Category> = self
            .execute_json(&ApiRequest::get(CATEGORIES_PATH))
            .await?;
        Ok(page.data)
    }

    /// Signed-in user, or `None` when the backend does not recognise us
    pub async fn profile(&self) -> Result<Option<User>> {
        let response = self.request(&ApiRequest::get(PROFILE_PATH)).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        let response = ensure_success(response, "Load profile").await?;
        let payload: ProfilePayload = decode_json(response).await?;
        Ok(payload.user)
    }

    /// End the backend session. Sent once without the refresh path; the
    /// token slot is emptied whether or not the backend could be reached.
    pub async fn logout(&self) -> Result<()> {
        let result = self.send(&ApiRequest::post(LOGOUT_PATH)).await;
        self.tokens().clear();

        ensure_success(result?, "Logout").await?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub async fn download_photo(&self, key: &str) -> Result<Vec<u8>> {
        let request = ApiRequest::get(format!("{DOWNLOAD_PATH}/{}", segment(key)?));
        let response = self.execute(&request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Direct URL of a stored photo
    pub fn photo_url(&self, key: &str) -> Result<Url> {
        self.config()
            .endpoint(&format!("{DOWNLOAD_PATH}/{}", segment(key)?))
    }

    /// Backend proxy URL for an external avatar image
    pub fn avatar_proxy_url(&self, source: &str) -> Result<Url> {
        let mut url = self.config().endpoint(AVATAR_PROXY_PATH)?;
        url.query_pairs_mut().append_pair("url", source);
        Ok(url)
    }

    /// Where to send the user to start the OAuth sign-in
    pub fn login_url(&self) -> Result<Url> {
        self.config().endpoint(LOGIN_PATH)
    }
}
