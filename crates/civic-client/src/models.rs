//! Wire models for the reports backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Storage key of the original upload
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl Photo {
    /// Key to display: the thumbnail when there is one
    pub fn display_key(&self) -> Option<&str> {
        self.thumb_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .or(Some(self.key.as_str()).filter(|k| !k.is_empty()))
    }
}

/// GeoJSON point, coordinates in `[longitude, latitude]` order with an
/// optional trailing altitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type", default = "point")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

fn point() -> String {
    "Point".to_string()
}

impl Location {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: point(),
            coordinates: vec![longitude, latitude],
        }
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.first().copied()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.get(1).copied()
    }

    /// `(longitude, latitude)` when both are present
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.longitude()?, self.latitude()?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_id: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn cover_photo(&self) -> Option<&Photo> {
        self.photos.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn display_name(&self) -> &str {
        self.author_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.name.as_deref().filter(|n| !n.is_empty()))
            .unwrap_or(if self.user_id.is_some() {
                "User"
            } else {
                "Anonymous"
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub pages: Option<u32>,
}

impl PageMeta {
    /// Number of pages, derived from `total` and `limit` when not sent
    pub fn page_count(&self) -> Option<u32> {
        self.pages.or_else(|| match (self.total, self.limit) {
            (Some(total), Some(limit)) if limit > 0 => {
                Some(total.div_ceil(u64::from(limit)).max(1) as u32)
            }
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// `{ "data": ... }`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// `{ "data": { "report": ... } }` or `{ "data": ... }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ReportPayload {
    Wrapped { report: Report },
    Bare(Report),
}

impl ReportPayload {
    pub fn into_report(self) -> Report {
        match self {
            ReportPayload::Wrapped { report } | ReportPayload::Bare(report) => report,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfilePayload {
    #[serde(default)]
    pub user: Option<civic_session::User>,
}
