//! Report list query: pagination, sort order and category filter

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 8;
/// Page sizes offered by list views
pub const PAGE_SIZES: [u32; 3] = [6, 8, 12];

/// Category value meaning "no filter"
const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: SortOrder,
    /// `None` lists every category
    pub category: Option<String>,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: SortOrder::Newest,
            category: None,
        }
    }
}

impl ReportQuery {
    /// Read a query from URL parameters, falling back to defaults for
    /// anything missing or malformed. Accepts `cat` or `category`.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key {
                "page" => query.page = parse_positive(value, DEFAULT_PAGE),
                "limit" => query.limit = parse_positive(value, DEFAULT_LIMIT),
                "sort" => query.sort = value.parse().unwrap_or_default(),
                "cat" | "category" => query.category = normalize_category(value),
                _ => {}
            }
        }
        query
    }

    /// Parameters for `GET /api/v1/reports`
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("sort".to_string(), self.sort.as_str().to_string()),
        ];
        if let Some(category) = &self.category {
            pairs.push(("category".to_string(), category.clone()));
        }
        pairs
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Advance one page unless already on the last known page
    pub fn next_page(&mut self, page_count: Option<u32>) -> bool {
        let next = self.page.saturating_add(1);
        if page_count.is_some_and(|count| next > count) {
            return false;
        }
        self.page = next;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = category.and_then(normalize_category);
        self.page = 1;
    }
}

fn parse_positive(value: &str, fallback: u32) -> u32 {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(fallback)
}

fn normalize_category(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_CATEGORIES) {
        None
    } else {
        Some(value.to_string())
    }
}
