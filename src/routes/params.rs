use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Pages past this are clamped so the offset always fits in an `i64`.
pub const MAX_PAGE: i64 = 1_000_000;

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
    pub offset: i64,
}

impl Page {
    pub fn normalize(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        Page {
            page,
            per_page,
            offset,
        }
    }
}

// Query structs keep page/per_page inline: serde_urlencoded cannot parse
// numbers through #[serde(flatten)].
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page::normalize(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    Name,
    Price,
    Stock,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Case-sensitive substring match on the product name.
    pub q: Option<String>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn page(&self) -> Page {
        Page::normalize(self.page, self.per_page)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PurchaseListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl PurchaseListQuery {
    pub fn page(&self) -> Page {
        Page::normalize(self.page, self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_clamps() {
        assert_eq!(
            Page::normalize(None, None),
            Page {
                page: 1,
                per_page: 20,
                offset: 0
            }
        );
        assert_eq!(Page::normalize(Some(0), Some(1000)).per_page, 100);
        assert_eq!(Page::normalize(Some(3), Some(10)).offset, 20);
    }

    #[test]
    fn huge_page_numbers_are_clamped() {
        let page = Page::normalize(Some(i64::MAX), Some(100));
        assert_eq!(page.page, MAX_PAGE);
        assert_eq!(page.offset, (MAX_PAGE - 1) * 100);

        let page = Page::normalize(Some(i64::MIN), Some(i64::MIN));
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.offset, 0);
    }
}
