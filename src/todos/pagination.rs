use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Resolved pagination for one listing request, serialized as `meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub pages: u64,
    pub page_size: u64,
    pub page: u64,
}

impl PageMeta {
    /// Invalid or non-positive `perpage` falls back to 10 and invalid `page`
    /// to 1. A page past the end clamps to the last page; with no todos at
    /// all the clamp gives 0, which falls back to page 1.
    pub fn resolve(total: u64, page: Option<&str>, perpage: Option<&str>) -> Self {
        let page_size = positive_int(perpage).unwrap_or(DEFAULT_PAGE_SIZE);
        let pages = total.div_ceil(page_size);
        let page = match positive_int(page).map(|p| p.min(pages)) {
            Some(0) | None => 1,
            Some(p) => p,
        };
        Self {
            total,
            pages,
            page_size,
            page,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

fn positive_int(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let meta = PageMeta::resolve(25, None, None);
        assert_eq!(
            meta,
            PageMeta {
                total: 25,
                pages: 3,
                page_size: 10,
                page: 1
            }
        );
        assert_eq!(meta.offset(), 0);
    }

    #[test]
    fn pages_is_ceiling_of_total_over_size() {
        assert_eq!(PageMeta::resolve(20, None, Some("10")).pages, 2);
        assert_eq!(PageMeta::resolve(21, None, Some("10")).pages, 3);
        assert_eq!(PageMeta::resolve(1, None, Some("7")).pages, 1);
    }

    #[test]
    fn page_past_the_end_clamps_to_last() {
        let meta = PageMeta::resolve(25, Some("9"), Some("10"));
        assert_eq!(meta.page, 3);
        assert_eq!(meta.offset(), 20);
    }

    #[test]
    fn no_todos_means_page_one_at_offset_zero() {
        let meta = PageMeta::resolve(0, Some("4"), None);
        assert_eq!(meta.pages, 0);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.offset(), 0);
    }

    #[test]
    fn invalid_params_fall_back() {
        for raw in ["abc", "0", "-2", "", "1.5"] {
            let meta = PageMeta::resolve(50, Some(raw), Some(raw));
            assert_eq!(meta.page_size, DEFAULT_PAGE_SIZE, "perpage {raw:?}");
            assert_eq!(meta.page, 1, "page {raw:?}");
        }
    }

    #[test]
    fn middle_page_offset() {
        let meta = PageMeta::resolve(50, Some("3"), Some("5"));
        assert_eq!(meta.page, 3);
        assert_eq!(meta.offset(), 10);
    }

    #[test]
    fn meta_uses_camel_case() {
        let json = serde_json::to_value(PageMeta::resolve(3, None, None)).unwrap();
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["pages"], 1);
    }
}
