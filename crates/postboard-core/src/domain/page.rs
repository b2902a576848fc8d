use serde::Serialize;

/// One page of a 1-indexed listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub total: u64,
    pub per_page: u64,
    pub page: u64,
    pub last_page: u64,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        let per_page = per_page.max(1);
        Self {
            total,
            per_page,
            page,
            last_page: total.div_ceil(per_page).max(1),
            data,
        }
    }

    /// Normalise a raw `page` parameter: absent, unparsable or zero means 1.
    pub fn parse_number(raw: Option<&str>) -> u64 {
        raw.and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or(1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total: self.total,
            per_page: self.per_page,
            page: self.page,
            last_page: self.last_page,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_defaults_to_first_page() {
        assert_eq!(Page::<()>::parse_number(None), 1);
        assert_eq!(Page::<()>::parse_number(Some("")), 1);
        assert_eq!(Page::<()>::parse_number(Some("abc")), 1);
        assert_eq!(Page::<()>::parse_number(Some("0")), 1);
        assert_eq!(Page::<()>::parse_number(Some("-2")), 1);
        assert_eq!(Page::<()>::parse_number(Some("3")), 3);
    }

    #[test]
    fn test_last_page() {
        let page = Page::new(vec![1, 2, 3, 4], 10, 2, 6);
        assert_eq!(page.last_page, 2);

        let empty: Page<i32> = Page::new(vec![], 0, 1, 6);
        assert_eq!(empty.last_page, 1);
    }
}
