//! Pagination request and result types shared by repositories and handlers.

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// A 1-based page request with a bounded size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Lenient parsing of raw query values: anything unparsable falls back to the defaults.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1) as u64;
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l != 0)
            .map(|l| l.max(1) as u64)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self::new(page, limit)
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.request.limit)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_falls_back_to_defaults() {
        assert_eq!(PageRequest::parse(None, None), PageRequest::new(1, 10));
        assert_eq!(PageRequest::parse(Some("abc"), Some("")), PageRequest::new(1, 10));
        assert_eq!(PageRequest::parse(Some("-4"), Some("0")), PageRequest::new(1, 10));
    }

    #[test]
    fn parse_clamps_limit() {
        assert_eq!(PageRequest::parse(Some("3"), Some("500")).limit, 100);
        assert_eq!(PageRequest::parse(Some("3"), Some("-7")).limit, 1);
        assert_eq!(PageRequest::parse(Some("3"), Some("20")).offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<u8> = Page {
            items: vec![],
            total: 21,
            request: PageRequest::new(1, 10),
        };
        assert_eq!(page.total_pages(), 3);
    }
}
