//! This module defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of records to return per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// The number of pages needed to display `total_count` items at `page_size`
/// items per page.
pub fn page_count(total_count: u64, page_size: u64) -> u64 {
    total_count.div_ceil(page_size)
}

/// The number of items to skip before the first item of `page` (1-based).
pub fn page_offset(page: u64, page_size: u64) -> u64 {
    (page - 1) * page_size
}

#[cfg(test)]
mod tests {
    use super::{page_count, page_offset};

    #[test]
    fn counts_exact_pages() {
        assert_eq!(page_count(30, 10), 3);
    }

    #[test]
    fn rounds_partial_pages_up() {
        assert_eq!(page_count(31, 10), 4);
        assert_eq!(page_count(1, 10), 1);
    }

    #[test]
    fn empty_set_has_no_pages() {
        assert_eq!(page_count(0, 10), 0);
    }

    #[test]
    fn offsets_skip_earlier_pages() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(2, 10), 10);
        assert_eq!(page_offset(5, 20), 80);
    }
}
