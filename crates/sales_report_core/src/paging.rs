/// Offset cursor over a paginated collection.
///
/// The collection is exhausted once a page comes back shorter than the page
/// size; no total count is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page_size: usize,
    offset: usize,
    pages_requested: usize,
    exhausted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingError {
    message: String,
}

impl PagingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for PagingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PagingError {}

impl PageCursor {
    pub fn new(page_size: usize) -> Result<Self, PagingError> {
        if page_size == 0 {
            return Err(PagingError::new("page size must be a positive integer"));
        }

        Ok(Self {
            page_size,
            offset: 0,
            pages_requested: 0,
            exhausted: false,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn pages_requested(&self) -> usize {
        self.pages_requested
    }

    /// Returns the next page to fetch, or `None` once the collection is exhausted.
    pub fn next_request(&mut self) -> Option<PageRequest> {
        if self.exhausted {
            return None;
        }
        self.pages_requested += 1;
        Some(PageRequest {
            limit: self.page_size,
            offset: self.offset,
        })
    }

    /// Records how many documents the last requested page returned.
    pub fn advance(&mut self, records_returned: usize) {
        if is_last_page(records_returned, self.page_size) {
            self.exhausted = true;
        } else {
            self.offset += self.page_size;
        }
    }
}

pub fn is_last_page(records_returned: usize, page_size: usize) -> bool {
    records_returned < page_size
}
