use crate::filters::FilterUpdate;

/// `max(1, ceil(total_count / limit))`. A zero limit counts as one.
pub fn total_pages(total_count: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    let pages = total_count.div_ceil(limit).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page indicator derived from the last successful list response.
///
/// Moves are returned as [`FilterUpdate::Page`] values for the caller to
/// push through the filter store, so paging re-fetches the same way any
/// other filter change does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationModel {
    current_page: u32,
    total_pages: u32,
}

impl Default for PaginationModel {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PaginationModel {
    /// Until the first response arrives the current page is the only one known.
    pub fn new(current_page: u32) -> Self {
        let current_page = current_page.max(1);
        Self {
            current_page,
            total_pages: current_page,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Recompute the page count and clamp the current page into range.
    /// Returns the page update to issue when clamping moved it.
    pub fn recompute(&mut self, total_count: u64, limit: u32) -> Option<FilterUpdate> {
        self.total_pages = total_pages(total_count, limit);
        let clamped = self.current_page.clamp(1, self.total_pages);
        if clamped == self.current_page {
            return None;
        }
        self.current_page = clamped;
        Some(FilterUpdate::Page(clamped))
    }

    pub fn advance(&mut self) -> Option<FilterUpdate> {
        if self.current_page >= self.total_pages {
            return None;
        }
        self.current_page += 1;
        Some(FilterUpdate::Page(self.current_page))
    }

    pub fn retreat(&mut self) -> Option<FilterUpdate> {
        if self.current_page <= 1 {
            return None;
        }
        self.current_page -= 1;
        Some(FilterUpdate::Page(self.current_page))
    }

    pub fn label(&self) -> String {
        format!("{} of {}", self.current_page, self.total_pages)
    }
}
