//! Page-number controls for a paged product list.
//!
//! Up to ten pages are listed in full. Longer lists collapse to
//! `1 2 <middle> … N-1 N`, where the middle button follows the current page
//! while it sits strictly between the fixed pairs and shows 3 otherwise.

/// Page counts above this collapse behind an ellipsis.
pub const MAX_UNCOLLAPSED_PAGES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page { number: u32, active: bool },
    Ellipsis,
}

impl PageButton {
    pub fn number(&self) -> Option<u32> {
        match self {
            PageButton::Page { number, .. } => Some(*number),
            PageButton::Ellipsis => None,
        }
    }
}

pub fn total_pages(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationWindow {
    total_pages: u32,
    current_page: u32,
    buttons: Vec<PageButton>,
}

impl PaginationWindow {
    pub fn compute(total: u64, limit: u32, current_page: u32) -> Self {
        let total_pages = total_pages(total, limit);
        // An empty result still renders a single page.
        let rendered = total_pages.max(1);
        let page = |number: u32| PageButton::Page {
            number,
            active: number == current_page,
        };

        let buttons = if rendered <= MAX_UNCOLLAPSED_PAGES {
            (1..=rendered).map(page).collect()
        } else {
            let middle = if current_page > 2 && current_page < rendered - 1 {
                current_page
            } else {
                3
            };
            vec![
                page(1),
                page(2),
                page(middle),
                PageButton::Ellipsis,
                page(rendered - 1),
                page(rendered),
            ]
        };

        Self {
            total_pages,
            current_page,
            buttons,
        }
    }

    /// `ceil(total / limit)`; zero for an empty result.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn buttons(&self) -> &[PageButton] {
        &self.buttons
    }

    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.buttons.iter().filter_map(PageButton::number)
    }

    pub fn previous_enabled(&self) -> bool {
        self.current_page > 1
    }

    pub fn next_enabled(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn previous_page(&self) -> Option<u32> {
        self.previous_enabled()
            .then(|| (self.current_page - 1).clamp(1, self.total_pages.max(1)))
    }

    pub fn next_page(&self) -> Option<u32> {
        self.next_enabled().then(|| self.current_page + 1)
    }
}
