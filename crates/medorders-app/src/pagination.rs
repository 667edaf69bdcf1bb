// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const DEFAULT_RANGE_LENGTH: usize = 7;

const SIBLINGS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl PageItem {
    pub const fn page(self) -> Option<u32> {
        match self {
            Self::Page(page) => Some(page),
            Self::Ellipsis => None,
        }
    }
}

pub fn clamp_page(page: i64, total_pages: u32) -> u32 {
    let total_pages = total_pages.max(1);
    if page < 1 {
        return 1;
    }
    if page > i64::from(total_pages) {
        return total_pages;
    }
    page as u32
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total_count.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

pub fn build_pagination_range(current_page: i64, total_pages: u32) -> Vec<PageItem> {
    build_pagination_range_with_max(current_page, total_pages, DEFAULT_RANGE_LENGTH)
}

/// Page markers for a pager: first and last page, one sibling on each side of
/// the current page, and an ellipsis wherever pages are elided.
pub fn build_pagination_range_with_max(
    current_page: i64,
    total_pages: u32,
    max_length: usize,
) -> Vec<PageItem> {
    let total_pages = total_pages.max(1);
    let current = clamp_page(current_page, total_pages);
    if total_pages as usize <= max_length {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let left = current.saturating_sub(SIBLINGS).max(2);
    let right = (current + SIBLINGS).min(total_pages - 1);

    let mut items = vec![PageItem::Page(1)];
    if left > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((left..=right).map(PageItem::Page));
    if right < total_pages - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total_pages));
    items
}
