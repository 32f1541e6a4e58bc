use serde::Serialize;
use std::collections::HashMap;

pub const PER_PAGE: i64 = 15;

/// Page links kept on each side of the current page once the list is windowed
const ON_EACH_SIDE: i64 = 3;

/// Requested page of a listing; anything but a positive integer means page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let page = params
            .get("page")
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        Self { page, per_page: PER_PAGE }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub from: Option<i64>,
    pub last_page: i64,
    pub links: Vec<MetaLink>,
    pub path: String,
    pub per_page: i64,
    pub to: Option<i64>,
    pub total: i64,
}

/// Length-aware page: `{data, links, meta}`
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub links: PageLinks,
    pub meta: PageMeta,
}

pub struct LengthAwarePaginator {
    request: PageRequest,
    total: i64,
    path: String,
}

impl LengthAwarePaginator {
    /// `path` is the absolute listing URL without a query string.
    pub fn new(request: PageRequest, total: i64, path: impl Into<String>) -> Self {
        Self { request, total, path: path.into() }
    }

    pub fn last_page(&self) -> i64 {
        let pages = (self.total + self.request.per_page - 1) / self.request.per_page;
        pages.max(1)
    }

    pub fn url(&self, page: i64) -> String {
        format!("{}?page={}", self.path, page.max(1))
    }

    pub fn paginate<T>(&self, data: Vec<T>) -> Paginated<T> {
        let current = self.request.page;
        let last = self.last_page();
        let count = data.len() as i64;

        let (from, to) = if count > 0 {
            let from = self.request.offset() + 1;
            (Some(from), Some(from + count - 1))
        } else {
            (None, None)
        };

        let prev = (current > 1).then(|| self.url(current - 1));
        let next = (current < last).then(|| self.url(current + 1));

        let mut links = Vec::new();
        links.push(MetaLink { url: prev.clone(), label: "&laquo; Previous".to_string(), active: false });
        for element in self.elements() {
            match element {
                Element::Dots => links.push(MetaLink { url: None, label: "...".to_string(), active: false }),
                Element::Pages(pages) => links.extend(pages.map(|page| MetaLink {
                    url: Some(self.url(page)),
                    label: page.to_string(),
                    active: page == current,
                })),
            }
        }
        links.push(MetaLink { url: next.clone(), label: "Next &raquo;".to_string(), active: false });

        Paginated {
            data,
            links: PageLinks { first: self.url(1), last: self.url(last), prev, next },
            meta: PageMeta {
                current_page: current,
                from,
                last_page: last,
                links,
                path: self.path.clone(),
                per_page: self.request.per_page,
                to,
                total: self.total,
            },
        }
    }

    /// Page numbers to show, with `...` gaps once there are too many to list.
    fn elements(&self) -> Vec<Element> {
        let current = self.request.page;
        let last = self.last_page();
        let window = ON_EACH_SIDE + 4;

        if last < ON_EACH_SIDE * 2 + 8 {
            return vec![Element::Pages(1..=last)];
        }

        let start = Element::Pages(1..=2);
        let finish = Element::Pages(last - 1..=last);

        if current <= window {
            vec![Element::Pages(1..=window + ON_EACH_SIDE), Element::Dots, finish]
        } else if current > last - window {
            vec![start, Element::Dots, Element::Pages(last - (window + ON_EACH_SIDE - 1)..=last)]
        } else {
            vec![
                start,
                Element::Dots,
                Element::Pages(current - ON_EACH_SIDE..=current + ON_EACH_SIDE),
                Element::Dots,
                finish,
            ]
        }
    }
}

enum Element {
    Pages(std::ops::RangeInclusive<i64>),
    Dots,
}
