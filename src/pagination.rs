use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` in any case is descending, everything else ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Zero-based page window with a sort key.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<S> {
    pub page: i64,
    pub size: i64,
    pub sort: S,
    pub direction: SortDirection,
}

impl<S> PageRequest<S> {
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i64,
    pub size: i64,
    pub number: i64,
    pub number_of_elements: i64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new<S>(content: Vec<T>, total_elements: i64, req: &PageRequest<S>) -> Self {
        let total_pages = if req.size > 0 {
            (total_elements + req.size - 1) / req.size
        } else {
            0
        };
        let number_of_elements = content.len() as i64;
        Self {
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            size: req.size,
            number: req.page,
            number_of_elements,
            first: req.page == 0,
            last: req.page.saturating_add(1) >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}
