use serde::{Deserialize, Serialize};

use crate::error::{AppError, FieldError};

pub const MAX_PAGE_SIZE: i64 = 100;

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page_number: default_page_number(),
            page_size: default_page_size(),
        }
    }
}

impl PageParams {
    /// Out-of-range values are a caller error, never clamped.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        if self.page_number < 1 {
            errors.push(FieldError::new(
                "pageNumber",
                "Page number must be greater than 0",
            ));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            errors.push(FieldError::new(
                "pageSize",
                format!("Page size must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page_number - 1) * self.page_size
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, params: &PageParams, total_count: i64) -> Self {
        let total_pages = (total_count as u64).div_ceil(params.page_size as u64) as i64;
        Self {
            data,
            page_number: params.page_number,
            page_size: params.page_size,
            total_count,
            total_pages,
            has_previous: params.page_number > 1,
            has_next: params.page_number < total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}
