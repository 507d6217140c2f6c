/*
 * Responsibility
 * - boats request/response DTO and paging parameters
 * - validate() covers shape only; id rules depend on the handler
 */
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::credentials::check_field;
use crate::error::Problem;
use crate::repos::{BoatRow, NewBoat};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
const MAX_DESCRIPTION_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoatDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BoatDto {
    pub fn validate(&self) -> Result<(), Vec<Problem>> {
        let mut problems: Vec<Problem> = check_field("name", &self.name, 2, 100).into_iter().collect();

        if let Some(description) = &self.description
            && description.chars().count() > MAX_DESCRIPTION_CHARS
        {
            problems.push(Problem::with_detail(
                "Invalid 'description'",
                format!("size must be at most {MAX_DESCRIPTION_CHARS}"),
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    pub fn into_new_boat(self) -> NewBoat {
        NewBoat {
            name: self.name.trim().to_owned(),
            description: self.description,
        }
    }
}

impl From<BoatRow> for BoatDto {
    fn from(row: BoatRow) -> Self {
        Self {
            id: Some(row.id),
            name: row.name,
            description: row.description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageParams {
    /// `(limit, offset)` for the repository.
    pub fn limit_offset(&self) -> Result<(i64, i64), Problem> {
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(Problem::with_detail(
                "Invalid 'size'",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        let page = i64::from(self.page.unwrap_or(0));
        let size = i64::from(size);
        Ok((size, page * size))
    }
}
