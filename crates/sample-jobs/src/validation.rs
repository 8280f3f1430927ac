//! Catalogue rules applied after decoding.
//!
//! - At least one posting.
//! - Identifiers are unique.
//! - `id`, `title`, `company`, `location` and `description` are not blank.
//! - `updatedAt` is never earlier than `createdAt`.

use std::collections::HashSet;

use crate::error::CatalogueError;
use crate::posting::SamplePosting;

pub(crate) fn validate_postings(postings: &[SamplePosting]) -> Result<(), CatalogueError> {
    if postings.is_empty() {
        return Err(CatalogueError::Empty);
    }

    let mut seen = HashSet::with_capacity(postings.len());
    for (index, posting) in postings.iter().enumerate() {
        check_required_fields(index, posting)?;
        if !seen.insert(posting.id.as_str()) {
            return Err(CatalogueError::DuplicateId {
                id: posting.id.clone(),
            });
        }
        if posting.updated_at < posting.created_at {
            return Err(CatalogueError::UpdatedBeforeCreated {
                id: posting.id.clone(),
            });
        }
    }
    Ok(())
}

fn check_required_fields(index: usize, posting: &SamplePosting) -> Result<(), CatalogueError> {
    let fields = [
        ("id", posting.id.as_str()),
        ("title", posting.title.as_str()),
        ("company", posting.company.as_str()),
        ("location", posting.location.as_str()),
        ("description", posting.description.as_str()),
    ];
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some(&(field, _)) => Err(CatalogueError::BlankField { index, field }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posting::JobTypeSeed;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn posting(id: &str) -> SamplePosting {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid date");
        SamplePosting {
            id: id.to_owned(),
            title: "Engineer".to_owned(),
            company: "Acme".to_owned(),
            location: "Austin, TX".to_owned(),
            job_type: JobTypeSeed::FullTime,
            salary_range: String::new(),
            description: "Build things.".to_owned(),
            requirements: Vec::new(),
            benefits: Vec::new(),
            is_featured: false,
            employer_id: "e1".to_owned(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn accepts_well_formed_postings() {
        assert_eq!(validate_postings(&[posting("1"), posting("2")]), Ok(()));
    }

    #[test]
    fn rejects_empty_catalogue() {
        assert_eq!(validate_postings(&[]), Err(CatalogueError::Empty));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = validate_postings(&[posting("1"), posting("1")]).expect_err("duplicate");
        assert_eq!(err, CatalogueError::DuplicateId { id: "1".to_owned() });
    }

    #[rstest]
    #[case("title")]
    #[case("company")]
    #[case("location")]
    #[case("description")]
    fn rejects_blank_required_fields(#[case] field: &'static str) {
        let mut blank = posting("9");
        match field {
            "title" => blank.title = "  ".to_owned(),
            "company" => blank.company = String::new(),
            "location" => blank.location = "\t".to_owned(),
            _ => blank.description = String::new(),
        }
        let err = validate_postings(&[posting("1"), blank]).expect_err("blank field");
        assert_eq!(err, CatalogueError::BlankField { index: 1, field });
    }

    #[test]
    fn rejects_update_before_creation() {
        let mut stale = posting("3");
        stale.updated_at = Utc
            .with_ymd_and_hms(2023, 12, 31, 0, 0, 0)
            .single()
            .expect("valid date");
        let err = validate_postings(&[stale]).expect_err("stale");
        assert_eq!(err, CatalogueError::UpdatedBeforeCreated { id: "3".to_owned() });
    }
}
