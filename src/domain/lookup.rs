//! Identifier-or-slug disambiguation for public lookup routes.
//!
//! Catalogue URLs carry either the raw record id or the human-facing slug.
//! A value matching the canonical UUID format is always resolved via the id
//! path and never via slug lookup, so a slug can never shadow an id.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Id(Uuid),
    Slug(String),
}

impl LookupKey {
    pub fn parse(raw: &str) -> Self {
        match Uuid::try_parse(raw) {
            Ok(id) => LookupKey::Id(id),
            Err(_) => LookupKey::Slug(raw.to_string()),
        }
    }
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKey::Id(id) => write!(f, "{id}"),
            LookupKey::Slug(slug) => f.write_str(slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_strings_resolve_to_id() {
        let id = Uuid::new_v4();
        assert_eq!(LookupKey::parse(&id.to_string()), LookupKey::Id(id));
    }

    #[test]
    fn non_uuid_strings_resolve_to_slug() {
        assert_eq!(
            LookupKey::parse("organic-cotton-tee"),
            LookupKey::Slug("organic-cotton-tee".to_string())
        );
    }

    #[test]
    fn uuid_like_but_invalid_falls_back_to_slug() {
        // One character short of a valid UUID.
        let almost = "123e4567-e89b-12d3-a456-42661417400";
        assert_eq!(
            LookupKey::parse(almost),
            LookupKey::Slug(almost.to_string())
        );
    }
}
