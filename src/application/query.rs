//! Typed per-endpoint queries built from raw query-string parameters.
//!
//! Raw structs only capture strings; `selection` turns them into predicates and
//! reports malformed input as [`QueryError`]. An identifier parameter, when
//! present, short-circuits every other filter.

use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    application::{
        filters::{Identifier, Predicate},
        pagination::{PageRequest, PaginationError},
        reference::Stored,
    },
    domain::{
        entities::{CreatureRecord, EvolutionTypeRecord, ExtinctionLevelRecord, TypeRecord},
        types::{FlagAttribute, SetAttribute},
    },
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query parameter `{param}` must not be empty")]
    Empty { param: &'static str },
    #[error("query parameter `{param}` must be `true` or `false`, got `{value}`")]
    InvalidBoolean { param: &'static str, value: String },
    #[error(
        "query parameter `{param}` must be a comma-separated list of non-negative integers, got `{value}`"
    )]
    InvalidIntegerList { param: &'static str, value: String },
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

impl QueryError {
    /// Name of the offending query parameter.
    pub fn param(&self) -> &'static str {
        match self {
            QueryError::Empty { param }
            | QueryError::InvalidBoolean { param, .. }
            | QueryError::InvalidIntegerList { param, .. } => param,
            QueryError::Pagination(PaginationError::InvalidPageSize(_)) => "pageSize",
            QueryError::Pagination(_) => "page",
        }
    }
}

/// What a query selects from its collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Identifier(Identifier),
    /// Zero predicates selects the whole collection.
    Filter(Vec<Predicate>),
}

/// A query against one reference collection.
pub trait LookupQuery: DeserializeOwned + Default + Send + Sync + 'static {
    type Record: Stored;

    /// Raw identifier parameter, if the request carries one.
    fn identifier(&self) -> Option<&str>;

    fn selection(&self) -> Result<Selection, QueryError>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypesQuery {
    pub id: Option<String>,
    pub weaknesses: Option<String>,
}

impl LookupQuery for TypesQuery {
    type Record = TypeRecord;

    fn identifier(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn selection(&self) -> Result<Selection, QueryError> {
        if let Some(id) = identifier_param("id", self.identifier())? {
            return Ok(Selection::Identifier(id));
        }

        let mut predicates = Vec::new();
        if let Some(raw) = self.weaknesses.as_deref() {
            predicates.push(Predicate::ContainsAll {
                attribute: SetAttribute::Weaknesses,
                values: parse_integer_list(SetAttribute::Weaknesses.as_str(), raw)?,
            });
        }
        Ok(Selection::Filter(predicates))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexQuery {
    pub id: Option<String>,
    pub starter: Option<String>,
    pub types: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl DexQuery {
    /// Validated pagination, checked before any filtering.
    pub fn page_request(&self) -> Result<PageRequest, QueryError> {
        Ok(PageRequest::parse(
            self.page.as_deref(),
            self.page_size.as_deref(),
        )?)
    }
}

impl LookupQuery for DexQuery {
    type Record = CreatureRecord;

    fn identifier(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn selection(&self) -> Result<Selection, QueryError> {
        if let Some(id) = identifier_param("id", self.identifier())? {
            return Ok(Selection::Identifier(id));
        }

        let mut predicates = Vec::new();
        if let Some(raw) = self.starter.as_deref() {
            let attribute = FlagAttribute::Starter;
            predicates.push(Predicate::Equals {
                attribute,
                value: parse_bool(attribute.as_str(), raw)?,
            });
        }
        if let Some(raw) = self.types.as_deref() {
            predicates.push(Predicate::ContainsAll {
                attribute: SetAttribute::Types,
                values: parse_integer_list(SetAttribute::Types.as_str(), raw)?,
            });
        }
        Ok(Selection::Filter(predicates))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtinctionLevelQuery {
    pub level: Option<String>,
}

impl LookupQuery for ExtinctionLevelQuery {
    type Record = ExtinctionLevelRecord;

    fn identifier(&self) -> Option<&str> {
        self.level.as_deref()
    }

    fn selection(&self) -> Result<Selection, QueryError> {
        Ok(match identifier_param("level", self.identifier())? {
            Some(level) => Selection::Identifier(level),
            None => Selection::Filter(Vec::new()),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvolutionTypeQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl LookupQuery for EvolutionTypeQuery {
    type Record = EvolutionTypeRecord;

    fn identifier(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    fn selection(&self) -> Result<Selection, QueryError> {
        Ok(match identifier_param("type", self.identifier())? {
            Some(kind) => Selection::Identifier(kind),
            None => Selection::Filter(Vec::new()),
        })
    }
}

fn identifier_param(
    param: &'static str,
    raw: Option<&str>,
) -> Result<Option<Identifier>, QueryError> {
    match raw {
        Some(value) if value.trim().is_empty() => Err(QueryError::Empty { param }),
        Some(value) => Ok(Some(Identifier::new(value))),
        None => Ok(None),
    }
}

/// Strict boolean: only the literal tokens `true` and `false` are accepted.
fn parse_bool(param: &'static str, raw: &str) -> Result<bool, QueryError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        "" => Err(QueryError::Empty { param }),
        other => Err(QueryError::InvalidBoolean {
            param,
            value: other.to_string(),
        }),
    }
}

fn parse_integer_list(param: &'static str, raw: &str) -> Result<Vec<u32>, QueryError> {
    if raw.trim().is_empty() {
        return Err(QueryError::Empty { param });
    }

    raw.split(',')
        .map(|token| token.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| QueryError::InvalidIntegerList {
            param,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dex(pairs: &[(&str, &str)]) -> DexQuery {
        let mut query = DexQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "id" => query.id = value,
                "starter" => query.starter = value,
                "types" => query.types = value,
                "page" => query.page = value,
                "pageSize" => query.page_size = value,
                other => panic!("unexpected key {other}"),
            }
        }
        query
    }

    #[test]
    fn identifier_short_circuits_other_filters() {
        let query = dex(&[("id", "4"), ("starter", "maybe"), ("types", "x")]);
        assert_eq!(
            query.selection(),
            Ok(Selection::Identifier(Identifier::new("4")))
        );
    }

    #[test]
    fn dex_filters_are_built_in_order() {
        let query = dex(&[("types", "1, 2"), ("starter", "false")]);
        assert_eq!(
            query.selection(),
            Ok(Selection::Filter(vec![
                Predicate::Equals {
                    attribute: FlagAttribute::Starter,
                    value: false,
                },
                Predicate::ContainsAll {
                    attribute: SetAttribute::Types,
                    values: vec![1, 2],
                },
            ]))
        );
    }

    #[test]
    fn starter_is_parsed_strictly() {
        let err = dex(&[("starter", "maybe")])
            .selection()
            .expect_err("not a boolean");
        assert_eq!(
            err,
            QueryError::InvalidBoolean {
                param: "starter",
                value: "maybe".to_string()
            }
        );
        assert!(dex(&[("starter", "TRUE")]).selection().is_err());
        assert!(dex(&[("starter", "1")]).selection().is_err());
    }

    #[test]
    fn malformed_integer_lists_are_rejected() {
        for raw in ["1,,2", "a", "1,-2", "1;2"] {
            let query = TypesQuery {
                weaknesses: Some(raw.to_string()),
                ..TypesQuery::default()
            };
            assert!(
                matches!(
                    query.selection(),
                    Err(QueryError::InvalidIntegerList { param: "weaknesses", .. })
                ),
                "`{raw}` should be rejected"
            );
        }
    }

    #[test]
    fn empty_values_are_rejected() {
        let query = TypesQuery {
            id: Some(" ".to_string()),
            ..TypesQuery::default()
        };
        assert_eq!(query.selection(), Err(QueryError::Empty { param: "id" }));

        let level = ExtinctionLevelQuery {
            level: Some(String::new()),
        };
        assert_eq!(level.selection(), Err(QueryError::Empty { param: "level" }));
    }

    #[test]
    fn pagination_errors_name_their_parameter() {
        let err = dex(&[("pageSize", "0")])
            .page_request()
            .expect_err("invalid size");
        assert_eq!(err.param(), "pageSize");

        let err = dex(&[("page", "-1")])
            .page_request()
            .expect_err("invalid page");
        assert_eq!(err.param(), "page");
    }

    #[test]
    fn no_parameters_select_everything() {
        assert_eq!(
            EvolutionTypeQuery::default().selection(),
            Ok(Selection::Filter(Vec::new()))
        );
        assert_eq!(
            TypesQuery::default().selection(),
            Ok(Selection::Filter(Vec::new()))
        );
    }
}
