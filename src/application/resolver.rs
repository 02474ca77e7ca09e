//! Response resolution for every reference endpoint.
//!
//! One generic engine selects records for any [`LookupQuery`]; the creature
//! listing additionally validates and applies pagination.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::{
    application::{
        filters::{self, Predicate},
        pagination::{self, Page, PaginationError},
        query::{
            DexQuery, EvolutionTypeQuery, ExtinctionLevelQuery, LookupQuery, QueryError,
            Selection, TypesQuery,
        },
        reference::ReferenceStore,
    },
    domain::{entities::ReferenceRecord, types::ResourceKind},
};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),
    #[error("no {kind} record has identifier `{identifier}`")]
    IdentifierNotFound {
        kind: ResourceKind,
        identifier: String,
    },
    #[error("no {kind} record matches the requested filters")]
    NoMatches { kind: ResourceKind },
    #[error("page {page} does not exist; there are {total_pages} pages")]
    PageNotFound { page: u64, total_pages: usize },
    #[error("failed to serialize response payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<PaginationError> for ResolveError {
    fn from(error: PaginationError) -> Self {
        match error {
            PaginationError::PageOutOfRange { page, total_pages } => {
                Self::PageNotFound { page, total_pages }
            }
            other => Self::InvalidQuery(QueryError::Pagination(other)),
        }
    }
}

/// A serialized JSON response body, either freshly computed or read from cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(String);

impl Payload {
    pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_string(value).map(Self)
    }

    pub fn from_cached(body: String) -> Self {
        Self(body)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[derive(Serialize)]
struct StatusBody<'a> {
    name: &'a str,
    status: &'static str,
    version: &'a str,
}

#[derive(Serialize)]
struct SingleListing<'a, T> {
    count: usize,
    list: [&'a T; 1],
}

enum Selected<'a, T> {
    Single(&'a T),
    Many(Vec<&'a T>),
}

/// Queries the resolver knows how to answer.
pub trait Resolvable: LookupQuery {
    fn resolve_with(&self, resolver: &ResponseResolver) -> Result<Payload, ResolveError>;
}

impl Resolvable for TypesQuery {
    fn resolve_with(&self, resolver: &ResponseResolver) -> Result<Payload, ResolveError> {
        resolver.listing(self)
    }
}

impl Resolvable for ExtinctionLevelQuery {
    fn resolve_with(&self, resolver: &ResponseResolver) -> Result<Payload, ResolveError> {
        resolver.listing(self)
    }
}

impl Resolvable for EvolutionTypeQuery {
    fn resolve_with(&self, resolver: &ResponseResolver) -> Result<Payload, ResolveError> {
        resolver.listing(self)
    }
}

impl Resolvable for DexQuery {
    fn resolve_with(&self, resolver: &ResponseResolver) -> Result<Payload, ResolveError> {
        resolver.dex(self)
    }
}

#[derive(Debug, Clone)]
pub struct ResponseResolver {
    store: Arc<ReferenceStore>,
}

impl ResponseResolver {
    pub fn new(store: Arc<ReferenceStore>) -> Self {
        Self { store }
    }

    pub fn status(&self) -> Result<Payload, ResolveError> {
        let info = self.store.info();
        Ok(Payload::to_json(&StatusBody {
            name: &info.name,
            status: "OK",
            version: &info.version,
        })?)
    }

    pub fn resolve<Q: Resolvable>(&self, query: &Q) -> Result<Payload, ResolveError> {
        query.resolve_with(self)
    }

    /// Single record for an identifier, otherwise the sorted selection.
    fn listing<Q: LookupQuery>(&self, query: &Q) -> Result<Payload, ResolveError> {
        match self.select(query)? {
            Selected::Single(record) => Ok(Payload::to_json(record)?),
            Selected::Many(records) => Ok(Payload::to_json(&records)?),
        }
    }

    fn dex(&self, query: &DexQuery) -> Result<Payload, ResolveError> {
        let page = query.page_request()?;

        match self.select(query)? {
            Selected::Single(record) => Ok(Payload::to_json(&SingleListing {
                count: 1,
                list: [record],
            })?),
            Selected::Many(records) => {
                let page: Page<_> = pagination::paginate(records, page)?;
                Ok(Payload::to_json(&page)?)
            }
        }
    }

    fn select<Q: LookupQuery>(&self, query: &Q) -> Result<Selected<'_, Q::Record>, ResolveError> {
        let records = self.store.collection::<Q::Record>().records();

        match query.selection()? {
            Selection::Identifier(identifier) => {
                let raw = identifier.as_str().to_string();
                filters::filter(records, &[Predicate::Identity(identifier)])
                    .into_iter()
                    .next()
                    .map(Selected::Single)
                    .ok_or(ResolveError::IdentifierNotFound {
                        kind: <Q::Record as ReferenceRecord>::KIND,
                        identifier: raw,
                    })
            }
            Selection::Filter(predicates) => {
                let matched = filters::filter(records, &predicates);
                if matched.is_empty() && !predicates.is_empty() {
                    return Err(ResolveError::NoMatches {
                        kind: <Q::Record as ReferenceRecord>::KIND,
                    });
                }
                Ok(Selected::Many(matched))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::*;
    use crate::{
        application::reference::ReferenceCollection,
        domain::entities::{
            CreatureRecord, EvolutionTypeRecord, ExtinctionLevelRecord, ServiceInfo, TypeRecord,
        },
    };

    fn creature(id: u32, starter: bool, types: &[u32]) -> CreatureRecord {
        CreatureRecord {
            id,
            name: format!("creature-{id}"),
            types: types.to_vec(),
            starter,
            extra: Map::new(),
        }
    }

    fn resolver(creatures: Vec<CreatureRecord>) -> ResponseResolver {
        let types = vec![
            TypeRecord {
                id: 2,
                name: "Ember".to_string(),
                weaknesses: vec![3, 6],
                extra: Map::new(),
            },
            TypeRecord {
                id: 1,
                name: "Flora".to_string(),
                weaknesses: vec![2, 5, 6],
                extra: Map::new(),
            },
        ];
        let store = ReferenceStore::new(
            ReferenceCollection::new(types).expect("types"),
            ReferenceCollection::new(creatures).expect("creatures"),
            ReferenceCollection::new(vec![ExtinctionLevelRecord {
                level: 1,
                name: "Least Concern".to_string(),
                extra: Map::new(),
            }])
            .expect("levels"),
            ReferenceCollection::new(vec![EvolutionTypeRecord {
                kind: 1,
                name: "Level".to_string(),
                extra: Map::new(),
            }])
            .expect("evolution types"),
            ServiceInfo {
                name: "bestiary".to_string(),
                version: "1.2.3".to_string(),
            },
        );
        ResponseResolver::new(Arc::new(store))
    }

    fn pair() -> ResponseResolver {
        resolver(vec![creature(1, true, &[1]), creature(2, false, &[1, 2])])
    }

    fn json_of(payload: Payload) -> Value {
        serde_json::from_str(payload.as_str()).expect("valid json")
    }

    fn dex_query(
        types: Option<&str>,
        starter: Option<&str>,
        page: Option<&str>,
        page_size: Option<&str>,
    ) -> DexQuery {
        DexQuery {
            id: None,
            starter: starter.map(str::to_string),
            types: types.map(str::to_string),
            page: page.map(str::to_string),
            page_size: page_size.map(str::to_string),
        }
    }

    #[test]
    fn status_reports_service_info() {
        let body = json_of(pair().status().expect("status"));
        assert_eq!(
            body,
            json!({ "name": "bestiary", "status": "OK", "version": "1.2.3" })
        );
    }

    #[test]
    fn types_filter_requires_superset() {
        let resolver = pair();
        let query = TypesQuery {
            id: None,
            weaknesses: Some("6".to_string()),
        };
        let body = json_of(resolver.resolve(&query).expect("matches"));
        assert_eq!(body[0]["id"], 1);
        assert_eq!(body[1]["id"], 2);

        let query = TypesQuery {
            id: None,
            weaknesses: Some("5,6".to_string()),
        };
        let body = json_of(resolver.resolve(&query).expect("matches"));
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["name"], "Flora");

        let query = TypesQuery {
            id: None,
            weaknesses: Some("4".to_string()),
        };
        assert!(matches!(
            resolver.resolve(&query),
            Err(ResolveError::NoMatches {
                kind: ResourceKind::Types
            })
        ));
    }

    #[test]
    fn identifier_lookup_returns_bare_record() {
        let query = TypesQuery {
            id: Some("02".to_string()),
            weaknesses: None,
        };
        let body = json_of(pair().resolve(&query).expect("found"));
        assert_eq!(body["name"], "Ember");

        let query = ExtinctionLevelQuery {
            level: Some("9".to_string()),
        };
        assert!(matches!(
            pair().resolve(&query),
            Err(ResolveError::IdentifierNotFound {
                kind: ResourceKind::ExtinctionLevels,
                ..
            })
        ));
    }

    #[test]
    fn dex_filters_narrow_the_listing() {
        let resolver = pair();
        let body = json_of(
            resolver
                .resolve(&dex_query(Some("1,2"), None, None, None))
                .expect("types filter"),
        );
        assert_eq!(body["count"], 1);
        assert_eq!(body["list"][0]["id"], 2);

        let body = json_of(
            resolver
                .resolve(&dex_query(None, Some("true"), None, None))
                .expect("starter filter"),
        );
        assert_eq!(body["count"], 1);
        assert_eq!(body["list"][0]["id"], 1);
    }

    #[test]
    fn dex_identifier_lookup_is_wrapped_in_a_list() {
        let query = DexQuery {
            id: Some("2".to_string()),
            ..DexQuery::default()
        };
        let body = json_of(pair().resolve(&query).expect("found"));
        assert_eq!(body["count"], 1);
        assert_eq!(body["list"][0]["id"], 2);
        assert!(body.get("page").is_none());
    }

    #[test]
    fn dex_validates_pagination_before_identifier() {
        let query = DexQuery {
            id: Some("2".to_string()),
            page: Some("0".to_string()),
            ..DexQuery::default()
        };
        assert!(matches!(
            pair().resolve(&query),
            Err(ResolveError::InvalidQuery(QueryError::Pagination(
                PaginationError::InvalidPage(_)
            )))
        ));
    }

    #[test]
    fn dex_pages_cover_the_filtered_set() {
        let creatures = (1..=7).map(|id| creature(id, id % 2 == 0, &[1])).collect();
        let resolver = resolver(creatures);

        let mut seen = Vec::new();
        for page in ["1", "2", "3"] {
            let body = json_of(
                resolver
                    .resolve(&dex_query(None, None, Some(page), Some("3")))
                    .expect("page exists"),
            );
            assert_eq!(body["totalPages"], 3);
            assert_eq!(body["count"], 7);
            for item in body["list"].as_array().expect("list") {
                seen.push(item["id"].as_u64().expect("id"));
            }
        }
        assert_eq!(seen, (1..=7).collect::<Vec<u64>>());

        assert!(matches!(
            resolver.resolve(&dex_query(None, None, Some("4"), Some("3"))),
            Err(ResolveError::PageNotFound {
                page: 4,
                total_pages: 3
            })
        ));
    }

    #[test]
    fn dex_rejects_invalid_starter() {
        assert!(matches!(
            pair().resolve(&dex_query(None, Some("maybe"), None, None)),
            Err(ResolveError::InvalidQuery(QueryError::InvalidBoolean { .. }))
        ));
    }

    #[test]
    fn dex_no_matches_is_not_a_page_error() {
        assert!(matches!(
            pair().resolve(&dex_query(Some("9"), None, None, None)),
            Err(ResolveError::NoMatches {
                kind: ResourceKind::Creatures
            })
        ));
    }

    #[test]
    fn unfiltered_listing_is_sorted() {
        let body = json_of(pair().resolve(&TypesQuery::default()).expect("all types"));
        let ids: Vec<u64> = body
            .as_array()
            .expect("list")
            .iter()
            .filter_map(|item| item["id"].as_u64())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
