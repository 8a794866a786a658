//! Unit tests for the user mapping resolution engine.
//!
//! Covers the cache short-circuit, miss-then-populate, creation, the
//! duplicate-pair race and degraded cache behaviour.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mockall::Sequence;
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::{ResolveError, UserMappingService};
use crate::domain::ports::{
    MockUserIdGenerator, MockUserMappingCache, MockUserMappingRepository, UserIdGenerationError,
    UserMappingCacheError, UserMappingRepositoryError,
};
use crate::domain::{ErrorCode, NewUserMapping, UserId, UserMapping};

const TOKEN: &str = "4e31ab8e-3328-44b1-be33-f30c82f4bc32";

type MockService =
    UserMappingService<MockUserMappingRepository, MockUserMappingCache, MockUserIdGenerator>;

fn user_id(value: &str) -> UserId {
    UserId::new(value).expect("non-empty token")
}

fn stored(id1: &str, id2: &str, token: &str) -> UserMapping {
    UserMapping {
        id: Uuid::new_v4(),
        id1: id1.to_owned(),
        id2: id2.to_owned(),
        user_id: user_id(token),
        created_at: Utc::now(),
    }
}

fn from_new(mapping: &NewUserMapping) -> UserMapping {
    UserMapping {
        id: Uuid::new_v4(),
        id1: mapping.id1.clone(),
        id2: mapping.id2.clone(),
        user_id: mapping.user_id.clone(),
        created_at: Utc::now(),
    }
}

fn make_service(
    repository: MockUserMappingRepository,
    cache: MockUserMappingCache,
    generator: MockUserIdGenerator,
) -> MockService {
    UserMappingService::new(Arc::new(repository), Arc::new(cache), Arc::new(generator))
}

fn expect_cache_miss(cache: &mut MockUserMappingCache, key: &'static str) {
    cache
        .expect_get()
        .withf(move |k| k.as_str() == key)
        .times(1)
        .returning(|_| Ok(None));
}

fn expect_cache_set(cache: &mut MockUserMappingCache, key: &'static str, token: &'static str) {
    cache
        .expect_set()
        .withf(move |k, value, ttl| {
            k.as_str() == key && value == token && *ttl == Duration::from_secs(3600)
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
}

fn expect_generate(generator: &mut MockUserIdGenerator, token: &'static str) {
    generator
        .expect_generate()
        .times(1)
        .returning(move || Ok(user_id(token)));
}

#[fixture]
fn repository() -> MockUserMappingRepository {
    MockUserMappingRepository::new()
}

#[fixture]
fn cache() -> MockUserMappingCache {
    MockUserMappingCache::new()
}

#[fixture]
fn generator() -> MockUserIdGenerator {
    MockUserIdGenerator::new()
}

#[rstest]
#[tokio::test]
async fn cache_hit_returns_without_touching_store(
    repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    generator: MockUserIdGenerator,
) {
    cache
        .expect_get()
        .withf(|k| k.as_str() == "user-mapping:id1:id2")
        .times(1)
        .returning(|_| Ok(Some("cached-uuid".to_owned())));
    cache.expect_set().never();

    // `repository` and `generator` carry no expectations: any call panics.
    let service = make_service(repository, cache, generator);
    let resolved = service.resolve("id1", "id2").await.expect("cache hit");

    assert_eq!(resolved, user_id("cached-uuid"));
}

#[rstest]
#[tokio::test]
async fn store_hit_populates_cache(
    mut repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    generator: MockUserIdGenerator,
) {
    expect_cache_miss(&mut cache, "user-mapping:id1:id2");
    repository
        .expect_find_by_unordered_pair()
        .withf(|a, b| a == "id1" && b == "id2")
        .times(1)
        .returning(|_, _| Ok(Some(stored("id2", "id1", "db-uuid"))));
    repository.expect_insert().never();
    expect_cache_set(&mut cache, "user-mapping:id1:id2", "db-uuid");

    let service = make_service(repository, cache, generator);
    let resolved = service.resolve("id1", "id2").await.expect("store hit");

    assert_eq!(resolved, user_id("db-uuid"));
}

#[rstest]
#[tokio::test]
async fn new_pair_is_inserted_in_supplied_order_and_cached(
    mut repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    mut generator: MockUserIdGenerator,
) {
    let mut seq = Sequence::new();
    cache
        .expect_get()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(None));
    repository
        .expect_find_by_unordered_pair()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(None));
    generator
        .expect_generate()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(user_id(TOKEN)));
    repository
        .expect_insert()
        .withf(|mapping: &NewUserMapping| {
            mapping.id1 == "idA" && mapping.id2 == "idB" && mapping.user_id.as_str() == TOKEN
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|mapping| Ok(from_new(mapping)));
    cache
        .expect_set()
        .withf(|k, value, _| k.as_str() == "user-mapping:idA:idB" && value == TOKEN)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));

    let service = make_service(repository, cache, generator);
    let resolved = service.resolve("idA", "idB").await.expect("created");

    assert_eq!(resolved.as_str(), TOKEN);
}

#[rstest]
#[tokio::test]
async fn duplicate_pair_race_returns_winner_token(
    mut repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    mut generator: MockUserIdGenerator,
) {
    let mut seq = Sequence::new();
    expect_cache_miss(&mut cache, "user-mapping:foo:bar");
    repository
        .expect_find_by_unordered_pair()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(None));
    expect_generate(&mut generator, "loser-token");
    repository
        .expect_insert()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(UserMappingRepositoryError::duplicate_pair("concurrent insert")));
    repository
        .expect_find_by_unordered_pair()
        .withf(|a, b| a == "foo" && b == "bar")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(Some(stored("bar", "foo", "winner-token"))));
    expect_cache_set(&mut cache, "user-mapping:foo:bar", "winner-token");

    let service = make_service(repository, cache, generator);
    let resolved = service.resolve("foo", "bar").await.expect("race recovered");

    assert_eq!(resolved, user_id("winner-token"));
}

#[rstest]
#[tokio::test]
async fn duplicate_pair_without_winner_is_store_failure(
    mut repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    mut generator: MockUserIdGenerator,
) {
    expect_cache_miss(&mut cache, "user-mapping:foo:bar");
    repository
        .expect_find_by_unordered_pair()
        .times(2)
        .returning(|_, _| Ok(None));
    expect_generate(&mut generator, TOKEN);
    repository
        .expect_insert()
        .times(1)
        .returning(|_| Err(UserMappingRepositoryError::duplicate_pair("concurrent insert")));
    cache.expect_set().never();

    let service = make_service(repository, cache, generator);
    let err = service.resolve("foo", "bar").await.expect_err("unresolved race");

    assert!(matches!(err, ResolveError::StoreUnavailable(_)), "got {err:?}");
}

#[rstest]
#[tokio::test]
async fn cache_failures_are_absorbed(
    mut repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    generator: MockUserIdGenerator,
) {
    cache
        .expect_get()
        .times(1)
        .returning(|_| Err(UserMappingCacheError::backend("connection refused")));
    repository
        .expect_find_by_unordered_pair()
        .times(1)
        .returning(|_, _| Ok(Some(stored("a", "b", "db-uuid"))));
    cache
        .expect_set()
        .times(1)
        .returning(|_, _, _| Err(UserMappingCacheError::backend("connection refused")));

    let service = make_service(repository, cache, generator);
    let resolved = service.resolve("a", "b").await.expect("cache failure tolerated");

    assert_eq!(resolved, user_id("db-uuid"));
}

#[rstest]
#[tokio::test]
async fn empty_cached_value_is_a_miss(
    mut repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    generator: MockUserIdGenerator,
) {
    cache
        .expect_get()
        .times(1)
        .returning(|_| Ok(Some(String::new())));
    repository
        .expect_find_by_unordered_pair()
        .times(1)
        .returning(|_, _| Ok(Some(stored("a", "b", "db-uuid"))));
    expect_cache_set(&mut cache, "user-mapping:a:b", "db-uuid");

    let service = make_service(repository, cache, generator);
    let resolved = service.resolve("a", "b").await.expect("store fallback");

    assert_eq!(resolved, user_id("db-uuid"));
}

#[rstest]
#[case(UserMappingRepositoryError::connection("pool timeout"))]
#[case(UserMappingRepositoryError::query("syntax"))]
#[tokio::test]
async fn store_lookup_failure_propagates(
    #[case] failure: UserMappingRepositoryError,
    mut repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    generator: MockUserIdGenerator,
) {
    expect_cache_miss(&mut cache, "user-mapping:a:b");
    let returned = failure.clone();
    repository
        .expect_find_by_unordered_pair()
        .times(1)
        .return_once(move |_, _| Err(returned));
    cache.expect_set().never();

    let service = make_service(repository, cache, generator);
    let err = service.resolve("a", "b").await.expect_err("store failure");

    assert_eq!(err, ResolveError::StoreUnavailable(failure));
}

#[rstest]
#[tokio::test]
async fn insert_failure_propagates(
    mut repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    mut generator: MockUserIdGenerator,
) {
    expect_cache_miss(&mut cache, "user-mapping:a:b");
    repository
        .expect_find_by_unordered_pair()
        .times(1)
        .returning(|_, _| Ok(None));
    expect_generate(&mut generator, TOKEN);
    repository
        .expect_insert()
        .times(1)
        .returning(|_| Err(UserMappingRepositoryError::connection("closed")));
    cache.expect_set().never();

    let service = make_service(repository, cache, generator);
    let err = service.resolve("a", "b").await.expect_err("insert failure");

    assert!(matches!(err, ResolveError::StoreUnavailable(_)), "got {err:?}");
}

#[rstest]
#[tokio::test]
async fn generation_failure_propagates_before_insert(
    mut repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    mut generator: MockUserIdGenerator,
) {
    expect_cache_miss(&mut cache, "user-mapping:a:b");
    repository
        .expect_find_by_unordered_pair()
        .times(1)
        .returning(|_, _| Ok(None));
    generator
        .expect_generate()
        .times(1)
        .returning(|| Err(UserIdGenerationError::exhausted("no entropy")));
    repository.expect_insert().never();

    let service = make_service(repository, cache, generator);
    let err = service.resolve("a", "b").await.expect_err("generation failure");

    assert_eq!(
        err,
        ResolveError::GenerationFailure(UserIdGenerationError::exhausted("no entropy"))
    );
}

#[rstest]
#[case("", "b", "id1")]
#[case("a", "", "id2")]
#[case("", "", "id1")]
#[tokio::test]
async fn empty_identifiers_are_rejected(
    #[case] id1: &str,
    #[case] id2: &str,
    #[case] field: &str,
    repository: MockUserMappingRepository,
    cache: MockUserMappingCache,
    generator: MockUserIdGenerator,
) {
    let service = make_service(repository, cache, generator);
    let err = service.resolve(id1, id2).await.expect_err("invalid argument");

    assert_eq!(err.to_string(), format!("{field} must not be empty"));
}

#[rstest]
#[tokio::test]
async fn custom_ttl_is_used_for_cache_writes(
    mut repository: MockUserMappingRepository,
    mut cache: MockUserMappingCache,
    generator: MockUserIdGenerator,
) {
    expect_cache_miss(&mut cache, "user-mapping:a:b");
    repository
        .expect_find_by_unordered_pair()
        .times(1)
        .returning(|_, _| Ok(Some(stored("a", "b", "db-uuid"))));
    cache
        .expect_set()
        .withf(|_, _, ttl| *ttl == Duration::from_secs(60))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let service =
        make_service(repository, cache, generator).with_cache_ttl(Duration::from_secs(60));
    assert_eq!(service.cache_ttl(), Duration::from_secs(60));
    service.resolve("a", "b").await.expect("store hit");
}

#[rstest]
#[case(ResolveError::InvalidArgument { field: "id1" }, ErrorCode::InvalidRequest)]
#[case(
    ResolveError::StoreUnavailable(UserMappingRepositoryError::connection("secret-host:5432")),
    ErrorCode::ServiceUnavailable
)]
#[case(
    ResolveError::GenerationFailure(UserIdGenerationError::exhausted("rng")),
    ErrorCode::InternalError
)]
fn resolve_errors_map_to_domain_codes(#[case] err: ResolveError, #[case] code: ErrorCode) {
    let mapped = crate::domain::Error::from(err);
    assert_eq!(mapped.code(), code);
    assert!(!mapped.message().contains("secret-host"));
}
