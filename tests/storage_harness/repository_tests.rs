//! Macro-generated test suite for `Repository<Gadget>` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use saas_admin::storage::InMemoryRepository;
//!
//! repository_tests!(InMemoryRepository::<Gadget>::new());
//! ```
//!
//! ## Generated tests
//! - insert / get / get missing
//! - find_by_ids ignores unknown IDs
//! - find_one_by exact and case-insensitive, with exclusion
//! - unique constraints on insert and replace
//! - list search, sort, skip/limit and total
//! - first() returns the oldest record
//! - replace / delete / delete_many / delete_all counts

/// Generate the repository conformance suite.
///
/// `$factory` is re-evaluated for each test and must produce an empty
/// repository implementing `Repository<Gadget>`.
#[macro_export]
macro_rules! repository_tests {
    ($factory:expr) => {
        mod repository_contract_tests {
            use super::*;
            use saas_admin::core::error::StoreError;
            use saas_admin::core::query::{ListQuery, SearchSpec, SortDirection, SortSpec};
            use saas_admin::core::record::NameMatch;
            use saas_admin::core::{RecordId, Repository};

            fn sorted_by(field: &str, direction: SortDirection) -> ListQuery {
                ListQuery {
                    skip: 0,
                    limit: usize::MAX,
                    search: None,
                    sort: SortSpec {
                        field: field.to_string(),
                        direction,
                    },
                }
            }

            fn names(items: &[Gadget]) -> Vec<&str> {
                items.iter().map(|g| g.name.as_str()).collect()
            }

            #[tokio::test]
            async fn test_insert_and_get() {
                let repo = $factory;
                let mut original = gadget("Sprocket", "SP-1", 0);
                original.parts = vec![RecordId::generate(), RecordId::generate()];

                repo.insert(original.clone()).await.unwrap();
                let fetched = repo.get(&original.id).await.unwrap();
                assert_eq!(fetched, Some(original));
            }

            #[tokio::test]
            async fn test_get_missing_returns_none() {
                let repo = $factory;
                assert!(repo.get(&RecordId::generate()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_find_by_ids_skips_unknown() {
                let repo = $factory;
                let a = repo.insert(gadget("A", "a", 0)).await.unwrap();
                let b = repo.insert(gadget("B", "b", 1)).await.unwrap();
                repo.insert(gadget("C", "c", 2)).await.unwrap();

                let found = repo
                    .find_by_ids(&[a.id.clone(), RecordId::generate(), b.id.clone()])
                    .await
                    .unwrap();
                let mut found_names = names(&found);
                found_names.sort();
                assert_eq!(found_names, vec!["A", "B"]);

                assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_find_one_by_matching_modes() {
                let repo = $factory;
                let stored = repo.insert(gadget("Billing", "BL", 0)).await.unwrap();

                let exact = repo
                    .find_one_by("name", "billing", NameMatch::Exact, None)
                    .await
                    .unwrap();
                assert!(exact.is_none());

                let relaxed = repo
                    .find_one_by("name", "bILLing", NameMatch::CaseInsensitive, None)
                    .await
                    .unwrap();
                assert_eq!(relaxed.map(|g| g.id), Some(stored.id.clone()));

                let excluded = repo
                    .find_one_by("name", "Billing", NameMatch::Exact, Some(&stored.id))
                    .await
                    .unwrap();
                assert!(excluded.is_none());
            }

            #[tokio::test]
            async fn test_case_insensitive_lookup_treats_metacharacters_literally() {
                let repo = $factory;
                repo.insert(gadget("a+b", "x", 0)).await.unwrap();

                let miss = repo
                    .find_one_by("name", "aab", NameMatch::CaseInsensitive, None)
                    .await
                    .unwrap();
                assert!(miss.is_none());

                let hit = repo
                    .find_one_by("name", "A+B", NameMatch::CaseInsensitive, None)
                    .await
                    .unwrap();
                assert!(hit.is_some());
            }

            #[tokio::test]
            async fn test_insert_rejects_case_insensitive_duplicate() {
                let repo = $factory;
                repo.insert(gadget("Billing", "one", 0)).await.unwrap();

                let err = repo.insert(gadget("BILLING", "two", 1)).await.unwrap_err();
                assert!(matches!(err, StoreError::Duplicate { .. }), "got {err:?}");
            }

            #[tokio::test]
            async fn test_insert_rejects_exact_duplicate_but_allows_other_case() {
                let repo = $factory;
                repo.insert(gadget("First", "abc", 0)).await.unwrap();

                let err = repo.insert(gadget("Second", "abc", 1)).await.unwrap_err();
                assert!(matches!(err, StoreError::Duplicate { .. }));

                repo.insert(gadget("Third", "ABC", 2)).await.unwrap();
            }

            #[tokio::test]
            async fn test_replace_existing_and_missing() {
                let repo = $factory;
                let mut stored = repo.insert(gadget("Old", "o", 0)).await.unwrap();
                stored.name = "New".to_string();

                let replaced = repo.replace(stored.clone()).await.unwrap();
                assert_eq!(replaced, Some(stored.clone()));
                assert_eq!(repo.get(&stored.id).await.unwrap().unwrap().name, "New");

                let ghost = gadget("Ghost", "g", 1);
                assert!(repo.replace(ghost.clone()).await.unwrap().is_none());
                assert!(repo.get(&ghost.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_replace_rejects_duplicate_of_other_record() {
                let repo = $factory;
                repo.insert(gadget("Taken", "t", 0)).await.unwrap();
                let mut other = repo.insert(gadget("Free", "f", 1)).await.unwrap();

                other.name = "taken".to_string();
                let err = repo.replace(other).await.unwrap_err();
                assert!(matches!(err, StoreError::Duplicate { .. }));
            }

            #[tokio::test]
            async fn test_list_sorts_and_pages() {
                let repo = $factory;
                for (i, name) in ["Alpha", "Bravo", "Charlie", "Delta", "Echo"].iter().enumerate() {
                    repo.insert(gadget(name, &format!("c{i}"), i as i64)).await.unwrap();
                }

                let newest = repo
                    .list(&sorted_by("createdAt", SortDirection::Desc))
                    .await
                    .unwrap();
                assert_eq!(newest.total, 5);
                assert_eq!(names(&newest.items), vec!["Echo", "Delta", "Charlie", "Bravo", "Alpha"]);

                let mut page = sorted_by("name", SortDirection::Asc);
                page.skip = 2;
                page.limit = 2;
                let second = repo.list(&page).await.unwrap();
                assert_eq!(second.total, 5);
                assert_eq!(names(&second.items), vec!["Charlie", "Delta"]);

                page.skip = 10;
                let beyond = repo.list(&page).await.unwrap();
                assert_eq!(beyond.total, 5);
                assert!(beyond.items.is_empty());
            }

            #[tokio::test]
            async fn test_list_search_is_case_insensitive_substring() {
                let repo = $factory;
                repo.insert(gadget("Admin Panel", "a", 0)).await.unwrap();
                repo.insert(gadget("superADMIN", "b", 1)).await.unwrap();
                repo.insert(gadget("Viewer", "c", 2)).await.unwrap();

                let mut query = sorted_by("createdAt", SortDirection::Asc);
                query.search = Some(SearchSpec {
                    field: "name",
                    term: "admin".to_string(),
                });
                let found = repo.list(&query).await.unwrap();
                assert_eq!(found.total, 2);
                assert_eq!(names(&found.items), vec!["Admin Panel", "superADMIN"]);
            }

            #[tokio::test]
            async fn test_first_returns_oldest() {
                let repo = $factory;
                assert!(repo.first().await.unwrap().is_none());

                repo.insert(gadget("Later", "l", 10)).await.unwrap();
                repo.insert(gadget("Earliest", "e", 0)).await.unwrap();
                repo.insert(gadget("Middle", "m", 5)).await.unwrap();

                assert_eq!(repo.first().await.unwrap().unwrap().name, "Earliest");
            }

            #[tokio::test]
            async fn test_delete_returns_removed_record() {
                let repo = $factory;
                let stored = repo.insert(gadget("Doomed", "d", 0)).await.unwrap();

                let removed = repo.delete(&stored.id).await.unwrap();
                assert_eq!(removed.map(|g| g.id), Some(stored.id.clone()));
                assert!(repo.delete(&stored.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_many_counts_only_existing() {
                let repo = $factory;
                let a = repo.insert(gadget("A", "a", 0)).await.unwrap();
                let b = repo.insert(gadget("B", "b", 1)).await.unwrap();
                let c = repo.insert(gadget("C", "c", 2)).await.unwrap();

                let deleted = repo
                    .delete_many(&[a.id.clone(), b.id.clone(), RecordId::generate()])
                    .await
                    .unwrap();
                assert_eq!(deleted, 2);
                assert!(repo.get(&c.id).await.unwrap().is_some());
                assert_eq!(repo.delete_many(&[]).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_delete_all_reports_count() {
                let repo = $factory;
                repo.insert(gadget("A", "a", 0)).await.unwrap();
                repo.insert(gadget("B", "b", 1)).await.unwrap();

                assert_eq!(repo.delete_all().await.unwrap(), 2);
                assert_eq!(repo.delete_all().await.unwrap(), 0);
                assert_eq!(
                    repo.list(&ListQuery::all()).await.unwrap().total,
                    0
                );
            }
        }
    };
}
