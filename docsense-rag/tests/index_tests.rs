//! Property tests for similarity index search.

use docsense_rag::document::Fragment;
use docsense_rag::index::{SimilarityIndex, cosine_similarity};
use proptest::prelude::*;

/// Generate an arbitrary (possibly zero) embedding of the given dimension.
fn arb_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim)
}

/// Generate a non-zero embedding of the given dimension.
fn arb_nonzero_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    arb_embedding(dim).prop_filter("non-zero embedding", |v| {
        v.iter().map(|x| x * x).sum::<f32>().sqrt() > 1e-3
    })
}

/// Generate a fragment with an embedding.
fn arb_fragment(dim: usize) -> impl Strategy<Value = Fragment> {
    ("[a-z]{3,8}", "[a-z ]{21,40}", arb_embedding(dim)).prop_map(|(id, text, embedding)| {
        Fragment { id, text, source_document: None, embedding, profile: None }
    })
}

/// *For any* set of fragments and query, search returns at most
/// `min(k, len)` hits ordered by non-increasing score, each within `[-1, 1]`.
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_k(
            fragments in proptest::collection::vec(arb_fragment(DIM), 1..20),
            query in arb_embedding(DIM),
            k in 1usize..25,
        ) {
            let count = fragments.len();
            let index = SimilarityIndex::build(fragments).unwrap();
            let hits = index.search(&query, k).unwrap();

            prop_assert_eq!(hits.len(), k.min(count));
            for hit in &hits {
                prop_assert!((-1.0..=1.0).contains(&hit.score));
            }
            for window in hits.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }

        #[test]
        fn empty_index_returns_nothing(query in arb_embedding(DIM), k in 1usize..10) {
            let index = SimilarityIndex::build(Vec::new()).unwrap();
            prop_assert!(index.search(&query, k).unwrap().is_empty());
        }

        #[test]
        fn zero_query_scores_zero(
            fragments in proptest::collection::vec(arb_fragment(DIM), 1..10)
        ) {
            let index = SimilarityIndex::build(fragments).unwrap();
            let hits = index.search_all(&[0.0; DIM]).unwrap();
            prop_assert!(hits.iter().all(|h| h.score == 0.0));
        }

        #[test]
        fn self_similarity_is_one(v in arb_nonzero_embedding(DIM)) {
            prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
        }

        #[test]
        fn identical_vector_ranks_first(
            mut fragments in proptest::collection::vec(arb_fragment(DIM), 1..10),
            target in arb_nonzero_embedding(DIM),
        ) {
            fragments[0].id = "target".to_string();
            fragments[0].embedding = target.clone();
            let index = SimilarityIndex::build(fragments).unwrap();
            let hits = index.search(&target, 1).unwrap();
            prop_assert!((hits[0].score - 1.0).abs() < 1e-5);
        }
    }
}
