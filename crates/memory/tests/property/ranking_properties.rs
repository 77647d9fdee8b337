use proptest::prelude::*;
use selene_core::{Chunk, EmbeddedChunk};
use selene_memory::{cosine_similarity, retrieve_top};

fn embedded(i: usize, tokens: usize, embedding: Vec<f32>) -> EmbeddedChunk {
    EmbeddedChunk::new(
        Chunk {
            id: format!("c{i}"),
            document_id: "doc".into(),
            index: i,
            text: "x".repeat(tokens * 4),
            topic: None,
            estimated_tokens: tokens,
        },
        embedding,
    )
}

fn candidates() -> impl Strategy<Value = Vec<EmbeddedChunk>> {
    prop::collection::vec(
        (prop::collection::vec(-1.0f32..1.0, 4), 1usize..200),
        0..40,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (embedding, tokens))| embedded(i, tokens, embedding))
            .collect()
    })
}

proptest! {
    #[test]
    fn cosine_stays_in_range(
        a in prop::collection::vec(-100.0f32..100.0, 0..16),
        b in prop::collection::vec(-100.0f32..100.0, 0..16),
    ) {
        let sim = cosine_similarity(&a, &b);
        prop_assert!((-1.0001..=1.0001).contains(&sim), "similarity {} out of range", sim);
    }

    #[test]
    fn results_are_descending_and_above_threshold(
        query in prop::collection::vec(-1.0f32..1.0, 4),
        pool in candidates(),
        limit in 0usize..20,
        min_similarity in -1.0f32..1.0,
    ) {
        let results = retrieve_top(&query, &pool, limit, min_similarity, None);
        prop_assert!(results.len() <= limit);
        for pair in results.windows(2) {
            prop_assert!(pair[0].similarity >= pair[1].similarity);
        }
        for scored in &results {
            prop_assert!(scored.similarity >= min_similarity);
        }
    }

    #[test]
    fn token_budget_is_never_exceeded(
        query in prop::collection::vec(-1.0f32..1.0, 4),
        pool in candidates(),
        budget in 0usize..1000,
    ) {
        let unbounded = retrieve_top(&query, &pool, 40, -1.0, None);
        let bounded = retrieve_top(&query, &pool, 40, -1.0, Some(budget));
        let total: usize = bounded.iter().map(|s| s.chunk.estimated_tokens).sum();
        prop_assert!(total <= budget);
        // The budgeted result is a prefix of the unbudgeted ranking.
        prop_assert!(bounded.len() <= unbounded.len());
        for (a, b) in bounded.iter().zip(unbounded.iter()) {
            prop_assert_eq!(&a.chunk.id, &b.chunk.id);
        }
        // The prefix is as long as the budget allows.
        if let Some(next) = unbounded.get(bounded.len()) {
            prop_assert!(total + next.chunk.estimated_tokens > budget);
        }
    }
}
