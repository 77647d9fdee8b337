use proptest::prelude::*;
use selene_context::{
    BoundaryDetector, Chunker, ContextBuilder, Entity, RegexBoundaryDetector, Render, ScanBoundaryDetector,
};
use selene_core::{FidelityTier, Note, estimate_tokens};

/// A paragraph of lowercase words with `tokens` estimated tokens or a little more.
fn paragraph(tokens: usize) -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{3,9}", 1..400).prop_map(move |words| {
        let mut text = String::new();
        let mut i = 0;
        while text.chars().count() < tokens * 4 {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&words[i % words.len()]);
            i += 1;
        }
        text
    })
}

proptest! {
    #[test]
    fn assembled_output_never_exceeds_budget(
        budget in 0usize..200,
        blocks in prop::collection::vec(".{0,300}", 0..20),
    ) {
        let mut builder = ContextBuilder::new(budget);
        for block in &blocks {
            builder.add(block.clone());
        }
        let out = builder.build();
        prop_assert!(out.chars().count() <= budget * 4);
        prop_assert_eq!(out.chars().count(), builder.used_chars());
        prop_assert_eq!(builder.remaining_tokens(), (budget * 4 - builder.used_chars()) / 4);
    }

    #[test]
    fn no_chunk_exceeds_max(text in "(?s).{0,3000}") {
        let chunker = Chunker::default();
        for chunk in chunker.split_text(&text) {
            prop_assert!(estimate_tokens(&chunk) <= 256, "{} tokens", estimate_tokens(&chunk));
            prop_assert!(!chunk.trim().is_empty());
        }
    }

    #[test]
    fn chunks_within_bounds_for_well_sized_paragraphs(
        sizes in prop::collection::vec(100usize..=256, 1..8),
    ) {
        // Each paragraph is exactly `tokens` tokens.
        let paragraphs: Vec<String> = sizes.iter().map(|&tokens| "abcd".repeat(tokens)).collect();
        let text = paragraphs.join("\n\n");
        let chunks = Chunker::default().split_text(&text);

        prop_assert!(!chunks.is_empty());
        let last = chunks.len() - 1;
        for (i, chunk) in chunks.iter().enumerate() {
            let tokens = estimate_tokens(chunk);
            prop_assert!(tokens <= 256);
            if i < last {
                prop_assert!(tokens >= 100, "non-final chunk {} has {} tokens", i, tokens);
            }
        }
        for pair in chunks.windows(2) {
            let joined = format!("{}\n\n{}", pair[0], pair[1]);
            prop_assert!(estimate_tokens(&joined) > 256);
        }
    }

    #[test]
    fn detectors_agree(text in "(?s)[a-c #\n\t .!]{0,200}") {
        prop_assert_eq!(
            RegexBoundaryDetector.boundaries(&text),
            ScanBoundaryDetector.boundaries(&text)
        );
    }

    #[test]
    fn chunking_is_deterministic(text in paragraph(300)) {
        let chunker = Chunker::default();
        prop_assert_eq!(chunker.split("doc", &text), chunker.split("doc", &text));
    }

    #[test]
    fn rendering_is_idempotent(
        title in ".{0,40}",
        content in ".{0,400}",
        essence in prop::option::of(".{0,80}"),
        concepts in prop::option::of(prop::collection::vec("[a-z]{1,8}", 0..8)),
    ) {
        let mut note = Note::new(1, title, content);
        note.essence = essence;
        note.concepts = concepts;
        let entity = Entity::from(note);
        for tier in FidelityTier::ALL {
            prop_assert_eq!(entity.render(tier), entity.render(tier));
        }
    }
}
