//! `selene render`: Assemble entities under a use-case budget.

use std::path::Path;

use selene_context::{ContextEngine, Entity};
use selene_core::UseCase;

use super::{load_config, read_json};

pub fn run(config: Option<&Path>, file: &Path, use_case: UseCase, json: bool) -> anyhow::Result<()> {
    let engine = ContextEngine::new(load_config(config)?);
    let items: Vec<Entity> = read_json(file)?;

    let assembled = engine.assemble(use_case, &items);
    if assembled.stats.blocks_dropped > 0 {
        tracing::warn!(
            use_case = use_case.description(),
            dropped = assembled.stats.blocks_dropped,
            budget_tokens = assembled.stats.budget_tokens,
            "Some entities did not fit the budget"
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&assembled)?);
    } else {
        println!("{}", assembled.text);
    }
    Ok(())
}
