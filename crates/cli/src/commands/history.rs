//! `selene history`: Compress a conversation transcript.

use std::path::Path;

use selene_context::ContextEngine;
use selene_core::Message;

use super::{load_config, read_json};

pub fn run(
    config: Option<&Path>,
    file: &Path,
    recent_turns: Option<usize>,
    budget: Option<usize>,
) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let recent_turns = recent_turns.unwrap_or(config.history.recent_turns);
    let budget = budget.unwrap_or(config.history.max_tokens);

    let engine = ContextEngine::new(config);
    let messages: Vec<Message> = read_json(file)?;
    println!("{}", engine.history().compress_with(&messages, recent_turns, budget));
    Ok(())
}
