use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use cricapi_client::CricApiClient;
use discord_client::DiscordClient;
use scorethread_common::Config;
use scorethread_engine::{
    BindingStore, Canonicalizer, Engine, MemoryBindingStore, PatternTable, Reconciler,
    ThreadGateway,
};

use crate::gateway::DiscordGateway;
use crate::sources::{CricApiSource, CricbuzzSource};

/// Wire the engine from configuration: patterns, in-memory binding store,
/// the Discord gateway and whichever sources are enabled.
pub fn build_engine(config: &Config) -> Result<Engine> {
    let patterns = PatternTable::for_team(&config.team_filter, &config.team_code)?
        .with_terminal_patterns(&config.terminal_patterns)
        .context("Invalid TERMINAL_PATTERNS")?;

    let discord = DiscordClient::new(config.discord_token.clone())?;
    let gateway: Arc<dyn ThreadGateway> = Arc::new(DiscordGateway::new(discord, &config.channel_id));
    let store: Arc<dyn BindingStore> = Arc::new(MemoryBindingStore::new());

    let reconciler = Reconciler::new(patterns.clone(), store, gateway);
    let mut engine = Engine::new(Canonicalizer::new(patterns), reconciler);

    if config.source.uses_cricbuzz() {
        info!(url = config.cricbuzz_url.as_str(), "Cricbuzz source enabled");
        let source = CricbuzzSource::new(&config.cricbuzz_url, &config.team_filter)?;
        engine = engine.with_source(Arc::new(source));
    }

    if config.source.uses_cricapi() {
        let key = config
            .cricket_api_key
            .clone()
            .context("CRICKET_API_KEY is required for the cricapi source")?;
        info!("CricketData source enabled");
        let source = CricApiSource::new(CricApiClient::new(key)?, &config.team_filter);
        engine = engine.with_source(Arc::new(source));
    }

    Ok(engine)
}
