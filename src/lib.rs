//! Daywise — a conversational assistant for weather, local time, and
//! what to wear, routed across specialist agents by an orchestrator.

use std::sync::Arc;

use agent_core::Agent;
use llm::LanguageModel;
use tools::{CapabilityHandler, ClothingTool, TimeTool, WeatherTool};

pub mod agent_core;
pub mod llm;
pub mod location;
pub mod server;
pub mod system;
pub mod tools;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `DEBUG=true` raises the default
/// filter from info to debug. Logs go to stderr so the interactive chat
/// keeps stdout to itself.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let default_filter = if debug_requested() {
        "daywise=debug,info"
    } else {
        "daywise=info,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `DEBUG=true` in the environment requests verbose logging.
fn debug_requested() -> bool {
    std::env::var("DEBUG")
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Build the stock agent set: weather, time, and clothing specialists
/// sharing one model client.
pub fn default_agents(llm: Arc<dyn LanguageModel>) -> Vec<Agent> {
    vec![
        Agent::new(
            "Weather Agent",
            "Provides weather information for a given location",
            vec![Arc::new(WeatherTool::new()) as Arc<dyn CapabilityHandler>],
            llm.clone(),
        ),
        Agent::new(
            "Time Agent",
            "Provides the current time for a given city",
            vec![Arc::new(TimeTool::new()) as Arc<dyn CapabilityHandler>],
            llm.clone(),
        ),
        Agent::new(
            "Clothing Agent",
            "Provides personalized clothing recommendations based on weather conditions, \
             time, and user preferences",
            vec![Arc::new(ClothingTool::new()) as Arc<dyn CapabilityHandler>],
            llm,
        ),
    ]
}
