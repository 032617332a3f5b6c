//! Prompt assembly for the chat assistant.

use roadwatch_traffic::TrafficState;

/// Builds provider prompts for the chat assistant.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the full prompt: instruction framing, the serialized traffic
    /// snapshot, then the verbatim user message.
    pub fn build(snapshot: &TrafficState, message: &str) -> String {
        let data = serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string());

        let mut prompt = String::new();
        prompt.push_str(
            "You are a traffic monitoring assistant. Here's the current traffic data:\n",
        );
        prompt.push_str(&data);
        prompt.push_str("\n\nUser question: ");
        prompt.push_str(message);
        prompt.push_str("\n\nPlease provide a helpful response based on this traffic data.");
        prompt
    }
}
