use st_core::types::{AiStrategy, Ticket};

use crate::provider::AdvisorError;

/// Race-briefing instruction with the grid embedded as JSON.
pub fn build_prompt(tickets: &[Ticket]) -> Result<String, AdvisorError> {
    let grid = serde_json::to_string(tickets).map_err(|e| AdvisorError::Parse(e.to_string()))?;
    Ok(format!(
        "Analyze this engineering team's current \"race\" (sprint).\n\
         Tickets: {grid}\n\n\
         Convert this into a F1 race strategy briefing.\n\
         Identify \"mechanical failures\" (blocked tickets), \"tyre degradation\" (old tickets), \
         and \"lap times\" (velocity).\n\
         Provide a priority level (CRITICAL, STABLE, OPTIMAL) and clear recommendations."
    ))
}

/// Parse model output into a strategy.
///
/// Accepts a bare JSON object or one wrapped in a Markdown code fence.
pub fn parse_strategy(text: &str) -> Result<AiStrategy, AdvisorError> {
    let body = strip_code_fence(text.trim());
    serde_json::from_str(body).map_err(|e| AdvisorError::Parse(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
