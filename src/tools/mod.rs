//! MCP tools implementation

pub mod result;
pub mod search;

use crate::cli::SearchArgs;
use schemars::schema_for;
use serde_json::{json, Value};

pub const SEARCH_TOOL_NAME: &str = "bsky_search";
pub const SEARCH_TOOL_DESCRIPTION: &str = "Search BlueSky posts by keyword.";

/// Declarative description of the search tool for tools/list
pub fn search_tool_definition() -> Value {
    json!({
        "name": SEARCH_TOOL_NAME,
        "description": SEARCH_TOOL_DESCRIPTION,
        "inputSchema": schema_for!(SearchArgs)
    })
}
