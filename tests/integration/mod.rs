/// Integration tests: the habit store through its public API and over MCP
mod mcp_session;
mod store_workflow;
