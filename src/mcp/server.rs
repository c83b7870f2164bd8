/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads newline-delimited JSON-RPC requests
/// 2. Routes tool calls to the habit store
/// 3. Writes JSON-RPC responses back

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::{SqliteStorage, StorageError};
use crate::tools;
use crate::{DailyRoutineServer, ServerError};

/// MCP server wrapping a DailyRoutine store
pub struct McpServer {
    routine: DailyRoutineServer,
    /// Whether the client has completed the handshake
    initialized: bool,
}

impl McpServer {
    pub fn new(routine: DailyRoutineServer) -> Self {
        Self {
            routine,
            initialized: false,
        }
    }

    /// Run the MCP server over stdin/stdout until stdin closes
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");
        let reader = BufReader::new(tokio::io::stdin());
        self.serve(reader, tokio::io::stdout()).await
    }

    /// Serve requests from any line-oriented reader to any writer
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();

            if reader.read_until(b'\n', &mut buf).await? == 0 {
                info!("MCP server shutting down (input closed)");
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) => self.process_line(line).await,
                Err(e) => {
                    error!("Request is not valid UTF-8: {}", e);
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        error_codes::PARSE_ERROR,
                        format!("Invalid UTF-8: {}", e),
                        None,
                    ))
                }
            };

            if let Some(response) = response {
                let response_str = serde_json::to_string(&response)?;

                writer.write_all(response_str.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;

                debug!("Sent response: {}", response_str);
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        let id = request.id.clone();
        let response = self.handle_request(request).await;
        // Notifications carry no id member and get no reply; `"id": null` is answered
        id.map(|_| response)
    }

    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "DailyRoutine".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let call: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(call)) => call,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let args = match call.arguments {
            Some(Value::Null) | None => json!({}),
            Some(args) => args,
        };
        let storage = self.routine.storage();

        let outcome = match call.name.as_str() {
            "habit_create" => run_tool(storage, args, tools::create_habit::<SqliteStorage>),
            "habit_update" => run_tool(storage, args, tools::update_habit::<SqliteStorage>),
            "habit_delete" => run_tool(storage, args, tools::delete_habit::<SqliteStorage>),
            "habit_get" => run_tool(storage, args, tools::get_habit::<SqliteStorage>),
            "habit_list" => run_tool(storage, args, tools::list_habits::<SqliteStorage>),
            "habit_complete" => run_tool(storage, args, tools::complete_habit::<SqliteStorage>),
            "habit_set_status" => run_tool(storage, args, tools::set_habit_status::<SqliteStorage>),
            "habit_stats" => run_tool(storage, args, tools::habit_stats::<SqliteStorage>),
            "category_list" => run_tool(storage, args, tools::list_categories::<SqliteStorage>),
            _ => Ok(ToolCallResult::error(format!("Unknown tool: {}", call.name))),
        };

        match outcome {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => {
                    JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None)
                }
            },
            Err(ToolFailure::InvalidArguments(message)) => {
                JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, message, None)
            }
            Err(ToolFailure::Storage(e)) => {
                error!("Tool '{}' failed: {}", call.name, e);
                JsonRpcResponse::error(id, storage_error_to_json_rpc_code(&e), e.to_string(), None)
            }
            Err(ToolFailure::Internal(message)) => {
                JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, message, None)
            }
        }
    }
}

/// Why a tool call could not produce a result
enum ToolFailure {
    InvalidArguments(String),
    Storage(StorageError),
    Internal(String),
}

/// Decode the arguments, run the tool and render its response
///
/// Validation failures become error results the caller can correct; storage
/// faults become JSON-RPC errors.
fn run_tool<P, R, F>(
    storage: &SqliteStorage,
    args: Value,
    tool: F,
) -> Result<ToolCallResult, ToolFailure>
where
    P: DeserializeOwned,
    R: Serialize,
    F: FnOnce(&SqliteStorage, P) -> Result<R, StorageError>,
{
    let params: P = serde_json::from_value(args)
        .map_err(|e| ToolFailure::InvalidArguments(format!("Invalid arguments: {}", e)))?;

    let response = match tool(storage, params) {
        Ok(response) => response,
        Err(e) if e.is_validation_failure() => {
            warn!("Tool input rejected: {}", e);
            return Ok(ToolCallResult::error(e.to_string()));
        }
        Err(e) => return Err(ToolFailure::Storage(e)),
    };

    let value =
        serde_json::to_value(&response).map_err(|e| ToolFailure::Internal(e.to_string()))?;
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if value.get("success").and_then(Value::as_bool).unwrap_or(true) {
        Ok(ToolCallResult::success(message))
    } else {
        Ok(ToolCallResult::error(message))
    }
}

fn definition<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(P);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema).unwrap_or_else(|_| json!({ "type": "object" })),
    }
}

/// Every tool this server offers
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        definition::<tools::CreateHabitParams>("habit_create", "Create a new habit to track"),
        definition::<tools::UpdateHabitParams>(
            "habit_update",
            "Change fields of an existing habit; omitted fields keep their value",
        ),
        definition::<tools::DeleteHabitParams>(
            "habit_delete",
            "Delete a habit together with its completion history",
        ),
        definition::<tools::GetHabitParams>(
            "habit_get",
            "Show one habit with its progress and recent completions",
        ),
        definition::<tools::ListHabitsParams>(
            "habit_list",
            "List habits, optionally filtered by category, status, priority or text",
        ),
        definition::<tools::CompleteHabitParams>(
            "habit_complete",
            "Mark a habit as done for today or a specific date",
        ),
        definition::<tools::SetStatusParams>(
            "habit_set_status",
            "Set a habit's status to Pending or Done",
        ),
        definition::<tools::StatsParams>(
            "habit_stats",
            "Summary statistics and insights across all habits",
        ),
        definition::<tools::CategoryListParams>("category_list", "List the habit categories"),
    ]
}
