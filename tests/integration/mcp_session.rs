/// A scripted MCP session against a file-backed server
use daily_routine::mcp::McpServer;
use daily_routine::*;

use serde_json::{json, Value};
use tempfile::tempdir;

fn request(id: i64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
    .to_string()
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"]
        .as_str()
        .expect("text content")
}

#[test]
fn test_session_round_trip() {
    let temp_dir = tempdir().unwrap();
    let config = StoreConfig::new(temp_dir.path().join("session.db"));
    let server = DailyRoutineServer::new(&config).unwrap();
    let mut mcp = McpServer::new(server);

    let lines = [
        request(
            1,
            "habit_create",
            json!({
                "name": "Read 20 pages",
                "category": "Study",
                "frequency": 7,
                "target_weekly": 3
            }),
        ),
        request(2, "habit_complete", json!({"habit_id": 1, "date": "2024-03-01"})),
        request(
            3,
            "habit_complete",
            json!({"habit_id": 1, "date": "2024-03-02", "note": "fiction"}),
        ),
        request(4, "habit_complete", json!({"habit_id": 1, "date": "2024-03-03"})),
        request(5, "habit_get", json!({"habit_id": 1})),
        request(6, "habit_list", json!({"category": "Study"})),
        request(7, "habit_set_status", json!({"habit_id": 1, "status": "Done"})),
        request(8, "habit_stats", json!({})),
        request(9, "habit_delete", json!({"habit_id": 1})),
        request(10, "habit_get", json!({"habit_id": 1})),
    ];

    let responses: Vec<Value> = lines
        .iter()
        .map(|line| {
            let response = tokio_test::block_on(mcp.process_line(line)).expect("response");
            serde_json::to_value(response).unwrap()
        })
        .collect();

    assert!(text(&responses[0]).contains("Created habit 'Read 20 pages'"));
    assert!(text(&responses[3]).contains("3 days in a row"));
    assert!(text(&responses[4]).contains("Total: 3"));
    assert!(text(&responses[4]).contains("Weekly progress: 100%"));
    assert!(text(&responses[4]).contains("2024-03-02 (fiction)"));
    assert!(text(&responses[5]).starts_with("Habits (1)"));
    assert!(text(&responses[6]).ends_with("is now Done"));
    assert!(text(&responses[7]).contains("Completion rate: 100.0%"));
    assert_eq!(responses[8]["result"]["isError"], json!(false));
    assert_eq!(responses[9]["result"]["isError"], json!(true));
    assert!(text(&responses[9]).contains("Habit 1 not found"));
}

#[test]
fn test_validation_errors_are_tool_errors() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let mut mcp = McpServer::new(DailyRoutineServer::from_storage(storage));

    let cases = [
        json!({"name": "", "category": "Health", "frequency": 3}),
        json!({"name": "Walk", "category": "Health", "frequency": 0}),
        json!({"name": "Walk", "category": "Health", "frequency": 3, "start_date": "03/01/2024"}),
        json!({"name": "Walk", "category": "Health", "frequency": 3, "status": "someday"}),
    ];

    for (i, args) in cases.into_iter().enumerate() {
        let line = request(i as i64, "habit_create", args);
        let response = tokio_test::block_on(mcp.process_line(&line)).unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["result"]["isError"], json!(true), "case {}", i);
    }

    let stats = tokio_test::block_on(mcp.process_line(&request(9, "habit_stats", Value::Null)))
        .unwrap();
    let value = serde_json::to_value(stats).unwrap();
    assert!(text(&value).starts_with("Total habits: 0"));
}
