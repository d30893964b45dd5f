//! Tests for the agent loop.

use database::{Database, Options};
use llm::{
    FinishReason, Role, StreamChunk,
    testing::{Scripted, call},
};
use sqlchat_agent::{
    AgentConfig, Answer, Assistant, Event, LIST_TABLES, QUERY, STOPPED, SqlAgent, ToolError,
};
use std::sync::Arc;
use tempfile::TempDir;

async fn database() -> (TempDir, Arc<Database>) {
    let dir = tempfile::tempdir().unwrap();
    let uri = format!("sqlite://{}?mode=rwc", dir.path().join("pr.db").display());
    let db = Database::connect(&uri, &Options::default()).await.unwrap();
    db.run("CREATE TABLE report (id INTEGER PRIMARY KEY, title TEXT)")
        .await
        .unwrap();
    db.run("INSERT INTO report VALUES (1, 'fix'), (2, 'docs'), (3, 'ci')")
        .await
        .unwrap();
    (dir, Arc::new(db))
}

async fn agent(provider: &Scripted, config: AgentConfig) -> (TempDir, SqlAgent<Scripted>) {
    let (dir, db) = database().await;
    (dir, SqlAgent::new(provider.clone(), db, config))
}

async fn run(agent: &SqlAgent<Scripted>, query: &str) -> (Answer, Vec<Event>) {
    let mut events = Vec::new();
    let answer = agent
        .run(query, &mut |event: &Event| events.push(event.clone()))
        .await
        .unwrap();
    (answer, events)
}

#[tokio::test]
async fn direct_answer() {
    let provider = Scripted::new().text("I don't know");
    let (_dir, agent) = agent(&provider, AgentConfig::default()).await;

    let (answer, events) = run(&agent, "what is the weather").await;
    assert_eq!(answer.text, "I don't know");
    assert_eq!(answer.steps, 1);
    assert_eq!(answer.trace, [Event::Finish("I don't know".into())]);
    assert_eq!(
        events,
        [
            Event::Token("I don't know".into()),
            Event::Finish("I don't know".into())
        ]
    );
}

#[tokio::test]
async fn first_request_carries_prompt_and_tools() {
    let provider = Scripted::new().text("done");
    let (_dir, agent) = agent(&provider, AgentConfig::default()).await;
    run(&agent, "how many rows are in the report table").await;

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.config.model, "llama3-8b-8192");
    assert_eq!(request.config.tools.as_ref().map(Vec::len), Some(4));

    let [system, user] = request.messages.as_slice() else {
        panic!("expected system and user messages");
    };
    assert_eq!(system.role, Role::System);
    assert!(system.content.contains("syntactically correct sqlite query"));
    assert!(system.content.contains("at most 10 results"));
    assert_eq!(user.content, "how many rows are in the report table");
}

#[tokio::test]
async fn tool_loop() {
    let provider = Scripted::new()
        .calls(vec![call("c1", LIST_TABLES, "{}")])
        .calls(vec![call(
            "c2",
            QUERY,
            r#"{"query": "SELECT count(*) FROM report"}"#,
        )])
        .text("There are 3 rows.");
    let (_dir, agent) = agent(&provider, AgentConfig::default()).await;

    let (answer, _) = run(&agent, "how many rows are in the report table").await;
    assert_eq!(answer.text, "There are 3 rows.");
    assert_eq!(answer.steps, 3);
    assert_eq!(
        answer.trace,
        [
            Event::Action {
                tool: LIST_TABLES.into(),
                input: "{}".into()
            },
            Event::Observation {
                tool: LIST_TABLES.into(),
                output: "report".into()
            },
            Event::Action {
                tool: QUERY.into(),
                input: r#"{"query": "SELECT count(*) FROM report"}"#.into()
            },
            Event::Observation {
                tool: QUERY.into(),
                output: "[(3,)]".into()
            },
            Event::Finish("There are 3 rows.".into()),
        ]
    );

    let last = provider.requests().pop().unwrap();
    let tool_messages: Vec<_> = last
        .messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .map(|m| (m.tool_call_id.as_str(), m.content.as_str()))
        .collect();
    assert_eq!(tool_messages, [("c1", "report"), ("c2", "[(3,)]")]);
}

#[tokio::test]
async fn thoughts_are_traced() {
    let provider = Scripted::new()
        .reply(vec![
            StreamChunk::text("Let me look at the tables."),
            StreamChunk::tool(&[call("c1", LIST_TABLES, "")]),
            StreamChunk::finish(FinishReason::ToolCalls),
        ])
        .text("report");
    let (_dir, agent) = agent(&provider, AgentConfig::default()).await;

    let (answer, _) = run(&agent, "which tables exist").await;
    assert_eq!(answer.trace[0], Event::Thought("Let me look at the tables.".into()));
}

#[tokio::test]
async fn parse_errors_are_handed_back() {
    let provider = Scripted::new()
        .calls(vec![call("c1", "sql_db_drop", "{}")])
        .text("Sorry.");
    let (_dir, agent) = agent(&provider, AgentConfig::default()).await;

    let (answer, _) = run(&agent, "drop everything").await;
    assert_eq!(answer.text, "Sorry.");
    assert!(matches!(
        &answer.trace[1],
        Event::ParseError { tool, error } if tool == "sql_db_drop" && error.contains("not a valid tool")
    ));

    let last = provider.requests().pop().unwrap();
    let observation = last.messages.last().unwrap();
    assert_eq!(observation.role, Role::Tool);
    assert!(observation.content.contains("not a valid tool"));
}

#[tokio::test]
async fn parse_errors_fail_when_not_handled() {
    let provider = Scripted::new().calls(vec![call("c1", QUERY, "not json")]);
    let config = AgentConfig {
        handle_parsing_errors: false,
        ..Default::default()
    };
    let (_dir, agent) = agent(&provider, config).await;

    let err = agent.run("count rows", &mut |_: &Event| {}).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ToolError>(),
        Some(ToolError::Arguments { .. })
    ));
}

#[tokio::test]
async fn stops_at_the_iteration_limit() {
    let provider = Scripted::new()
        .calls(vec![call("c1", LIST_TABLES, "{}")])
        .calls(vec![call("c2", LIST_TABLES, "{}")])
        .text("never reached");
    let config = AgentConfig {
        max_iterations: 2,
        ..Default::default()
    };
    let (_dir, agent) = agent(&provider, config).await;

    let (answer, _) = run(&agent, "loop").await;
    assert_eq!(answer.text, STOPPED);
    assert_eq!(answer.steps, 2);
    assert_eq!(answer.trace.last(), Some(&Event::Finish(STOPPED.into())));
    assert_eq!(provider.remaining(), 1);
}

#[tokio::test]
async fn without_streaming_no_tokens_are_emitted() {
    let provider = Scripted::new().text("3");
    let config = AgentConfig {
        stream: false,
        ..Default::default()
    };
    let (_dir, agent) = agent(&provider, config).await;

    let (answer, events) = run(&agent, "count").await;
    assert_eq!(answer.text, "3");
    assert!(events.iter().all(|event| !matches!(event, Event::Token(_))));
}

#[tokio::test]
async fn model_errors_propagate() {
    let provider = Scripted::new();
    let (_dir, agent) = agent(&provider, AgentConfig::default()).await;
    let err = agent.run("anything", &mut |_: &Event| {}).await.unwrap_err();
    assert!(err.to_string().contains("no reply left"));
}

#[tokio::test]
async fn runs_do_not_share_history() {
    let provider = Scripted::new().text("first").text("second");
    let (_dir, agent) = agent(&provider, AgentConfig::default()).await;

    ask(&agent, "one").await;
    ask(&agent, "two").await;

    let requests = provider.requests();
    assert_eq!(requests[1].messages.len(), 2);
    assert_eq!(requests[1].messages[1].content, "two");
}

async fn ask(assistant: &impl Assistant, query: &str) -> Answer {
    assistant.run(query, &mut |_: &Event| {}).await.unwrap()
}
