//! Tests for CLI argument parsing.

use clap::Parser;
use sqlchat::{App, Command, directive, repl::Line};

#[test]
fn defaults_to_chat() {
    let app = App::parse_from(["sqlchat"]);
    assert!(app.command.is_none());
    assert_eq!(app.verbose, 0);
}

#[test]
fn parse_generate() {
    let app = App::parse_from(["sqlchat", "generate"]);
    assert!(matches!(app.command, Some(Command::Generate)));
}

#[test]
fn verbosity_is_global() {
    let app = App::parse_from(["sqlchat", "chat", "-vv"]);
    assert!(matches!(app.command, Some(Command::Chat)));
    assert_eq!(app.verbose, 2);
}

#[test]
fn verbosity_directives() {
    assert_eq!(directive(0), "warn");
    assert_eq!(directive(1), "sqlchat=debug");
    assert_eq!(directive(2), "sqlchat=trace");
    assert_eq!(directive(3), "debug");
    assert_eq!(directive(9), "trace");
}

#[test]
fn chat_lines() {
    assert_eq!(Line::parse("   "), Line::Empty);
    assert_eq!(Line::parse("/clear"), Line::Clear);
    assert_eq!(Line::parse(" /settings "), Line::Settings);
    assert_eq!(Line::parse("/exit"), Line::Exit);
    assert_eq!(Line::parse("/quit"), Line::Exit);
    assert_eq!(
        Line::parse(" how many rows are in the report table\n"),
        Line::Query("how many rows are in the report table")
    );
    assert_eq!(Line::parse("/unknown"), Line::Query("/unknown"));
}
