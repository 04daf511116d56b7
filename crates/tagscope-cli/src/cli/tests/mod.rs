//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_decode() {
    match parse(&["tagscope", "decode", "http://m.test/b/ss/r/1/H.23/s?x=1"]) {
        CliCommand::Decode { url, loading, json } => {
            assert_eq!(url, "http://m.test/b/ss/r/1/H.23/s?x=1");
            assert!(!loading);
            assert!(!json);
        }
        _ => panic!("expected Decode"),
    }
}

#[test]
fn cli_parse_decode_loading_json() {
    match parse(&["tagscope", "decode", "http://x.test/p", "--loading", "--json"]) {
        CliCommand::Decode { loading, json, .. } => {
            assert!(loading);
            assert!(json);
        }
        _ => panic!("expected Decode with flags"),
    }
}

#[test]
fn cli_parse_har() {
    match parse(&["tagscope", "har", "capture.har"]) {
        CliCommand::Har { path, json } => {
            assert_eq!(path, "capture.har");
            assert!(!json);
        }
        _ => panic!("expected Har"),
    }
}

#[test]
fn cli_parse_stream_sessions() {
    match parse(&["tagscope", "stream", "--session", "3", "--session", "7"]) {
        CliCommand::Stream { sessions, json } => {
            assert_eq!(sessions, vec![3, 7]);
            assert!(!json);
        }
        _ => panic!("expected Stream with sessions"),
    }
}

#[test]
fn cli_parse_stream_defaults() {
    match parse(&["tagscope", "stream"]) {
        CliCommand::Stream { sessions, json } => {
            assert!(sessions.is_empty());
            assert!(!json);
        }
        _ => panic!("expected Stream"),
    }
}

#[test]
fn cli_parse_providers() {
    assert!(matches!(
        parse(&["tagscope", "providers"]),
        CliCommand::Providers
    ));
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["tagscope", "frobnicate"]).is_err());
}
