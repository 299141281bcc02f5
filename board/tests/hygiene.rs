//! Hygiene: enforces coding standards at test time
//!
//! These tests scan the board crate source tree for antipatterns. The engine
//! is sans-IO, so beyond the panic and silent-loss budgets it must never
//! print, sleep, read a clock or open a socket. Each budget is zero; the
//! budget never grows.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

// Panics: these crash the host.
const MAX_UNWRAP: usize = 0;
const MAX_EXPECT: usize = 0;
const MAX_PANIC: usize = 0;
const MAX_UNREACHABLE: usize = 0;
const MAX_TODO: usize = 0;
const MAX_UNIMPLEMENTED: usize = 0;

// Silent loss: discards errors without inspecting.
const MAX_SILENT_DISCARD: usize = 0;
const MAX_DOT_OK: usize = 0;

// I/O: the host owns the network, the clock and the terminal.
const MAX_PRINT: usize = 0;
const MAX_CLOCK: usize = 0;
const MAX_SLEEP: usize = 0;
const MAX_NET: usize = 0;

const MAX_ALLOW_DEAD_CODE: usize = 0;

struct SourceFile {
    path: String,
    content: String,
}

/// Collect production `.rs` files from `board/src/`, excluding test files.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn count_in_source(files: &[SourceFile], patterns: &[&str]) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| patterns.iter().any(|p| line.contains(p)))
                .count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn check_budget(label: &str, patterns: &[&str], max: usize) {
    let hits = count_in_source(&source_files(), patterns);
    let count: usize = hits.iter().map(|(_, c)| c).sum();
    let listing = hits
        .iter()
        .map(|(path, count)| format!("  {path}: {count}"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(count <= max, "{label} budget exceeded: found {count}, max {max}.\n{listing}");
}

#[test]
fn sources_are_found() {
    assert!(source_files().iter().any(|f| f.path.ends_with("session.rs")));
}

#[test]
fn unwrap_budget() {
    check_budget(".unwrap()", &[".unwrap()"], MAX_UNWRAP);
}

#[test]
fn expect_budget() {
    check_budget(".expect()", &[".expect("], MAX_EXPECT);
}

#[test]
fn panic_budget() {
    check_budget("panic!()", &["panic!("], MAX_PANIC);
}

#[test]
fn unreachable_budget() {
    check_budget("unreachable!()", &["unreachable!("], MAX_UNREACHABLE);
}

#[test]
fn todo_budget() {
    check_budget("todo!()", &["todo!("], MAX_TODO);
}

#[test]
fn unimplemented_budget() {
    check_budget("unimplemented!()", &["unimplemented!("], MAX_UNIMPLEMENTED);
}

#[test]
fn silent_discard_budget() {
    check_budget("let _ =", &["let _ ="], MAX_SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    check_budget(".ok()", &[".ok()"], MAX_DOT_OK);
}

#[test]
fn print_budget() {
    check_budget("print", &["println!(", "eprintln!(", "print!(", "dbg!("], MAX_PRINT);
}

#[test]
fn clock_budget() {
    check_budget("clock read", &["Instant::now", "SystemTime::now"], MAX_CLOCK);
}

#[test]
fn sleep_budget() {
    check_budget("sleep", &["thread::sleep"], MAX_SLEEP);
}

#[test]
fn net_budget() {
    check_budget("socket", &["std::net", "TcpStream", "UdpSocket"], MAX_NET);
}

#[test]
fn allow_dead_code_budget() {
    check_budget("#[allow(dead_code)]", &["#[allow(dead_code)]"], MAX_ALLOW_DEAD_CODE);
}
