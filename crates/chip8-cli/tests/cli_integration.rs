//! Integration tests for the chip8 CLI.

use anyhow as _;
use chip8_core as _;
use clap as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing as _;
use tracing_subscriber as _;

fn binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.join("chip8")
}

// Draws glyph 0 at the origin, starts a beep, then spins on the last word.
const ROM: [u8; 14] = [
    0x00, 0xE0, 0xA0, 0x00, 0x60, 0x00, 0xD0, 0x05, 0x6A, 0x10, 0xFA, 0x18, 0x12, 0x0C,
];

fn write_rom(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn run_prints_final_screen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let rom = write_rom(temp_dir.path(), "zero.ch8", &ROM);

    let output = Command::new(binary_path())
        .args(["run", rom.to_str().unwrap(), "--frames", "2"])
        .output()
        .expect("failed to run chip8");

    assert!(output.status.success());
    let screen = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = screen.lines().collect();
    assert_eq!(lines.len(), 32);
    assert!(lines.iter().all(|line| line.len() == 64));
    assert!(lines[0].starts_with("####."));
    assert!(lines[1].starts_with("#..#."));
    assert!(lines[5].chars().all(|c| c == '.'));
}

#[test]
fn dump_state_prints_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let rom = write_rom(temp_dir.path(), "zero.ch8", &ROM);

    let output = Command::new(binary_path())
        .args(["run", rom.to_str().unwrap(), "--frames", "1", "--dump-state"])
        .output()
        .expect("failed to run chip8");

    assert!(output.status.success());
    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["regs"]["pc"], 0x20C);
    assert_eq!(state["regs"]["v"][10], 0x10);
    assert_eq!(state["memory"].as_array().map(Vec::len), Some(4096));
}

#[test]
fn save_state_then_load_state() {
    let temp_dir = tempfile::tempdir().unwrap();
    let rom = write_rom(temp_dir.path(), "zero.ch8", &ROM);
    let state = temp_dir.path().join("zero.state");

    let status = Command::new(binary_path())
        .args([
            "run",
            rom.to_str().unwrap(),
            "--frames",
            "3",
            "--save-state",
            state.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run chip8");
    assert!(status.success());
    assert!(fs::read(&state).unwrap().starts_with(b"C8SS"));

    let output = Command::new(binary_path())
        .args([
            "run",
            rom.to_str().unwrap(),
            "--frames",
            "0",
            "--load-state",
            state.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run chip8");
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().starts_with("####."));
}

#[test]
fn corrupt_state_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let rom = write_rom(temp_dir.path(), "zero.ch8", &ROM);
    let state = write_rom(temp_dir.path(), "bad.state", b"nope");

    let output = Command::new(binary_path())
        .args([
            "run",
            rom.to_str().unwrap(),
            "--load-state",
            state.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run chip8");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("restore state"));
}

#[test]
fn disasm_lists_each_word() {
    let temp_dir = tempfile::tempdir().unwrap();
    let rom = write_rom(temp_dir.path(), "zero.ch8", &ROM);

    let output = Command::new(binary_path())
        .args(["disasm", rom.to_str().unwrap()])
        .output()
        .expect("failed to run chip8");

    assert!(output.status.success());
    let listing = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "200: 00E0  CLS");
    assert_eq!(lines[3], "206: D005  DRW V0, V0, 5");
    assert_eq!(lines[6], "20C: 120C  JP 0x20C");
}

#[test]
fn missing_rom_exits_with_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("missing.ch8");

    let output = Command::new(binary_path())
        .args(["run", missing.to_str().unwrap()])
        .output()
        .expect("failed to run chip8");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("read rom"));
}

#[test]
fn oversized_rom_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let rom = write_rom(temp_dir.path(), "huge.ch8", &vec![0u8; 0xCA1]);

    let output = Command::new(binary_path())
        .args(["run", rom.to_str().unwrap()])
        .output()
        .expect("failed to run chip8");

    assert_eq!(output.status.code(), Some(1));
}
