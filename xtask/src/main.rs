//! Build automation tasks for the button-events project.
//!
//! Run with: `cargo xtask <command>`

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::{Command, ExitCode};

/// The only board the firmware side supports.
const FIRMWARE_TARGET: &str = "thumbv6m-none-eabi";
const FIRMWARE_FEATURES: &str = "defmt,pico1,arm";
const DEMOS: [&str; 1] = ["button_log"];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for button-events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: host tests, firmware library, demos, docs
    CheckAll,
    /// Run the host tests only
    Test,
    /// Build the library for the Pico
    Build,
    /// Build a firmware demo
    Demo {
        /// Demo name (e.g., button_log)
        name: String,
    },
    /// Build UF2 firmware file for flashing to Pico
    Uf2 {
        /// Demo name (e.g., button_log)
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckAll => check_all(),
        Commands::Test => exit_code(run_host_tests()),
        Commands::Build => exit_code(build_lib()),
        Commands::Demo { name } => exit_code(build_demo(&name, false)),
        Commands::Uf2 { name } => build_uf2(&name),
    }
}

fn check_all() -> ExitCode {
    println!("{}", "==> Running host tests...".cyan());
    if !run_host_tests() {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building library (pico1, arm)...".cyan());
    if !build_lib() {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building demos (pico1, arm)...".cyan());
    for demo in &DEMOS {
        println!("  {}", format!("- {demo}").bright_black());
        if !build_demo(demo, false) {
            return ExitCode::FAILURE;
        }
    }

    println!("\n{}", "==> Building documentation...".cyan());
    if !run_command(Command::new("cargo").current_dir(workspace_root()).args([
        "doc",
        "--lib",
        "--target",
        FIRMWARE_TARGET,
        "--no-deps",
        "--features",
        FIRMWARE_FEATURES,
        "--no-default-features",
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> All checks passed!".green().bold());
    ExitCode::SUCCESS
}

fn run_host_tests() -> bool {
    let host_target = host_target();
    match host_target.as_deref() {
        Some(target) => {
            println!(
                "  {}",
                format!("Using host target: {target}").bright_black()
            );
        }
        None => {
            println!(
                "{}",
                "  Unable to detect host target; relying on cargo default.".bright_black()
            );
        }
    }

    let mut test_cmd = Command::new("cargo");
    test_cmd
        .current_dir(workspace_root())
        .args(["test", "-p", "button-events", "--lib", "--tests"]);

    if let Some(target) = host_target {
        test_cmd.arg("--target").arg(target);
    }

    test_cmd.args(["--no-default-features", "--features", "host"]);
    run_command(&mut test_cmd)
}

fn build_lib() -> bool {
    println!(
        "{}",
        format!("Building library with features: {FIRMWARE_FEATURES}").cyan()
    );
    run_command(Command::new("cargo").current_dir(workspace_root()).args([
        "build",
        "--lib",
        "--target",
        FIRMWARE_TARGET,
        "--features",
        FIRMWARE_FEATURES,
        "--no-default-features",
    ]))
}

fn build_demo(name: &str, release: bool) -> bool {
    println!(
        "{}",
        format!("Building demo '{name}' with features: {FIRMWARE_FEATURES}").cyan()
    );
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root()).args([
        "build",
        "--bin",
        name,
        "--target",
        FIRMWARE_TARGET,
        "--features",
        FIRMWARE_FEATURES,
        "--no-default-features",
    ]);
    if release {
        cmd.arg("--release");
    }
    run_command(&mut cmd)
}

fn build_uf2(name: &str) -> ExitCode {
    println!("{}", format!("Building UF2 for demo '{name}'").cyan());
    println!("  Target: {}", FIRMWARE_TARGET.bright_black());

    // Build in release mode for UF2
    if !build_demo(name, true) {
        return ExitCode::FAILURE;
    }

    // Convert to UF2 using elf2uf2-rs
    let elf_path = format!("target/{FIRMWARE_TARGET}/release/{name}");
    let uf2_path = format!("{name}.uf2");

    println!("\n{}", "Converting to UF2 format...".cyan());

    if run_command(
        Command::new("elf2uf2-rs")
            .current_dir(workspace_root())
            .args([&elf_path, &uf2_path]),
    ) {
        println!("{}", format!("UF2 created: {uf2_path}").green().bold());
        println!("{}", "Ready to drag-and-drop to your Pico!".bright_black());
        ExitCode::SUCCESS
    } else {
        println!(
            "{}",
            "Note: Install elf2uf2-rs with: cargo install elf2uf2-rs".yellow()
        );
        ExitCode::FAILURE
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        println!("{}", "Done!".green());
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn workspace_root() -> std::path::PathBuf {
    // `cargo xtask` runs from the workspace root
    std::env::current_dir().expect("Failed to get current directory")
}

fn host_target() -> Option<String> {
    let output = Command::new("rustc").arg("-vV").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(host) = line.strip_prefix("host: ") {
            return Some(host.trim().to_string());
        }
    }
    None
}

fn run_command(cmd: &mut Command) -> bool {
    match cmd.status() {
        Ok(status) => status.success(),
        Err(e) => {
            eprintln!("{}", format!("Failed to execute command: {e}").red());
            false
        }
    }
}
