//! CLI argument definitions for vendorkit.
//!
//! The tool takes no operational arguments; clap supplies `--help` and
//! `--version`.

use clap::Parser;

/// Fetch SDL3 and Dear ImGui, then build the GUI app.
#[derive(Parser, Debug, Default)]
#[command(name = "vendorkit")]
#[command(version, about)]
#[command(long_about = concat!(
    "Fetch SDL3 and Dear ImGui into vendors/ and build the GUI app.\n\n",
    "Each dependency is downloaded only when its vendor directory is missing ",
    "or empty. The contents of an existing directory are not checked, so ",
    "delete vendors/<name> to pick up a new version.\n\n",
    "The app is compiled from src/main.cpp and the ImGui sources into ",
    "build/app. On Windows, SDL3.dll is copied next to the executable.",
))]
#[command(after_help = concat!(
    "SETTINGS:\n",
    "  An optional vendorkit.toml in the working directory overrides\n",
    "  sdl_version, imgui_version, vendor_dir, output_dir, compiler,\n",
    "  app_source, and executable_name.\n\n",
    "LOGGING:\n",
    "  Set RUST_LOG=debug for download and command details.",
))]
pub struct Cli {}
