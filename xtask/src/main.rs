// Copyright 2026 The Obsidian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # xtask
//!
//! Workspace build automation.  `vfs-overlay` writes a clang/LLVM virtual
//! file system overlay that remaps one directory onto another, letting a
//! toolchain see generated headers under a stable path without copying them.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace build tasks")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Write a VFS overlay file remapping `--from` onto `--to`.
    VfsOverlay {
        /// Directory the toolchain will look in.
        #[arg(long)]
        from: PathBuf,
        /// Directory the contents actually live in.
        #[arg(long)]
        to: PathBuf,
        /// Overlay file to write.
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct Overlay {
    version: u32,
    roots: Vec<Root>,
}

#[derive(Serialize)]
struct Root {
    name: String,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "external-contents")]
    external_contents: String,
}

/// The overlay format wants forward slashes even on Windows.
fn normalize(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn overlay(from: &std::path::Path, to: &std::path::Path) -> Overlay {
    Overlay {
        version: 0,
        roots: vec![Root {
            name: normalize(from),
            kind: "directory-remap",
            external_contents: normalize(to),
        }],
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Task::VfsOverlay { from, to, output } => {
            let json = serde_json::to_string_pretty(&overlay(&from, &to))?;
            fs::write(&output, json)
                .with_context(|| format!("writing overlay to {}", output.display()))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn overlay_shape() {
        let overlay = overlay(
            std::path::Path::new("/virtual/include"),
            std::path::Path::new("/real/generated"),
        );
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&overlay).unwrap()).unwrap();

        assert_eq!(json["version"], 0);
        assert_eq!(json["roots"][0]["name"], "/virtual/include");
        assert_eq!(json["roots"][0]["type"], "directory-remap");
        assert_eq!(json["roots"][0]["external-contents"], "/real/generated");
    }

    #[test]
    fn backslashes_are_normalized() {
        let name = normalize(std::path::Path::new(r"C:\vulkan\include"));
        assert_eq!(name, "C:/vulkan/include");
    }
}
