#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::Parser;
use relist_core::event::KeyCode;
use relist_core::keymap::ReorderKeymap;
use relist_widgets::Item;

use crate::error::{DemoError, Result};

const SAMPLE_ITEMS: [&str; 7] = [
    "Go running.",
    "Do laundry.",
    "Write report.",
    "Call mom.",
    "Buy groceries.",
    "Water plants.",
    "Read a book.",
];

#[derive(Debug, Parser)]
#[command(
    name = "relist-demo",
    about = "Reorder a list in the terminal with the mouse or the keyboard",
    version
)]
pub struct Cli {
    /// Item labels, in initial order. Defaults to a sample to-do list.
    #[arg(value_name = "LABEL")]
    pub items: Vec<String>,

    /// Grab/drop key name (e.g. "space", "enter", "g").
    #[arg(long, value_parser = parse_key)]
    pub grab_key: Option<KeyCode>,

    /// Cancel key name.
    #[arg(long, value_parser = parse_key)]
    pub cancel_key: Option<KeyCode>,

    /// Wrap the cursor at the list ends when nothing is grabbed.
    #[arg(long)]
    pub wrap: bool,

    /// TOML keymap file; command-line keys override it.
    #[arg(long, value_name = "PATH")]
    pub keymap: Option<PathBuf>,

    /// Write JSON logs to this file (filter with RELIST_LOG).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

fn parse_key(name: &str) -> std::result::Result<KeyCode, String> {
    KeyCode::parse(name).ok_or_else(|| format!("unknown key '{name}'"))
}

impl Cli {
    /// Items to show, numbered from 1.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        let labels: Vec<&str> = if self.items.is_empty() {
            SAMPLE_ITEMS.to_vec()
        } else {
            self.items.iter().map(String::as_str).collect()
        };
        labels
            .into_iter()
            .zip(1u64..)
            .map(|(label, id)| Item::new(id, label))
            .collect()
    }

    /// Keymap from, in increasing priority: environment, file, flags.
    pub fn keymap(&self) -> Result<ReorderKeymap> {
        let mut keymap = match &self.keymap {
            Some(path) => {
                let source =
                    std::fs::read_to_string(path).map_err(|source| DemoError::KeymapRead {
                        path: path.clone(),
                        source,
                    })?;
                ReorderKeymap::from_toml_str(&source)?
            }
            None => ReorderKeymap::from_env(),
        };
        if let Some(code) = self.grab_key {
            keymap.grab = code;
        }
        if let Some(code) = self.cancel_key {
            keymap.cancel = code;
        }
        if self.wrap {
            keymap.wrap_navigation = true;
        }
        Ok(keymap.validated())
    }
}
