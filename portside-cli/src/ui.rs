//! Terminal implementations of the view collaborators

use crate::output;
use async_trait::async_trait;
use dialoguer::Confirm;
use portside_common::Error;
use portside_console::services::{ModalService, Navigator, TabStorage};
use portside_console::Notifier;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Prints notifications and counts failures so the command can exit
/// non-zero
#[derive(Default)]
pub struct TerminalNotifier {
    failures: AtomicUsize,
}

impl TerminalNotifier {
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }
}

impl Notifier for TerminalNotifier {
    fn success(&self, title: &str, text: &str) {
        output::print_success(&format!("{}: {}", title, text));
    }

    fn error(&self, title: &str, err: &Error, message: &str) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        output::print_error(&format!("{}: {} ({})", title, message, err.user_detail()));
    }
}

/// Confirmation prompt. `assume_yes` accepts without asking.
pub struct PromptModal {
    assume_yes: bool,
}

impl PromptModal {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl ModalService for PromptModal {
    async fn confirm_update(&self, message: &str) -> bool {
        output::print_warning(message);
        if self.assume_yes {
            return true;
        }

        let answer = tokio::task::spawn_blocking(|| {
            Confirm::new()
                .with_prompt("Apply the update?")
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Confirmation prompt failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Confirmation prompt task failed");
                false
            }
        }
    }
}

/// A terminal has no views to switch; routes are reported instead
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn go(&self, route: &str) {
        tracing::debug!(route, "Navigate");
        output::print_info(&format!("Next view: {}", route));
    }

    fn reload(&self) {
        tracing::debug!("Reload requested");
    }
}

/// Tab memory kept in a JSON file
pub struct FileTabStore {
    path: PathBuf,
}

impl FileTabStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> HashMap<String, usize> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    fn write(&self, tabs: &HashMap<String, usize>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(tabs)?)?;
        Ok(())
    }
}

impl TabStorage for FileTabStore {
    fn get_active_tab(&self, key: &str) -> usize {
        self.read().get(key).copied().unwrap_or(0)
    }

    fn store_active_tab(&self, key: &str, index: usize) {
        let mut tabs = self.read();
        tabs.insert(key.to_string(), index);
        if let Err(e) = self.write(&tabs) {
            tracing::warn!(path = %self.path.display(), error = %e, "Unable to store active tab");
        }
    }
}
