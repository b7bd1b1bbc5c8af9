//! Progress reporting for query execution

use chorus_application::ProgressNotifier;
use chorus_domain::{MixStrategy, ModelCapabilities, Topic};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::sync::Mutex;

/// Reports progress with a spinner bar that ticks once per backend
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    /// Drop the bar without a completion message (e.g. after cancellation)
    pub fn clear(&self) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_and_clear();
        }
    }

    fn topic_list(topics: &BTreeSet<Topic>) -> String {
        if topics.is_empty() {
            "no topic".to_string()
        } else {
            topics.iter().map(Topic::as_str).collect::<Vec<_>>().join(", ")
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_route(&self, topics: &BTreeSet<Topic>, selected: &[ModelCapabilities]) {
        let pb = ProgressBar::new(selected.len() as u64);
        pb.set_style(Self::style());
        pb.set_prefix("Asking");
        pb.set_message(format!("({})", Self::topic_list(topics)));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        if let Ok(mut bar) = self.bar.lock()
            && let Some(old) = bar.replace(pb)
        {
            old.finish_and_clear();
        }
    }

    fn on_backend_complete(&self, backend: &str, success: bool) {
        let Ok(mut bar) = self.bar.lock() else {
            return;
        };
        let Some(pb) = bar.as_ref() else {
            return;
        };

        let status = if success {
            format!("{} {}", "v".green(), backend)
        } else {
            format!("{} {}", "x".red(), backend)
        };
        pb.set_message(status);
        pb.inc(1);

        if pb.length().is_some_and(|len| pb.position() >= len)
            && let Some(pb) = bar.take()
        {
            pb.finish_and_clear();
        }
    }

    fn on_mix(&self, strategy: MixStrategy, responses: usize) {
        eprintln!(
            "{} mixing {} responses ({})",
            "->".cyan(),
            responses,
            strategy.to_string().bold()
        );
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_route(&self, topics: &BTreeSet<Topic>, selected: &[ModelCapabilities]) {
        eprintln!(
            "{} {} ({})",
            "->".cyan(),
            selected
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
                .bold(),
            ProgressReporter::topic_list(topics)
        );
    }

    fn on_backend_complete(&self, backend: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), backend);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_list() {
        let topics: BTreeSet<Topic> = [Topic::Math, Topic::Code].into_iter().collect();
        assert_eq!(ProgressReporter::topic_list(&topics), "code, math");
        assert_eq!(ProgressReporter::topic_list(&BTreeSet::new()), "no topic");
    }

    #[test]
    fn test_bar_finishes_after_last_backend() {
        let reporter = ProgressReporter::new();
        reporter.on_route(
            &BTreeSet::new(),
            &[ModelCapabilities::new("a"), ModelCapabilities::new("b")],
        );
        reporter.on_backend_complete("a", true);
        assert!(reporter.bar.lock().unwrap().is_some());
        reporter.on_backend_complete("b", false);
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
