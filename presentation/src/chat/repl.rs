//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::interrupt::answer_until_interrupted;
use crate::output::formatter::{OutputFormatter, formatter_for};
use crate::progress::reporter::ProgressReporter;
use chorus_application::{AnswerQueryUseCase, NoProgress};
use chorus_domain::{OutputFormat, PromptTemplate, Query};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;

/// What a slash command asks the loop to do
#[derive(Debug, PartialEq, Eq)]
enum CommandAction {
    Continue,
    Exit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: Arc<AnswerQueryUseCase>,
    show_progress: bool,
    history_file: Option<PathBuf>,
    formatter: Box<dyn OutputFormatter>,
}

impl ChatRepl {
    pub fn new(use_case: Arc<AnswerQueryUseCase>) -> Self {
        Self {
            use_case,
            show_progress: true,
            history_file: dirs::data_dir().map(|p| p.join("chorus").join("history.txt")),
            formatter: formatter_for(OutputFormat::Text, true),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Override the history file location
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.history_file = path;
        }
        self
    }

    pub fn with_output(mut self, format: OutputFormat, color: bool) -> Self {
        self.formatter = formatter_for(format, color);
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) == CommandAction::Exit {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_question(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_file {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Chorus - Chat Mode".cyan().bold());
        println!();
        println!("Backends: {}", self.backend_names().join(", "));
        println!("Strategy: {}", self.use_case.mixer().strategy());
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /models   - Show available backends");
        println!("  /quit     - Exit chat");
        println!();
    }

    fn backend_names(&self) -> Vec<&str> {
        self.use_case.registry().names().collect()
    }

    /// Handle slash commands
    fn handle_command(&self, cmd: &str) -> CommandAction {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                CommandAction::Exit
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /models          - Show available backends");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                println!("Anything else is sent as a question. Ctrl-C cancels a running query.");
                println!();
                CommandAction::Continue
            }
            "/models" => {
                println!();
                println!("Available backends:");
                for caps in self.use_case.registry().all() {
                    let strengths: Vec<_> = caps.strengths.iter().map(|t| t.as_str()).collect();
                    println!(
                        "  - {} ({}) strong at: {}",
                        caps.name.bold(),
                        caps.model,
                        strengths.join(", ")
                    );
                }
                println!();
                CommandAction::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                CommandAction::Continue
            }
        }
    }

    async fn process_question(&self, question: &str) {
        let Ok(query) = Query::new(question) else {
            println!("{}", PromptTemplate::no_message());
            return;
        };
        println!();

        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            let result = answer_until_interrupted(&self.use_case, &query, &progress).await;
            progress.clear();
            result
        } else {
            answer_until_interrupted(&self.use_case, &query, &NoProgress).await
        };

        match result {
            Ok(response) => println!("{}", self.formatter.format(&response)),
            Err(e) if e.is_cancelled() => println!("{}", "Cancelled.".yellow()),
            Err(e) => eprintln!("Error: {}", e),
        }
        println!();
    }
}
