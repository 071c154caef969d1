//! Line input on a dedicated thread.
//!
//! rustyline blocks, so it runs on its own OS thread and forwards events to
//! the async runner over a channel. Output printed while the prompt is active
//! goes through rustyline's external printer so the input line is redrawn.

use std::sync::{Arc, Mutex};

use rustyline::{DefaultEditor, ExternalPrinter, error::ReadlineError};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    /// Ctrl+C while the prompt owns the terminal
    Interrupted,
    /// Ctrl+D or closed stdin
    Eof,
    Failed(String),
}

type Printer = Box<dyn ExternalPrinter + Send>;

/// Console sink shared by the receive task and the input loop.
///
/// Falls back to stdout when no external printer is available (e.g. stdin is
/// not a terminal).
#[derive(Clone, Default)]
pub struct ConsoleOutput {
    printer: Arc<Mutex<Option<Printer>>>,
}

impl ConsoleOutput {
    fn with_printer(printer: Option<Printer>) -> Self {
        Self {
            printer: Arc::new(Mutex::new(printer)),
        }
    }

    pub fn print(&self, line: String) {
        let mut guard = match self.printer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_mut() {
            Some(printer) => {
                if let Err(e) = printer.print(line.clone()) {
                    tracing::debug!("External printer failed: {}", e);
                    println!("{line}");
                }
            }
            None => println!("{line}"),
        }
    }
}

/// Start reading lines with `prompt`.
///
/// The thread ends after the first non-line event or once the receiver is
/// dropped.
pub async fn spawn_reader(
    prompt: &str,
) -> (mpsc::UnboundedReceiver<InputEvent>, ConsoleOutput) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (printer_tx, printer_rx) = oneshot::channel::<Option<Printer>>();
    let prompt = prompt.to_string();

    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                let _ = printer_tx.send(None);
                let _ = tx.send(InputEvent::Failed(e.to_string()));
                return;
            }
        };
        let printer = match editor.create_external_printer() {
            Ok(printer) => Some(Box::new(printer) as Printer),
            Err(e) => {
                tracing::debug!("No external printer: {}", e);
                None
            }
        };
        let _ = printer_tx.send(printer);

        loop {
            let event = match editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    InputEvent::Line(line)
                }
                Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
                Err(ReadlineError::Eof) => InputEvent::Eof,
                Err(e) => InputEvent::Failed(e.to_string()),
            };

            let done = !matches!(event, InputEvent::Line(_));
            if tx.send(event).is_err() || done {
                break;
            }
        }
    });

    let output = ConsoleOutput::with_printer(printer_rx.await.unwrap_or_default());
    (rx, output)
}
