//! Line-oriented terminal surface.

use std::io::{BufRead, Write};
use taskboard_core::{
    FormMode, ItemAction, ItemKey, KeyValueRepository, TaskController, TaskView, UiEvent,
    VisibleItem,
};

const HELP: &str = "\
commands:
  add <text>         add a task
  done <n>           toggle task n done/pending
  edit <n>           edit task n (then type new text, or :cancel)
  rm <n>             delete task n
  search <term>      show tasks containing term
  clear              clear search
  filter <mode>      all | done | pending
  list               show the list
  help               this text
  quit               exit";

const CANCEL_EDIT: &str = ":cancel";

/// One parsed line typed in add mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Item { index: usize, action: ItemAction },
    Search(String),
    ClearSearch,
    Filter(String),
    List,
    Help,
    Quit,
}

/// Parses one add-mode line. Item numbers are 1-based.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (verb, rest) = match line.trim_start().split_once(' ') {
        Some((verb, rest)) => (verb, rest),
        None => (line.trim(), ""),
    };

    let action = match verb {
        "add" => return Ok(Command::Add(rest.to_string())),
        "search" => return Ok(Command::Search(rest.to_string())),
        "filter" => return Ok(Command::Filter(rest.trim().to_string())),
        "clear" => return Ok(Command::ClearSearch),
        "list" | "" => return Ok(Command::List),
        "help" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        "done" => ItemAction::ToggleDone,
        "edit" => ItemAction::Edit,
        "rm" => ItemAction::Delete,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };

    let index = rest
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|index| *index > 0)
        .ok_or_else(|| format!("`{verb}` expects a task number"))?;
    Ok(Command::Item { index, action })
}

/// `TaskView` over a line reader and a writer.
pub struct TerminalView<I: BufRead, O: Write> {
    input: I,
    output: O,
    add_buffer: String,
    edit_buffer: String,
    mode: FormMode,
    /// Keys of shown items, in the numbering of the last paint.
    rows: Vec<ItemKey>,
}

impl<I: BufRead, O: Write> TerminalView<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self {
            input,
            output,
            add_buffer: String::new(),
            edit_buffer: String::new(),
            mode: FormMode::Add,
            rows: Vec::new(),
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn prompt(&mut self) {
        let label = match self.mode {
            FormMode::Add => "todo> ".to_string(),
            FormMode::Edit => format!("edit [{}]> ", self.edit_buffer),
        };
        let _ = write!(self.output, "{label}");
        let _ = self.output.flush();
    }

    fn say(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }

    fn key_at(&self, index: usize) -> Option<ItemKey> {
        self.rows.get(index - 1).copied()
    }
}

impl<I: BufRead, O: Write> TaskView for TerminalView<I, O> {
    fn add_input(&self) -> String {
        self.add_buffer.clone()
    }

    fn clear_add_input(&mut self) {
        self.add_buffer.clear();
    }

    fn focus_add_input(&mut self) {}

    fn edit_input(&self) -> String {
        self.edit_buffer.clone()
    }

    fn set_edit_input(&mut self, text: &str) {
        self.edit_buffer = text.to_string();
    }

    fn clear_search_input(&mut self) {}

    fn show_form(&mut self, mode: FormMode) {
        self.mode = mode;
    }

    fn paint_list(&mut self, items: &[VisibleItem]) {
        self.rows.clear();
        if !self.mode.list_visible() {
            return;
        }
        let shown: Vec<&VisibleItem> = items.iter().filter(|item| !item.hidden).collect();
        if shown.is_empty() {
            let note = if items.is_empty() {
                "  (no tasks)"
            } else {
                "  (no matching tasks)"
            };
            self.say(note);
            return;
        }
        for (position, item) in shown.iter().enumerate() {
            let marker = if item.done { "x" } else { " " };
            let _ = writeln!(
                self.output,
                "  {:>2}. [{marker}] {}",
                position + 1,
                item.label
            );
        }
        self.rows = shown.iter().map(|item| item.key).collect();
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        let _ = write!(self.output, "{prompt} [y/N] ");
        let _ = self.output.flush();
        matches!(
            self.read_line().as_deref().map(str::trim),
            Some("y" | "Y" | "yes")
        )
    }
}

/// Runs the read-eval loop until `quit` or end of input.
pub fn run_session<R, I, O>(controller: &mut TaskController<R, TerminalView<I, O>>)
where
    R: KeyValueRepository,
    I: BufRead,
    O: Write,
{
    loop {
        controller.view_mut().prompt();
        let Some(line) = controller.view_mut().read_line() else {
            return;
        };

        if controller.mode() == FormMode::Edit {
            if line.trim() == CANCEL_EDIT {
                controller.handle(UiEvent::EditCancelled);
            } else {
                controller.view_mut().edit_buffer = line;
                controller.handle(UiEvent::EditSubmitted);
            }
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                controller.view_mut().say(&message);
                continue;
            }
        };

        let event = match command {
            Command::Add(text) => {
                controller.view_mut().add_buffer = text;
                UiEvent::AddSubmitted
            }
            Command::Item { index, action } => match controller.view().key_at(index) {
                Some(key) => UiEvent::ItemClicked { key, action },
                None => {
                    controller.view_mut().say(&format!("no task number {index}"));
                    continue;
                }
            },
            Command::Search(term) => UiEvent::SearchInput(term),
            Command::ClearSearch => UiEvent::SearchCleared,
            Command::Filter(mode) => UiEvent::FilterChanged(mode),
            Command::List => {
                let items = controller.renderer().items().to_vec();
                controller.view_mut().paint_list(&items);
                continue;
            }
            Command::Help => {
                controller.view_mut().say(HELP);
                continue;
            }
            Command::Quit => return,
        };
        controller.handle(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, run_session, Command, TerminalView};
    use std::io::Cursor;
    use taskboard_core::{launch, ItemAction, MemoryKeyValueRepository};

    #[test]
    fn parse_command_handles_verbs_and_numbers() {
        assert_eq!(
            parse_command("add Buy milk"),
            Ok(Command::Add("Buy milk".to_string()))
        );
        assert_eq!(
            parse_command("rm 2"),
            Ok(Command::Item {
                index: 2,
                action: ItemAction::Delete
            })
        );
        assert_eq!(
            parse_command("search  MILK"),
            Ok(Command::Search(" MILK".to_string()))
        );
        assert_eq!(parse_command(""), Ok(Command::List));
        assert!(parse_command("done 0").is_err());
        assert!(parse_command("done x").is_err());
        assert!(parse_command("archive 1").is_err());
    }

    #[test]
    fn scripted_session_adds_edits_and_deletes() {
        let repo = MemoryKeyValueRepository::new();
        let script = "add Buy milk\nadd Walk dog\ndone 1\nedit 2\nWalk the dog\nrm 1\ny\nquit\n";
        let view = TerminalView::new(Cursor::new(script), Vec::new());
        let mut controller = launch(&repo, "minhastarefas", view);

        run_session(&mut controller);

        let texts: Vec<&str> = controller
            .store()
            .tasks()
            .iter()
            .map(|task| task.text.as_str())
            .collect();
        assert_eq!(texts, ["Walk the dog"]);

        let output = String::from_utf8(controller.view().output().clone()).unwrap();
        assert!(output.contains("[x] Buy milk"));
        assert!(output.contains("Are you sure you want to delete this task? [y/N]"));
    }

    #[test]
    fn search_hides_non_matching_rows_from_numbering() {
        let repo = MemoryKeyValueRepository::new();
        let script = "add Buy milk\nadd Walk dog\nsearch dog\ndone 1\nquit\n";
        let view = TerminalView::new(Cursor::new(script), Vec::new());
        let mut controller = launch(&repo, "minhastarefas", view);

        run_session(&mut controller);

        let tasks = controller.store().tasks();
        assert!(!tasks[0].done);
        assert!(tasks[1].done);
    }
}
