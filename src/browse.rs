use crate::error::{ Error, Result };
use crate::models::{ Directory, Node };
use crate::tree::{ filter, render, RenderStyle };
use cool_rust_input::{ set_terminal_line, CoolInput, CustomInput, KeyPressResult };
use crossterm::event::{ Event, KeyCode, KeyEventKind, KeyModifiers };
use crossterm::execute;
use crossterm::style::{ Color, ResetColor, SetForegroundColor };
use std::io::stdout;
use tracing::debug;

/// How a browsing session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum BrowseOutcome {
    Exit,
    /// The user asked to load another repository.
    Open(String),
}

#[derive(Debug, PartialEq, Eq)]
enum CommandResult {
    Ok,
    NotFound,
    BadArgs,
    ShowTree,
    Open(String),
    Exit,
}

struct TreeViewInput {
    title: String,
}

impl CustomInput for TreeViewInput {
    fn get_offset(&mut self, _terminal_size: (u16, u16), _current_text: String) -> (u16, u16) {
        (0, 2)
    }
    fn get_size(&mut self, terminal_size: (u16, u16), _current_text: String) -> (u16, u16) {
        (terminal_size.0, terminal_size.1.saturating_sub(2))
    }
    fn before_draw_text(&mut self, _terminal_size: (u16, u16), _current_text: String) {
        let _ = execute!(stdout(), ResetColor);
    }
    fn after_draw_text(&mut self, _terminal_size: (u16, u16), _current_text: String) {
        let _ = execute!(stdout(), SetForegroundColor(Color::Blue));
        let header = "[".to_string() + &self.title + "]";
        let _ = set_terminal_line(&header, 0, 0, true);
        let _ = set_terminal_line("esc or ctrl+q to go back", 0, 1, true);
    }
    fn handle_key_press(
        &mut self,
        key: &crossterm::event::Event,
        _current_text: String
    ) -> KeyPressResult {
        if let Event::Key(key_event) = key {
            if key_event.kind == KeyEventKind::Press {
                if let KeyCode::Esc = key_event.code {
                    return KeyPressResult::Stop;
                }
                if let KeyCode::Char('q') = key_event.code {
                    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
                        return KeyPressResult::Stop;
                    }
                }
            }
        }
        KeyPressResult::Continue
    }
}

struct PromptInput {
    error_message: String,
    cwd: String,
    dirs: String,
    files: String,
    items: Vec<String>,
    current_autocomplete: Option<String>,
    should_back: bool,
}

impl CustomInput for PromptInput {
    fn get_offset(&mut self, _terminal_size: (u16, u16), _current_text: String) -> (u16, u16) {
        (0, 3)
    }
    fn get_size(&mut self, terminal_size: (u16, u16), _current_text: String) -> (u16, u16) {
        (terminal_size.0, terminal_size.1.saturating_sub(3))
    }
    fn before_draw_text(&mut self, _terminal_size: (u16, u16), _current_text: String) {
        let _ = execute!(stdout(), ResetColor);
    }
    fn after_draw_text(&mut self, _terminal_size: (u16, u16), current_text: String) {
        let _ = execute!(stdout(), SetForegroundColor(Color::Grey));
        let _ = set_terminal_line(&self.cwd, 0, 0, true);
        let _ = execute!(stdout(), SetForegroundColor(Color::Green));
        let _ = set_terminal_line(&self.dirs, 0, 1, true);
        let _ = execute!(stdout(), SetForegroundColor(Color::Blue));
        let _ = set_terminal_line(&self.files, self.dirs.chars().count() + 1, 1, false);
        let _ = execute!(stdout(), SetForegroundColor(Color::Red));
        let _ = set_terminal_line(&self.error_message, 0, 2, true);

        let _ = execute!(stdout(), SetForegroundColor(Color::DarkGrey));
        let input_length = current_text.chars().count();
        self.current_autocomplete = autocomplete(&self.items, &current_text);
        if let Some(autocomplete) = &self.current_autocomplete {
            let _ = set_terminal_line(autocomplete, input_length, 3, false);
        }
    }
    fn handle_key_press(
        &mut self,
        key: &crossterm::event::Event,
        _current_text: String
    ) -> KeyPressResult {
        if let Event::Key(key_event) = key {
            if key_event.kind == KeyEventKind::Press {
                if let KeyCode::Enter = key_event.code {
                    return KeyPressResult::Stop;
                }
                if let KeyCode::Esc = key_event.code {
                    self.should_back = true;
                    return KeyPressResult::Stop;
                }
                if let KeyCode::Char('x') = key_event.code {
                    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
                        self.should_back = true;
                        return KeyPressResult::Stop;
                    }
                }
            }
        }

        KeyPressResult::Continue
    }
}

/// Remainder of the shortest item that starts with `current_input`.
fn autocomplete(items: &[String], current_input: &str) -> Option<String> {
    if current_input.is_empty() {
        return None;
    }

    let mut items: Vec<&String> = items.iter().collect();
    items.sort_by_key(|item| item.len());
    for item in items {
        if item == current_input {
            return None;
        }
        if let Some(rest) = item.strip_prefix(current_input) {
            return Some(rest.to_string());
        }
    }
    None
}

/// Read-only shell-like navigator over a repository tree.
pub struct Browser {
    label: String,
    root: Directory,
    filtered: Option<(String, Directory)>,
    cwd: Vec<String>,
    error_message: String,
    style: RenderStyle,
}

impl Browser {
    pub fn new(label: &str, root: Directory, style: RenderStyle) -> Self {
        Browser {
            label: label.to_string(),
            root,
            filtered: None,
            cwd: Vec::new(),
            error_message: String::new(),
            style,
        }
    }

    /// Swaps in a freshly loaded repository and returns to its root.
    pub fn replace_tree(&mut self, label: &str, root: Directory) {
        self.label = label.to_string();
        self.root = root;
        self.filtered = None;
        self.cwd.clear();
        self.error_message = String::new();
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_message = message.into();
    }

    fn view(&self) -> &Directory {
        match &self.filtered {
            Some((_, dir)) => dir,
            None => &self.root,
        }
    }

    fn cwd_path(&self) -> String {
        let mut path = format!("{}:/{}", self.label, self.cwd.join("/"));
        if let Some((term, _)) = &self.filtered {
            path += &format!("  (find: {})", term);
        }
        path
    }

    fn get_cwd_data(&self) -> &Directory {
        self.view().subdirectory(&self.cwd).unwrap_or(self.view())
    }

    fn move_to_dir(&mut self, name: &str) -> CommandResult {
        if !name.is_empty() && name.chars().all(|c| c == '.') {
            if name.len() > 1 {
                self.cwd.pop();
            }
            return CommandResult::Ok;
        }
        if self.get_cwd_data().get(name).is_some_and(Node::is_directory) {
            self.cwd.push(name.to_string());
            return CommandResult::Ok;
        }
        CommandResult::BadArgs
    }

    fn handle_path(&mut self, name: &str) -> CommandResult {
        match self.get_cwd_data().get(name).map(Node::is_directory) {
            Some(true) => self.move_to_dir(name),
            // files have no contents to open
            Some(false) => CommandResult::BadArgs,
            None if name.chars().all(|c| c == '.') => self.move_to_dir(name),
            None => CommandResult::NotFound,
        }
    }

    fn list_dir(&self) -> (Vec<String>, String, String) {
        let mut dirs = String::new();
        let mut files = String::new();
        let mut items: Vec<String> = Vec::new();

        for (item, value) in self.get_cwd_data().iter() {
            if value.is_directory() {
                dirs += &(item.to_string() + " ");
            } else {
                files += &(item.to_string() + " ");
            }
            items.push(item.to_string());
        }
        (items, dirs, files)
    }

    pub fn apply_filter(&mut self, term: &str) {
        let filtered = filter(&self.root, term);
        debug!(term, matches = filtered.len(), "applied filter");
        self.filtered = Some((term.to_string(), filtered));
        self.cwd.clear();
    }

    fn handle_command(&mut self, command: &str) -> CommandResult {
        let mut args = command.split_whitespace();
        let keyword = args.next().unwrap_or("");
        let args: Vec<&str> = args.collect();
        match keyword {
            "" | "ls" => CommandResult::Ok,
            "cd" => {
                if args.len() != 1 {
                    return CommandResult::BadArgs;
                }
                self.move_to_dir(args[0])
            }
            "find" => {
                if args.is_empty() {
                    return CommandResult::BadArgs;
                }
                self.apply_filter(&args.join(" "));
                CommandResult::Ok
            }
            "clear" => {
                self.filtered = None;
                CommandResult::Ok
            }
            "tree" => CommandResult::ShowTree,
            "open" => {
                if args.len() != 1 {
                    return CommandResult::BadArgs;
                }
                CommandResult::Open(args[0].to_string())
            }
            "exit" | "q" => CommandResult::Exit,
            _ => self.handle_path(keyword),
        }
    }

    /// Runs `command`, retrying an unknown name with the autocomplete
    /// suggestion appended.
    fn run_command(&mut self, command: &str, completion: Option<&str>) -> CommandResult {
        match (self.handle_command(command), completion) {
            (CommandResult::NotFound, Some(completion)) => {
                let full = command.trim().to_string() + completion;
                self.handle_path(&full)
            }
            (result, _) => result,
        }
    }

    fn report(&mut self, result: &CommandResult) {
        self.error_message = match result {
            CommandResult::BadArgs => "bad args".to_string(),
            CommandResult::NotFound => "unknown command or nonexisting directory".to_string(),
            _ => String::new(),
        };
    }

    fn show_tree(&self) -> Result<()> {
        let mut title = self.cwd_path();
        if self.cwd.is_empty() && self.filtered.is_none() {
            title = self.label.clone();
        }
        let mut input = CoolInput::new(TreeViewInput { title });
        input.text = render(self.get_cwd_data(), &self.style);
        input.pre_listen().map_err(Error::Terminal)?;
        input.render().map_err(Error::Terminal)?;
        input.listen_quiet().map_err(Error::Terminal)?;
        input.post_listen().map_err(Error::Terminal)?;
        Ok(())
    }

    /// Runs the prompt loop until the user exits or opens another repository.
    pub fn listen_terminal(&mut self) -> Result<BrowseOutcome> {
        let mut input = CoolInput::new(PromptInput {
            error_message: String::new(),
            cwd: String::new(),
            dirs: String::new(),
            files: String::new(),
            items: Vec::new(),
            current_autocomplete: None,
            should_back: false,
        });

        input.pre_listen().map_err(Error::Terminal)?;
        let outcome = loop {
            input.custom_input.error_message = self.error_message.to_string();
            input.custom_input.cwd = self.cwd_path();
            (input.custom_input.items, input.custom_input.dirs, input.custom_input.files) =
                self.list_dir();

            input.text = String::new();
            input.cursor_x = 0;
            input.cursor_y = 0;
            input.custom_input.should_back = false;
            input.render().map_err(Error::Terminal)?;
            input.listen_quiet().map_err(Error::Terminal)?;
            if input.custom_input.should_back {
                if self.cwd.is_empty() {
                    break BrowseOutcome::Exit;
                }
                self.move_to_dir("..");
                continue;
            }
            let completion = input.custom_input.current_autocomplete.clone();
            let result = self.run_command(&input.text, completion.as_deref());
            match result {
                CommandResult::ShowTree => {
                    input.post_listen().map_err(Error::Terminal)?;
                    self.show_tree()?;
                    input.pre_listen().map_err(Error::Terminal)?;
                }
                CommandResult::Open(repo) => {
                    break BrowseOutcome::Open(repo);
                }
                CommandResult::Exit => {
                    break BrowseOutcome::Exit;
                }
                other => self.report(&other),
            }
        };
        input.post_listen().map_err(Error::Terminal)?;
        Ok(outcome)
    }
}
