use std::io::{BufRead, Write};
use std::path::Path;
use owo_colors::OwoColorize;
use usersdb::config::{write_config, UsersdbConfig};
use usersdb::output::{emit_json, emit_json_error, OutputMode};
use usersdb::storage::RecordStore;
use usersdb::ui::{self, banner, stats_table, theme, Icons, TerminalSurface};
use usersdb::ListSyncController;

pub type Controller = ListSyncController<TerminalSurface>;

pub fn run_init(path: &Path, config: &UsersdbConfig, force: bool, mode: OutputMode) -> anyhow::Result<()> {
    write_config(path, config, force)?;
    if mode.is_human() {
        ui::success(&format!("Wrote config to {}", path.display()));
    } else {
        emit_json("init", serde_json::json!({ "path": path.display().to_string() }))?;
    }
    Ok(())
}

pub fn run_list(controller: &mut Controller) -> anyhow::Result<()> {
    controller.refresh()?;
    Ok(())
}

pub fn run_add(controller: &mut Controller, name: &str) -> anyhow::Result<()> {
    controller.on_submit_create(name)?;
    Ok(())
}

pub fn run_update(controller: &mut Controller, index: usize, name: &str) -> anyhow::Result<()> {
    select_quietly(controller, index)?;
    controller.on_submit_update(name)?;
    Ok(())
}

pub fn run_delete(controller: &mut Controller, index: usize) -> anyhow::Result<()> {
    select_quietly(controller, index)?;
    controller.on_submit_delete()?;
    Ok(())
}

/// Load the snapshot and select from it without printing the list twice
fn select_quietly(controller: &mut Controller, index: usize) -> anyhow::Result<()> {
    controller.surface_mut().set_render_enabled(false);
    let selected = load_and_select(controller, index);
    controller.surface_mut().set_render_enabled(true);
    selected?;
    Ok(())
}

fn load_and_select(controller: &mut Controller, index: usize) -> usersdb::Result<()> {
    controller.refresh()?;
    controller.on_item_selected(index)?;
    Ok(())
}

pub fn run_stats(store: &RecordStore, mode: OutputMode) -> anyhow::Result<()> {
    let stats = store.stats()?;

    if mode.is_human() {
        banner(
            &format!("{} {}", Icons::STATS, "usersdb Statistics".bold().style(theme().info.clone())),
            &stats.path.display().to_string(),
        );
        let records = stats.records.to_string();
        let max_id = stats.max_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
        let version = stats.schema_version.to_string();
        println!(
            "{}",
            stats_table(&[
                ("Records", records.as_str()),
                ("Highest id", max_id.as_str()),
                ("Schema version", version.as_str()),
                ("Migration policy", stats.policy.as_str()),
            ])
        );
    } else {
        let data = serde_json::json!({
            "path": stats.path.display().to_string(),
            "records": stats.records,
            "max_id": stats.max_id,
            "schema_version": stats.schema_version,
            "migration": stats.policy.as_str(),
        });
        emit_json("stats", data)?;
    }
    Ok(())
}

/// One line of input in the interactive shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Select(usize),
    Add(String),
    Update(String),
    Delete,
    Clear,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "list" | "ls" => ShellCommand::List,
            "select" | "sel" => {
                let index = rest
                    .parse::<usize>()
                    .map_err(|_| format!("select expects a list position, got {:?}", rest))?;
                ShellCommand::Select(index)
            }
            // Names are passed through as typed; the controller rejects empty ones
            "add" => ShellCommand::Add(rest.to_string()),
            "update" => ShellCommand::Update(rest.to_string()),
            "delete" | "rm" => ShellCommand::Delete,
            "clear" => ShellCommand::Clear,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("unknown command: {}", other)),
        };
        Ok(Some(command))
    }
}

const SHELL_HELP: &str = "\
  list              show all users
  select <N>        select the user at list position N
  add <NAME>        add a user
  update <NAME>     rename the selected user
  delete            delete the selected user
  clear             clear the selection
  quit              leave the shell";

/// Serve intents from `input` one line at a time until EOF or `quit`.
///
/// A failed intent is reported and the session continues.
pub fn run_shell(controller: &mut Controller, input: impl BufRead) -> anyhow::Result<()> {
    let mode = controller.surface().mode();
    if mode.is_human() {
        println!("{}", ui::dim("usersdb shell - type `help` for commands"));
    }
    controller.refresh()?;

    prompt(mode)?;
    for line in input.lines() {
        let line = line?;
        match ShellCommand::parse(&line) {
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = dispatch(controller, command) {
                    report(mode, &e.to_string());
                }
            }
            Ok(None) => {}
            Err(message) => report(mode, &message),
        }
        prompt(mode)?;
    }

    Ok(())
}

fn dispatch(controller: &mut Controller, command: ShellCommand) -> usersdb::Result<()> {
    match command {
        ShellCommand::List => {
            controller.refresh()?;
        }
        ShellCommand::Select(index) => {
            controller.on_item_selected(index)?;
        }
        ShellCommand::Add(name) => {
            controller.on_submit_create(&name)?;
        }
        ShellCommand::Update(name) => {
            controller.on_submit_update(&name)?;
        }
        ShellCommand::Delete => {
            controller.on_submit_delete()?;
        }
        ShellCommand::Clear => controller.clear_selection(),
        ShellCommand::Help => println!("{}", SHELL_HELP),
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn report(mode: OutputMode, message: &str) {
    if mode.is_human() {
        ui::error(message);
    } else {
        emit_json_error(message);
    }
}

fn prompt(mode: OutputMode) -> std::io::Result<()> {
    if mode.is_human() {
        print!("{} ", ">".style(theme().header.clone()));
        std::io::stdout().flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("list").unwrap(), Some(ShellCommand::List));
        assert_eq!(ShellCommand::parse("  select 2 ").unwrap(), Some(ShellCommand::Select(2)));
        assert_eq!(
            ShellCommand::parse("add Amine Benali").unwrap(),
            Some(ShellCommand::Add("Amine Benali".to_string()))
        );
        assert_eq!(ShellCommand::parse("update").unwrap(), Some(ShellCommand::Update(String::new())));
        assert_eq!(ShellCommand::parse("DELETE").unwrap(), Some(ShellCommand::Delete));
        assert_eq!(ShellCommand::parse("").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(ShellCommand::parse("select two").is_err());
        assert!(ShellCommand::parse("frobnicate").is_err());
    }

    fn open_controller(dir: &tempfile::TempDir) -> Controller {
        let store = RecordStore::open(&dir.path().join("usersdb.db"), 1).unwrap();
        ListSyncController::new(store, TerminalSurface::new(OutputMode::Json))
    }

    #[test]
    fn test_delete_bad_index_restores_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = open_controller(&dir);

        assert!(run_delete(&mut controller, 5).is_err());
        assert!(controller.surface().is_render_enabled());
        assert_eq!(controller.selection(), None);
        assert_eq!(controller.store().count().unwrap(), 1);
    }

    #[test]
    fn test_update_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = open_controller(&dir);
        run_add(&mut controller, "Amine").unwrap();

        run_update(&mut controller, 1, "Amine Benali").unwrap();
        assert!(controller.surface().is_render_enabled());
        assert_eq!(controller.selection(), Some(2));
        assert_eq!(controller.store().get(2).unwrap().unwrap().name, "Amine Benali");
        assert_eq!(controller.store().get(1).unwrap().unwrap().name, "Mostapha");
    }

    #[test]
    fn test_shell_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = open_controller(&dir);

        let script = "add Amine\nselect 0\nupdate Mostapha Updated\nselect 1\ndelete\nupdate nope\nquit\nadd Never\n";
        run_shell(&mut controller, script.as_bytes()).unwrap();

        let names: Vec<_> = controller.snapshot().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Mostapha Updated"]);
        assert_eq!(controller.selection(), None);
    }
}
