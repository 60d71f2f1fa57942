// src/app/shell.rs

//! Line-oriented front end over [`App`]. One command is handled at a time.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::app::App;

const HELP: &str = "\
Commands:
  tasks              list available tasks
  use <task>         select a task and show its model info
  info               show the selected model's info
  run <input>        run the selected task (text, or an image path)
  history            list what has run so far
  clear              clear the screen
  help               show this help
  quit               leave";

pub fn run<R: BufRead, W: Write>(app: &mut App, input: R, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "taskdesk".bold())?;
    list_tasks(app, out)?;
    writeln!(out, "Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "tasks" => list_tasks(app, out)?,
            "use" => match app.select(rest) {
                Ok(info) => write!(out, "{info}")?,
                Err(e) => writeln!(out, "{e}")?,
            },
            "info" => match app.selected_info() {
                Some(info) => write!(out, "{info}")?,
                None => writeln!(out, "(No model selected)")?,
            },
            "run" => {
                if let Some(output) = app.run(rest) {
                    writeln!(out, "{output}")?;
                }
            }
            "history" => {
                for (i, entry) in app.history().iter().enumerate() {
                    writeln!(out, "{}. {entry}", i + 1)?;
                }
            }
            "clear" => write!(out, "\x1B[2J\x1B[H")?,
            "help" => writeln!(out, "{HELP}")?,
            "quit" | "exit" => break,
            other => writeln!(out, "unknown command '{other}', try 'help'")?,
        }
        out.flush()?;
    }

    Ok(())
}

fn list_tasks<W: Write>(app: &App, out: &mut W) -> io::Result<()> {
    let selected = app.selected_task();
    for task in app.tasks() {
        if Some(task) == selected {
            writeln!(out, "{} {task}", "*".green())?;
        } else {
            writeln!(out, "  {task}")?;
        }
    }
    Ok(())
}
