//! Stdin gestures understood by the session loop.

use anyhow::{anyhow, bail, Context};
use thread_jump_core::Category;

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Toggle,
    Open,
    Close,
    Escape,
    Frame,
    Tab(Category),
    Search(String),
    /// 1-based row number as rendered.
    Click(usize),
    Outside,
    Drag { dx: f64, dy: f64 },
    Reload,
    Reinit,
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> anyhow::Result<UserCommand> {
    let line = line.trim_start();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let command = match word.to_ascii_lowercase().as_str() {
        "toggle" => UserCommand::Toggle,
        "open" => UserCommand::Open,
        "close" => UserCommand::Close,
        "esc" | "escape" => UserCommand::Escape,
        "frame" => UserCommand::Frame,
        "tab" => UserCommand::Tab(parse_tab(rest.trim())?),
        // Everything after the command word, so the term may contain spaces.
        "search" => UserCommand::Search(rest.to_string()),
        "click" => {
            let row = rest
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|row| *row > 0)
                .ok_or_else(|| anyhow!("click needs a row number starting at 1"))?;
            UserCommand::Click(row)
        }
        "outside" => UserCommand::Outside,
        "drag" => {
            let mut parts = rest.split_whitespace().map(str::parse::<f64>);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(dx), Some(dy), None) => UserCommand::Drag {
                    dx: dx.context("drag dx is not a number")?,
                    dy: dy.context("drag dy is not a number")?,
                },
                _ => bail!("usage: drag <dx> <dy>"),
            }
        }
        "reload" => UserCommand::Reload,
        "reinit" => UserCommand::Reinit,
        "show" => UserCommand::Show,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" => UserCommand::Quit,
        other => bail!("unknown command {other:?}, try 'help'"),
    };
    Ok(command)
}

fn parse_tab(name: &str) -> anyhow::Result<Category> {
    match name.to_ascii_lowercase().as_str() {
        "all" => Ok(Category::All),
        "user" | "mine" => Ok(Category::User),
        "ai" | "assistant" => Ok(Category::Assistant),
        other => bail!("unknown tab {other:?}, expected all, user or ai"),
    }
}
