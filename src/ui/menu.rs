//! Main menu of the interactive shell

use std::io::{self, Write};

/// An entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    List,
    Add,
    Rename,
    Remove,
    Exit,
}

impl MenuAction {
    /// Entries in display order
    pub const ALL: [MenuAction; 5] = [
        MenuAction::List,
        MenuAction::Add,
        MenuAction::Rename,
        MenuAction::Remove,
        MenuAction::Exit,
    ];

    /// Key the operator types to pick this entry
    pub fn key(self) -> &'static str {
        match self {
            MenuAction::List => "1",
            MenuAction::Add => "2",
            MenuAction::Rename => "3",
            MenuAction::Remove => "4",
            MenuAction::Exit => "0",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::List => "List documents",
            MenuAction::Add => "Add document",
            MenuAction::Rename => "Rename document",
            MenuAction::Remove => "Remove document",
            MenuAction::Exit => "Exit",
        }
    }

    /// Parse operator input; `q` and `quit` also exit
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            return Some(MenuAction::Exit);
        }
        Self::ALL.into_iter().find(|action| action.key() == input)
    }
}

/// Main menu printer
pub struct MainMenu;

impl MainMenu {
    /// Print the menu
    pub fn show(out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "=== Docshelf ===")?;
        for action in MenuAction::ALL {
            writeln!(out, "{}. {}", action.key(), action.label())?;
        }
        Ok(())
    }
}
