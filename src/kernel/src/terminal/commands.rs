//! Built-in shell commands.

use serpent_hal::Console;

/// Shell command types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Clear the screen.
    Cls,
    /// Shut the machine down.
    Exit,
    /// Display help information.
    Help,
    /// Start the snake game.
    Snake,
}

/// What the shell does after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Stay in the shell and prompt again.
    Prompt,
    /// Hand the keyboard to the interactive program.
    EnterInteractive,
    /// Stop taking input and halt.
    Shutdown,
}

impl Command {
    /// Every command, in help order.
    pub const ALL: [Command; 4] = [Command::Snake, Command::Help, Command::Cls, Command::Exit];

    /// Parse a command from a complete line. Matching is exact.
    pub fn parse(line: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|cmd| cmd.name() == line)
    }

    /// The word that invokes this command.
    pub const fn name(self) -> &'static str {
        match self {
            Command::Cls => "cls",
            Command::Exit => "exit",
            Command::Help => "help",
            Command::Snake => "snake",
        }
    }

    /// Execute a command.
    pub fn execute(self, console: &mut dyn Console) -> Effect {
        match self {
            Command::Cls => {
                console.clear();
                Effect::Prompt
            }
            Command::Exit => {
                console.write_str("exiting...\n");
                Effect::Shutdown
            }
            Command::Help => {
                cmd_help(console);
                Effect::Prompt
            }
            Command::Snake => {
                console.write_str("lets play some snake\n");
                Effect::EnterInteractive
            }
        }
    }
}

/// Display help information.
fn cmd_help(console: &mut dyn Console) {
    console.write_str("commands:\n");
    for cmd in Command::ALL {
        console.write_str(cmd.name());
        console.write_char('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockConsole;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(Command::parse("cls"), Some(Command::Cls));
        assert_eq!(Command::parse("snake"), Some(Command::Snake));
        assert_eq!(Command::parse("CLS"), None);
        assert_eq!(Command::parse(" help"), None);
        assert_eq!(Command::parse("help me"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_help_lists_commands() {
        let mut console = MockConsole::default();
        assert_eq!(Command::Help.execute(&mut console), Effect::Prompt);
        assert_eq!(console.output, "commands:\nsnake\nhelp\ncls\nexit\n");
    }

    #[test]
    fn test_effects() {
        let mut console = MockConsole::default();
        assert_eq!(Command::Cls.execute(&mut console), Effect::Prompt);
        assert_eq!(console.clears, 1);
        assert_eq!(Command::Exit.execute(&mut console), Effect::Shutdown);
        assert_eq!(
            Command::Snake.execute(&mut console),
            Effect::EnterInteractive
        );
        assert!(console.output.ends_with("exiting...\nlets play some snake\n"));
    }
}
