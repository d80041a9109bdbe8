/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Guess(String),
    GiveUp,
    Restart,
    NewGame,
    Target(String),
    AiTurn,
    Stats,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("Usage: /target <selector>")]
    MissingTarget,
}

pub const HELP: &str = "\
Type a word to guess it. Commands:
  /ai               let the AI take its turn now
  /giveup           reveal the word and end the game
  /restart          start over on the same word
  /new              start over on a new word
  /target <name>    play a specific word
  /stats            show today's stats
  /quit             leave";

impl Command {
    /// Parses a line; blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Some(Command::Guess(line.to_string())));
        };

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "giveup" | "give-up" => Command::GiveUp,
            "restart" => Command::Restart,
            "new" => Command::NewGame,
            "target" if argument.is_empty() => return Err(CommandError::MissingTarget),
            "target" => Command::Target(argument.to_string()),
            "ai" => Command::AiTurn,
            "stats" => Command::Stats,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Reads a y/n answer; anything but yes is a no.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_are_guesses() {
        assert_eq!(
            Command::parse("  Ocean ").unwrap(),
            Some(Command::Guess("Ocean".to_string()))
        );
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_commands() {
        assert_eq!(Command::parse("/giveup").unwrap(), Some(Command::GiveUp));
        assert_eq!(Command::parse("/RESTART").unwrap(), Some(Command::Restart));
        assert_eq!(Command::parse("/new").unwrap(), Some(Command::NewGame));
        assert_eq!(Command::parse("/ai").unwrap(), Some(Command::AiTurn));
        assert_eq!(Command::parse("/quit").unwrap(), Some(Command::Quit));
        assert_eq!(
            Command::parse("/target  daily-291 ").unwrap(),
            Some(Command::Target("daily-291".to_string()))
        );
    }

    #[test]
    fn test_bad_commands() {
        assert_eq!(Command::parse("/target"), Err(CommandError::MissingTarget));
        assert_eq!(
            Command::parse("/dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn test_confirmation_answers() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES\n"));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }
}
