//! Line commands for the terminal front end.

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain text: an edit of the search bar
    Edit(String),
    /// `:go <text>`
    Submit(String),
    /// `:pick <n>`, 1-based
    Pick(usize),
    /// `:here <lat> <lon>`
    Here { latitude: f64, longitude: f64 },
    /// `:nowhere [reason]`
    NoLocation(String),
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command :{0} (try :help)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Edit(line.to_string()));
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        match name {
            "go" => Ok(Command::Submit(args.to_string())),
            "pick" => args
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(Command::Pick)
                .ok_or(CommandError::Usage(":pick <n>")),
            "here" => {
                let mut parts = args.split_whitespace().map(str::parse::<f64>);
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(Ok(latitude)), Some(Ok(longitude)), None) => Ok(Command::Here {
                        latitude,
                        longitude,
                    }),
                    _ => Err(CommandError::Usage(":here <lat> <lon>")),
                }
            }
            "nowhere" => Ok(Command::NoLocation(if args.is_empty() {
                "location unavailable".to_string()
            } else {
                args.to_string()
            })),
            "help" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

pub const HELP: &str = "\
Type to search. Commands:
  :go <text>         fetch the forecast for <text>
  :pick <n>          fetch the forecast for suggestion <n>
  :here <lat> <lon>  fetch the forecast for coordinates
  :nowhere [reason]  report that the device location is unavailable
  :help              show this list
  :quit              save the last search and exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_an_edit() {
        assert_eq!(Command::parse("Jersey Ci\n"), Ok(Command::Edit("Jersey Ci".into())));
        assert_eq!(Command::parse(""), Ok(Command::Edit(String::new())));
    }

    #[test]
    fn go_keeps_inner_spaces() {
        assert_eq!(
            Command::parse(":go Jersey City,NJ,US"),
            Ok(Command::Submit("Jersey City,NJ,US".into()))
        );
    }

    #[test]
    fn pick_is_one_based() {
        assert_eq!(Command::parse(":pick 2"), Ok(Command::Pick(2)));
        assert!(Command::parse(":pick 0").is_err());
        assert!(Command::parse(":pick x").is_err());
    }

    #[test]
    fn here_takes_two_numbers() {
        assert_eq!(
            Command::parse(":here 40.7225 -74.0422"),
            Ok(Command::Here {
                latitude: 40.7225,
                longitude: -74.0422
            })
        );
        assert!(Command::parse(":here 40.7").is_err());
        assert!(Command::parse(":here 1 2 3").is_err());
    }

    #[test]
    fn help_lists_every_command() {
        for name in [":go", ":pick", ":here", ":nowhere", ":help", ":quit"] {
            assert!(HELP.contains(name), "{} missing from help", name);
        }
        assert_eq!(Command::parse(":help"), Ok(Command::Help));
    }

    #[test]
    fn unknown_command_is_error() {
        assert_eq!(
            Command::parse(":weather"),
            Err(CommandError::Unknown("weather".into()))
        );
        assert_eq!(Command::parse(":q"), Ok(Command::Quit));
    }
}
