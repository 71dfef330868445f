//! Console commands for headless runs.
//!
//! A stdin line is parsed into a [`ConsoleCommand`]. Input commands become
//! [`InputSignal`]s for the loop; the rest are handled by the binary.
//!
//! ```text
//! key <name> down|up   press or release a key
//! aim <x> <y>          move the pointer
//! fire                 one shot
//! status               print the status line
//! quit                 exit
//! ```

use anyhow::{bail, Context};

use crate::input::InputSignal;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Input(InputSignal),
    Status,
    Quit,
}

/// Parses one line. Blank lines and `//` comments yield `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<ConsoleCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("//") {
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let cmd = match tokens.as_slice() {
        ["key", key, "down"] => ConsoleCommand::Input(InputSignal::KeyDown(key.to_string())),
        ["key", key, "up"] => ConsoleCommand::Input(InputSignal::KeyUp(key.to_string())),
        ["key", ..] => bail!("Usage: key <name> down|up"),
        ["aim", x, y] => ConsoleCommand::Input(InputSignal::PointerMove {
            x: x.parse().with_context(|| format!("bad x {x:?}"))?,
            y: y.parse().with_context(|| format!("bad y {y:?}"))?,
        }),
        ["aim", ..] => bail!("Usage: aim <x> <y>"),
        ["fire"] => ConsoleCommand::Input(InputSignal::Fire),
        ["status"] => ConsoleCommand::Status,
        ["quit"] | ["exit"] => ConsoleCommand::Quit,
        [other, ..] => bail!("Unknown command: {other}"),
        [] => return Ok(None),
    };
    Ok(Some(cmd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_input_commands() {
        assert_eq!(
            parse_line("key W down").unwrap(),
            Some(ConsoleCommand::Input(InputSignal::KeyDown("W".into())))
        );
        assert_eq!(
            parse_line("  aim 150 100.5 ").unwrap(),
            Some(ConsoleCommand::Input(InputSignal::PointerMove { x: 150.0, y: 100.5 }))
        );
        assert_eq!(
            parse_line("fire").unwrap(),
            Some(ConsoleCommand::Input(InputSignal::Fire))
        );
        assert_eq!(parse_line("exit").unwrap(), Some(ConsoleCommand::Quit));
    }

    #[test]
    fn ignores_blank_and_comments() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("// note").unwrap(), None);
    }

    #[test]
    fn rejects_malformed() {
        assert!(parse_line("aim 1").is_err());
        assert!(parse_line("aim x 2").is_err());
        assert!(parse_line("key w sideways").is_err());
        assert!(parse_line("dance").is_err());
    }
}
