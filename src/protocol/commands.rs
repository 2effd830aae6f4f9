//! Module `commands`
//!
//! Parses write-hook command lines sent by the storage application.

use crate::storage::FileId;

/// A hook command parsed from one input line.
#[derive(Debug, PartialEq)]
pub enum HookCommand {
    /// Pre-write quota check: actor, candidate file (if it exists yet) and
    /// the byte sizes of an explicit multi-file upload.
    Check {
        actor: String,
        file_id: Option<FileId>,
        batch: Option<Vec<u64>>,
    },
    /// Post-write ownership fix
    Written(FileId),
    /// Run a sweep now
    Sweep,
    /// Report the fix list entry of a file
    Status(FileId),
    Quit,
    /// Unknown command or bad arguments
    Unknown(String),
}

/// Parses a raw line into a `HookCommand`.
///
/// Known commands with malformed arguments become `Unknown` carrying the reason.
pub fn parse_command(raw: &str) -> HookCommand {
    let trimmed = raw.trim();
    let mut parts = trimmed.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let args: Vec<&str> = parts.collect();

    match (cmd.as_str(), args.as_slice()) {
        ("CHECK", [actor, file_id, sizes @ ..]) => parse_check(actor, file_id, sizes),
        ("WRITTEN", [id]) => parse_file_id(id).map_or_else(HookCommand::Unknown, HookCommand::Written),
        ("STATUS", [id]) => parse_file_id(id).map_or_else(HookCommand::Unknown, HookCommand::Status),
        ("SWEEP", []) => HookCommand::Sweep,
        ("QUIT", []) => HookCommand::Quit,
        ("CHECK" | "WRITTEN" | "STATUS" | "SWEEP" | "QUIT", _) => {
            HookCommand::Unknown(format!("wrong number of arguments for {cmd}"))
        }
        _ => HookCommand::Unknown("unknown command".to_string()),
    }
}

fn parse_check(actor: &str, file_id: &str, sizes: &[&str]) -> HookCommand {
    let file_id = if file_id == "-" {
        None
    } else {
        match parse_file_id(file_id) {
            Ok(id) => Some(id),
            Err(reason) => return HookCommand::Unknown(reason),
        }
    };

    let batch = if sizes.is_empty() {
        None
    } else {
        match sizes.iter().map(|s| s.parse::<u64>()).collect::<Result<Vec<_>, _>>() {
            Ok(batch) if batch_total(&batch).is_some() => Some(batch),
            _ => return HookCommand::Unknown("invalid upload size".to_string()),
        }
    };

    HookCommand::Check {
        actor: actor.to_string(),
        file_id,
        batch,
    }
}

/// Sum of the batch in bytes, `None` when it does not fit in a u64
fn batch_total(batch: &[u64]) -> Option<u64> {
    batch.iter().try_fold(0u64, |acc, &size| acc.checked_add(size))
}

fn parse_file_id(raw: &str) -> Result<FileId, String> {
    raw.parse::<FileId>()
        .map_err(|_| format!("invalid file id: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_command("SWEEP"), HookCommand::Sweep);
        assert_eq!(parse_command("quit\r\n"), HookCommand::Quit);
        assert_eq!(parse_command("WRITTEN 77"), HookCommand::Written(FileId(77)));
        assert_eq!(parse_command("status 12"), HookCommand::Status(FileId(12)));
    }

    #[test]
    fn test_parse_check_with_batch() {
        assert_eq!(
            parse_command("CHECK alice - 102400 204800 307200"),
            HookCommand::Check {
                actor: "alice".to_string(),
                file_id: None,
                batch: Some(vec![102_400, 204_800, 307_200]),
            }
        );
    }

    #[test]
    fn test_parse_check_existing_file() {
        assert_eq!(
            parse_command("CHECK bob 9"),
            HookCommand::Check {
                actor: "bob".to_string(),
                file_id: Some(FileId(9)),
                batch: None,
            }
        );
    }

    #[test]
    fn test_parse_invalid_commands() {
        assert!(matches!(parse_command("WRITTEN abc"), HookCommand::Unknown(_)));
        assert!(matches!(parse_command("WRITTEN"), HookCommand::Unknown(_)));
        assert!(matches!(parse_command("CHECK alice - 12x"), HookCommand::Unknown(_)));
        assert!(matches!(parse_command("CHECK alice"), HookCommand::Unknown(_)));
    }

    #[test]
    fn test_parse_check_rejects_overflowing_batch() {
        assert_eq!(
            parse_command("CHECK alice - 18446744073709551615 2048"),
            HookCommand::Unknown("invalid upload size".to_string())
        );
        assert!(matches!(
            parse_command("CHECK alice - 18446744073709551615"),
            HookCommand::Check { .. }
        ));
        assert_eq!(
            parse_command("RETR file"),
            HookCommand::Unknown("unknown command".to_string())
        );
        assert_eq!(
            parse_command(""),
            HookCommand::Unknown("unknown command".to_string())
        );
    }
}
