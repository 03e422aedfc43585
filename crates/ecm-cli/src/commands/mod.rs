//! Command implementations.

pub mod config;
pub mod extract;
pub mod prompt;
pub mod validate;

pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::prompt::execute_prompt;
pub use self::validate::execute_validate;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use std::fs;
use std::io::{self, Read};

/// Input text plus the name it came from
pub(crate) struct Input {
    pub text: String,
    pub name: String,
}

/// Read the input selected by `args`.
pub(crate) fn read_input(args: &InputArgs) -> Result<Input> {
    if args.stdin {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(Input {
            text,
            name: "stdin".to_string(),
        });
    }

    let path = args.file.as_ref().ok_or_else(|| {
        CliError::InvalidInput("Must specify either a file or --stdin".to_string())
    })?;
    let text = fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Input { text, name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_read_file_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.md");
        fs::write(&path, "# Audit").unwrap();

        let input = read_input(&InputArgs {
            file: Some(path),
            stdin: false,
        })
        .unwrap();
        assert_eq!(input.text, "# Audit");
        assert_eq!(input.name, "audit.md");
    }

    #[test]
    fn test_no_input_selected() {
        let result = read_input(&InputArgs {
            file: None,
            stdin: false,
        });
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = read_input(&InputArgs {
            file: Some(PathBuf::from("/nonexistent/audit.md")),
            stdin: false,
        });
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
