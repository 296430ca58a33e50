mod cli;
mod tui;

pub(crate) use cli::{as_cli, Cli};
pub(crate) use tui::as_tui;

/// Expand a leading `~/` to `$HOME`.
pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shellexpand_plain_path_unchanged() {
        assert_eq!(shellexpand("/tmp/x.csv"), "/tmp/x.csv");
        assert_eq!(shellexpand("relative/x.csv"), "relative/x.csv");
    }

    #[test]
    fn test_shellexpand_home() {
        let expanded = shellexpand("~/fleet.csv");
        assert!(expanded.ends_with("/fleet.csv"));
        assert!(!expanded.starts_with('~'));
    }
}
