//! Operator menu

use std::io::{self, BufRead, Write};

use crate::{Error, Result};

/// Which pipelines to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Walk the image repository tree
    Mirror,
    /// Download the catalog into category folders
    Catalog,
    /// Mirror first, then catalog
    Both,
}

impl Choice {
    pub const ALL: [Self; 3] = [Self::Mirror, Self::Catalog, Self::Both];

    #[must_use]
    pub const fn runs_mirror(self) -> bool {
        matches!(self, Self::Mirror | Self::Both)
    }

    #[must_use]
    pub const fn runs_catalog(self) -> bool {
        matches!(self, Self::Catalog | Self::Both)
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Mirror => "Direct from GitHub repository (explores all folders)",
            Self::Catalog => "Using CSGO API (organized by collections)",
            Self::Both => "Download both ways",
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mirror => write!(f, "1"),
            Self::Catalog => write!(f, "2"),
            Self::Both => write!(f, "3"),
        }
    }
}

impl std::str::FromStr for Choice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(Self::Mirror),
            "2" => Ok(Self::Catalog),
            "3" => Ok(Self::Both),
            other => Err(Error::InvalidChoice(other.to_string())),
        }
    }
}

/// Print the menu to `out` and read one answer from `input`
pub fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Choice> {
    writeln!(out, "CS2 Stickers Downloader")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "Choose download method:")?;
    for choice in Choice::ALL {
        writeln!(out, "{choice}. {}", choice.description())?;
    }

    write!(out, "\nEnter your choice (1-3): ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    line.parse()
}

/// [`prompt`] on the process console
pub fn prompt_stdin() -> Result<Choice> {
    prompt(&mut io::stdin().lock(), &mut io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_parse() {
        assert_eq!("1".parse::<Choice>().unwrap(), Choice::Mirror);
        assert_eq!(" 2\n".parse::<Choice>().unwrap(), Choice::Catalog);
        assert_eq!("3".parse::<Choice>().unwrap(), Choice::Both);
    }

    #[test]
    fn test_choice_rejects_other_input() {
        for input in ["", "0", "4", "one", "1 2"] {
            assert!(matches!(
                input.parse::<Choice>(),
                Err(Error::InvalidChoice(_))
            ));
        }
    }

    #[test]
    fn test_choice_pipelines() {
        assert!(Choice::Mirror.runs_mirror() && !Choice::Mirror.runs_catalog());
        assert!(!Choice::Catalog.runs_mirror() && Choice::Catalog.runs_catalog());
        assert!(Choice::Both.runs_mirror() && Choice::Both.runs_catalog());
    }

    #[test]
    fn test_prompt_reads_one_line() {
        let mut input = io::Cursor::new(b"2\nignored\n".to_vec());
        let mut out = Vec::new();

        let choice = prompt(&mut input, &mut out).unwrap();

        assert_eq!(choice, Choice::Catalog);
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("3. Download both ways"));
        assert!(shown.ends_with("Enter your choice (1-3): "));
    }
}
