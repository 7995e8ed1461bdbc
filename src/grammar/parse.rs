use super::{Alternative, Grammar};
use crate::errors::{Error, Result};

impl Grammar {
    /// Parses lines of the form `A -> a B | c`. A line starting with `|`
    /// continues the previous left side; blank lines and `#` comments are
    /// skipped. The first left side becomes the start symbol.
    pub fn parse(grammar: &str) -> Result<Self> {
        let mut raw_productions: Vec<(&str, &str)> = Vec::new();

        let mut previous_left: Option<&str> = None;
        for (i, line) in grammar.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = trimmed.split("->").collect();
            if parts.len() > 2 {
                return Err(Error::TooManyArrows(i + 1));
            }
            let (left, rights): (&str, &str) = if parts.len() == 2 {
                let left = parts[0].trim();
                if left.is_empty() {
                    return Err(Error::EmptyLeftSide(i + 1));
                } else if left.split_whitespace().count() != 1 {
                    return Err(Error::LeftSideContainsWhitespace(i + 1));
                }
                (left, parts[1].trim())
            } else if let (Some(left), Some(rest)) = (previous_left, trimmed.strip_prefix('|')) {
                (left, rest.trim())
            } else {
                return Err(Error::MissingLeftSide(i + 1));
            };

            previous_left = Some(left);
            raw_productions.push((left, rights));
        }

        let Some(&(start, _)) = raw_productions.first() else {
            return Err(Error::EmptyGrammar);
        };

        let mut g = Self::new(start);
        for (left, rights) in raw_productions {
            g.add_alternatives(left, rights.split('|').map(Alternative::parse));
        }

        Ok(g)
    }
}
