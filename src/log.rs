use std::fmt::{Debug, Display, Formatter};

/// Read side of a log: counters and stored messages
pub trait LogStatus: Debug {
    fn num_notes(&self) -> usize;
    fn num_warnings(&self) -> usize;
    fn num_errors(&self) -> usize;

    fn has_no_errors(&self) -> bool {
        self.num_errors() == 0
    }

    fn has_no_warnings(&self) -> bool {
        self.num_warnings() == 0
    }

    fn messages(&self) -> &[LogMsg] {
        &[]
    }

    fn messages_str(&self) -> String {
        self.messages()
            .iter()
            .map(|m| format!("- {}", m))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Write side of a log
pub trait Logger: Debug {
    fn add_note<T: Into<String>>(&mut self, msg: T);
    fn add_warning<T: Into<String>>(&mut self, msg: T);
    fn add_error<T: Into<String>>(&mut self, msg: T);
}

#[derive(Clone, Debug, PartialEq)]
pub enum LogMsg {
    Note(String),
    Warning(String),
    Error(String),
}

impl Display for LogMsg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogMsg::Note(s) => write!(f, "Note   : {}", s),
            LogMsg::Warning(s) => write!(f, "Warning: {}", s),
            LogMsg::Error(s) => write!(f, "ERROR  : {}", s),
        }
    }
}

/// Log that keeps every message in memory
#[derive(Clone, Debug, Default)]
pub struct BufLog {
    messages: Vec<LogMsg>,
    num_notes: usize,
    num_warnings: usize,
    num_errors: usize,
}

impl BufLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn notes(&self) -> impl Iterator<Item = &String> {
        self.messages.iter().filter_map(|m| match m {
            LogMsg::Note(s) => Some(s),
            _ => None,
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &String> {
        self.messages.iter().filter_map(|m| match m {
            LogMsg::Warning(s) => Some(s),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &String> {
        self.messages.iter().filter_map(|m| match m {
            LogMsg::Error(s) => Some(s),
            _ => None,
        })
    }
}

impl LogStatus for BufLog {
    fn num_notes(&self) -> usize {
        self.num_notes
    }

    fn num_warnings(&self) -> usize {
        self.num_warnings
    }

    fn num_errors(&self) -> usize {
        self.num_errors
    }

    fn messages(&self) -> &[LogMsg] {
        &self.messages
    }
}

impl Logger for BufLog {
    fn add_note<T: Into<String>>(&mut self, msg: T) {
        self.messages.push(LogMsg::Note(msg.into()));
        self.num_notes += 1;
    }

    fn add_warning<T: Into<String>>(&mut self, msg: T) {
        self.messages.push(LogMsg::Warning(msg.into()));
        self.num_warnings += 1;
    }

    fn add_error<T: Into<String>>(&mut self, msg: T) {
        self.messages.push(LogMsg::Error(msg.into()));
        self.num_errors += 1;
    }
}

impl Display for BufLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages_str())
    }
}

/// Log that writes to stderr and only counts
#[derive(Clone, Debug, Default)]
pub struct PrintLog {
    num_notes: usize,
    num_warnings: usize,
    num_errors: usize,
}

impl PrintLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays a stored log onto stderr
    pub fn replay(&mut self, log: &BufLog) {
        for msg in log.messages() {
            match msg {
                LogMsg::Note(s) => self.add_note(s.as_str()),
                LogMsg::Warning(s) => self.add_warning(s.as_str()),
                LogMsg::Error(s) => self.add_error(s.as_str()),
            }
        }
    }
}

impl LogStatus for PrintLog {
    fn num_notes(&self) -> usize {
        self.num_notes
    }

    fn num_warnings(&self) -> usize {
        self.num_warnings
    }

    fn num_errors(&self) -> usize {
        self.num_errors
    }
}

impl Logger for PrintLog {
    fn add_note<T: Into<String>>(&mut self, msg: T) {
        eprintln!("NOTE:    {}", msg.into());
        self.num_notes += 1;
    }

    fn add_warning<T: Into<String>>(&mut self, msg: T) {
        eprintln!("WARNING: {}", msg.into());
        self.num_warnings += 1;
    }

    fn add_error<T: Into<String>>(&mut self, msg: T) {
        eprintln!("ERROR:   {}", msg.into());
        self.num_errors += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buf_log_counts() {
        let mut log = BufLog::new();
        assert!(log.is_empty());
        log.add_note("a");
        log.add_warning(String::from("b"));
        log.add_warning("c");
        assert_eq!(log.num_notes(), 1);
        assert_eq!(log.num_warnings(), 2);
        assert!(log.has_no_errors());
        assert_eq!(log.warnings().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(log.to_string(), "- Note   : a\n- Warning: b\n- Warning: c");
    }
}
