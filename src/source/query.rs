/// Critical (1), Error (2) and Warning (3).
pub const SEVERITY_FILTER: &str = "Level<4";

/// Number of events requested when no checkpoint exists.
pub const INITIAL_EVENT_COUNT: u32 = 10;

/// Which slice of the log a run asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryWindow {
    /// Events created after a UTC timestamp.
    Since(String),
    /// The newest N events.
    LastN(u32),
}

/// A `wevtutil qe` invocation against one log, newest events first, as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub logger: String,
    pub window: QueryWindow,
}

impl LogQuery {
    pub fn new(logger: impl Into<String>, window: QueryWindow) -> Self {
        Self {
            logger: logger.into(),
            window,
        }
    }

    pub fn since(logger: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(logger, QueryWindow::Since(timestamp.into()))
    }

    pub fn last_n(logger: impl Into<String>, count: u32) -> Self {
        Self::new(logger, QueryWindow::LastN(count))
    }

    /// XPath event filter passed via `/q:`.
    pub fn xpath(&self) -> String {
        match &self.window {
            QueryWindow::Since(timestamp) => format!(
                "*[System [({}) and TimeCreated[@SystemTime>'{}']]]",
                SEVERITY_FILTER, timestamp
            ),
            QueryWindow::LastN(_) => format!("*[System [({})]]", SEVERITY_FILTER),
        }
    }

    /// Arguments following the tool name.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "qe".to_string(),
            self.logger.clone(),
            format!("/q:{}", self.xpath()),
            "/f:text".to_string(),
            "/rd:true".to_string(),
        ];
        if let QueryWindow::LastN(count) = self.window {
            args.push(format!("/c:{}", count));
        }
        args
    }

    /// Shell-style rendering, for logs and dry runs.
    pub fn command_line(&self, tool: &str) -> String {
        let mut line = format!(
            "{} qe \"{}\" \"/q:{}\" /f:text /rd:true",
            tool,
            self.logger,
            self.xpath()
        );
        if let QueryWindow::LastN(count) = self.window {
            line.push_str(&format!(" /c:{}", count));
        }
        line
    }
}
