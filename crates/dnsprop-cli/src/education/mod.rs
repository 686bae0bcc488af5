//! Educational features: explanations of what each command sends and why.

use colored::Colorize;

/// Command explanation builder.
pub struct Explain {
    title: String,
    description: String,
    query: Option<String>,
    traffic: Option<String>,
    what_happens: Vec<String>,
    learn_more: Option<String>,
}

impl Explain {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: String::new(),
            query: None,
            traffic: None,
            what_happens: Vec::new(),
            learn_more: None,
        }
    }

    fn description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    fn query(mut self, question: &str) -> Self {
        self.query = Some(question.to_string());
        self
    }

    fn traffic(mut self, cost: &str) -> Self {
        self.traffic = Some(cost.to_string());
        self
    }

    fn step(mut self, step: &str) -> Self {
        self.what_happens.push(step.to_string());
        self
    }

    fn rfc(mut self, number: u32) -> Self {
        self.learn_more = Some(format!("https://www.rfc-editor.org/rfc/rfc{number}"));
        self
    }

    /// Print the explanation to stdout.
    pub fn print(&self) {
        println!();
        println!("{}", format!("=== {} ===", self.title).bold().cyan());
        println!("{}", self.description);
        println!();

        if !self.what_happens.is_empty() {
            println!("{}", "How it works:".bold());
            for (i, step) in self.what_happens.iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            println!();
        }

        if let Some(query) = &self.query {
            println!("{} {}", "Question:".bold(), query.dimmed());
        }

        if let Some(traffic) = &self.traffic {
            println!("{} {}", "Traffic:".bold(), traffic);
        }

        if let Some(url) = &self.learn_more {
            println!();
            println!("{} {}", "Learn more:".bold(), url.cyan().underline());
        }

        println!();
        println!("{}", "=== Results ===".bold().cyan());
        println!();
    }

    // ========================================================================
    // Factory methods for each command
    // ========================================================================

    pub fn resolve(name: &str, record_type: &str, servers: usize) -> Self {
        Self::new("Propagation Check")
            .description(&format!(
                "Asks {servers} recursive resolvers for the {record_type} records of {name} at the same time."
            ))
            .query(&format!("{name}. IN {record_type}"))
            .traffic(&format!("{servers} UDP queries, plus TCP for truncated answers"))
            .step("Each resolver answers from its own cache, so answers differ until old TTLs expire")
            .step("At most 20 queries are in flight at once")
            .step("Answers are cached locally for their TTL (capped by cache_ttl)")
            .step("Statuses: ok, noanswer, nxdomain, servfail, timeout, error")
            .rfc(1034)
    }

    pub fn watch(name: &str, record_type: &str, expected: &str) -> Self {
        Self::new("Propagation Watch")
            .description(&format!(
                "Repeats the {record_type} lookup for {name} until every responding resolver returns {expected}."
            ))
            .query(&format!("{name}. IN {record_type}"))
            .traffic("Only resolvers whose cached answer has expired are asked again")
            .step("Each round reports how many resolvers already return the new value")
            .step("Resolvers that time out or fail do not block completion")
            .step("Stops when propagated, or after --max-rounds")
            .rfc(2308)
    }

    pub fn ready() -> Self {
        Self::new("Readiness Probe")
            .description("Checks that at least one configured resolver can be reached.")
            .query("example.com. IN A")
            .traffic("Up to 3 UDP queries, finished within 500ms")
            .step("Any DNS response counts, even NXDOMAIN or SERVFAIL")
            .step("Only timeouts and local errors count as failures")
    }

    pub fn servers() -> Self {
        Self::new("Resolver Directory")
            .description("Lists the well-known public resolvers with an approximate location.")
            .traffic("None - built-in table")
            .step("Servers not in this table are reported with region 'unknown' at 0,0")
    }

    pub fn config() -> Self {
        Self::new("Configuration")
            .description("Shows or writes the settings used when flags and environment variables are absent.")
            .traffic("None - local file only")
            .step("Precedence: command-line flag, then environment variable, then config file, then default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_mentions_question() {
        let explain = Explain::resolve("example.com", "MX", 30);
        assert_eq!(explain.query.as_deref(), Some("example.com. IN MX"));
        assert!(explain.description.contains("30 recursive resolvers"));
        assert_eq!(
            explain.learn_more.as_deref(),
            Some("https://www.rfc-editor.org/rfc/rfc1034")
        );
    }

    #[test]
    fn local_commands_send_nothing() {
        for explain in [Explain::servers(), Explain::config()] {
            assert!(explain.traffic.unwrap().starts_with("None"));
        }
    }
}
