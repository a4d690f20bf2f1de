//! Rendering of search results as a Slack message

use crate::config::ResponseType;
use crate::results::{Aggregate, SearchResult};
use crate::summary::Summary;
use serde::{Deserialize, Serialize};

/// Longest snippet shown under a result, in characters
pub const MAX_SNIPPET_CHARS: usize = 200;

pub const NO_QUERY_MESSAGE: &str = "Please provide a search query.";
pub const NO_SERVICES_MESSAGE: &str = "No services configured for search.";
pub const EMPTY_SOURCE_LINE: &str = "    • _No results found._";

/// A slash command reply, either returned inline or posted to `response_url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub response_type: ResponseType,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_original: Option<bool>,
}

impl SlackMessage {
    pub fn new(response_type: ResponseType, text: impl Into<String>) -> Self {
        Self {
            response_type,
            text: text.into(),
            replace_original: None,
        }
    }

    /// A message only the invoking user sees
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self::new(ResponseType::Ephemeral, text)
    }

    pub fn replacing_original(mut self) -> Self {
        self.replace_original = Some(true);
        self
    }
}

/// The message sent when every queried backend came back empty
pub fn no_results_message(query: &str) -> String {
    format!("No results found for `{}`.", escape(query))
}

/// Render grouped results and the topic line as Slack mrkdwn
pub fn render(aggregate: &Aggregate, summary: &Summary) -> String {
    if aggregate.no_sources() {
        return NO_SERVICES_MESSAGE.to_string();
    }
    if !aggregate.has_results() {
        return no_results_message(aggregate.query());
    }

    let mut lines = vec![format!("*Results for:* `{}`", escape(aggregate.query()))];

    for source in aggregate.sources() {
        lines.push(String::new());
        lines.push(format!("*{}*", escape(&source.display_name)));

        if source.is_empty() {
            lines.push(EMPTY_SOURCE_LINE.to_string());
            continue;
        }

        for result in &source.results {
            lines.extend(render_result(result));
        }
    }

    if !summary.is_empty() {
        lines.push(String::new());
        lines.push(format!("*Topics:* {}", escape(&summary.topics.join(", "))));
    }

    lines.join("\n")
}

fn render_result(result: &SearchResult) -> Vec<String> {
    let label = escape(&result.title).replace('|', "¦");
    let mut lines = vec![if result.url.is_empty() {
        format!("    • {}", label)
    } else {
        format!("    • <{}|{}>", link_target(&result.url), label)
    }];

    if let Some(snippet) = &result.snippet {
        lines.push(format!("      _{}_", escape(&truncate(snippet, MAX_SNIPPET_CHARS))));
    }

    lines
}

/// Escape the three characters Slack treats as control sequences
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn link_target(url: &str) -> String {
    url.replace('<', "%3C")
        .replace('>', "%3E")
        .replace('|', "%7C")
}

/// Collapse whitespace and cut to `max` characters, ending with an ellipsis
fn truncate(text: &str, max: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max {
        return text;
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}
