//! HTTP request handlers

use super::state::AppState;
use crate::query::ParsedQuery;
use crate::search::SearchQuery;
use crate::slack::message::{self, NO_QUERY_MESSAGE};
use crate::slack::{SlackMessage, SlashCommand, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Slash command webhook handler
pub async fn slash_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);
    let signature = header_str(&headers, SIGNATURE_HEADER);

    if let Err(e) = state.verifier.verify(timestamp, signature, &body) {
        warn!("Rejected slash command: {}", e);
        return (StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let command = match SlashCommand::from_form(&body) {
        Ok(command) => command,
        Err(e) => {
            warn!("Malformed slash command payload: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let span = info_span!(
        "slash_command",
        request_id = %Uuid::new_v4(),
        command = %command.command,
        user_id = %command.user_id,
        channel_id = %command.channel_id,
    );

    let reply = respond(state, command).instrument(span).await;
    Json(reply).into_response()
}

/// Decide the reply to a verified slash command
async fn respond(state: AppState, command: SlashCommand) -> SlackMessage {
    if let Err(e) = command.ensure_command(state.settings.slack.command.as_deref()) {
        warn!("{}", e);
        return SlackMessage::ephemeral(format!(
            "Unsupported command `{}`.",
            message::escape(&command.command)
        ));
    }

    let parsed = ParsedQuery::parse(&command.text);
    if parsed.is_empty() {
        return SlackMessage::ephemeral(NO_QUERY_MESSAGE);
    }

    info!(
        "Search requested: '{}' (lang: {:?}, engines: {:?})",
        parsed.query, parsed.lang, parsed.engines
    );

    match command.response_url {
        Some(response_url) if state.settings.slack.deferred_response => {
            let ack = SlackMessage::ephemeral(format!(
                "Searching for `{}`…",
                message::escape(&parsed.query)
            ));
            let span = tracing::Span::current();
            tokio::spawn(
                async move {
                    let reply = run_search(&state, parsed).await.replacing_original();
                    deliver(&state, &response_url, &reply).await;
                }
                .instrument(span),
            );
            ack
        }
        _ => run_search(&state, parsed).await,
    }
}

/// Search, summarize and render
async fn run_search(state: &AppState, parsed: ParsedQuery) -> SlackMessage {
    let query =
        SearchQuery::from_parsed(parsed).with_max_results(state.settings.outgoing.max_results);

    let aggregate = state.search.execute(&query).await;
    let summary = state.summarizer.summarize(&query.query, aggregate.results());

    info!(
        "Search '{}' finished: {} results from {} sources",
        query.query,
        aggregate.result_count(),
        aggregate.sources().len()
    );

    SlackMessage::new(
        state.settings.slack.response_type,
        message::render(&aggregate, &summary),
    )
}

/// Post a deferred reply to Slack's `response_url`
async fn deliver(state: &AppState, response_url: &str, reply: &SlackMessage) {
    let body = match serde_json::to_value(reply) {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to serialize reply: {}", e);
            return;
        }
    };

    match state.client.post_json(response_url, body).await {
        Ok(response) if response.is_success() => info!("Delivered deferred reply"),
        Ok(response) => warn!("response_url rejected reply with HTTP {}", response.status),
        Err(e) => warn!("Failed to deliver reply: {}", e),
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "backends": state.backend_names(),
    }))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
