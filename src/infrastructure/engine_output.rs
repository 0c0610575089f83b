// Decoders for the call-graph engine's JSON output.
// The engine answers callers/callees with one entry per symbol matching the
// queried name; we keep the entry with the most calls in that direction.

use crate::domain::symbol::{CalleeResult, CallerResult, Symbol, TraceResult};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    FindSymbol,
    Callers,
    Callees,
    Trace,
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QueryKind::FindSymbol => "find",
            QueryKind::Callers => "callers",
            QueryKind::Callees => "callees",
            QueryKind::Trace => "trace",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum EngineOutputError {
    #[error("Malformed {query} output from engine: {source}")]
    Json {
        query: QueryKind,
        #[source]
        source: serde_json::Error,
    },
}

fn decode<T: DeserializeOwned>(query: QueryKind, json: &str) -> Result<T, EngineOutputError> {
    serde_json::from_str(json).map_err(|source| EngineOutputError::Json { query, source })
}

/// First entry with the largest `count`.
fn busiest<T>(entries: Vec<T>, count: impl Fn(&T) -> usize) -> Option<T> {
    let mut best: Option<(usize, T)> = None;
    for entry in entries {
        let n = count(&entry);
        if best.as_ref().map_or(true, |(m, _)| n > *m) {
            best = Some((n, entry));
        }
    }
    best.map(|(_, entry)| entry)
}

pub fn parse_find(json: &str) -> Result<Vec<Symbol>, EngineOutputError> {
    decode(QueryKind::FindSymbol, json)
}

pub fn parse_callers(json: &str) -> Result<Option<CallerResult>, EngineOutputError> {
    let entries: Vec<CallerResult> = decode(QueryKind::Callers, json)?;
    Ok(busiest(entries, |r| r.callers.len()))
}

pub fn parse_callees(json: &str) -> Result<Option<CalleeResult>, EngineOutputError> {
    let entries: Vec<CalleeResult> = decode(QueryKind::Callees, json)?;
    Ok(busiest(entries, |r| r.callees.len()))
}

pub fn parse_trace(json: &str) -> Result<TraceResult, EngineOutputError> {
    decode(QueryKind::Trace, json)
}
