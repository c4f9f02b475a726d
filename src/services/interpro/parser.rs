//! Turns InterProScan 5 JSON results into [`Feature`]s.
//!
//! Upstream payloads are irregular: `entry` is only present for signatures
//! integrated into InterPro, `goXRefs` may sit on the signature, the entry,
//! both or neither, and names and descriptions are frequently null or just
//! repeat the accession. Every such key is an explicit `Option` below.

use serde::Deserialize;

use crate::core::feature::{Feature, GoTerm, Location};
use crate::services::RawResult;
use crate::services::error::MalformedResult;

#[derive(Debug, Deserialize)]
struct ScanResponse {
    results: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    signature: Signature,
    #[serde(default)]
    locations: Vec<MatchLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Signature {
    accession: Option<String>,
    name: Option<String>,
    description: Option<String>,
    entry: Option<Entry>,
    go_x_refs: Option<Vec<GoXRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    accession: Option<String>,
    name: Option<String>,
    description: Option<String>,
    go_x_refs: Option<Vec<GoXRef>>,
}

#[derive(Debug, Deserialize)]
struct MatchLocation {
    start: u32,
    end: u32,
}

// `databaseName` is always "GO" for this provider and is not kept.
#[derive(Debug, Deserialize)]
struct GoXRef {
    id: String,
    name: String,
    category: String,
}

impl From<GoXRef> for GoTerm {
    fn from(xref: GoXRef) -> Self {
        GoTerm::new(xref.id, xref.category, xref.name)
    }
}

/// First of `description`, `name` that is present, non-empty and not just the
/// record's own accession.
fn usable_name(
    accession: Option<&str>,
    description: Option<String>,
    name: Option<String>,
) -> Option<String> {
    [description, name]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty() && Some(candidate.as_str()) != accession)
}

fn parse_match(service: &str, m: Match) -> Option<Feature> {
    let locations = m
        .locations
        .into_iter()
        .map(|loc| Location::new(loc.start, loc.end))
        .collect();

    let signature = m.signature;
    let mut go_terms: Vec<GoTerm> = signature
        .go_x_refs
        .into_iter()
        .flatten()
        .map(GoTerm::from)
        .collect();

    let signature_name = usable_name(
        signature.accession.as_deref(),
        signature.description,
        signature.name,
    );

    // Entry-level wording is preferred over the member database's own.
    let name = match signature.entry {
        Some(entry) => {
            go_terms.extend(entry.go_x_refs.into_iter().flatten().map(GoTerm::from));
            usable_name(entry.accession.as_deref(), entry.description, entry.name).or(signature_name)
        }
        None => signature_name,
    }?;

    Some(Feature::new(service, name, locations, go_terms))
}

/// Parses a finished job's payload into features tagged with `service`.
///
/// Matches without a usable name are dropped. A payload with zero matches
/// gives an empty list; one without the `results` wrapper is malformed.
pub fn parse(service: &str, raw: &RawResult) -> Result<Vec<Feature>, MalformedResult> {
    let response = ScanResponse::deserialize(raw)?;
    let first = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| MalformedResult("`results` is empty".to_string()))?;

    Ok(first
        .matches
        .into_iter()
        .filter_map(|m| parse_match(service, m))
        .collect())
}
