//! `$`-prefixed GET parameter replacement inside command templates.
//!
//! Replacement is plain substring replacement on the template text. It knows
//! nothing about shell quoting; the configured pattern is the only thing
//! standing between a caller and the shell.

use axum::extract::Query;
use axum::http::Uri;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::error::SubstitutionError;

pub const PLACEHOLDER_PREFIX: char = '$';

#[derive(Debug, Clone)]
pub struct SubstitutionConfig {
    pub enabled: bool,
    /// Anchored, a value must match as a whole.
    pub pattern: Regex,
    /// Skip offending parameters instead of failing the request.
    pub continue_on_error: bool,
}

/// Decoded query string, every value of a repeated key kept in arrival order.
/// Keys iterate sorted so the same query always resolves the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    pub fn from_uri(uri: &Uri) -> Result<Self, SubstitutionError> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map_err(|rejection| SubstitutionError::Malformed(rejection.body_text()))?;
        Ok(pairs.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = BTreeMap::<String, Vec<String>>::new();
        for (name, value) in iter {
            params.entry(name.into()).or_default().push(value.into());
        }
        Self(params)
    }
}

fn check<'a>(
    name: &str,
    values: &'a [String],
    pattern: &Regex,
) -> Result<&'a str, SubstitutionError> {
    let [value] = values else {
        return Err(SubstitutionError::Arity {
            name: name.to_string(),
            count: values.len(),
        });
    };
    if !name.starts_with(PLACEHOLDER_PREFIX) {
        return Err(SubstitutionError::Prefix { name: name.to_string() });
    }
    if !pattern.is_match(value) {
        return Err(SubstitutionError::Pattern { name: name.to_string() });
    }
    Ok(value.as_str())
}

/// Resolve `template` against `params`.
///
/// Returns the template untouched when substitution is off or there are no
/// parameters. With `continue_on_error` a rejected parameter is skipped and
/// its placeholder stays in the command as-is.
pub fn substitute(
    template: &str,
    params: &QueryParams,
    config: &SubstitutionConfig,
) -> Result<String, SubstitutionError> {
    let mut command = template.to_string();
    if !config.enabled || params.is_empty() {
        return Ok(command);
    }

    info!(params = ?params.0, "replacing params");
    for (name, values) in params.iter() {
        match check(name, values, &config.pattern) {
            Ok(value) => command = command.replace(name, value),
            Err(e) if config.continue_on_error => {
                warn!(param = name, values = ?values, "get param error, skipping: {e}");
            }
            Err(e) => {
                warn!(param = name, values = ?values, "get param error: {e}");
                return Err(e);
            }
        }
    }
    Ok(command)
}
