//! Identifiers for upload sessions, experiments, and MapQTL analysis sessions.
//!
//! Session and experiment identifiers double as directory names under the
//! upload folder, so both are restricted to a single safe path component.

use chrono::{Local, NaiveDateTime};
use uuid::Uuid;

use crate::newtype_string::define_identifier;
use crate::params::ExperimentParams;

/// Length of the `%Y%m%d%H%M%S` prefix shared by session and experiment ids.
const TIMESTAMP_LEN: usize = 14;

/// Number of random characters appended to a session id.
const SESSION_SALT_LEN: usize = 15;

define_identifier! {
    /// Upload session identifier: a timestamp followed by a random salt.
    pub struct SessionId: "session", is_path_component;
}

define_identifier! {
    /// Experiment identifier: a timestamp followed by the experiment parameters.
    pub struct ExperimentId: "experiment", is_experiment_name;
}

define_identifier! {
    /// Label of one MapQTL analysis session (statistical run) inside an archive.
    pub struct AnalysisSession: "analysis session", is_session_label;
}

/// Returns `true` if `value` is a single, non-hidden path component made of
/// ASCII alphanumerics, `_`, `-` and `.`.
pub fn is_path_component(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('.')
        && !value.contains("..")
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn is_experiment_name(value: &str) -> bool {
    is_path_component(value)
        && value.len() >= TIMESTAMP_LEN
        && value.as_bytes()[..TIMESTAMP_LEN]
            .iter()
            .all(u8::is_ascii_digit)
}

fn is_session_label(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '\\'))
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    value
        .get(..TIMESTAMP_LEN)
        .and_then(|ts| NaiveDateTime::parse_from_str(ts, "%Y%m%d%H%M%S").ok())
}

/// Escape an analysis-session label into `[A-Za-z0-9-]`.
///
/// Every byte outside `[A-Za-z0-9]` becomes `-XX` (uppercase hex), so two
/// distinct labels never share an escaped form.
fn escape_label(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("-{byte:02X}"));
        }
    }
    out
}

impl SessionId {
    /// Generate a fresh session id from the current local time and a random salt.
    pub fn generate() -> Self {
        let stamp = Local::now().format("%Y%m%d%H%M%S%6f");
        let salt = Uuid::new_v4().simple().to_string().to_uppercase();
        Self(format!("{stamp}{}", &salt[..SESSION_SALT_LEN]))
    }

    /// Creation time encoded in the id, if the id follows the generated format.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.0)
    }
}

impl ExperimentId {
    /// Generate an experiment id for `params` stamped with the current local time.
    pub fn generate(params: &ExperimentParams) -> Self {
        Self::for_params(params, Local::now().naive_local())
    }

    /// Build the experiment id for `params` run at `at`.
    ///
    /// The threshold uses `Debug` formatting, which round-trips and renders
    /// `3.0` as `3.0`, not `3`. Distinct parameters run at the same second get
    /// distinct ids.
    pub fn for_params(params: &ExperimentParams, at: NaiveDateTime) -> Self {
        Self(format!(
            "{}_s{}_lod{:?}",
            at.format("%Y%m%d%H%M%S"),
            escape_label(params.mapqtl_session.as_str()),
            params.lod_threshold,
        ))
    }

    /// The id with a numeric suffix, for when the plain id is already taken.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }

    /// Date and time the experiment was run, decoded from the id.
    pub fn run_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.0)
    }
}

#[cfg(test)]
#[path = "ids_test.rs"]
mod tests;
