//! Response classification
//!
//! Maps the module's heterogeneous response vocabularies onto a small
//! uniform taxonomy. Each operation supplies its own prefix vocabulary;
//! anything a vocabulary does not recognize is discarded and the exchange
//! keeps waiting.

/// What a completed response line means for the operation in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Terminal: the command succeeded.
    Success,
    /// Terminal: the module rejected the command.
    ModuleError,
    /// Terminal: no device answered at the requested address.
    ConnectError,
    /// Terminal: the remote device refused the connection.
    RemoteError,
    /// A value line for a get-parameter exchange; the exchange continues.
    Value(String),
    /// No terminal or value signal; discard the line and keep waiting.
    Continue,
}

/// Prefix vocabulary for one operation.
///
/// Matching is case-sensitive on the line's leading characters. Error
/// prefixes are checked before the value prefix: a parameter whose name
/// happens to begin with `ER` must still see error lines classified as
/// errors.
#[derive(Debug, Clone)]
pub struct ResponseRules {
    success: &'static [&'static str],
    module_error: &'static [&'static str],
    connect_error: &'static [&'static str],
    remote_error: &'static [&'static str],
    value_prefix: Option<String>,
}

impl ResponseRules {
    /// The generic `OK`/`ERROR` command vocabulary.
    pub fn command() -> Self {
        Self {
            success: &["OK"],
            module_error: &["ER"],
            connect_error: &[],
            remote_error: &[],
            value_prefix: None,
        }
    }

    /// `RESET` vocabulary: success is the `Ready` boot banner, not `OK`.
    pub fn boot_banner() -> Self {
        Self {
            success: &["Re"],
            module_error: &["ER"],
            connect_error: &[],
            remote_error: &[],
            value_prefix: None,
        }
    }

    /// `GET <name>` vocabulary: generic command plus a value line echoing
    /// the parameter name.
    pub fn get_param(name: &str) -> Self {
        Self {
            success: &["OK"],
            module_error: &["ER"],
            connect_error: &[],
            remote_error: &[],
            value_prefix: Some(name.to_string()),
        }
    }

    /// `OPEN` handshake vocabulary. `PAIR_OK` is an intermediate line and
    /// deliberately matches nothing here, so it falls through to
    /// [`Classification::Continue`].
    pub fn open_link() -> Self {
        Self {
            success: &["OPEN_OK"],
            module_error: &["ERROR"],
            connect_error: &["OPEN_ERROR"],
            remote_error: &["PAIR_ERROR"],
            value_prefix: None,
        }
    }

    /// Data-mode escape vocabulary: the module only ever answers `OK`.
    pub fn escape_ack() -> Self {
        Self {
            success: &["OK"],
            module_error: &[],
            connect_error: &[],
            remote_error: &[],
            value_prefix: None,
        }
    }

    /// Classify one completed line.
    pub fn classify(&self, line: &str) -> Classification {
        if matches_any(line, self.module_error) {
            return Classification::ModuleError;
        }
        if matches_any(line, self.connect_error) {
            return Classification::ConnectError;
        }
        if matches_any(line, self.remote_error) {
            return Classification::RemoteError;
        }
        if matches_any(line, self.success) {
            return Classification::Success;
        }
        if let Some(prefix) = &self.value_prefix {
            if line.starts_with(prefix.as_str()) {
                return Classification::Value(extract_value(line, prefix));
            }
        }
        Classification::Continue
    }
}

fn matches_any(line: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| line.starts_with(prefix))
}

/// Strip the echoed parameter name and its separator, trim the remainder.
fn extract_value(line: &str, prefix: &str) -> String {
    line.get(prefix.len() + 1..).unwrap_or("").trim().to_string()
}
