use serde::{Deserialize, Serialize};

/// Execution context a logger runs in.
///
/// Supplied explicitly by the embedding environment at construction; the
/// relay never probes the host surface to guess where it is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "UI")]
    Ui,
    Client,
    Server,
    Local,
}

/// Severity of a single log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Log,
    Error,
    Warn,
    Info,
}

impl LogLevel {
    /// Human-readable label prepended to every rendered message.
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Log => "[LOG]",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Info => "[INFO]",
        }
    }
}

/// Semantic format assigned to a logged value, exactly once per log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatTag {
    Error,
    Boolean,
    Number,
    String,
    Json,
    Function,
    Undefined,
    Null,
    Date,
    Html,
    Map,
    Set,
    RegExp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_serde_names() {
        assert_eq!(serde_json::to_string(&Platform::Ui).unwrap(), "\"UI\"");
        assert_eq!(
            serde_json::to_string(&Platform::Client).unwrap(),
            "\"Client\""
        );
        assert_eq!(
            serde_json::to_string(&Platform::Server).unwrap(),
            "\"Server\""
        );
        assert_eq!(serde_json::to_string(&Platform::Local).unwrap(), "\"Local\"");
    }

    #[test]
    fn level_labels() {
        assert_eq!(LogLevel::Log.label(), "[LOG]");
        assert_eq!(LogLevel::Error.label(), "[ERROR]");
        assert_eq!(LogLevel::Warn.label(), "[WARN]");
        assert_eq!(LogLevel::Info.label(), "[INFO]");
    }

    #[test]
    fn format_tag_camel_case() {
        assert_eq!(
            serde_json::to_string(&FormatTag::RegExp).unwrap(),
            "\"regExp\""
        );
        assert_eq!(
            serde_json::to_string(&FormatTag::Undefined).unwrap(),
            "\"undefined\""
        );
        let parsed: FormatTag = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(parsed, FormatTag::Json);
    }
}
