use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One piece of visual evidence from the secondary fetch, keyed back to the
/// finding or scenario step it originated from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct MediaAttachment {
    pub module_key: Option<String>,
    pub finding_id: Option<String>,
    pub finding_index: Option<usize>,
    pub scenario: Option<String>,
    pub step_index: Option<usize>,
    pub url: Option<String>,
    pub base64: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct MediaAttachments {
    pub screenshots: Vec<MediaAttachment>,
    pub videos: Vec<MediaAttachment>,
}

/// Secondary "enhanced report" document, fetched by analysis id via the
/// primary report's `enhanced_report.json_file` reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EnhancedReport {
    pub analysis_id: Option<String>,
    pub json_file: Option<String>,
    pub media_attachments: MediaAttachments,
}

impl EnhancedReport {
    /// Lenient parse: an unusable payload degrades to an empty attachment
    /// set. Report correctness never depends on this document.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}
