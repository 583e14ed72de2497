use reqwest::blocking::Client;
use std::time::Duration;

use super::types::{ChatMessage, ChatRequest, ChatResponse};
use super::{DecisionOracle, OracleError, SectionInfo};

const SYSTEM_PROMPT: &str = "You are an expert in document structuring.";

/// Decision oracle backed by an OpenAI-style chat-completions endpoint.
///
/// Each operation is a single blocking request/response exchange. The model
/// is instructed to answer with a bare JSON payload; anything else in the
/// reply body is a protocol violation.
pub struct ChatOracle {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatOracle {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        // Generous default: decision calls carry the full document text.
        Self::with_timeout(api_key, model, endpoint, Duration::from_secs(120))
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Send one prompt and return the assistant message content.
    fn complete(&self, prompt: String) -> Result<String, OracleError> {
        let req = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OracleError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let res: ChatResponse = response.json()?;
        res.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| OracleError::Protocol {
                detail: "response contained no choices".to_string(),
                raw: String::new(),
            })
    }
}

impl DecisionOracle for ChatOracle {
    fn choose_merge(&self, sections: &[SectionInfo]) -> Result<(usize, usize), OracleError> {
        let metadata = serialize_metadata(sections)?;
        let content = self.complete(merge_prompt(&metadata))?;
        parse_index_pair(&content)
    }

    fn choose_split(&self, sections: &[SectionInfo]) -> Result<usize, OracleError> {
        let metadata = serialize_metadata(sections)?;
        let content = self.complete(split_prompt(&metadata, sections.len()))?;
        parse_target_index(&content)
    }

    fn split_text(&self, text: &str) -> Result<(String, String), OracleError> {
        let content = self.complete(split_text_prompt(text))?;
        parse_split_parts(&content)
    }
}

fn serialize_metadata(sections: &[SectionInfo]) -> Result<String, OracleError> {
    serde_json::to_string(sections).map_err(|err| OracleError::Protocol {
        detail: format!("failed to serialize section metadata: {err}"),
        raw: String::new(),
    })
}

fn merge_prompt(metadata: &str) -> String {
    format!(
        "## Task: Choose which two adjacent sections to merge, and return their indexes.\n\
         You are given a markdown document that has been split into sections, represented as a JSON list.\n\
         Identify two adjacent sections that make the most sense to merge while maintaining balance in section sizes.\n\
         The actual section content is the value of the \"text\" key.\n\
         \n\
         ## Criteria\n\
         - Merge the two smallest adjacent sections based on word count and paragraph count.\n\
         - Prioritize merging titles or very short sections into the section that follows.\n\
         - Ensure merged sections convey a coherent idea.\n\
         \n\
         ## Current Sections\n\
         ```json\n\
         {metadata}\n\
         ```\n\
         \n\
         ## Expected Output Format\n\
         ```json\n\
         [0, 1]\n\
         ```\n\
         Return only the JSON and nothing else. No explanations. Section indexes start at zero."
    )
}

fn split_prompt(metadata: &str, count: usize) -> String {
    format!(
        "## Task: Choose which section to split, and return its index.\n\
         You are given a markdown document that has been split into sections, represented as a JSON list.\n\
         There are currently {count} sections, but we need {} sections by splitting one.\n\
         Word and paragraph counts are provided for each section; the actual content is the value of the \"text\" key.\n\
         \n\
         ## Criteria\n\
         - A section should be split based on size and the number of discrete ideas it embeds.\n\
         - The chosen section should contain distinct ideas that make it a better split candidate than the others.\n\
         \n\
         ## Current Sections\n\
         ```json\n\
         {metadata}\n\
         ```\n\
         \n\
         ## Expected Output Format\n\
         ```json\n\
         [2]\n\
         ```\n\
         Return only the JSON and nothing else. No explanations. Section indexes start at zero.",
        count + 1
    )
}

fn split_text_prompt(text: &str) -> String {
    format!(
        "## Task: Split the following markdown text into 2 parts.\n\
         \n\
         ## Criteria\n\
         - Aim for both parts to be roughly equal in size.\n\
         - The main criterion for the split is to separate distinct ideas.\n\
         - If joined back together, the returned parts must match the original text.\n\
         - You can not split mid-sentence under any circumstance.\n\
         \n\
         TEXT:\n\
         {text}\n\
         \n\
         Return a JSON array of two strings:\n\
         ```json\n\
         [\"Part 1...\", \"Part 2...\"]\n\
         ```\n\
         Return only the JSON and nothing else. No explanations."
    )
}

/// Strip Markdown code fences the model tends to wrap JSON payloads in.
pub(super) fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

pub(super) fn parse_index_pair(content: &str) -> Result<(usize, usize), OracleError> {
    let indices: Vec<usize> = parse_payload(content, "a JSON array of two section indexes")?;
    match indices.as_slice() {
        [first, second] => Ok((*first, *second)),
        _ => Err(shape_error(
            format!("expected exactly two indexes, got {}", indices.len()),
            content,
        )),
    }
}

pub(super) fn parse_target_index(content: &str) -> Result<usize, OracleError> {
    let indices: Vec<usize> = parse_payload(content, "a JSON array of one section index")?;
    match indices.as_slice() {
        [index] => Ok(*index),
        _ => Err(shape_error(
            format!("expected exactly one index, got {}", indices.len()),
            content,
        )),
    }
}

pub(super) fn parse_split_parts(content: &str) -> Result<(String, String), OracleError> {
    let mut parts: Vec<String> = parse_payload(content, "a JSON array of two strings")?;
    if parts.len() != 2 {
        return Err(shape_error(
            format!("expected exactly two parts, got {}", parts.len()),
            content,
        ));
    }
    let second = parts.pop().unwrap_or_default();
    let first = parts.pop().unwrap_or_default();
    Ok((first, second))
}

fn parse_payload<T: serde::de::DeserializeOwned>(
    content: &str,
    expected: &str,
) -> Result<T, OracleError> {
    let cleaned = strip_code_fences(content);
    serde_json::from_str(&cleaned).map_err(|err| shape_error(format!("expected {expected}: {err}"), content))
}

fn shape_error(detail: String, raw: &str) -> OracleError {
    OracleError::Protocol {
        detail,
        raw: raw.to_string(),
    }
}
