//! Grounding prompt rendering

const DEFAULT_TEMPLATE: &str = "Answer the question based only on the following context:\n\
{context}\n\
---\n\
Answer the question based on the above context: {question}";

/// A prompt with `{context}` and `{question}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Substitute both placeholders in a single pass
    ///
    /// Placeholder text appearing inside the context is left alone.
    pub fn render(&self, context: &str, question: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + context.len() + question.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix("{context}") {
                out.push_str(context);
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{question}") {
                out.push_str(question);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }
}
