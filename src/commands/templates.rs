//! Prompt templates behind `/name` commands.
//!
//! Templates are a closed set. User-defined templates are split around their
//! single `{arg}` placeholder when the configuration loads, so a template that
//! cannot take an argument never reaches a session.

use crate::core::error::ChatError;

pub const ARG_PLACEHOLDER: &str = "{arg}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptTemplate {
    /// Rewrite a document as markdown.
    Format,
    /// Summarize a document.
    Summarize,
    /// Text from configuration with one argument slot.
    Custom(CustomTemplate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTemplate {
    prefix: String,
    suffix: String,
}

impl CustomTemplate {
    pub fn parse(template: &str) -> Result<Self, String> {
        match template.matches(ARG_PLACEHOLDER).count() {
            1 => {}
            0 => return Err(format!("template has no {ARG_PLACEHOLDER} placeholder")),
            n => {
                return Err(format!(
                    "template has {n} {ARG_PLACEHOLDER} placeholders; exactly one is allowed"
                ))
            }
        }
        let (prefix, suffix) = template
            .split_once(ARG_PLACEHOLDER)
            .ok_or_else(|| format!("template has no {ARG_PLACEHOLDER} placeholder"))?;
        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    fn render(&self, arg: &str) -> String {
        format!("{}{}{}", self.prefix, arg, self.suffix)
    }
}

impl PromptTemplate {
    /// Whether the argument names a document.
    pub fn takes_document(&self) -> bool {
        matches!(self, PromptTemplate::Format | PromptTemplate::Summarize)
    }

    pub fn usage(&self, name: &str) -> String {
        if self.takes_document() {
            format!("/{name} <doc_id>")
        } else {
            format!("/{name} [text]")
        }
    }

    pub fn render(&self, name: &str, arg: &str) -> Result<String, ChatError> {
        if self.takes_document() && arg.is_empty() {
            return Err(ChatError::validation(format!(
                "Usage: {}",
                self.usage(name)
            )));
        }

        Ok(match self {
            PromptTemplate::Format => format!(
                "Your goal is to reformat a document so it is written with markdown syntax.\n\n\
                 The id of the document you need to reformat is:\n\
                 <document_id>\n{arg}\n</document_id>\n\n\
                 Add headers, bullet points, tables and other markdown structure where it helps. \
                 Don't change the meaning of the document. \
                 Reply with the final version of the document only; don't explain your changes."
            ),
            PromptTemplate::Summarize => format!(
                "Summarize the document identified below in a few short paragraphs.\n\n\
                 <document_id>\n{arg}\n</document_id>\n\n\
                 Lead with the most important facts and keep the summary faithful to the source."
            ),
            PromptTemplate::Custom(template) => template.render(arg),
        })
    }
}
