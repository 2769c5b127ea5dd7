//! `@id` mention resolution.
//!
//! Mentions are whitespace-separated tokens that start with `@`; everything
//! after the `@` up to the next whitespace is the document id. Ids that the
//! store does not know are left out of the context and reported back as
//! `missing` so the caller can warn about them.

use tracing::{debug, warn};

use crate::core::document::{Document, DocumentStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedContext {
    /// Resolved documents in order of first mention.
    pub documents: Vec<Document>,
    /// Mentioned ids that are not in the store, in order of first mention.
    pub missing: Vec<String>,
}

impl ResolvedContext {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Renders the resolved documents as `<document id="...">` blocks.
    pub fn render(&self) -> String {
        self.documents
            .iter()
            .map(|doc| format!("\n<document id=\"{}\">\n{}\n</document>\n", doc.id, doc.content))
            .collect()
    }

    pub fn missing_warning(&self) -> Option<String> {
        if self.missing.is_empty() {
            return None;
        }
        let ids: Vec<String> = self.missing.iter().map(|id| format!("@{id}")).collect();
        Some(format!(
            "Unknown document reference{}: {}",
            if ids.len() == 1 { "" } else { "s" },
            ids.join(", ")
        ))
    }
}

/// Returns the distinct ids mentioned in `input`, in order of first mention.
pub fn extract_mentions(input: &str) -> Vec<String> {
    let mut mentions: Vec<String> = Vec::new();
    for token in input.split_whitespace() {
        let Some(id) = token.strip_prefix('@') else {
            continue;
        };
        if id.is_empty() || mentions.iter().any(|seen| seen == id) {
            continue;
        }
        mentions.push(id.to_string());
    }
    mentions
}

/// Looks up every mention in `input`. Never fails; unknown ids land in
/// [`ResolvedContext::missing`].
pub fn resolve_references(store: &dyn DocumentStore, input: &str) -> ResolvedContext {
    let mut context = ResolvedContext::default();
    let mentions = extract_mentions(input);
    if mentions.is_empty() {
        return context;
    }
    debug!(mentions = ?mentions, "Found document mentions");

    for id in mentions {
        match store.get(&id) {
            Ok(content) => {
                debug!(doc_id = %id, len = content.len(), "Loaded mentioned document");
                context.documents.push(Document { id, content });
            }
            Err(_) => {
                warn!(doc_id = %id, "Mentioned document not found; skipping");
                context.missing.push(id);
            }
        }
    }

    context
}

/// Builds the text sent upstream for a free-form query. With no resolved
/// documents the query is returned unchanged.
pub fn compose_prompt(query: &str, context: &ResolvedContext) -> String {
    if context.is_empty() {
        return query.to_string();
    }

    format!(
        "The user has a question:\n\
         <query>\n{query}\n</query>\n\n\
         The following context may be useful in answering their question:\n\
         <context>\n{context}\n</context>\n\n\
         Mentions such as \"@report.pdf\" refer to documents by id; the \"@\" is not part of the id. \
         Documents included above do not need to be fetched again. \
         Answer the question directly and concisely without referring to the provided context.",
        context = context.render()
    )
}
