use super::{ResultKind, ResultTarget};
use crate::cache::NodeId;
use crate::messages::{self, MessageCatalog};
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

/// One classification of one target under one rule.
///
/// The human-readable message is rendered on first call to
/// [`ElementResult::message`] and cached.
pub struct ElementResult {
    rule_id: &'static str,
    kind: ResultKind,
    target: ResultTarget,
    message_id: String,
    args: Vec<String>,
    required: bool,
    catalog: Arc<MessageCatalog>,
    message: OnceCell<String>,
}

impl ElementResult {
    pub(crate) fn new(
        rule_id: &'static str,
        kind: ResultKind,
        target: ResultTarget,
        message_id: &str,
        args: Vec<String>,
        required: bool,
        catalog: Arc<MessageCatalog>,
    ) -> Self {
        Self {
            rule_id,
            kind,
            target,
            message_id: message_id.to_string(),
            args,
            required,
            catalog,
            message: OnceCell::new(),
        }
    }

    /// Id of the rule that produced this result.
    #[must_use]
    pub fn rule_id(&self) -> &'static str {
        self.rule_id
    }

    /// Classification.
    #[must_use]
    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    /// What was classified.
    #[must_use]
    pub fn target(&self) -> ResultTarget {
        self.target
    }

    /// The classified element, if any.
    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        self.target.node()
    }

    /// Message id within the rule's catalog entry.
    #[must_use]
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Positional message arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Word substituted for `%s`.
    #[must_use]
    pub fn severity_word(&self) -> &str {
        let words = &self.catalog.severity;
        match self.kind {
            ResultKind::Violation => &words.must,
            ResultKind::Warning => &words.should,
            ResultKind::ManualCheck => &words.may,
            ResultKind::Pass | ResultKind::Hidden if self.required => &words.must,
            ResultKind::Pass | ResultKind::Hidden => &words.should,
        }
    }

    /// Rendered message. Missing templates render as a placeholder.
    pub fn message(&self) -> &str {
        self.message.get_or_init(|| {
            match self.catalog.node_message(self.rule_id, &self.message_id) {
                Some(template) => messages::render(template, &self.args, self.severity_word()),
                None => {
                    tracing::debug!(
                        "No message `{}` for rule {}",
                        self.message_id,
                        self.rule_id
                    );
                    messages::missing_message(&self.message_id)
                }
            }
        })
    }
}

impl fmt::Debug for ElementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementResult")
            .field("rule_id", &self.rule_id)
            .field("kind", &self.kind)
            .field("target", &self.target)
            .field("message_id", &self.message_id)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
