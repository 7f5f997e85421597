//! Conversation-related types.

use tool_loop_model::ModelMessage;

/// The conversation history exchanged with the model.
///
/// The context is owned by exactly one agent. It only grows by appending,
/// except for compaction, which replaces the whole history at once. When
/// the agent has a non-empty instruction, the first message is always the
/// system instruction, and it survives compaction.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Context {
    pub(crate) messages: Vec<ModelMessage>,
}

impl Context {
    pub(crate) fn with_instruction(instruction: String) -> Self {
        let mut messages = vec![];
        if !instruction.is_empty() {
            messages.push(ModelMessage::System(instruction));
        }
        Self { messages }
    }

    /// Returns all messages, in conversation order.
    #[inline]
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// Returns the number of messages, including the system instruction.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if there are no messages at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the last message.
    #[inline]
    pub fn last(&self) -> Option<&ModelMessage> {
        self.messages.last()
    }

    /// Returns the system instruction.
    #[inline]
    pub fn instruction(&self) -> Option<&str> {
        match self.messages.first() {
            Some(ModelMessage::System(instruction)) => {
                Some(instruction.as_str())
            }
            _ => None,
        }
    }

    /// Returns the messages after the system instruction.
    #[inline]
    pub fn history(&self) -> &[ModelMessage] {
        let skip = usize::from(self.instruction().is_some());
        &self.messages[skip..]
    }

    #[inline]
    pub(crate) fn push(&mut self, msg: ModelMessage) {
        self.messages.push(msg);
    }

    /// Removes the user message at `idx`. Anything else is left in place.
    pub(crate) fn remove_user_turn(
        &mut self,
        idx: usize,
    ) -> Option<ModelMessage> {
        if !self.messages.get(idx)?.is_user() {
            return None;
        }
        Some(self.messages.remove(idx))
    }

    /// Replaces the history with a single user message carrying `summary`,
    /// keeping the system instruction in front.
    pub(crate) fn replace_with_summary(&mut self, summary: String) {
        let mut messages = Vec::with_capacity(2);
        if let Some(instruction) = self.instruction() {
            messages.push(ModelMessage::System(instruction.to_owned()));
        }
        messages.push(ModelMessage::User(summary));
        self.messages = messages;
    }
}

#[cfg(test)]
mod tests {
    use tool_loop_model::{ToolCallResult, ToolOutput};

    use super::*;

    fn sample_context() -> Context {
        let mut context = Context::with_instruction("be nice".to_owned());
        context.push(ModelMessage::User("first".to_owned()));
        context.push(ModelMessage::assistant("ok"));
        context.push(ModelMessage::User("second".to_owned()));
        context.push(ModelMessage::Tool(ToolCallResult {
            id: "call:1".to_owned(),
            output: ToolOutput::success("done"),
        }));
        context
    }

    #[test]
    fn test_instruction_is_first() {
        let context = sample_context();
        assert_eq!(context.instruction(), Some("be nice"));
        assert_eq!(context.history().len(), 4);

        let context = Context::with_instruction(String::new());
        assert!(context.is_empty());
        assert_eq!(context.instruction(), None);
        assert!(context.history().is_empty());
    }

    #[test]
    fn test_remove_user_turn() {
        let mut context = sample_context();
        let removed = context.remove_user_turn(3);
        assert_eq!(removed, Some(ModelMessage::User("second".to_owned())));
        assert_eq!(context.len(), 4);
        assert!(matches!(context.last(), Some(ModelMessage::Tool(_))));

        assert_eq!(context.remove_user_turn(0), None);
        assert_eq!(context.remove_user_turn(2), None);
        assert_eq!(context.remove_user_turn(9), None);
        assert_eq!(context.len(), 4);
    }

    #[test]
    fn test_replace_with_summary() {
        let mut context = sample_context();
        let instruction = context.messages()[0].clone();

        context.replace_with_summary("we said hi".to_owned());
        assert_eq!(context.len(), 2);
        assert_eq!(context.messages()[0], instruction);
        assert_eq!(
            context.messages()[1],
            ModelMessage::User("we said hi".to_owned())
        );
    }
}
