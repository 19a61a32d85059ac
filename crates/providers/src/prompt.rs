use serde::Serialize;

/// Who produced a conversation turn, in the completion service's terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    User,
    Model,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Model => "Model",
        }
    }
}

/// One prior message in the context window. Text is carried verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

/// A fully built completion request, immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub system_instructions: String,
    /// Oldest-first; the last turn is the triggering message.
    pub turns: Vec<ConversationTurn>,
}

/// Serialize a request into the service's expected prompt block: system
/// instructions, the chronological transcript, then the marker where the
/// model's answer begins.
#[must_use]
pub fn render_prompt(request: &CompletionRequest) -> String {
    let transcript = request
        .turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\nSystem Instructions: {}\n\nCurrent Conversation:\n{}\n\nModel Response:",
        request.system_instructions, transcript,
    )
}
