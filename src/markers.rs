pub const TURN_START: &str = "<|im_start|>";
pub const TURN_END: &str = "<|im_end|>";
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful AI assistant.";

const THINK_INSTRUCTION: &str =
    "\nFirst analyze step by step in <think> tags, then give a direct answer.";
const THINK_SUFFIX: &str = " /think";

/// Stop sequences sent with every completion request.
pub fn default_stop_sequences() -> Vec<String> {
    vec!["</s>".to_string(), TURN_END.to_string()]
}

/// Removes chat-turn sentinels left behind by the template.
pub fn strip_chat_markers(text: &str) -> String {
    text.replace(TURN_START, "").replace(TURN_END, "")
}

/// Wraps a user prompt in the ChatML template the server expects.
pub fn build_chat_prompt(prompt: &str, system: Option<&str>, thinking: bool) -> String {
    let mut system_msg = system
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_SYSTEM_MESSAGE)
        .to_string();
    let mut user = prompt.to_string();
    if thinking {
        system_msg.push_str(THINK_INSTRUCTION);
        user.push_str(THINK_SUFFIX);
    }
    format!(
        "{TURN_START}system\n{system_msg}{TURN_END}\n{TURN_START}user\n{user}{TURN_END}\n{TURN_START}assistant\n"
    )
}
