/// Fixed sentinel returned when no text could be extracted. This is a normal
/// outcome (scanned/image-only documents), not a fault, and it travels in the
/// same reply field as real model output.
pub const NO_TEXT_SENTINEL: &str =
    "Could not extract text from this file (is it a scanned image-PDF?)";

/// Extracted text is truncated to this many characters before prompting, to
/// respect downstream size and quota limits.
pub const MAX_PROMPT_CHARS: usize = 12_000;

/// Build the directive prompt around a bounded prefix of the extracted text.
/// Truncation is silent and deterministic: always the first
/// [`MAX_PROMPT_CHARS`] characters.
pub fn build_prompt(text: &str) -> String {
    let chunk: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    format!(
        "Summarize this document concisely, then suggest a folder name for filing it \
         and a few keywords. Return ONLY valid JSON as: \
         {{\"summary\": \"...\", \"suggested_folder\": \"...\", \"keywords\": [\"...\"]}}\n\n{chunk}"
    )
}
