use litdoc::chunk::Chunk;
use litdoc::parser::{ChunkParser, MarkdownParser, TranscriptParser};

fn transcript(source: &str) -> Vec<Chunk> {
    TranscriptParser::new()
        .parse(source, "test")
        .expect("parse failed")
}

fn markdown(source: &str) -> Vec<Chunk> {
    MarkdownParser::new()
        .parse(source, "test")
        .expect("parse failed")
}

fn code(chunk: &Chunk) -> &litdoc::chunk::CodeChunk {
    chunk.as_code().expect("expected a code chunk")
}

#[test]
fn consecutive_prompts_form_one_sample() {
    let chunks = transcript(">>> x = 1\n>>> x\n1\n");
    assert_eq!(chunks.len(), 1);
    let sample = code(&chunks[0]);
    assert_eq!(sample.source, "x = 1\nx\n");
    assert_eq!(sample.expected_output.as_deref(), Some("1\n"));
    assert_eq!(sample.expected_error, None);
}

#[test]
fn continuation_prompts_extend_the_sample() {
    let chunks = transcript(">>> if x > 0 {\n...     print(\"pos\")\n... }\npos\n");
    assert_eq!(chunks.len(), 1);
    let sample = code(&chunks[0]);
    assert_eq!(sample.source, "if x > 0 {\n    print(\"pos\")\n}\n");
    assert_eq!(sample.expected_output.as_deref(), Some("pos\n"));
}

#[test]
fn error_header_switches_to_error_capture() {
    let chunks = transcript(">>> 1 / 0\nerror: division by zero\n");
    let sample = code(&chunks[0]);
    assert_eq!(sample.expected_output, None);
    assert_eq!(
        sample.expected_error.as_deref(),
        Some("error: division by zero\n")
    );
}

#[test]
fn output_then_error_capture() {
    let chunks = transcript(">>> print(\"a\")\n>>> nope\na\nerror: undefined variable: nope\n");
    let sample = code(&chunks[0]);
    assert_eq!(sample.source, "print(\"a\")\nnope\n");
    assert_eq!(sample.expected_output.as_deref(), Some("a\n"));
    assert_eq!(
        sample.expected_error.as_deref(),
        Some("error: undefined variable: nope\n")
    );
}

#[test]
fn prose_surrounds_samples() {
    let chunks = transcript("Intro text.\n\n>>> x = 2 + 3\n>>> x\n5\n\nDone.\n");
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0], Chunk::Text("Intro text.\n\n".to_string()));
    assert!(chunks[1].is_code());
    assert_eq!(chunks[2], Chunk::Text("\nDone.\n".to_string()));
}

#[test]
fn blank_line_closes_a_sample() {
    let chunks = transcript(">>> a = 1\n\n>>> b = 2\n");
    let samples: Vec<_> = chunks.iter().filter(|c| c.is_code()).collect();
    assert_eq!(samples.len(), 2);
    assert_eq!(code(samples[0]).source, "a = 1\n");
    assert_eq!(code(samples[1]).source, "b = 2\n");
}

#[test]
fn indented_sample_records_its_indent() {
    let chunks = transcript("Prose:\n\n    >>> x = 1\n    >>> x\n    1\n");
    let sample = code(&chunks[1]);
    assert_eq!(sample.indent, 4);
    assert_eq!(sample.source, "x = 1\nx\n");
    assert_eq!(sample.expected_output.as_deref(), Some("1\n"));
}

#[test]
fn dedent_closes_a_sample() {
    let chunks = transcript("    >>> x = 1\nback to prose\n");
    assert_eq!(chunks.len(), 2);
    let sample = code(&chunks[0]);
    assert_eq!(sample.source, "x = 1\n");
    assert_eq!(sample.expected_output, None);
    assert_eq!(chunks[1], Chunk::Text("back to prose\n".to_string()));
}

#[test]
fn inconsistent_prompt_indent_is_fatal() {
    let errors = TranscriptParser::new()
        .parse(">>> a = 1\n  >>> b = 2\n", "test")
        .expect_err("expected parse errors");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("inconsistent leading whitespace"));
}

#[test]
fn missing_space_after_prompt_is_fatal() {
    let errors = TranscriptParser::new()
        .parse(">>>x = 1\n", "test")
        .expect_err("expected parse errors");
    assert!(errors[0].message.contains("missing space after '>>>'"));
}

#[test]
fn empty_document_is_one_empty_text_chunk() {
    let chunks = transcript("");
    assert_eq!(chunks, vec![Chunk::Text(String::new())]);
}

#[test]
fn fenced_block_becomes_a_code_chunk() {
    let chunks = markdown("Intro.\n\n```\nx = 1\nx\n```\n\nDone.\n");
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0], Chunk::Text("Intro.\n\n".to_string()));
    let sample = code(&chunks[1]);
    assert_eq!(sample.source, "x = 1\nx\n");
    assert_eq!(sample.expected_output, None);
    assert_eq!(sample.expected_error, None);
    assert_eq!(chunks[2], Chunk::Text("\nDone.".to_string()));
}

#[test]
fn tagged_fence_is_executable() {
    let chunks = markdown("```litr\nx = 1\n```\n");
    assert_eq!(code(&chunks[0]).source, "x = 1\n");
}

#[test]
fn foreign_fence_passes_through_as_text() {
    let chunks = markdown("```python\nx = 1\n```\n");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0], Chunk::Text("```python\nx = 1\n```".to_string()));
}

#[test]
fn interior_blank_lines_are_dropped() {
    let chunks = markdown("```\nx = 1\n\nx\n```\n");
    assert_eq!(chunks.len(), 1);
    assert_eq!(code(&chunks[0]).source, "x = 1\nx\n");
}

#[test]
fn dedent_to_zero_splits_the_fence() {
    let chunks = markdown("```\nstep_one(\n    1)\nstep_two(2)\n```\n");
    let samples: Vec<_> = chunks.iter().filter(|c| c.is_code()).collect();
    assert_eq!(samples.len(), 2);
    assert_eq!(code(samples[0]).source, "step_one(\n    1)\n");
    assert_eq!(code(samples[1]).source, "step_two(2)\n");
}

#[test]
fn closing_brace_does_not_split_the_fence() {
    let chunks = markdown("```\nif x {\n    print(\"yes\")\n}\n```\n");
    assert_eq!(chunks.len(), 1);
    assert_eq!(code(&chunks[0]).source, "if x {\n    print(\"yes\")\n}\n");
}

#[test]
fn indented_block_after_blank_line() {
    let chunks = markdown("Prose.\n\n    x = 1\n    x\n\nMore prose.\n");
    assert_eq!(chunks.len(), 3);
    let sample = code(&chunks[1]);
    assert_eq!(sample.source, "x = 1\nx\n");
    assert_eq!(sample.indent, 4);
}

#[test]
fn non_indented_line_closes_indented_block() {
    let chunks = markdown("Prose.\n\n    x = 1\nback\n");
    let samples: Vec<_> = chunks.iter().filter(|c| c.is_code()).collect();
    assert_eq!(samples.len(), 1);
    assert_eq!(code(samples[0]).source, "x = 1\n");
}

#[test]
fn indented_line_without_blank_lead_in_is_prose() {
    let chunks = markdown("Prose.\n    still prose\n");
    assert_eq!(chunks.len(), 1);
    assert!(!chunks[0].is_code());
}

#[test]
fn unterminated_fence_flushes_at_end_of_document() {
    let chunks = markdown("```\nx = 1\n");
    assert_eq!(code(&chunks[0]).source, "x = 1\n");
}
