// src/fence.rs

//! Markdown code-fence removal for generated text.

const FENCE: &str = "```";

/// Strips a surrounding triple-backtick fence from `text`.
///
/// The text counts as fenced when its first line opens a fence and its last
/// line closes one. Only blocks of more than two lines are unwrapped; anything
/// shorter, or unfenced, is returned as is.
pub fn strip_code_fence(text: &str) -> &str {
    let Some((opening, rest)) = text.split_once('\n') else {
        return text;
    };
    let Some((inner, closing)) = rest.rsplit_once('\n') else {
        return text;
    };

    if is_fence_line(opening) && is_fence_line(closing) {
        inner
    } else {
        text
    }
}

fn is_fence_line(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_line_block_loses_its_fences() {
        let text = "```python\ndef add(a, b):\n    return a + b\n```";
        assert_eq!(strip_code_fence(text), "def add(a, b):\n    return a + b");
    }

    #[test]
    fn three_line_block_keeps_the_single_body_line() {
        assert_eq!(strip_code_fence("```\nprint(1)\n```"), "print(1)");
    }

    #[test]
    fn two_line_block_is_untouched() {
        assert_eq!(strip_code_fence("```lua\n```"), "```lua\n```");
    }

    #[test]
    fn single_line_fence_is_untouched() {
        assert_eq!(strip_code_fence("```print(1)```"), "```print(1)```");
    }

    #[test]
    fn unfenced_text_is_untouched() {
        let text = "fn main() {\n    println!(\"hi\");\n}";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn unterminated_fence_is_untouched() {
        let text = "```go\nfunc main() {\n}";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn crlf_fences_are_recognised() {
        assert_eq!(strip_code_fence("```js\r\nlet a = 1;\r\n```"), "let a = 1;\r");
    }

    #[test]
    fn inner_fences_survive() {
        let text = "```md\n```\nnested\n```\n```";
        assert_eq!(strip_code_fence(text), "```\nnested\n```");
    }
}
