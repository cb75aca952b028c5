//! 导出文本清洗 - 业务能力层
//!
//! 只用于导出：去掉强调标记、标签，合并连续换行，让排版拿到纯文本

use crate::error::ExportError;
use regex::Regex;

/// 成对的强调标记
///
/// 标记内侧紧挨非空白字符，外侧不能贴着字母数字，
/// 因此 `3 * 4 * 5`、`a*b*c` 这类算式不会被当成强调
struct Emphasis {
    pattern: Regex,
    marker: char,
}

impl Emphasis {
    fn new(marker: &str) -> Result<Self, ExportError> {
        let escaped = regex::escape(marker);
        let first = marker.chars().next().unwrap_or('*');
        let pattern = Regex::new(&format!(
            r"{m}(\S(?:[^{c}\n]*?\S)?){m}",
            m = escaped,
            c = regex::escape(&first.to_string()),
        ))?;
        Ok(Self {
            pattern,
            marker: first,
        })
    }

    fn strip(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in self.pattern.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let before = text[..whole.start()].chars().next_back();
            let after = text[whole.end()..].chars().next();
            if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
                continue;
            }
            // `__init__` 这类标识符保持原样
            if self.marker == '_' && inner.as_str().chars().all(is_word_char) {
                continue;
            }

            out.push_str(&text[last..whole.start()]);
            out.push_str(inner.as_str());
            last = whole.end();
        }

        out.push_str(&text[last..]);
        out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// 导出文本清洗器
///
/// 正则只编译一次，整个导出过程复用
pub struct TextCleaner {
    line_breaks: Regex,
    tags: Regex,
    emphasis: Vec<Emphasis>,
    blank_lines: Regex,
}

impl TextCleaner {
    pub fn new() -> Result<Self, ExportError> {
        Ok(Self {
            line_breaks: Regex::new(r"(?i)<br\s*/?>|</p\s*>")?,
            tags: Regex::new(r"<[^>]*>")?,
            emphasis: vec![
                Emphasis::new("**")?,
                Emphasis::new("__")?,
                Emphasis::new("~~")?,
                Emphasis::new("*")?,
            ],
            blank_lines: Regex::new(r"\n(?:[ \t]*\n)+")?,
        })
    }

    /// 清洗一段题干
    pub fn clean(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let text = self.line_breaks.replace_all(&text, "\n");
        let text = self.tags.replace_all(&text, "");
        let mut text = decode_entities(&text);

        for emphasis in &self.emphasis {
            text = emphasis.strip(&text);
        }

        let text = self.blank_lines.replace_all(&text, "\n");
        text.trim().to_string()
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
