//! 文档注释解析模块
//!
//! 用一个按行工作的小型分词器解析 `/** ... */` 文档注释，
//! 提取主描述以及 `@param`、`@return`、`@throws`、`@since` 标签，
//! 再渲染成扁平、便于阅读和翻译的文本：
//!
//! ```text
//! Adds two numbers.
//! Params:
//!      a – first
//!      b – second
//! Returns:
//!      sum
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// 标签内容和 `<pre>` 代码块的缩进
const INDENT: &str = "     ";

static ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a\s+href="[^"]*">([^<]*)</a>"#).expect("valid anchor regex")
});

static INLINE_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?tt>|</?cite>").expect("valid regex"));

static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?p>").expect("valid regex"));

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// 文档注释解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocParseError {
    /// 注释体中出现了提前结束的 `*/`
    #[error("unexpected comment terminator on line {line}")]
    StrayTerminator { line: usize },
    /// `<pre>` 没有对应的 `</pre>`
    #[error("unterminated <pre> block opened on line {line}")]
    UnterminatedPre { line: usize },
    /// `@` 后面没有标签名
    #[error("missing tag name on line {line}")]
    EmptyTagName { line: usize },
}

/// `@param` 条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDoc {
    pub name: String,
    pub text: String,
}

/// `@throws` 条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowsDoc {
    /// 去掉包名后的类名
    pub type_name: String,
    pub text: String,
}

/// 渲染后的一个段落，按固定顺序输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTagSection {
    Description(String),
    Params(Vec<ParamDoc>),
    Returns(String),
    Throws(Vec<ThrowsDoc>),
    Since(String),
}

impl DocTagSection {
    fn render_into(&self, out: &mut String) {
        match self {
            DocTagSection::Description(text) => {
                out.push_str(text);
                out.push('\n');
            }
            DocTagSection::Params(params) => {
                out.push_str("Params:\n");
                for param in params {
                    push_entry(out, &param.name, &param.text);
                }
            }
            DocTagSection::Returns(text) => {
                out.push_str("Returns:\n");
                out.push_str(INDENT);
                out.push_str(text);
                out.push('\n');
            }
            DocTagSection::Throws(throws) => {
                out.push_str("Throws:\n");
                for entry in throws {
                    push_entry(out, &entry.type_name, &entry.text);
                }
            }
            DocTagSection::Since(version) => {
                out.push_str("Since:\n");
                out.push_str(INDENT);
                out.push_str(version);
                out.push('\n');
            }
        }
    }
}

fn push_entry(out: &mut String, name: &str, text: &str) {
    out.push_str(INDENT);
    out.push_str(name);
    if !text.is_empty() {
        out.push_str(" – ");
        out.push_str(text);
    }
    out.push('\n');
}

/// 解析后的文档注释
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    pub description: String,
    pub params: Vec<ParamDoc>,
    pub returns: Option<String>,
    pub throws: Vec<ThrowsDoc>,
    pub since: Option<String>,
}

impl DocComment {
    /// 解析一段原始文档注释，可以带也可以不带 `/**` 和 `*/`
    pub fn parse(raw: &str) -> Result<Self, DocParseError> {
        let (body, skipped_lines) = strip_delimiters(raw);
        let mut tokenizer = Tokenizer::default();

        for (index, line) in body.lines().enumerate() {
            let line_no = skipped_lines + index + 1;
            if line.contains("*/") {
                return Err(DocParseError::StrayTerminator { line: line_no });
            }
            tokenizer.feed_line(strip_marker(line), line_no)?;
        }

        tokenizer.finish()
    }

    /// 按 描述、参数、返回值、异常、版本 的顺序列出非空段落
    pub fn sections(&self) -> Vec<DocTagSection> {
        let mut sections = Vec::new();
        if !self.description.is_empty() {
            sections.push(DocTagSection::Description(self.description.clone()));
        }
        if !self.params.is_empty() {
            sections.push(DocTagSection::Params(self.params.clone()));
        }
        if let Some(returns) = &self.returns {
            sections.push(DocTagSection::Returns(returns.clone()));
        }
        if !self.throws.is_empty() {
            sections.push(DocTagSection::Throws(self.throws.clone()));
        }
        if let Some(since) = &self.since {
            sections.push(DocTagSection::Since(since.clone()));
        }
        sections
    }

    /// 渲染成扁平文本
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in self.sections() {
            section.render_into(&mut out);
        }
        out.trim_end().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Param,
    Return,
    Throws,
    Since,
    Other,
}

impl TagKind {
    fn from_name(name: &str) -> Self {
        match name {
            "param" => TagKind::Param,
            "return" => TagKind::Return,
            "throws" | "exception" => TagKind::Throws,
            "since" => TagKind::Since,
            _ => TagKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    InDescription,
    InPreBlock {
        opened_at: usize,
    },
    InTag(TagKind),
}

#[derive(Debug)]
enum DescriptionBlock {
    Prose(String),
    Pre(Vec<String>),
}

#[derive(Debug, Default)]
struct Tokenizer {
    state: State,
    description: Vec<DescriptionBlock>,
    tags: Vec<(TagKind, String)>,
}

impl Tokenizer {
    fn feed_line(&mut self, line: &str, line_no: usize) -> Result<(), DocParseError> {
        if !matches!(self.state, State::InPreBlock { .. }) {
            if let Some(tag) = line.trim_start().strip_prefix('@') {
                let name_end = tag.find(char::is_whitespace).unwrap_or(tag.len());
                let (name, value) = tag.split_at(name_end);
                if name.is_empty() {
                    return Err(DocParseError::EmptyTagName { line: line_no });
                }
                let kind = TagKind::from_name(name);
                self.state = State::InTag(kind);
                self.tags.push((kind, value.trim().to_string()));
                return Ok(());
            }
        }

        match self.state {
            State::InTag(_) => {
                if let Some((_, value)) = self.tags.last_mut() {
                    value.push('\n');
                    value.push_str(line);
                }
            }
            State::InDescription | State::InPreBlock { .. } => self.feed_description(line, line_no),
        }
        Ok(())
    }

    fn feed_description(&mut self, line: &str, line_no: usize) {
        let mut rest = line;
        loop {
            match self.state {
                State::InPreBlock { .. } => match rest.find("</pre>") {
                    Some(pos) => {
                        self.push_pre_line(&rest[..pos]);
                        self.state = State::InDescription;
                        rest = &rest[pos + "</pre>".len()..];
                    }
                    None => {
                        self.push_pre_line(rest);
                        return;
                    }
                },
                _ => match rest.find("<pre>") {
                    Some(pos) => {
                        self.push_prose(&rest[..pos]);
                        self.description.push(DescriptionBlock::Pre(Vec::new()));
                        self.state = State::InPreBlock { opened_at: line_no };
                        rest = rest[pos + "<pre>".len()..].trim_start();
                    }
                    None => {
                        self.push_prose(rest);
                        return;
                    }
                },
            }
        }
    }

    fn push_prose(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        match self.description.last_mut() {
            Some(DescriptionBlock::Prose(prose)) => {
                prose.push('\n');
                prose.push_str(text);
            }
            _ => self.description.push(DescriptionBlock::Prose(text.to_string())),
        }
    }

    fn push_pre_line(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        if let Some(DescriptionBlock::Pre(lines)) = self.description.last_mut() {
            lines.push(text.trim_end().to_string());
        }
    }

    fn finish(self) -> Result<DocComment, DocParseError> {
        if let State::InPreBlock { opened_at } = self.state {
            return Err(DocParseError::UnterminatedPre { line: opened_at });
        }

        let mut doc = DocComment {
            description: render_description(&self.description),
            ..DocComment::default()
        };

        for (kind, value) in &self.tags {
            match kind {
                TagKind::Param => {
                    if let Some((name, text)) = split_first_word(value) {
                        doc.params.push(ParamDoc {
                            name: name.to_string(),
                            text: format_tag_content(text),
                        });
                    }
                }
                TagKind::Throws => {
                    if let Some((name, text)) = split_first_word(value) {
                        let type_name = name.rsplit('.').next().unwrap_or(name);
                        doc.throws.push(ThrowsDoc {
                            type_name: type_name.to_string(),
                            text: format_tag_content(text),
                        });
                    }
                }
                TagKind::Return if doc.returns.is_none() => {
                    doc.returns = Some(format_tag_content(value));
                }
                TagKind::Since if doc.since.is_none() => {
                    doc.since = Some(format_tag_content(value));
                }
                _ => {}
            }
        }

        Ok(doc)
    }
}

/// 去掉开头的 `/**` 和结尾的 `*/`，同时返回被跳过的行数，用于报错时定位原始行号
fn strip_delimiters(raw: &str) -> (&str, usize) {
    let trimmed = raw.trim_start();
    let mut skipped = raw[..raw.len() - trimmed.len()].matches('\n').count();
    let opened = trimmed.strip_prefix("/**").unwrap_or(trimmed);
    let body = opened.trim_start();
    skipped += opened[..opened.len() - body.len()].matches('\n').count();
    let body = body.trim_end();
    let body = body.strip_suffix("*/").unwrap_or(body).trim_end();
    (body, skipped)
}

/// 去掉行首的 `*` 标记和其后的一个空格，保留其余缩进
fn strip_marker(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => trimmed,
    }
}

fn split_first_word(value: &str) -> Option<(&str, &str)> {
    let value = value.trim_start();
    if value.is_empty() {
        return None;
    }
    let end = value.find(char::is_whitespace).unwrap_or(value.len());
    Some((&value[..end], value[end..].trim_start()))
}

fn render_description(blocks: &[DescriptionBlock]) -> String {
    let mut parts: Vec<String> = Vec::new();

    for block in blocks {
        match block {
            DescriptionBlock::Prose(text) => {
                let text = INLINE_MARKUP.replace_all(text, "");
                let text = ANCHOR.replace_all(&text, "$1");
                let text = text.replace("&trade;", "™");
                for paragraph in PARAGRAPH.split(&text) {
                    let joined = collapse_whitespace(paragraph);
                    if !joined.is_empty() {
                        parts.push(joined);
                    }
                }
            }
            DescriptionBlock::Pre(lines) if !lines.is_empty() => {
                // 只按ASCII空格计算公共缩进，全角空格等保留为内容
                let margin = lines
                    .iter()
                    .map(|line| line.len() - line.trim_start_matches(' ').len())
                    .min()
                    .unwrap_or(0);
                let block = lines
                    .iter()
                    .map(|line| format!("{}{}", INDENT, &line[margin..]))
                    .collect::<Vec<_>>()
                    .join("\n");
                parts.push(block);
            }
            DescriptionBlock::Pre(_) => {}
        }
    }

    parts.join("\n")
}

/// 标签内容格式化：去掉HTML标签、反转义 `&trade;`、合并空白
pub fn format_tag_content(text: &str) -> String {
    let text = HTML_TAG.replace_all(text, "");
    collapse_whitespace(&text.replace("&trade;", "™"))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_params_and_return_in_order() {
        let raw = "/**\n * Adds two numbers.\n * @param a first\n * @param b second\n * @return sum\n */";
        let doc = DocComment::parse(raw).unwrap();
        assert_eq!(doc.description, "Adds two numbers.");
        assert_eq!(
            doc.sections(),
            vec![
                DocTagSection::Description("Adds two numbers.".to_string()),
                DocTagSection::Params(vec![
                    ParamDoc { name: "a".into(), text: "first".into() },
                    ParamDoc { name: "b".into(), text: "second".into() },
                ]),
                DocTagSection::Returns("sum".to_string()),
            ]
        );
        assert_eq!(
            doc.render(),
            "Adds two numbers.\nParams:\n     a – first\n     b – second\nReturns:\n     sum"
        );
    }

    #[test]
    fn sections_follow_fixed_order_regardless_of_source_order() {
        let raw = "/**\n * Opens it.\n * @since 1.2\n * @throws java.io.IOException when the disk\n *         is gone\n * @return handle\n * @param path the <code>path</code>\n */";
        let rendered = DocComment::parse(raw).unwrap().render();
        assert_eq!(
            rendered,
            "Opens it.\nParams:\n     path – the path\nReturns:\n     handle\nThrows:\n     IOException – when the disk is gone\nSince:\n     1.2"
        );
    }

    #[test]
    fn description_markup_is_flattened() {
        let raw = "/**\n * The <tt>Foo</tt>&trade; class, see\n * <a href=\"https://example.com\">the docs</a>.\n * <p>\n * Second <cite>paragraph</cite>.\n */";
        let doc = DocComment::parse(raw).unwrap();
        assert_eq!(doc.description, "The Foo™ class, see the docs.\nSecond paragraph.");
    }

    #[test]
    fn pre_blocks_stay_multiline_and_indented() {
        let raw = "/**\n * Usage:\n * <pre>\n *   let x = 1;\n *     run(x);\n * </pre>\n * Done.\n */";
        let doc = DocComment::parse(raw).unwrap();
        assert_eq!(doc.description, "Usage:\n     let x = 1;\n       run(x);\nDone.");
    }

    #[test]
    fn pre_margin_ignores_full_width_indentation() {
        let raw = "/**\n * <pre>\n * \u{3000}x = 1;\n *  y = 2;\n * </pre>\n */";
        let doc = DocComment::parse(raw).unwrap();
        assert_eq!(doc.description, "     \u{3000}x = 1;\n      y = 2;");

        let raw = "/**\n * <pre>\n *   \u{a0}a\n *   b\n * </pre>\n */";
        let doc = DocComment::parse(raw).unwrap();
        assert_eq!(doc.description, "     \u{a0}a\n     b");
    }

    #[test]
    fn exception_is_an_alias_of_throws() {
        let raw = "/**\n * Closes it.\n * @exception java.lang.IllegalStateException if closed\n */";
        let doc = DocComment::parse(raw).unwrap();
        assert_eq!(
            doc.throws,
            vec![ThrowsDoc {
                type_name: "IllegalStateException".into(),
                text: "if closed".into(),
            }]
        );
        assert_eq!(
            doc.render(),
            "Closes it.\nThrows:\n     IllegalStateException – if closed"
        );
    }

    #[test]
    fn tags_inside_pre_are_content() {
        let raw = "/**\n * <pre>\n * @Override\n * </pre>\n */";
        let doc = DocComment::parse(raw).unwrap();
        assert_eq!(doc.description, "     @Override");
        assert!(doc.params.is_empty());
    }

    #[test]
    fn empty_sections_are_omitted() {
        let doc = DocComment::parse("/** @since 2.0 */").unwrap();
        assert_eq!(doc.render(), "Since:\n     2.0");

        let doc = DocComment::parse("/** Only text. */").unwrap();
        assert_eq!(doc.render(), "Only text.");
    }

    #[test]
    fn param_without_name_is_skipped_and_unknown_tags_ignored() {
        let raw = "/**\n * Text.\n * @param\n * @author someone\n * @see Other\n */";
        let doc = DocComment::parse(raw).unwrap();
        assert!(doc.params.is_empty());
        assert_eq!(doc.render(), "Text.");
    }

    #[test]
    fn only_first_return_is_used() {
        let raw = "/**\n * @return one\n * @return two\n */";
        assert_eq!(DocComment::parse(raw).unwrap().returns.as_deref(), Some("one"));
    }

    #[test]
    fn malformed_comments_report_errors() {
        assert_eq!(
            DocComment::parse("/**\n * a */ b\n */"),
            Err(DocParseError::StrayTerminator { line: 2 })
        );
        assert_eq!(
            DocComment::parse("/**\n * <pre>\n * code\n */"),
            Err(DocParseError::UnterminatedPre { line: 2 })
        );
        assert_eq!(
            DocComment::parse("/**\n * @ oops\n */"),
            Err(DocParseError::EmptyTagName { line: 2 })
        );
    }

    #[test]
    fn tag_content_formatter_strips_html() {
        assert_eq!(
            format_tag_content("  the <b>bold</b>\n   Acme&trade;  value "),
            "the bold Acme™ value"
        );
    }
}
