//! 注释规范化模块
//!
//! 把选中的原始文本整理成可以直接翻译的内容。
//! 处理方式由调用方通过 [`CommentMode`] 指定，不做自动判断。

use crate::doc_comment::DocComment;
use crate::types::{CommentMode, NormalizedText};

/// 注释分隔符，出现在任意位置都会被去掉
const DELIMITERS: [&str; 3] = ["/**", "/*", "*/"];

/// 规范化文本
///
/// * `CommentMode::DocComment` - 解析文档注释标签并重新排版。
///   解析失败时不会中断流程，错误信息本身作为待翻译内容返回。
/// * `CommentMode::Plain` - 只去掉注释符号和行首的 `*`。
pub fn normalize(text: &str, mode: CommentMode) -> NormalizedText {
    match mode {
        CommentMode::DocComment => {
            let content = match DocComment::parse(text) {
                Ok(doc) => doc.render(),
                Err(e) => {
                    log::warn!("文档注释解析失败，使用错误信息代替: {}", e);
                    format!("Error parsing doc comment: {}", e)
                }
            };
            NormalizedText {
                content,
                was_structured_comment: true,
            }
        }
        CommentMode::Plain => NormalizedText {
            content: strip_plain_comment(text),
            was_structured_comment: false,
        },
    }
}

/// 去掉注释符号
///
/// 删除所有 `/**`、`/*`、`*/`，每行去掉首尾空白以及行首连续的 `*` 标记（如 `** `、`* * `），
/// 最后去掉首尾的空行。输出再处理一次结果不变。
pub fn strip_plain_comment(text: &str) -> String {
    let mut stripped = text.to_string();
    // 删除后可能拼出新的分隔符，例如 `**//` 去掉 `*/` 后还剩 `*/`
    while DELIMITERS.iter().any(|delimiter| stripped.contains(delimiter)) {
        for delimiter in DELIMITERS {
            stripped = stripped.replace(delimiter, "");
        }
    }

    let lines: Vec<&str> = stripped
        .lines()
        .map(|line| {
            line.trim_start_matches(|c: char| c == '*' || c.is_whitespace())
                .trim_end()
        })
        .collect();

    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}
