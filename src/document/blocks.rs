/*!
 * The markdown block model.
 *
 * A parsed document is a tree of `Block` nodes. Every variant knows how to
 * render itself back to markdown text, and the whole tree serializes to JSON
 * with a `block_type` tag per node, which is the checkpoint wire format.
 *
 * Translatable variants carry an optional `translated_data` payload that is
 * filled in by the translation pass; structural containers (paragraphs,
 * lists, list items, quotes) never do.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marks used for unordered list items, cycled by nesting level
const LIST_MARKS: [char; 3] = ['*', '-', '+'];

/// A node in the parsed markdown tree.
///
/// The enum is closed: deserializing an unknown `block_type` fails hard,
/// which is the desired behavior for a corrupted checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block_type")]
pub enum Block {
    /// Top-level paragraph wrapping a run of inline blocks
    Paragraph {
        children: Vec<Block>,
    },

    /// Plain text run
    TextBlock {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translated_data: Option<String>,
    },

    /// Bold span, rendered with `**`
    StrongTextBlock {
        children: Vec<Block>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translated_data: Option<String>,
    },

    /// Italic span, canonicalized to `*`
    EmphasisTextBlock {
        children: Vec<Block>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translated_data: Option<String>,
    },

    /// Inline link with label children and an optional quoted title
    LinkBlock {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Block>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translated_data: Option<String>,
    },

    /// Inline image
    ImageBlock {
        url: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translated_data: Option<String>,
    },

    /// ATX heading, levels 1-6
    HeadingBlock {
        level: usize,
        children: Vec<Block>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translated_data: Option<String>,
    },

    /// Thematic break
    SeparatorBlock,

    /// Inline code span
    CodeSpanBlock {
        code: String,
    },

    /// Fenced code block; code is stored without surrounding blank lines
    CodeBlock {
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },

    /// Block-level HTML, emitted verbatim
    HtmlBlock {
        code: String,
    },

    /// Inline HTML, emitted verbatim
    InlineHtmlBlock {
        code: String,
    },

    /// One list item: own content plus trailing nested sub-blocks
    ListItemBlock {
        children: Vec<Block>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        nested_children: Vec<Block>,
        level: usize,
    },

    /// Ordered or unordered list of items
    ListBlock {
        children: Vec<Block>,
        ordered: bool,
        level: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
    },

    /// Hard line break (two trailing spaces)
    LineBreakBlock,

    /// Blank-line sentinel between sibling blocks inside a quote.
    /// Filtered from the top-level block list of a parsed document.
    NewlineBlock,

    /// Quoted region; children may include `NewlineBlock` separators
    BlockQuote {
        children: Vec<Block>,
    },
}

impl Block {
    /// Build a plain text block
    pub fn text<S: Into<String>>(text: S) -> Block {
        Block::TextBlock {
            text: text.into(),
            translated_data: None,
        }
    }

    /// Build a code block, stripping leading and trailing blank lines
    pub fn code_block(code: &str, language: Option<String>) -> Block {
        Block::CodeBlock {
            code: strip_blank_lines(code),
            language: language.filter(|l| !l.is_empty()),
        }
    }

    /// Whether this variant is a candidate for translation at all
    pub fn is_translatable(&self) -> bool {
        matches!(
            self,
            Block::TextBlock { .. }
                | Block::StrongTextBlock { .. }
                | Block::EmphasisTextBlock { .. }
                | Block::LinkBlock { .. }
                | Block::ImageBlock { .. }
                | Block::HeadingBlock { .. }
        )
    }

    /// Whether this node still needs a translation attached
    pub fn should_be_translated(&self) -> bool {
        self.is_translatable() && self.translated_data().is_none()
    }

    /// The attached translation, if any
    pub fn translated_data(&self) -> Option<&str> {
        match self {
            Block::TextBlock { translated_data, .. }
            | Block::StrongTextBlock { translated_data, .. }
            | Block::EmphasisTextBlock { translated_data, .. }
            | Block::LinkBlock { translated_data, .. }
            | Block::ImageBlock { translated_data, .. }
            | Block::HeadingBlock { translated_data, .. } => translated_data.as_deref(),
            _ => None,
        }
    }

    /// Attach a translation to a translatable node.
    ///
    /// Returns false (and changes nothing) for structural variants, which by
    /// construction cannot carry a translation.
    pub fn set_translated_data(&mut self, data: String) -> bool {
        match self {
            Block::TextBlock { translated_data, .. }
            | Block::StrongTextBlock { translated_data, .. }
            | Block::EmphasisTextBlock { translated_data, .. }
            | Block::LinkBlock { translated_data, .. }
            | Block::ImageBlock { translated_data, .. }
            | Block::HeadingBlock { translated_data, .. } => {
                *translated_data = Some(data);
                true
            }
            _ => false,
        }
    }

    /// Direct children of this node, empty for leaves
    pub fn children(&self) -> &[Block] {
        match self {
            Block::Paragraph { children, .. }
            | Block::StrongTextBlock { children, .. }
            | Block::EmphasisTextBlock { children, .. }
            | Block::LinkBlock { children, .. }
            | Block::HeadingBlock { children, .. }
            | Block::ListItemBlock { children, .. }
            | Block::ListBlock { children, .. }
            | Block::BlockQuote { children, .. } => children,
            _ => &[],
        }
    }

    /// Mutable access to the direct children
    pub fn children_mut(&mut self) -> &mut [Block] {
        match self {
            Block::Paragraph { children, .. }
            | Block::StrongTextBlock { children, .. }
            | Block::EmphasisTextBlock { children, .. }
            | Block::LinkBlock { children, .. }
            | Block::HeadingBlock { children, .. }
            | Block::ListItemBlock { children, .. }
            | Block::ListBlock { children, .. }
            | Block::BlockQuote { children, .. } => children,
            _ => &mut [],
        }
    }

    /// Nested sub-blocks of a list item (sub-lists, quote continuations)
    pub fn nested_children(&self) -> &[Block] {
        match self {
            Block::ListItemBlock {
                nested_children, ..
            } => nested_children,
            _ => &[],
        }
    }

    /// Mutable access to a list item's nested sub-blocks
    pub fn nested_children_mut(&mut self) -> &mut [Block] {
        match self {
            Block::ListItemBlock {
                nested_children, ..
            } => nested_children,
            _ => &mut [],
        }
    }

    /// Whether any node in this subtree carries a translation
    pub fn has_translated(&self) -> bool {
        self.translated_data().is_some()
            || self.children().iter().any(|c| c.has_translated())
            || self.nested_children().iter().any(|c| c.has_translated())
    }

    /// Render the original markdown text of this subtree
    pub fn render(&self) -> String {
        self.render_inner(false)
    }

    /// Render the subtree with translations substituted for originals.
    ///
    /// A node carrying `translated_data` renders that payload verbatim;
    /// containers recurse so that translated leaves surface through their
    /// structural parents.
    pub fn render_translated(&self) -> String {
        self.render_inner(true)
    }

    fn render_inner(&self, translated: bool) -> String {
        if translated {
            if let Some(data) = self.translated_data() {
                return data.to_string();
            }
        }
        match self {
            Block::Paragraph { children } => render_joined(children, translated),
            Block::TextBlock { text, .. } => text.clone(),
            Block::StrongTextBlock { children, .. } => {
                format!("**{}**", render_joined(children, translated))
            }
            Block::EmphasisTextBlock { children, .. } => {
                format!("*{}*", render_joined(children, translated))
            }
            Block::LinkBlock {
                url,
                title,
                children,
                ..
            } => {
                format!(
                    "[{}]({}{})",
                    render_joined(children, translated),
                    url,
                    title_segment(title)
                )
            }
            Block::ImageBlock {
                url, alt, title, ..
            } => {
                format!("![{}]({}{})", alt, url, title_segment(title))
            }
            Block::HeadingBlock {
                level, children, ..
            } => {
                format!("{} {}", "#".repeat(*level), render_joined(children, translated))
            }
            Block::SeparatorBlock => "---".to_string(),
            Block::CodeSpanBlock { code } => {
                if code.contains('`') {
                    format!("``{}``", code)
                } else {
                    format!("`{}`", code)
                }
            }
            Block::CodeBlock { code, language } => {
                format!("```{}\n{}\n```", language.as_deref().unwrap_or(""), code)
            }
            Block::HtmlBlock { code } => code.clone(),
            Block::InlineHtmlBlock { code } => code.clone(),
            Block::ListItemBlock {
                children,
                nested_children,
                ..
            } => {
                let mut result = render_joined(children, translated);
                if !nested_children.is_empty() {
                    let nested = nested_children
                        .iter()
                        .map(|c| c.render_inner(translated))
                        .collect::<Vec<_>>()
                        .join("\n");
                    let indented = nested
                        .lines()
                        .map(|line| format!("    {}", line))
                        .collect::<Vec<_>>()
                        .join("\n");
                    result.push('\n');
                    result.push_str(&indented);
                }
                result
            }
            Block::ListBlock {
                children,
                ordered,
                level,
                start,
            } => {
                let mut rendered = Vec::with_capacity(children.len());
                if *ordered {
                    let start = start.unwrap_or(1);
                    for (i, child) in children.iter().enumerate() {
                        rendered.push(format!(
                            "{}. {}",
                            start + i as u64,
                            child.render_inner(translated)
                        ));
                    }
                } else {
                    for child in children {
                        let item_level = match child {
                            Block::ListItemBlock { level, .. } => *level,
                            _ => *level,
                        };
                        let mark =
                            LIST_MARKS[item_level.saturating_sub(1) % LIST_MARKS.len()];
                        rendered.push(format!("{} {}", mark, child.render_inner(translated)));
                    }
                }
                rendered.join("\n")
            }
            Block::LineBreakBlock => "  \n".to_string(),
            Block::NewlineBlock => "\n".to_string(),
            Block::BlockQuote { children } => {
                let mut result = Vec::with_capacity(children.len());
                for child in children {
                    let rendered = child.render_inner(translated);
                    if rendered == "\n" {
                        result.push(">".to_string());
                        continue;
                    }
                    let quoted = rendered
                        .lines()
                        .map(|line| {
                            if line.is_empty() {
                                ">".to_string()
                            } else if line.starts_with('>') {
                                format!(">{}", line)
                            } else {
                                format!("> {}", line)
                            }
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    result.push(quoted);
                }
                result.join("\n")
            }
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn render_joined(children: &[Block], translated: bool) -> String {
    children
        .iter()
        .map(|c| c.render_inner(translated))
        .collect()
}

fn title_segment(title: &Option<String>) -> String {
    match title {
        Some(title) => format!(" \"{}\"", title),
        None => String::new(),
    }
}

fn strip_blank_lines(code: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}
