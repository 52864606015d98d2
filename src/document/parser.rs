/*!
 * Adapter from the pulldown-cmark event stream to the block model.
 *
 * The adapter is a pure function of the markdown text: identical input yields
 * a structurally identical tree, and no state survives between calls. Events
 * are folded over a stack of open container frames; each `End` event closes
 * the top frame and attaches the finished block to its parent.
 *
 * Constructs outside the supported subset fail parsing with an explicit
 * error instead of degrading silently.
 */

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag};

use crate::errors::DocumentError;

use super::blocks::Block;

/// Parse markdown text into the ordered top-level block list.
///
/// Newline sentinels are retained inside quote bodies but filtered from the
/// returned top-level list.
pub fn parse_blocks(text: &str) -> Result<Vec<Block>, DocumentError> {
    let mut builder = TreeBuilder::new();
    for event in Parser::new(text) {
        builder.handle(event)?;
    }
    builder.finish()
}

/// An open construct whose children are still being collected
enum Frame {
    Root {
        children: Vec<Block>,
    },
    Paragraph {
        children: Vec<Block>,
    },
    Heading {
        level: usize,
        children: Vec<Block>,
    },
    BlockQuote {
        children: Vec<Block>,
    },
    Emphasis {
        children: Vec<Block>,
    },
    Strong {
        children: Vec<Block>,
    },
    Link {
        url: String,
        title: Option<String>,
        children: Vec<Block>,
    },
    Image {
        url: String,
        title: Option<String>,
        alt: String,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    HtmlBlock {
        code: String,
    },
    List {
        ordered: bool,
        start: Option<u64>,
        level: usize,
        children: Vec<Block>,
    },
    Item {
        level: usize,
        children: Vec<Block>,
    },
}

struct TreeBuilder {
    stack: Vec<Frame>,
    list_depth: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            stack: vec![Frame::Root {
                children: Vec::new(),
            }],
            list_depth: 0,
        }
    }

    fn handle(&mut self, event: Event) -> Result<(), DocumentError> {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => {
                self.close();
                Ok(())
            }
            Event::Text(text) => {
                self.push_text(&text);
                Ok(())
            }
            Event::Code(code) => {
                self.push_block(Block::CodeSpanBlock {
                    code: code.to_string(),
                });
                Ok(())
            }
            Event::Html(html) => {
                // Block HTML arrives inside an HtmlBlock frame; a stray event
                // becomes a standalone block.
                if let Some(Frame::HtmlBlock { code }) = self.stack.last_mut() {
                    code.push_str(&html);
                } else {
                    self.push_block(Block::HtmlBlock {
                        code: html.trim_end_matches('\n').to_string(),
                    });
                }
                Ok(())
            }
            Event::InlineHtml(html) => {
                self.push_block(Block::InlineHtmlBlock {
                    code: html.to_string(),
                });
                Ok(())
            }
            Event::SoftBreak => {
                self.push_text("\n");
                Ok(())
            }
            Event::HardBreak => {
                self.push_block(Block::LineBreakBlock);
                Ok(())
            }
            Event::Rule => {
                self.push_block(Block::SeparatorBlock);
                Ok(())
            }
            other => Err(DocumentError::UnsupportedConstruct(format!("{:?}", other))),
        }
    }

    fn start(&mut self, tag: Tag) -> Result<(), DocumentError> {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph {
                children: Vec::new(),
            },
            Tag::Heading { level, .. } => Frame::Heading {
                level: heading_level(level),
                children: Vec::new(),
            },
            Tag::BlockQuote(_) => Frame::BlockQuote {
                children: Vec::new(),
            },
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                Frame::CodeBlock {
                    language,
                    code: String::new(),
                }
            }
            Tag::HtmlBlock => Frame::HtmlBlock {
                code: String::new(),
            },
            Tag::List(start) => {
                self.list_depth += 1;
                Frame::List {
                    ordered: start.is_some(),
                    start,
                    level: self.list_depth,
                    children: Vec::new(),
                }
            }
            Tag::Item => Frame::Item {
                level: self.list_depth,
                children: Vec::new(),
            },
            Tag::Emphasis => Frame::Emphasis {
                children: Vec::new(),
            },
            Tag::Strong => Frame::Strong {
                children: Vec::new(),
            },
            Tag::Link {
                dest_url, title, ..
            } => Frame::Link {
                url: dest_url.to_string(),
                title: non_empty(&title),
                children: Vec::new(),
            },
            Tag::Image {
                dest_url, title, ..
            } => Frame::Image {
                url: dest_url.to_string(),
                title: non_empty(&title),
                alt: String::new(),
            },
            other => {
                return Err(DocumentError::UnsupportedConstruct(format!("{:?}", other)));
            }
        };
        self.stack.push(frame);
        Ok(())
    }

    /// Close the top frame and attach the finished block to its parent
    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Root { children } => {
                // The root is never closed by an event; restore it.
                self.stack.push(Frame::Root { children });
            }
            Frame::Paragraph { children } => {
                if !children.is_empty() {
                    self.push_block(Block::Paragraph { children });
                }
            }
            Frame::Heading { level, children } => {
                self.push_block(Block::HeadingBlock {
                    level,
                    children,
                    translated_data: None,
                });
            }
            Frame::BlockQuote { children } => {
                // Blank quote lines separate sibling blocks inside a quote;
                // the sentinel renders back as a bare ">".
                let mut interleaved = Vec::with_capacity(children.len() * 2);
                for (i, child) in children.into_iter().enumerate() {
                    if i > 0 {
                        interleaved.push(Block::NewlineBlock);
                    }
                    interleaved.push(child);
                }
                self.push_block(Block::BlockQuote {
                    children: interleaved,
                });
            }
            Frame::Emphasis { children } => {
                self.push_block(Block::EmphasisTextBlock {
                    children,
                    translated_data: None,
                });
            }
            Frame::Strong { children } => {
                self.push_block(Block::StrongTextBlock {
                    children,
                    translated_data: None,
                });
            }
            Frame::Link {
                url,
                title,
                children,
            } => {
                self.push_block(Block::LinkBlock {
                    url,
                    title,
                    children,
                    translated_data: None,
                });
            }
            Frame::Image { url, title, alt } => {
                self.push_block(Block::ImageBlock {
                    url,
                    alt,
                    title,
                    translated_data: None,
                });
            }
            Frame::CodeBlock { language, code } => {
                self.push_block(Block::code_block(&code, language));
            }
            Frame::HtmlBlock { code } => {
                self.push_block(Block::HtmlBlock {
                    code: code.trim_end_matches('\n').to_string(),
                });
            }
            Frame::List {
                ordered,
                start,
                level,
                children,
            } => {
                self.list_depth = self.list_depth.saturating_sub(1);
                self.push_block(Block::ListBlock {
                    children,
                    ordered,
                    level,
                    start,
                });
            }
            Frame::Item {
                level,
                mut children,
            } => {
                // Own content first, then trailing sub-lists and quote
                // continuations become the nested group.
                let split = children
                    .iter()
                    .position(|c| matches!(c, Block::ListBlock { .. } | Block::BlockQuote { .. }))
                    .unwrap_or(children.len());
                let nested_children = children.split_off(split);
                // Loose items wrap their content in a paragraph; unwrap it so
                // item content stays inline like in tight lists.
                let children = if let [Block::Paragraph { .. }] = children.as_slice() {
                    match children.pop() {
                        Some(Block::Paragraph { children }) => children,
                        _ => Vec::new(),
                    }
                } else {
                    children
                };
                self.push_block(Block::ListItemBlock {
                    children,
                    nested_children,
                    level,
                });
            }
        }
    }

    fn push_block(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(Frame::Root { children })
            | Some(Frame::Paragraph { children })
            | Some(Frame::Heading { children, .. })
            | Some(Frame::BlockQuote { children })
            | Some(Frame::Emphasis { children })
            | Some(Frame::Strong { children })
            | Some(Frame::Link { children, .. })
            | Some(Frame::List { children, .. })
            | Some(Frame::Item { children, .. }) => children.push(block),
            // Inline constructs inside an image contribute to its alt text.
            Some(Frame::Image { alt, .. }) => alt.push_str(&block.render()),
            Some(Frame::CodeBlock { code, .. }) | Some(Frame::HtmlBlock { code }) => {
                code.push_str(&block.render());
            }
            None => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        match self.stack.last_mut() {
            Some(Frame::Image { alt, .. }) => {
                alt.push_str(text);
                return;
            }
            Some(Frame::CodeBlock { code, .. }) | Some(Frame::HtmlBlock { code }) => {
                code.push_str(text);
                return;
            }
            _ => {}
        }
        // Merge adjacent text runs so a paragraph split over soft breaks
        // stays a single text block.
        if let Some(Block::TextBlock {
            text: existing,
            translated_data: None,
        }) = self.current_children_mut().and_then(|c| c.last_mut())
        {
            existing.push_str(text);
            return;
        }
        self.push_block(Block::text(text));
    }

    fn current_children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self.stack.last_mut() {
            Some(Frame::Root { children })
            | Some(Frame::Paragraph { children })
            | Some(Frame::Heading { children, .. })
            | Some(Frame::BlockQuote { children })
            | Some(Frame::Emphasis { children })
            | Some(Frame::Strong { children })
            | Some(Frame::Link { children, .. })
            | Some(Frame::List { children, .. })
            | Some(Frame::Item { children, .. }) => Some(children),
            _ => None,
        }
    }

    fn finish(mut self) -> Result<Vec<Block>, DocumentError> {
        debug_assert_eq!(self.stack.len(), 1, "unbalanced markdown event stream");
        match self.stack.pop() {
            Some(Frame::Root { children }) => Ok(children
                .into_iter()
                .filter(|b| !matches!(b, Block::NewlineBlock))
                .collect()),
            _ => Err(DocumentError::UnsupportedConstruct(
                "unbalanced markdown event stream".to_string(),
            )),
        }
    }
}

fn heading_level(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
