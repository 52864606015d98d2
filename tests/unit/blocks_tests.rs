/*!
 * Tests for the markdown block model: rendering rules, serialization and
 * translation state
 */

use md_translate::document::Block;
use serde_json::json;

fn text(value: &str) -> Block {
    Block::text(value)
}

fn item(level: usize, children: Vec<Block>) -> Block {
    Block::ListItemBlock {
        children,
        nested_children: Vec::new(),
        level,
    }
}

/// Test heading rendering
#[test]
fn test_heading_render_withLevelThree_shouldPrefixMarks() {
    let block = Block::HeadingBlock {
        level: 3,
        children: vec![text("Title")],
        translated_data: None,
    };
    assert_eq!(block.render(), "### Title");
}

/// Test emphasis and strong rendering
#[test]
fn test_emphasis_render_withNestedText_shouldUseCanonicalMarks() {
    let strong = Block::StrongTextBlock {
        children: vec![text("bold")],
        translated_data: None,
    };
    let emphasis = Block::EmphasisTextBlock {
        children: vec![text("italic")],
        translated_data: None,
    };
    assert_eq!(strong.render(), "**bold**");
    assert_eq!(emphasis.render(), "*italic*");
}

/// Test link rendering with and without a title
#[test]
fn test_link_render_withTitle_shouldAppendQuotedSegment() {
    let plain = Block::LinkBlock {
        url: "https://example.com".to_string(),
        title: None,
        children: vec![text("label")],
        translated_data: None,
    };
    let titled = Block::LinkBlock {
        url: "https://example.com".to_string(),
        title: Some("Example".to_string()),
        children: vec![text("label")],
        translated_data: None,
    };
    assert_eq!(plain.render(), "[label](https://example.com)");
    assert_eq!(titled.render(), "[label](https://example.com \"Example\")");
}

/// Test image rendering
#[test]
fn test_image_render_withTitle_shouldAppendQuotedSegment() {
    let image = Block::ImageBlock {
        url: "image.png".to_string(),
        alt: "alt text".to_string(),
        title: Some("A picture".to_string()),
        translated_data: None,
    };
    assert_eq!(image.render(), "![alt text](image.png \"A picture\")");
}

/// Test code span rendering when the code itself contains a backtick
#[test]
fn test_code_span_render_withBacktick_shouldDoubleWrap() {
    let plain = Block::CodeSpanBlock {
        code: "foo()".to_string(),
    };
    let tricky = Block::CodeSpanBlock {
        code: "a`b".to_string(),
    };
    assert_eq!(plain.render(), "`foo()`");
    assert_eq!(tricky.render(), "``a`b``");
}

/// Test code block construction strips surrounding blank lines
#[test]
fn test_code_block_withBlankLines_shouldStripThem() {
    let block = Block::code_block("\n\nlet x = 1;\n\n", Some("rust".to_string()));
    assert_eq!(block.render(), "```rust\nlet x = 1;\n```");
}

/// Test code block rendering without a language
#[test]
fn test_code_block_withoutLanguage_shouldOmitIt() {
    let block = Block::code_block("pass", None);
    assert_eq!(block.render(), "```\npass\n```");
}

/// Test separator and line break rendering
#[test]
fn test_structural_leaves_render_shouldUseFixedText() {
    assert_eq!(Block::SeparatorBlock.render(), "---");
    assert_eq!(Block::LineBreakBlock.render(), "  \n");
    assert_eq!(Block::NewlineBlock.render(), "\n");
}

/// Test ordered list renumbering from the start value
#[test]
fn test_ordered_list_render_withStart_shouldRenumberSequentially() {
    let list = Block::ListBlock {
        children: vec![
            item(1, vec![text("a")]),
            item(1, vec![text("b")]),
            item(1, vec![text("c")]),
        ],
        ordered: true,
        level: 1,
        start: Some(3),
    };
    assert_eq!(list.render(), "3. a\n4. b\n5. c");
}

/// Test unordered marks cycling by nesting level
#[test]
fn test_unordered_list_render_withDeeperLevels_shouldCycleMarks() {
    let level_one = Block::ListBlock {
        children: vec![item(1, vec![text("a")])],
        ordered: false,
        level: 1,
        start: None,
    };
    let level_two = Block::ListBlock {
        children: vec![item(2, vec![text("b")])],
        ordered: false,
        level: 2,
        start: None,
    };
    let level_four = Block::ListBlock {
        children: vec![item(4, vec![text("c")])],
        ordered: false,
        level: 4,
        start: None,
    };
    assert_eq!(level_one.render(), "* a");
    assert_eq!(level_two.render(), "- b");
    // Levels wrap around modulo the three marks
    assert_eq!(level_four.render(), "* c");
}

/// Test nested sub-list indentation inside a list item
#[test]
fn test_list_item_render_withNestedList_shouldIndentFourSpaces() {
    let nested = Block::ListBlock {
        children: vec![item(2, vec![text("inner")])],
        ordered: false,
        level: 2,
        start: None,
    };
    let outer_item = Block::ListItemBlock {
        children: vec![text("outer")],
        nested_children: vec![nested],
        level: 1,
    };
    assert_eq!(outer_item.render(), "outer\n    - inner");
}

/// Test blockquote rendering of the newline sentinel and nested quotes
#[test]
fn test_blockquote_render_withSentinelAndNestedQuote_shouldPrefixLines() {
    let quote = Block::BlockQuote {
        children: vec![
            Block::Paragraph {
                children: vec![text("Outer.")],
            },
            Block::NewlineBlock,
            Block::BlockQuote {
                children: vec![Block::Paragraph {
                    children: vec![text("Inner.")],
                }],
            },
        ],
    };
    assert_eq!(quote.render(), "> Outer.\n>\n>> Inner.");
}

/// Test multi-line children are quoted line by line
#[test]
fn test_blockquote_render_withMultilineChild_shouldQuoteEveryLine() {
    let quote = Block::BlockQuote {
        children: vec![Block::Paragraph {
            children: vec![text("first\nsecond")],
        }],
    };
    assert_eq!(quote.render(), "> first\n> second");
}

/// Test serialization carries the block_type tag and skips unset options
#[test]
fn test_serialize_withTextBlock_shouldTagBlockType() {
    let block = text("hi");
    assert_eq!(
        serde_json::to_value(&block).unwrap(),
        json!({"block_type": "TextBlock", "text": "hi"})
    );
}

/// Test nested serialization of containers preserves child order
#[test]
fn test_serialize_withHeading_shouldNestChildren() {
    let block = Block::HeadingBlock {
        level: 1,
        children: vec![text("Heading 1")],
        translated_data: None,
    };
    assert_eq!(
        serde_json::to_value(&block).unwrap(),
        json!({
            "block_type": "HeadingBlock",
            "level": 1,
            "children": [{"block_type": "TextBlock", "text": "Heading 1"}],
        })
    );
}

/// Test the serialization round-trip restores the exact value
#[test]
fn test_serialize_roundTrip_shouldRestoreExactValue() {
    let block = Block::ListBlock {
        children: vec![Block::ListItemBlock {
            children: vec![
                text("label "),
                Block::LinkBlock {
                    url: "https://example.com".to_string(),
                    title: Some("t".to_string()),
                    children: vec![text("link")],
                    translated_data: Some("translated link".to_string()),
                },
            ],
            nested_children: vec![Block::ListBlock {
                children: vec![item(2, vec![text("inner")])],
                ordered: false,
                level: 2,
                start: None,
            }],
            level: 1,
        }],
        ordered: true,
        level: 1,
        start: Some(1),
    };
    let value = serde_json::to_value(&block).unwrap();
    let restored: Block = serde_json::from_value(value).unwrap();
    assert_eq!(restored, block);
}

/// Test deserialization of an unknown block type fails hard
#[test]
fn test_deserialize_withUnknownBlockType_shouldFail() {
    let result = serde_json::from_value::<Block>(json!({"block_type": "MysteryBlock"}));
    assert!(result.is_err());
}

/// Test deserialization with missing fields fails hard
#[test]
fn test_deserialize_withMissingFields_shouldFail() {
    let result = serde_json::from_value::<Block>(json!({"block_type": "TextBlock"}));
    assert!(result.is_err());
}

/// Test the translation state predicate
#[test]
fn test_should_be_translated_withTranslatableStates_shouldFollowPayload() {
    let mut block = text("hello");
    assert!(block.should_be_translated());
    assert!(block.set_translated_data("bonjour".to_string()));
    assert!(!block.should_be_translated());
    assert_eq!(block.translated_data(), Some("bonjour"));
}

/// Test structural variants refuse a translation payload
#[test]
fn test_set_translated_data_withStructuralVariant_shouldRefuse() {
    let mut separator = Block::SeparatorBlock;
    assert!(!separator.set_translated_data("nope".to_string()));
    assert!(separator.translated_data().is_none());
    assert!(!separator.is_translatable());

    let mut paragraph = Block::Paragraph {
        children: vec![text("hi")],
    };
    assert!(!paragraph.set_translated_data("nope".to_string()));
    assert!(paragraph.translated_data().is_none());
}

/// Test has_translated sees through containers
#[test]
fn test_has_translated_withDeepChild_shouldRecurse() {
    let mut paragraph = Block::Paragraph {
        children: vec![text("hi")],
    };
    assert!(!paragraph.has_translated());
    paragraph.children_mut()[0].set_translated_data("salut".to_string());
    assert!(paragraph.has_translated());
}

/// Test translated rendering substitutes payloads through containers
#[test]
fn test_render_translated_withPayload_shouldSubstitute() {
    let mut paragraph = Block::Paragraph {
        children: vec![text("Hello "), text("world")],
    };
    paragraph.children_mut()[1].set_translated_data("le monde".to_string());
    assert_eq!(paragraph.render(), "Hello world");
    assert_eq!(paragraph.render_translated(), "Hello le monde");
}
