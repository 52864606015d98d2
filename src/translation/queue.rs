/*!
 * Translation queue: ordered addressing of translatable nodes.
 *
 * The queue is the list of tree paths of every node that still needs a
 * translation, in depth-first, left-to-right order. That order is document
 * order, and it determines both the output interleaving and the
 * resume-after-crash point, so it must be stable for a given tree.
 *
 * Traversal stops descending at a translatable node: a heading or emphasis
 * span is translated as one rendered unit, never its inline children
 * separately.
 */

use crate::document::Block;

/// One step down the tree: into a block's children, or into a list item's
/// trailing nested group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// Index into `children`
    Child(usize),
    /// Index into `nested_children`
    Nested(usize),
}

/// Address of one block relative to the top-level block list
pub type BlockPath = Vec<PathStep>;

/// Collect the paths of all blocks that still need translating
pub fn translation_queue(blocks: &[Block]) -> Vec<BlockPath> {
    let mut queue = Vec::new();
    let mut prefix = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        prefix.push(PathStep::Child(i));
        visit(block, &mut prefix, &mut queue);
        prefix.pop();
    }
    queue
}

fn visit(block: &Block, prefix: &mut BlockPath, queue: &mut Vec<BlockPath>) {
    if block.is_translatable() {
        if block.translated_data().is_none() {
            queue.push(prefix.clone());
        }
        return;
    }
    for (i, child) in block.children().iter().enumerate() {
        prefix.push(PathStep::Child(i));
        visit(child, prefix, queue);
        prefix.pop();
    }
    for (i, child) in block.nested_children().iter().enumerate() {
        prefix.push(PathStep::Nested(i));
        visit(child, prefix, queue);
        prefix.pop();
    }
}

/// Resolve a path to a shared block reference
pub fn resolve<'a>(blocks: &'a [Block], path: &[PathStep]) -> Option<&'a Block> {
    let (first, rest) = path.split_first()?;
    let mut current = match first {
        PathStep::Child(i) => blocks.get(*i)?,
        PathStep::Nested(_) => return None,
    };
    for step in rest {
        current = match step {
            PathStep::Child(i) => current.children().get(*i)?,
            PathStep::Nested(i) => current.nested_children().get(*i)?,
        };
    }
    Some(current)
}

/// Resolve a path to a mutable block reference
pub fn resolve_mut<'a>(blocks: &'a mut [Block], path: &[PathStep]) -> Option<&'a mut Block> {
    let (first, rest) = path.split_first()?;
    let mut current = match first {
        PathStep::Child(i) => blocks.get_mut(*i)?,
        PathStep::Nested(_) => return None,
    };
    for step in rest {
        current = match step {
            PathStep::Child(i) => current.children_mut().get_mut(*i)?,
            PathStep::Nested(i) => current.nested_children_mut().get_mut(*i)?,
        };
    }
    Some(current)
}
