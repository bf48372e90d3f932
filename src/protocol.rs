//! Wire types for the parser service.
//!
//! A parse response carries the echoed input plus either a single `tree`
//! root or a flat `lists` sequence of top-level nodes. [`validate`] checks
//! the structural rules the renderer relies on before any panel is built,
//! so a bad response becomes a visible error state instead of a crash or a
//! silently wrong highlight.

use serde::Deserialize;

use crate::unicode::codepoint_len;

/// One parse result from the service.
///
/// Exactly one of `tree` and `lists` is populated in a well-formed
/// response; [`validate`] rejects the other shapes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParseResponse {
    pub input: String,
    #[serde(default)]
    pub tree: Option<AstNode>,
    #[serde(default)]
    pub lists: Option<Vec<AstNode>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AstNode {
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub children: Vec<AstNode>,
}

/// A node's extent in the parsed input.
///
/// All four fields are 1-indexed. Characters count codepoints from the
/// start of the input, lines count terminator sequences, and both end
/// bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Position {
    pub start_line: usize,
    pub end_line: usize,
    pub start_character: usize,
    pub end_character: usize,
}

impl ParseResponse {
    /// Top-level nodes, regardless of which response shape was used.
    pub fn roots(&self) -> &[AstNode] {
        if let Some(tree) = &self.tree {
            std::slice::from_ref(tree)
        } else if let Some(lists) = &self.lists {
            lists.as_slice()
        } else {
            &[]
        }
    }
}

/// Checks a decoded response against the structural rules in the wire
/// contract.
///
/// Rejected: neither or both of `tree`/`lists` populated, any zero
/// position field (they are 1-indexed), a reversed line or character
/// range, and an end character past one-beyond the input's codepoint
/// length. Walks every node with an explicit stack, so arbitrarily deep
/// trees cannot exhaust the call stack.
pub fn validate(response: &ParseResponse) -> Result<(), String> {
    match (&response.tree, &response.lists) {
        (Some(_), Some(_)) => {
            return Err("response contains both tree and lists".to_string());
        }
        (None, None) => {
            return Err("response contains neither tree nor lists".to_string());
        }
        _ => {}
    }

    let input_len = codepoint_len(&response.input);
    let mut stack: Vec<&AstNode> = response.roots().iter().collect();
    while let Some(node) = stack.pop() {
        check_position(&node.name, node.position, input_len)?;
        stack.extend(node.children.iter());
    }
    Ok(())
}

fn check_position(name: &str, position: Position, input_len: usize) -> Result<(), String> {
    let Position {
        start_line,
        end_line,
        start_character,
        end_character,
    } = position;
    if start_line == 0 || end_line == 0 || start_character == 0 || end_character == 0 {
        return Err(format!("node '{}' has a zero position field", name));
    }
    if start_line > end_line {
        return Err(format!(
            "node '{}' has start_line {} after end_line {}",
            name, start_line, end_line
        ));
    }
    if start_character > end_character {
        return Err(format!(
            "node '{}' has start_character {} after end_character {}",
            name, start_character, end_character
        ));
    }
    // end_character is exclusive, so input_len + 1 is the last valid value.
    if end_character > input_len + 1 {
        return Err(format!(
            "node '{}' ends at character {} but the input has {} codepoints",
            name, end_character, input_len
        ));
    }
    Ok(())
}
