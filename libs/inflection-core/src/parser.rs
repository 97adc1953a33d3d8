//! Text formats: tab-separated tables and bracket templates.
//!
//! # Tables
//! ```text
//! # finite conjugations
//! verb	person	number	tense	form
//! be	1	singular	present	am
//! ```
//!
//! # Templates
//! ```text
//! [clause [agent np the [n man]] [vp [cloze [v eat]]]]
//! ```

use crate::error::ParseError;
use crate::tree::Node;

/// Parse tab-separated rows. Comment and blank lines are skipped; cells are
/// trimmed and empty cells kept.
pub fn parse_tsv(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .filter_map(|line| match classify(line) {
            LineType::Row(line) => Some(line.split('\t').map(|cell| cell.trim().to_string()).collect()),
            LineType::Comment | LineType::Blank => None,
        })
        .collect()
}

enum LineType<'a> {
    Row(&'a str),
    Comment,
    Blank,
}

fn classify(line: &str) -> LineType<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineType::Blank
    } else if trimmed.starts_with('#') {
        LineType::Comment
    } else {
        LineType::Row(line)
    }
}

/// Parse a bracket template into a list tree.
///
/// A template holding one top-level list yields that list; several
/// top-level items are wrapped in a list.
pub fn parse_template(text: &str) -> Result<Node, ParseError> {
    let mut parser = TemplateParser::new();
    for (position, c) in text.char_indices() {
        parser.process_char(c, position)?;
    }
    let mut items = parser.finalize()?;
    match items.len() {
        0 => Err(ParseError::Empty),
        1 if matches!(items[0], Node::List(_)) => Ok(items.remove(0)),
        _ => Ok(Node::List(items)),
    }
}

struct TemplateParser {
    /// Open lists with the position of their `[`; the bottom entry is the top level.
    stack: Vec<(usize, Vec<Node>)>,
    word: String,
}

impl TemplateParser {
    fn new() -> Self {
        Self {
            stack: vec![(0, Vec::new())],
            word: String::new(),
        }
    }

    fn process_char(&mut self, c: char, position: usize) -> Result<(), ParseError> {
        match c {
            '[' => {
                self.flush_word();
                self.stack.push((position, Vec::new()));
            }
            ']' => {
                self.flush_word();
                if self.stack.len() < 2 {
                    return Err(ParseError::UnexpectedClose { position });
                }
                if let Some((_, items)) = self.stack.pop() {
                    self.current().push(Node::List(items));
                }
            }
            c if c.is_whitespace() => self.flush_word(),
            c => self.word.push(c),
        }
        Ok(())
    }

    fn current(&mut self) -> &mut Vec<Node> {
        // The top level is never popped.
        let last = self.stack.len() - 1;
        &mut self.stack[last].1
    }

    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        let word = std::mem::take(&mut self.word);
        self.current().push(Node::Token(word));
    }

    fn finalize(mut self) -> Result<Vec<Node>, ParseError> {
        self.flush_word();
        if self.stack.len() > 1 {
            let position = self.stack[self.stack.len() - 1].0;
            return Err(ParseError::Unclosed { position });
        }
        Ok(self.stack.pop().map(|(_, items)| items).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_tsv_skips_comments_and_blanks() {
        let input = "# header comment\nverb\tform\n\nbe\tam \n  # indented comment\neat\t\n";
        let rows = parse_tsv(input);
        assert_eq!(
            rows,
            vec![
                vec!["verb".to_string(), "form".to_string()],
                vec!["be".to_string(), "am".to_string()],
                vec!["eat".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn parse_tsv_handles_crlf() {
        let rows = parse_tsv("a\tb\r\nc\td\r\n");
        assert_eq!(rows[1], vec!["c".to_string(), "d".to_string()]);
    }

    #[test]
    fn parse_nested_template() {
        let tree = parse_template("[clause [np the [n man]] [vp [v eat]]]").unwrap();
        let expected = Node::list([
            Node::token("clause"),
            Node::list([
                Node::token("np"),
                Node::token("the"),
                Node::list([Node::token("n"), Node::token("man")]),
            ]),
            Node::list([
                Node::token("vp"),
                Node::list([Node::token("v"), Node::token("eat")]),
            ]),
        ]);
        assert_eq!(tree, expected);
    }

    #[test]
    fn parse_multiple_top_level_items() {
        let tree = parse_template("the [n man]").unwrap();
        assert_eq!(
            tree,
            Node::list([
                Node::token("the"),
                Node::list([Node::token("n"), Node::token("man")]),
            ])
        );
    }

    #[test]
    fn reject_unbalanced_brackets() {
        assert!(matches!(
            parse_template("[clause [np]"),
            Err(ParseError::Unclosed { position: 0 })
        ));
        assert!(matches!(
            parse_template("[np]]"),
            Err(ParseError::UnexpectedClose { position: 4 })
        ));
    }

    #[test]
    fn reject_empty_template() {
        assert!(matches!(parse_template("  \n "), Err(ParseError::Empty)));
    }
}
