use std::{collections::HashSet, fmt, fs, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub creator_name: String,
    pub content: String,
}

#[derive(Debug)]
pub enum Element<'a> {
    Container { class_name: &'static str, children: Vec<Element<'a>> },
    SingleComment { key: String, comment: &'a Comment },
    NewComment(NewComment<'a>),
}

/// Input for adding a comment to one story. Submitted comments go to the
/// handler; the caller owns the list and renders again.
pub struct NewComment<'a> {
    story_id: &'a str,
    existing: &'a [Comment],
    add_new_comment: &'a dyn Fn(Comment),
}

pub fn comments_block<'a>(
    comments: &'a [Comment],
    story_id: &'a str,
    add_new_comment: &'a dyn Fn(Comment),
) -> Element<'a> {
    let mut children: Vec<Element<'a>> = comments
        .iter()
        .map(|comment| Element::SingleComment {
            key: format!("SingleComment_{}", comment.id),
            comment,
        })
        .collect();
    children.push(Element::NewComment(NewComment { story_id, existing: comments, add_new_comment }));

    Element::Container {
        class_name: "Card-commentSection",
        children: vec![Element::Container { class_name: "story-comments", children }],
    }
}

/// The view assumes ids are unique; callers that load comments from outside
/// can check it first.
pub fn validate_unique_ids(comments: &[Comment]) -> Result<()> {
    let mut seen = HashSet::new();
    for comment in comments {
        if !seen.insert(comment.id.as_str()) {
            return Err(GameError::DuplicateCommentId(comment.id.clone()));
        }
    }
    Ok(())
}

pub fn load_comments(path: &Path) -> Result<Vec<Comment>> {
    let data = fs::read_to_string(path)?;
    let comments: Vec<Comment> = serde_json::from_str(&data)?;
    debug!("loaded {} comments from {}", comments.len(), path.display());
    Ok(comments)
}

impl<'a> NewComment<'a> {
    pub fn story_id(&self) -> &str {
        self.story_id
    }

    /// `{story_id}-{n}`, counting on from the comments already shown and
    /// skipping any id that is taken.
    pub fn next_id(&self) -> String {
        let mut n = self.existing.len() + 1;
        loop {
            let id = format!("{}-{}", self.story_id, n);
            if !self.existing.iter().any(|comment| comment.id == id) {
                return id;
            }
            n += 1;
        }
    }

    pub fn submit(&self, creator_name: &str, content: &str) {
        let comment = Comment {
            id: self.next_id(),
            creator_name: creator_name.to_owned(),
            content: content.to_owned(),
        };
        debug!("submitting comment {} on story {}", comment.id, self.story_id);
        (self.add_new_comment)(comment);
    }
}

impl fmt::Debug for NewComment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NewComment").field("story_id", &self.story_id).finish()
    }
}

impl<'a> Element<'a> {
    pub fn children(&self) -> &[Element<'a>] {
        match self {
            Element::Container { children, .. } => children,
            _ => &[],
        }
    }

    /// First new-comment affordance in the tree, depth first.
    pub fn new_comment(&self) -> Option<&NewComment<'a>> {
        match self {
            Element::NewComment(input) => Some(input),
            _ => self.children().iter().find_map(Element::new_comment),
        }
    }

    pub fn render_text(&self) -> Vec<String> {
        let mut lines = vec![];
        self.render_into(0, &mut lines);
        lines
    }

    fn render_into(&self, depth: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        match self {
            Element::Container { class_name, children } => {
                lines.push(format!("{}[{}]", indent, class_name));
                for child in children {
                    child.render_into(depth + 1, lines);
                }
            }
            Element::SingleComment { key, comment } => {
                lines.push(format!("{}{}: {} #{}", indent, comment.creator_name, comment.content, key));
            }
            Element::NewComment(input) => {
                lines.push(format!("{}> new comment on {} (name: text)", indent, input.story_id()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, io::Write};
    use tempfile::NamedTempFile;

    fn comment(id: &str, creator_name: &str, content: &str) -> Comment {
        Comment { id: id.to_owned(), creator_name: creator_name.to_owned(), content: content.to_owned() }
    }

    fn items<'a, 'b>(root: &'b Element<'a>) -> &'b [Element<'a>] {
        root.children()[0].children()
    }

    #[test]
    fn renders_one_keyed_item_per_comment_then_the_input() {
        let comments = vec![comment("a", "alice", "first"), comment("b", "bob", "second")];
        let noop = |_: Comment| {};
        let root = comments_block(&comments, "story-1", &noop);

        let children = items(&root);
        assert_eq!(children.len(), 3);

        let keys: Vec<&str> = children
            .iter()
            .filter_map(|child| match child {
                Element::SingleComment { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(keys, vec!["SingleComment_a", "SingleComment_b"]);

        assert!(matches!(&children[2], Element::NewComment(input) if input.story_id() == "story-1"));
        let inputs = children.iter().filter(|c| matches!(c, Element::NewComment(_))).count();
        assert_eq!(inputs, 1);
    }

    #[test]
    fn keeps_the_given_order() {
        let comments = vec![comment("z", "zed", "last"), comment("a", "amy", "first")];
        let noop = |_: Comment| {};
        let root = comments_block(&comments, "s", &noop);

        let ids: Vec<&str> = items(&root)
            .iter()
            .filter_map(|child| match child {
                Element::SingleComment { comment, .. } => Some(comment.id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn empty_list_still_offers_the_input() {
        let noop = |_: Comment| {};
        let root = comments_block(&[], "s", &noop);
        assert_eq!(items(&root).len(), 1);
        assert!(root.new_comment().is_some());
    }

    #[test]
    fn submit_hands_the_comment_to_the_caller() {
        let mut comments = vec![comment("a", "alice", "first")];
        let pending = RefCell::new(vec![]);
        let add = |c: Comment| pending.borrow_mut().push(c);

        {
            let root = comments_block(&comments, "story-1", &add);
            root.new_comment().expect("input rendered").submit("bob", "hello");
        }
        comments.extend(pending.borrow_mut().drain(..));

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].creator_name, "bob");
        assert_eq!(comments[1].content, "hello");
        assert_eq!(comments[1].id, "story-1-2");
        assert!(validate_unique_ids(&comments).is_ok());

        let noop = |_: Comment| {};
        let root = comments_block(&comments, "story-1", &noop);
        assert_eq!(items(&root).len(), 3);
    }

    #[test]
    fn render_text_nests_by_depth() {
        let comments = vec![comment("a", "alice", "first")];
        let noop = |_: Comment| {};
        let lines = comments_block(&comments, "s1", &noop).render_text();

        assert_eq!(
            lines,
            vec![
                "[Card-commentSection]",
                "  [story-comments]",
                "    alice: first #SingleComment_a",
                "    > new comment on s1 (name: text)",
            ]
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let comments = vec![comment("a", "alice", "x"), comment("a", "bob", "y")];
        assert!(matches!(validate_unique_ids(&comments), Err(GameError::DuplicateCommentId(id)) if id == "a"));
        assert!(validate_unique_ids(&comments[..1]).is_ok());
    }

    #[test]
    fn deserializes_underscore_id() {
        let json = r#"[{"_id": "c1", "creator_name": "Kenneth", "content": "meow"}]"#;
        let comments: Vec<Comment> = serde_json::from_str(json).unwrap();
        assert_eq!(comments, vec![comment("c1", "Kenneth", "meow")]);
    }

    #[test]
    fn next_id_skips_ids_already_shown() {
        let comments = vec![comment("s-2", "alice", "x"), comment("s-3", "bob", "y")];
        let noop = |_: Comment| {};
        let root = comments_block(&comments, "s", &noop);
        let input = root.new_comment().expect("input rendered");

        assert_eq!(input.next_id(), "s-4");
    }

    #[test]
    fn repeated_submits_keep_ids_unique() {
        let mut comments = vec![comment("s-1", "alice", "x"), comment("other", "bob", "y")];
        let pending = RefCell::new(vec![]);
        let add = |c: Comment| pending.borrow_mut().push(c);

        for n in 0..5 {
            {
                let root = comments_block(&comments, "s", &add);
                root.new_comment().expect("input rendered").submit("carol", &format!("reply {}", n));
            }
            comments.extend(pending.borrow_mut().drain(..));
            assert!(validate_unique_ids(&comments).is_ok());
        }
        assert_eq!(comments.len(), 7);
    }

    #[test]
    fn loads_comments_from_a_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"_id": "c1", "creator_name": "Kenneth", "content": "meow"}},
                {{"_id": "c2", "creator_name": "Tim", "content": "hi"}}]"#
        )
        .unwrap();

        let comments = load_comments(file.path()).unwrap();
        assert_eq!(comments, vec![comment("c1", "Kenneth", "meow"), comment("c2", "Tim", "hi")]);
    }

    #[test]
    fn loading_a_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_comments(&dir.path().join("missing.json"));
        assert!(matches!(res, Err(GameError::Io(_))));
    }

    #[test]
    fn loading_malformed_json_is_a_json_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(load_comments(file.path()), Err(GameError::Json(_))));
    }
}
