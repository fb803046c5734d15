//! Composable pieces of generated text.
//!
//! Emitters assemble each item from these pieces instead of concatenating
//! ad hoc, so every branch (options, out-parameters, blobs) can be checked
//! on its own.

/// Appends a declarator to a C-like type, inserting a space unless the type
/// already ends in a pointer or reference marker.
#[must_use]
pub fn spaced(type_name: &str, declarator: &str) -> String {
    if type_name.ends_with('*') || type_name.ends_with('&') {
        format!("{type_name}{declarator}")
    } else {
        format!("{type_name} {declarator}")
    }
}

/// A `/** ... */` documentation block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    indent: String,
    lines: Vec<String>,
}

impl DocBlock {
    /// Creates an empty block at the given indentation.
    #[must_use]
    pub fn new(indent: &str) -> Self {
        Self {
            indent: indent.to_string(),
            lines: Vec::new(),
        }
    }

    /// Adds text; embedded newlines become continuation lines.
    #[must_use]
    pub fn line(mut self, text: &str) -> Self {
        self.push(text);
        self
    }

    /// Adds text in place.
    pub fn push(&mut self, text: &str) {
        self.lines.extend(text.split('\n').map(str::to_string));
    }

    /// Returns true if no text was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Renders the block, ending with a newline.
    #[must_use]
    pub fn render(&self) -> String {
        let indent = &self.indent;
        let mut output = format!("{indent}/**\n");
        for line in &self.lines {
            if line.is_empty() {
                output.push_str(&format!("{indent} *\n"));
            } else {
                output.push_str(&format!("{indent} * {line}\n"));
            }
        }
        output.push_str(&format!("{indent} */\n"));
        output
    }
}

/// Ordered, comma-separated list of rendered items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgList {
    items: Vec<String>,
}

impl ArgList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one item.
    pub fn push(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    /// Returns true if the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Joins the items with `", "`.
    #[must_use]
    pub fn render(&self) -> String {
        self.items.join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for ArgList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for ArgList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<S: Into<String>> Extend<S> for ArgList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced() {
        assert_eq!(spaced("int", "width"), "int width");
        assert_eq!(spaced("const std::string &", "filename"), "const std::string &filename");
        assert_eq!(spaced("VipsBlob *", "buffer"), "VipsBlob *buffer");
    }

    #[test]
    fn test_doc_block() {
        let doc = DocBlock::new("    ").line("How to align.").line("@param x Offset.");
        assert_eq!(
            doc.render(),
            "    /**\n     * How to align.\n     * @param x Offset.\n     */\n"
        );
    }

    #[test]
    fn test_doc_block_continuation_lines() {
        let doc = DocBlock::new("").line("First.\n\nSecond.");
        assert_eq!(doc.render(), "/**\n * First.\n *\n * Second.\n */\n");
        assert!(DocBlock::new("").is_empty());
    }

    #[test]
    fn test_arg_list() {
        let mut args: ArgList = ["int a", "double b"].into_iter().collect();
        args.push("emscripten::val js_options");
        assert_eq!(args.render(), "int a, double b, emscripten::val js_options");
        assert!(ArgList::new().render().is_empty());
    }
}
