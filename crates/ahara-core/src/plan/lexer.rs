//! Tag lexer for generated plan text.
//!
//! Generated text is a flat stream tagged with `keyword:` markers
//! (`day3:`, `lunch:`). The lexer finds every marker occurrence once, and
//! sections are then cut between markers without rescanning:
//!
//! - a section of kind `K` starts after the *first* marker of kind `K`;
//! - it ends at the earliest *boundary* marker that starts at or after the
//!   section body, or at end of text.
//!
//! Which kinds count as boundaries is chosen by the caller: for meals it is
//! every other meal keyword, for day `N` it is every day `M > N`.

/// A single occurrence of a tag in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<K> {
    pub kind: K,
    /// Byte offset of the tag itself.
    pub start: usize,
    /// Byte offset just past the tag's colon.
    pub body_start: usize,
}

/// Tokenized marker stream over one piece of text.
#[derive(Debug, Clone)]
pub struct Markers<'t, K> {
    text: &'t str,
    markers: Vec<Marker<K>>,
}

impl<'t, K: Copy + PartialEq> Markers<'t, K> {
    /// Find every occurrence of every tag, ordered by position.
    ///
    /// Each tag is matched literally, so it should already include its colon.
    pub fn scan(text: &'t str, tags: &[(K, &str)]) -> Self {
        let mut markers: Vec<Marker<K>> = tags
            .iter()
            .flat_map(|&(kind, tag)| {
                text.match_indices(tag).map(move |(start, matched)| Marker {
                    kind,
                    start,
                    body_start: start + matched.len(),
                })
            })
            .collect();
        markers.sort_by_key(|m| m.start);
        Self { text, markers }
    }

    pub fn markers(&self) -> &[Marker<K>] {
        &self.markers
    }

    pub fn contains(&self, kind: K) -> bool {
        self.markers.iter().any(|m| m.kind == kind)
    }

    /// Body of the first section of `kind`, bounded by the earliest later
    /// marker for which `is_boundary` holds. `None` if `kind` never occurs.
    pub fn section(&self, kind: K, is_boundary: impl Fn(K) -> bool) -> Option<&'t str> {
        let open = self.markers.iter().find(|m| m.kind == kind)?;
        let end = self
            .markers
            .iter()
            .filter(|m| m.start >= open.body_start && is_boundary(m.kind))
            .map(|m| m.start)
            .min()
            .unwrap_or(self.text.len());
        Some(&self.text[open.body_start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Tag {
        A,
        B,
        C,
    }

    const TAGS: &[(Tag, &str)] = &[(Tag::A, "a:"), (Tag::B, "b:"), (Tag::C, "c:")];

    #[test]
    fn markers_are_sorted_by_position() {
        let m = Markers::scan("c: 1 a: 2 b: 3 a: 4", TAGS);
        let kinds: Vec<Tag> = m.markers().iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![Tag::C, Tag::A, Tag::B, Tag::A]);
        assert_eq!(m.markers()[1].start, 5);
        assert_eq!(m.markers()[1].body_start, 7);
    }

    #[test]
    fn section_ends_at_nearest_boundary() {
        let m = Markers::scan("a: x c: y b: z", TAGS);
        assert_eq!(m.section(Tag::A, |k| k != Tag::A), Some(" x "));
        assert_eq!(m.section(Tag::A, |k| k == Tag::B), Some(" x c: y "));
        assert_eq!(m.section(Tag::B, |k| k != Tag::B), Some(" z"));
    }

    #[test]
    fn repeated_own_tag_is_not_a_boundary() {
        let m = Markers::scan("a: x a: y b: z", TAGS);
        assert_eq!(m.section(Tag::A, |k| k != Tag::A), Some(" x a: y "));
    }

    #[test]
    fn markers_before_the_section_are_ignored() {
        let m = Markers::scan("b: early a: late", TAGS);
        assert_eq!(m.section(Tag::A, |k| k != Tag::A), Some(" late"));
    }

    #[test]
    fn missing_kind_has_no_section() {
        let m = Markers::scan("a: x", TAGS);
        assert!(!m.contains(Tag::C));
        assert_eq!(m.section(Tag::C, |_| true), None);
    }
}
