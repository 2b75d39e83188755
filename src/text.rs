//! Splitting text into words and putting it back together.
//!
//! Text is split into paragraphs on `\n` and each paragraph into runs of
//! whitespace and words. Only words are ever replaced, so reassembly
//! reproduces the input byte for byte wherever nothing was rewritten.

/// A run of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Space(&'a str),
    Word(&'a str),
}

/// Returns `true` for words that look like a URL.
pub fn is_url_shaped(word: &str) -> bool {
    word.starts_with("http://") || word.starts_with("https://")
}

/// Returns `true` if `text` contains the opt-out `marker` anywhere.
pub fn is_opted_out(text: &str, marker: &str) -> bool {
    !marker.is_empty() && text.contains(marker)
}

/// Split one paragraph into alternating whitespace and word runs.
pub fn pieces(paragraph: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (i, c) in paragraph.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(current) if current != space => {
                out.push(piece(&paragraph[start..i], current));
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if let Some(space) = in_space {
        out.push(piece(&paragraph[start..], space));
    }
    out
}

fn piece(run: &str, space: bool) -> Piece<'_> {
    if space { Piece::Space(run) } else { Piece::Word(run) }
}
