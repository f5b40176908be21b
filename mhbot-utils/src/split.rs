//! Splitting long text into message-sized, fenced chunks.

/// Hard cap on a single chat message.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// How [`split_message`] sizes and wraps its chunks.
#[derive(Clone, Copy, Debug)]
pub struct SplitOptions<'a> {
    pub max_length: usize,
    pub prepend: &'a str,
    pub append: &'a str,
}

impl<'a> SplitOptions<'a> {
    /// `prepend`/`append` around chunks of at most [`MAX_MESSAGE_LENGTH`].
    pub fn fenced(prepend: &'a str, append: &'a str) -> Self {
        Self {
            max_length: MAX_MESSAGE_LENGTH,
            prepend,
            append,
        }
    }
}

/// Split `text` on line boundaries so every chunk, including its wrapping,
/// fits in `options.max_length` characters. Lines that cannot fit on their
/// own are cut at character boundaries. Always returns at least one chunk.
pub fn split_message(text: &str, options: &SplitOptions<'_>) -> Vec<String> {
    let overhead = options.prepend.chars().count() + options.append.chars().count();
    let budget = options.max_length.saturating_sub(overhead).max(1);

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0_usize;
    // A chunk holding only a blank line is still started.
    let mut started = false;

    for line in text.split('\n') {
        for piece in hard_wrap(line, budget) {
            let piece_len = piece.chars().count();
            let joined_len = if started {
                current_len + 1 + piece_len
            } else {
                piece_len
            };

            if joined_len > budget && started {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
                started = false;
            }

            if started {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
            started = true;
        }
    }

    if started || chunks.is_empty() {
        chunks.push(current);
    }

    chunks
        .into_iter()
        .map(|chunk| format!("{}{}{}", options.prepend, chunk, options.append))
        .collect()
}

fn hard_wrap(line: &str, budget: usize) -> Vec<String> {
    if line.chars().count() <= budget {
        return vec![line.to_owned()];
    }

    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(budget)
        .map(|piece| piece.iter().collect())
        .collect()
}
