//! Per-letter guess feedback.
//!
//! Wordle-style classification: green for a positional match, yellow
//! for a letter present elsewhere in the answer, gray otherwise. The
//! yellow check is plain membership and does not account for repeated
//! letters; that simplification is intentional.

/// Sentinel used to right-pad a short guess up to the answer length
const PAD: char = ' ';

/// Classification of a single guessed letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterMark {
  Green,
  Yellow,
  Gray,
}

impl LetterMark {
  /// CSS class used by the game template
  pub fn css_class(&self) -> &'static str {
    match self {
      LetterMark::Green => "green",
      LetterMark::Yellow => "yellow",
      LetterMark::Gray => "gray",
    }
  }
}

/// Compare a guess against the answer, one mark per answer position.
///
/// The guess is padded on the right, never truncated; the result
/// length always equals the answer's character count.
pub fn feedback(actual: &str, guessed: &str) -> Vec<LetterMark> {
  let actual_chars: Vec<char> = actual.chars().collect();
  let mut guessed_chars: Vec<char> = guessed.chars().collect();
  while guessed_chars.len() < actual_chars.len() {
    guessed_chars.push(PAD);
  }

  actual_chars
    .iter()
    .enumerate()
    .map(|(i, &a)| {
      let g = guessed_chars[i];
      if g == a {
        LetterMark::Green
      } else if actual_chars.contains(&g) {
        LetterMark::Yellow
      } else {
        LetterMark::Gray
      }
    })
    .collect()
}

/// A guess is correct iff it equals the answer exactly.
///
/// Equivalent to an all-green feedback row of matching length; a
/// padded short guess can never pass this check.
pub fn is_correct(actual: &str, guessed: &str) -> bool {
  actual == guessed
}
