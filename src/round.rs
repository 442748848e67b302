//! Round manager: picks the next source word and its falling options.

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{
    Cue, FallingWord, Session, WordPair, FIELD_WIDTH, WORD_COLUMNS, WORD_COLUMN_INSET,
};
use crate::words::WordPool;

/// Number of wrong options shown next to the right one.
pub const DISTRACTORS: usize = WORD_COLUMNS - 1;

/// Left edge of a falling label in column `index`.
pub fn column_x(index: usize) -> f32 {
    index as f32 * (FIELD_WIDTH / WORD_COLUMNS as f32) + WORD_COLUMN_INSET
}

/// Pairs whose source term has not been shown yet this game.
pub fn unused_pairs<'a>(state: &Session, pool: &'a WordPool) -> Vec<&'a WordPair> {
    pool.pairs()
        .iter()
        .filter(|p| !state.used_words.contains(&p.source))
        .collect()
}

/// Start the next round.
///
/// Returns `None` when every pair of the pool has been used, which is the
/// win condition; the falling words are left as they were in that case.
/// Otherwise the word speed is back at its base value, the chosen source is
/// marked used, and up to three options fall from the top of the field with
/// exactly one of them correct.
pub fn start_new_round(state: &Session, pool: &WordPool, rng: &mut impl Rng) -> Option<Session> {
    let pair = *unused_pairs(state, pool).choose(rng)?;

    let mut others: Vec<&str> = pool
        .pairs()
        .iter()
        .map(|p| p.translation.as_str())
        .filter(|t| *t != pair.translation)
        .collect();
    others.sort_unstable();
    others.dedup();
    if others.len() < DISTRACTORS {
        warn!(
            "only {} distractor(s) available for '{}'",
            others.len(),
            pair.source
        );
    }

    let mut options: Vec<&str> = others.choose_multiple(rng, DISTRACTORS).copied().collect();
    options.push(pair.translation.as_str());
    options.shuffle(rng);

    let words: Vec<FallingWord> = options
        .iter()
        .enumerate()
        .map(|(column, text)| FallingWord {
            text: text.to_string(),
            x: column_x(column),
            y: 0.0,
            is_correct: *text == pair.translation,
        })
        .collect();

    let mut used_words = state.used_words.clone();
    used_words.insert(pair.source.clone());

    let mut cues = state.cues.clone();
    cues.push(Cue::Pronounce(pair.source.clone()));

    debug!(
        "round {}/{}: '{}' with options {:?}",
        used_words.len(),
        pool.len(),
        pair.source,
        options
    );

    Some(Session {
        words,
        current_word: pair.source.clone(),
        used_words,
        word_speed: state.base_word_speed,
        cues,
        ..state.clone()
    })
}
