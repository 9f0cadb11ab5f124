//! Randomized answer presentation.
//!
//! Each session presents every question with its options in a fresh random
//! order. The presented correct index is recomputed from the permutation, so
//! the original position of the right answer never reaches the screen.

use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{instrument, trace};

use crate::Question;

/// A question as one session sees it: options permuted, correct index remapped.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PresentedQuestion {
    /// The authoritative question.
    question: Question,
    /// Option texts in presentation order.
    options: Vec<String>,
    /// `order[presented] == original` option index.
    order: Vec<usize>,
    /// Presented index of the correct option, if the question has one.
    correct_index: Option<usize>,
}

impl PresentedQuestion {
    /// Returns the category label of the underlying question.
    pub fn category(&self) -> &str {
        self.question.category()
    }

    /// Returns the prompt text of the underlying question.
    pub fn text(&self) -> &str {
        self.question.text()
    }

    /// Returns the number of presented options.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Returns true if `index` is the presented position of the correct option.
    pub fn is_correct(&self, index: usize) -> bool {
        self.correct_index == Some(index)
    }
}

/// Presents `question` with a uniformly random option order drawn from `rng`.
///
/// A question without options is returned with an empty option list.
#[instrument(skip(question, rng), fields(question_id = question.id()))]
pub fn present<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> PresentedQuestion {
    let n = question.options().len();
    let mut order: Vec<usize> = (0..n).collect();
    if n > 1 {
        order.shuffle(rng);
    }

    let options = order
        .iter()
        .map(|&original| question.options()[original].clone())
        .collect();
    let correct_index = order.iter().position(|&original| original == *question.answer());
    trace!(?order, ?correct_index, "Question presented");

    PresentedQuestion {
        question: question.clone(),
        options,
        order,
        correct_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(options: &[&str], answer: usize) -> Question {
        Question::new(
            1,
            "Web".to_string(),
            "Pick one".to_string(),
            options.iter().map(|o| o.to_string()).collect(),
            answer,
        )
    }

    #[test]
    fn presented_options_are_a_permutation() {
        let q = question(&["a", "b", "c", "d", "e"], 3);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let p = present(&q, &mut rng);

            let mut seen = p.options().clone();
            seen.sort();
            assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);

            let mut order = p.order().clone();
            order.sort_unstable();
            assert_eq!(order, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn correct_index_follows_the_correct_text() {
        let q = question(&["SSL/TLS", "FTP", "SMTP", "DNS"], 0);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let p = present(&q, &mut rng);
            let idx = p.correct_index().expect("has a correct option");
            assert_eq!(p.options()[idx], "SSL/TLS");
            assert!(p.is_correct(idx));
        }
    }

    #[test]
    fn empty_options_present_empty() {
        let q = question(&[], 0);
        let mut rng = StdRng::seed_from_u64(1);
        let p = present(&q, &mut rng);
        assert!(p.options().is_empty());
        assert_eq!(*p.correct_index(), None);
        assert!(!p.is_correct(0));
    }

    #[test]
    fn out_of_range_answer_has_no_correct_index() {
        let q = question(&["a", "b"], 5);
        let mut rng = StdRng::seed_from_u64(2);
        let p = present(&q, &mut rng);
        assert_eq!(p.option_count(), 2);
        assert_eq!(*p.correct_index(), None);
    }

    #[test]
    fn orderings_vary_across_draws() {
        let q = question(&["a", "b", "c", "d"], 0);
        let mut rng = StdRng::seed_from_u64(42);
        let first = present(&q, &mut rng);
        let varied = (0..20).any(|_| present(&q, &mut rng).order() != first.order());
        assert!(varied);
    }
}
