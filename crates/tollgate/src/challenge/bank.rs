//! Localized question banks.

use rand::Rng;
use tollgate_common::Locale;

use super::Challenge;
use super::puzzle::CountingPuzzle;

/// Static question text for one locale.
///
/// Counting templates contain a `{word}` placeholder.
pub struct QuestionBank {
    pub fixed_question: &'static str,
    pub fixed_answer: &'static str,
    pub upper_template: &'static str,
    pub lower_template: &'static str,
}

const WORD_PLACEHOLDER: &str = "{word}";

static DE: QuestionBank = QuestionBank {
    fixed_question: "Welches Wort ist eine Farbe: Gut, Haus, Gelb, Neutral",
    fixed_answer: "Gelb",
    upper_template: "Wie viele Grossbuchstaben sind in {word} enthalten? Schreibe als Ziffer.",
    lower_template: "Wie viele Kleinbuchstaben sind in {word} enthalten? Schreibe als Ziffer.",
};

static FR: QuestionBank = QuestionBank {
    fixed_question: "Quel mot est une couleur: bien, maison, jaune, neutre?",
    fixed_answer: "jaune",
    upper_template: "Combien de lettres majuscules sont contenues dans {word}? Écrivez sous forme de chiffre.",
    lower_template: "Combien de lettres minuscules sont contenues dans {word}? Écrivez sous forme de chiffre.",
};

impl QuestionBank {
    pub fn for_locale(locale: Locale) -> &'static QuestionBank {
        match locale {
            Locale::De => &DE,
            Locale::Fr => &FR,
        }
    }

    /// Fixed question followed by the uppercase and lowercase counting
    /// questions of one freshly generated puzzle
    pub fn candidates<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Challenge> {
        let puzzle = CountingPuzzle::generate(rng);
        vec![
            Challenge {
                text: self.fixed_question.to_string(),
                solution: self.fixed_answer.to_string(),
            },
            Challenge {
                text: self.upper_template.replace(WORD_PLACEHOLDER, &puzzle.upper_word),
                solution: puzzle.upper_solution(),
            },
            Challenge {
                text: self.lower_template.replace(WORD_PLACEHOLDER, &puzzle.lower_word),
                solution: puzzle.lower_solution(),
            },
        ]
    }
}
