use chrono::{Duration, NaiveDate};
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
#[cfg(test)]
use mockall::automock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Join dates fall within this many days before today, today included.
pub const JOIN_WINDOW_DAYS: i64 = 730;

/// Source of the random values written by the seeder.
#[cfg_attr(test, automock)]
pub trait DataGenerator: Send {
    /// Two title-cased words, e.g. `"Dolor Amet"`.
    fn organization_name(&mut self) -> String;

    fn description(&mut self) -> String;

    /// `<2020..=2025>-<1..=8>-<NNNN>`
    fn student_id(&mut self) -> String;

    fn last_name(&mut self) -> String;

    fn first_name(&mut self) -> String;

    fn middle_name(&mut self) -> String;

    fn date_joined(&mut self, today: NaiveDate) -> NaiveDate;

    /// Uniform index in `0..len`. Only called with `len > 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// [`DataGenerator`] backed by the `fake` crate's English vocabulary.
pub struct FakeDataGenerator {
    rng: StdRng,
}

impl FakeDataGenerator {
    /// A fixed `seed` makes every generated value reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl DataGenerator for FakeDataGenerator {
    fn organization_name(&mut self) -> String {
        let words: Vec<String> = (0..2)
            .map(|_| title_case(&Word().fake_with_rng::<String, _>(&mut self.rng)))
            .collect();
        words.join(" ")
    }

    fn description(&mut self) -> String {
        Sentence(4..10).fake_with_rng(&mut self.rng)
    }

    fn student_id(&mut self) -> String {
        format!(
            "{}-{}-{:04}",
            self.rng.gen_range(2020..=2025),
            self.rng.gen_range(1..=8),
            self.rng.gen_range(0..10_000)
        )
    }

    fn last_name(&mut self) -> String {
        LastName().fake_with_rng(&mut self.rng)
    }

    fn first_name(&mut self) -> String {
        FirstName().fake_with_rng(&mut self.rng)
    }

    fn middle_name(&mut self) -> String {
        LastName().fake_with_rng(&mut self.rng)
    }

    fn date_joined(&mut self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(self.rng.gen_range(0..=JOIN_WINDOW_DAYS))
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalizes_first_letter_only() {
        assert_eq!(title_case("dolor"), "Dolor");
        assert_eq!(title_case("AMET"), "Amet");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn organization_name_is_two_capitalized_words() {
        let mut generator = FakeDataGenerator::new(Some(1));
        for _ in 0..20 {
            let name = generator.organization_name();
            let words: Vec<&str> = name.split(' ').collect();
            assert_eq!(words.len(), 2, "unexpected name {name:?}");
            for word in words {
                let first = word.chars().next().expect("empty word");
                assert!(first.is_uppercase(), "unexpected name {name:?}");
            }
        }
    }

    #[test]
    fn student_id_has_year_digit_and_serial() {
        let mut generator = FakeDataGenerator::new(Some(2));
        for _ in 0..100 {
            let id = generator.student_id();
            let parts: Vec<&str> = id.split('-').collect();
            assert_eq!(parts.len(), 3, "unexpected id {id:?}");

            let year: i32 = parts[0].parse().unwrap();
            let term: u32 = parts[1].parse().unwrap();
            assert!((2020..=2025).contains(&year));
            assert!((1..=8).contains(&term));
            assert_eq!(parts[2].len(), 4);
            assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn date_joined_stays_within_window() {
        let mut generator = FakeDataGenerator::new(Some(3));
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let earliest = today - Duration::days(JOIN_WINDOW_DAYS);
        for _ in 0..200 {
            let date = generator.date_joined(today);
            assert!(date <= today && date >= earliest, "out of range: {date}");
        }
    }

    #[test]
    fn pick_index_is_in_bounds() {
        let mut generator = FakeDataGenerator::new(None);
        for len in 1..10 {
            assert!(generator.pick_index(len) < len);
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let mut a = FakeDataGenerator::new(Some(99));
        let mut b = FakeDataGenerator::new(Some(99));

        assert_eq!(a.organization_name(), b.organization_name());
        assert_eq!(a.student_id(), b.student_id());
        assert_eq!(a.last_name(), b.last_name());
    }
}
