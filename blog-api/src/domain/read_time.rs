//! Estimated reading duration of post content.

pub(crate) const WORDS_PER_MINUTE: u64 = 265;

/// Human readable estimate, e.g. `"3 min read"`. Never less than one minute.
pub(crate) fn read_time(content: &str) -> String {
    format!("{} min read", read_time_minutes(content))
}

pub(crate) fn read_time_minutes(content: &str) -> u64 {
    let seconds = (count_words(content) * 60).div_ceil(WORDS_PER_MINUTE);
    seconds.div_ceil(60).max(1)
}

/// Counts maximal runs of alphanumeric or `_` characters.
fn count_words(content: &str) -> u64 {
    content
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .count() as u64
}

#[cfg(test)]
mod tests {
    use super::{count_words, read_time, read_time_minutes};

    #[test]
    fn words_are_runs_of_word_characters() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("hello, world!"), 2);
        assert_eq!(count_words("snake_case and-dash"), 3);
    }

    #[test]
    fn short_content_reads_in_one_minute() {
        assert_eq!(read_time(""), "1 min read");
        assert_eq!(read_time("just a few words"), "1 min read");
    }

    #[test]
    fn minutes_round_up() {
        let exactly_one_minute = "word ".repeat(265);
        assert_eq!(read_time_minutes(&exactly_one_minute), 1);

        let just_over = "word ".repeat(266);
        assert_eq!(read_time_minutes(&just_over), 2);

        let long = "word ".repeat(265 * 5);
        assert_eq!(read_time(&long), "5 min read");
    }
}
