use crate::board::{self, BOARD_SIZE};
use crate::models::DrawRecord;

/// Observed draw counts, index `n - 1` for number `n`.
pub type Counts = [u32; BOARD_SIZE as usize];

/// Tokenizes a comma/dash delimited number list.
///
/// Tokens are trimmed and kept only if they are non-empty ASCII digits with a
/// value on the board. Anything else is dropped without error.
pub fn parse_numbers(raw: &str) -> impl Iterator<Item = u8> + '_ {
    raw.split([',', '-']).filter_map(|token| {
        let token = token.trim();
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        token
            .parse::<u32>()
            .ok()
            .and_then(|value| u8::try_from(value).ok())
            .filter(|&n| board::is_on_board(n))
    })
}

pub fn count_frequencies(draws: &[DrawRecord]) -> Counts {
    let mut counts = [0u32; BOARD_SIZE as usize];
    for draw in draws {
        for n in parse_numbers(&draw.numbers) {
            counts[(n - 1) as usize] += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> Vec<u8> {
        parse_numbers(raw).collect()
    }

    #[test]
    fn accepts_dash_and_comma_delimiters() {
        assert_eq!(parsed("1-2-3"), vec![1, 2, 3]);
        assert_eq!(parsed("4,5,6"), vec![4, 5, 6]);
        assert_eq!(parsed("7-8,9"), vec![7, 8, 9]);
        assert_eq!(parsed(" 10 - 11 , 12 "), vec![10, 11, 12]);
    }

    #[test]
    fn tolerates_trailing_and_repeated_delimiters() {
        assert_eq!(parsed("1-2-"), vec![1, 2]);
        assert_eq!(parsed(",1,,2,"), vec![1, 2]);
        assert_eq!(parsed("--"), Vec::<u8>::new());
    }

    #[test]
    fn drops_non_numeric_tokens() {
        assert_eq!(parsed("1-x-3"), vec![1, 3]);
        assert_eq!(parsed("+4-5.0-6"), vec![6]);
        assert_eq!(parsed("7a,8"), vec![8]);
    }

    #[test]
    fn drops_out_of_range_values() {
        assert_eq!(parsed("0-1-80-81-255-256-99999999999"), vec![1, 80]);
        assert_eq!(parsed("007"), vec![7]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parsed("").is_empty());
        assert!(parsed("   ").is_empty());
    }

    #[test]
    fn counts_cover_every_number() {
        let draws = vec![
            DrawRecord::new(1, "", "1-2-3"),
            DrawRecord::new(2, "", "1,80,bogus"),
            DrawRecord::new(3, "", ""),
        ];
        let counts = count_frequencies(&draws);
        assert_eq!(counts.len(), 80);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[2], 1);
        assert_eq!(counts[79], 1);
        assert_eq!(counts.iter().sum::<u32>(), 5);
    }
}
