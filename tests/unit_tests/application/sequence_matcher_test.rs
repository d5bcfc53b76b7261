use ascolto::application::services::metrics::{MatchingBlock, matching_blocks, similarity_ratio};

use crate::helpers::assert_close;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn given_two_empty_sequences_when_comparing_then_ratio_is_one() {
    let empty: Vec<char> = Vec::new();

    assert_eq!(similarity_ratio(&empty, &empty), 1.0);
}

#[test]
fn given_one_empty_sequence_when_comparing_then_ratio_is_zero() {
    assert_eq!(similarity_ratio(&chars("abc"), &chars("")), 0.0);
}

#[test]
fn given_shifted_strings_when_comparing_then_ratio_counts_common_run() {
    assert_close(similarity_ratio(&chars("abcd"), &chars("bcde")), 0.75);
}

#[test]
fn given_identical_strings_when_comparing_then_ratio_is_one() {
    assert_eq!(similarity_ratio(&chars("trascrizione"), &chars("trascrizione")), 1.0);
}

#[test]
fn given_split_matches_when_listing_blocks_then_they_are_ordered() {
    let blocks = matching_blocks(&chars("abxcd"), &chars("abcd"));

    assert_eq!(
        blocks,
        vec![
            MatchingBlock {
                a_start: 0,
                b_start: 0,
                size: 2
            },
            MatchingBlock {
                a_start: 3,
                b_start: 2,
                size: 2
            },
        ]
    );
}

#[test]
fn given_word_sequences_when_comparing_then_works_on_tokens() {
    let a = ["il", "gatto", "nero"];
    let b = ["il", "gatto", "bianco"];

    assert_close(similarity_ratio(&a, &b), 4.0 / 6.0);
}

#[test]
fn given_long_sequence_with_popular_element_when_comparing_then_it_cannot_seed_a_match() {
    let mut a = vec!['a', 'b'];
    a.extend(std::iter::repeat_n('x', 250));
    let mut b = vec!['x'; 250];
    b.extend(['a', 'b']);

    assert_close(similarity_ratio(&a, &b), 4.0 / 504.0);
}

#[test]
fn given_short_repetitive_sequence_when_comparing_then_autojunk_does_not_apply() {
    let a = vec!['x'; 150];
    let b = vec!['x'; 150];

    assert_eq!(similarity_ratio(&a, &b), 1.0);
}
