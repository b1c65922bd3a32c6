use bitrot::{digest_of, flip_bit, locate_bit_flip, SearchOutcome};
use proptest::prelude::*;
use quickcheck::quickcheck;

quickcheck! {
    fn flip_twice_restores_the_buffer(data: Vec<u8>, bit: u64) -> bool {
        if data.is_empty() {
            return true;
        }
        let bit = bit % (data.len() as u64 * 8);
        let mut buf = data.clone();
        flip_bit(&mut buf, bit);
        flip_bit(&mut buf, bit);
        buf == data
    }

    fn single_flip_changes_exactly_one_bit(data: Vec<u8>, bit: u64) -> bool {
        if data.is_empty() {
            return true;
        }
        let bit = bit % (data.len() as u64 * 8);
        let mut buf = data.clone();
        flip_bit(&mut buf, bit);
        let differing: u32 = data
            .iter()
            .zip(&buf)
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        differing == 1
    }
}

proptest! {
    // Each case runs a full exhaustive search, so keep pieces small and
    // the case count low.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn recovers_any_injected_flip(
        piece in proptest::collection::vec(any::<u8>(), 1..48),
        bit_seed in any::<u64>(),
    ) {
        let bit = bit_seed % (piece.len() as u64 * 8);
        let mut corrupted = piece.clone();
        flip_bit(&mut corrupted, bit);
        let target = digest_of(&corrupted);
        prop_assert_eq!(
            locate_bit_flip(&piece, &target).unwrap(),
            SearchOutcome::Found(bit)
        );
    }

    #[test]
    fn never_finds_a_flip_in_an_intact_piece(
        piece in proptest::collection::vec(any::<u8>(), 1..48),
    ) {
        let target = digest_of(&piece);
        prop_assert_eq!(
            locate_bit_flip(&piece, &target).unwrap(),
            SearchOutcome::NotFound
        );
    }
}
