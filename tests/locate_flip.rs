use bitrot::{digest_of, flip_bit, locate_bit_flip, BitrotError, SearchOutcome, CHUNK_SIZE};
use rand::{Rng, RngCore};

fn corrupt(piece: &[u8], bit: u64) -> Vec<u8> {
    let mut out = piece.to_vec();
    flip_bit(&mut out, bit);
    out
}

#[test]
fn zero_piece_with_bit_five_flipped() {
    let piece = [0u8; 64];
    let target = digest_of(&corrupt(&piece, 5));
    assert_eq!(
        locate_bit_flip(&piece, &target).unwrap(),
        SearchOutcome::Found(5)
    );
}

#[test]
fn zero_piece_with_matching_digest_finds_nothing() {
    let piece = [0u8; 64];
    let target = digest_of(&piece);
    assert_eq!(
        locate_bit_flip(&piece, &target).unwrap(),
        SearchOutcome::NotFound
    );
}

#[test]
fn locates_flips_across_chunk_boundaries() {
    let mut piece = vec![0u8; CHUNK_SIZE * 3];
    rand::thread_rng().fill_bytes(&mut piece);

    // First bit, last bit, and one bit per chunk.
    let bits = [
        0,
        7,
        (CHUNK_SIZE as u64) * 8 - 1,
        (CHUNK_SIZE as u64) * 8,
        (CHUNK_SIZE as u64) * 8 + 13,
        (CHUNK_SIZE as u64) * 16 + 200,
        (piece.len() as u64) * 8 - 1,
    ];
    for bit in bits {
        let target = digest_of(&corrupt(&piece, bit));
        assert_eq!(
            locate_bit_flip(&piece, &target).unwrap(),
            SearchOutcome::Found(bit),
            "bit {bit}"
        );
    }
}

#[test]
fn piece_not_a_multiple_of_chunk_size() {
    // Two full chunks plus a 17-byte tail; flips both inside the tail
    // and right at the last full boundary must be recovered.
    let mut piece = vec![0u8; CHUNK_SIZE * 2 + 17];
    rand::thread_rng().fill_bytes(&mut piece);

    let tail_start_bit = (CHUNK_SIZE as u64) * 2 * 8;
    for bit in [
        tail_start_bit - 1,
        tail_start_bit,
        tail_start_bit + 60,
        (piece.len() as u64) * 8 - 1,
    ] {
        let target = digest_of(&corrupt(&piece, bit));
        assert_eq!(
            locate_bit_flip(&piece, &target).unwrap(),
            SearchOutcome::Found(bit),
            "bit {bit}"
        );
    }
}

#[test]
fn piece_smaller_than_one_chunk() {
    let piece = b"tiny piece".to_vec();
    let bit = 42;
    let target = digest_of(&corrupt(&piece, bit));
    assert_eq!(
        locate_bit_flip(&piece, &target).unwrap(),
        SearchOutcome::Found(bit)
    );
}

#[test]
fn random_piece_random_bit_roundtrip() {
    let mut rng = rand::thread_rng();
    for _ in 0..5 {
        let len = rng.gen_range(1..300);
        let mut piece = vec![0u8; len];
        rng.fill_bytes(&mut piece);
        let bit = rng.gen_range(0..len as u64 * 8);
        let target = digest_of(&corrupt(&piece, bit));
        assert_eq!(
            locate_bit_flip(&piece, &target).unwrap(),
            SearchOutcome::Found(bit),
            "len {len} bit {bit}"
        );
    }
}

#[test]
fn wrong_digest_length_is_a_config_error() {
    let piece = [0u8; 64];
    for len in [0usize, 19, 21, 32] {
        let err = locate_bit_flip(&piece, &vec![0u8; len]).unwrap_err();
        assert!(matches!(err, BitrotError::Config(_)), "len {len}");
    }
}

#[test]
fn unrelated_digest_finds_nothing() {
    let piece = [0xABu8; 96];
    // Digest of something that is not one flip away.
    let target = digest_of(b"a completely different payload");
    assert_eq!(
        locate_bit_flip(&piece, &target).unwrap(),
        SearchOutcome::NotFound
    );
}
