//! Property tests for the frame codec: arbitrary payloads survive a round
//! trip, and any single bit flip inside the checksummed region is caught.

use proptest::prelude::*;
use ubx_codec::{checksum, decode, encode, FrameDecoder, FrameError, UbxChecksumCalc};

fn frame_strategy() -> impl Strategy<Value = (u8, u8, Vec<u8>)> {
    (
        any::<u8>(),
        any::<u8>(),
        prop::collection::vec(any::<u8>(), 0..512),
    )
}

proptest! {
    #[test]
    fn test_encode_decode_round_trip((class, id, payload) in frame_strategy()) {
        let bytes = encode(class, id, &payload).unwrap();
        prop_assert_eq!(bytes.len(), payload.len() + 8);

        let frame = decode(&bytes).unwrap();
        prop_assert_eq!(frame.class, class);
        prop_assert_eq!(frame.id, id);
        prop_assert_eq!(frame.payload, &payload[..]);
    }

    #[test]
    fn test_single_bit_flip_is_detected(
        (class, id, payload) in frame_strategy(),
        bit in any::<prop::sample::Index>(),
    ) {
        let mut bytes = encode(class, id, &payload).unwrap();
        // checksummed region minus the length field, whose corruption is a
        // size mismatch instead
        let mut positions: Vec<usize> = vec![2, 3];
        positions.extend(6..bytes.len() - 2);
        let bit_pos = bit.index(positions.len() * 8);
        let byte = positions[bit_pos / 8];
        bytes[byte] ^= 1 << (bit_pos % 8);

        let is_bad_checksum = matches!(decode(&bytes), Err(FrameError::BadChecksum { .. }));
        prop_assert!(is_bad_checksum);
    }

    #[test]
    fn test_corrupted_length_never_decodes(
        (class, id, payload) in frame_strategy(),
        len_byte in 4usize..6,
        flip in 1u8..=255,
    ) {
        let mut bytes = encode(class, id, &payload).unwrap();
        bytes[len_byte] ^= flip;
        let decoder = FrameDecoder::builder().max_payload_len(u16::MAX).build();
        let is_size_mismatch = matches!(decoder.decode(&bytes), Err(FrameError::Truncated { .. }));
        prop_assert!(is_size_mismatch);
    }

    #[test]
    fn test_incremental_checksum_matches_one_shot(
        data in prop::collection::vec(any::<u8>(), 0..256),
        split in any::<prop::sample::Index>(),
    ) {
        let at = split.index(data.len() + 1);
        let mut calc = UbxChecksumCalc::new();
        calc.update(&data[..at]);
        for byte in &data[at..] {
            calc.update_byte(*byte);
        }
        let (ck_a, ck_b) = checksum::compute(&data);
        prop_assert_eq!(calc.result(), (ck_a, ck_b));
        prop_assert!(checksum::verify(&data, ck_a, ck_b));
    }
}
