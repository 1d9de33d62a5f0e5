//! Property tests for the wire codec.

use laptime_bus::{
    BusError, decode_checkpoint_signal, decode_checkpoint_text, decode_driver, decode_position,
    encode_driver, matches_topic,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _position = decode_position(&bytes);
        let _driver = decode_driver(&bytes);
        let _text = decode_checkpoint_text(&bytes);
        let _signal = decode_checkpoint_signal(&bytes);
    }

    #[test]
    fn prop_big_endian_signal_matches_integer(n in any::<u32>()) {
        prop_assert_eq!(decode_checkpoint_signal(&n.to_be_bytes()).ok(), Some(n));
    }

    #[test]
    fn prop_leading_zero_bytes_do_not_change_signal(n in any::<u16>(), zeros in 0usize..3) {
        let mut bytes = vec![0u8; zeros];
        bytes.extend_from_slice(&n.to_be_bytes());
        prop_assert_eq!(decode_checkpoint_signal(&bytes).ok(), Some(u32::from(n)));
    }

    #[test]
    fn prop_five_nonzero_bytes_overflow(first in 1u8..=255, rest in any::<[u8; 4]>()) {
        let mut bytes = vec![first];
        bytes.extend_from_slice(&rest);
        prop_assert!(matches!(decode_checkpoint_signal(&bytes), Err(BusError::Decode(_))));
    }

    #[test]
    fn prop_driver_names_survive_encoding(name in "[A-Za-z][A-Za-z .'-]{0,24}") {
        let message = encode_driver("current_driver", &name);
        prop_assert!(matches_topic(&message, "current_driver"));
        prop_assert_eq!(decode_driver(&message).ok(), Some(name));
    }

    #[test]
    fn prop_positions_decode_with_or_without_topic(x in -1.0e6f64..1.0e6, y in -1.0e6f64..1.0e6) {
        let bare = format!("[{x}, {y}]");
        let topical = format!("pixel_coordinates {bare}");
        let a = decode_position(bare.as_bytes()).ok();
        let b = decode_position(topical.as_bytes()).ok();
        prop_assert!(a.is_some());
        prop_assert_eq!(a, b);
    }
}
