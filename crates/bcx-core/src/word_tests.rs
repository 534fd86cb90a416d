use crate::word::{PointerMode, WordSize, pack_chars};

#[test]
fn wrap_16_overflows_to_negative() {
    assert_eq!(WordSize::W16.wrap(32767 + 1), -32768);
    assert_eq!(WordSize::W16.wrap(65536), 0);
    assert_eq!(WordSize::W16.wrap(-1), -1);
}

#[test]
fn wrap_32_overflows_to_negative() {
    assert_eq!(WordSize::W32.wrap(2_147_483_647 + 1), -2_147_483_648);
    assert_eq!(WordSize::W32.wrap(1 << 32), 0);
}

#[test]
fn host_is_identity() {
    assert_eq!(WordSize::Host.wrap(i64::MAX), i64::MAX);
    assert!(!WordSize::Host.needs_mask());
    assert!(WordSize::W16.needs_mask());
}

#[test]
fn contains_checks_width() {
    assert!(WordSize::W16.contains(32767));
    assert!(!WordSize::W16.contains(32768));
    assert!(WordSize::W16.contains(-32768));
    assert!(!WordSize::W16.contains(-32769));
}

#[test]
fn char_capacity_tracks_width() {
    assert_eq!(WordSize::W16.char_capacity(), 2);
    assert_eq!(WordSize::W32.char_capacity(), 4);
    assert_eq!(WordSize::Host.char_capacity(), (usize::BITS / 8) as usize);
}

#[test]
fn pack_first_byte_most_significant() {
    // 'Hi' == 0x4869
    assert_eq!(pack_chars(b"Hi"), 0x4869);
    assert_eq!(pack_chars(b"A"), 0x41);
    assert_eq!(pack_chars(b""), 0);
    // General law: sum of b_i * 256^(k-1-i)
    assert_eq!(pack_chars(&[1, 2, 3]), 1 * 65536 + 2 * 256 + 3);
}

#[test]
fn default_mode_is_byte_addressed() {
    assert_eq!(PointerMode::default(), PointerMode::Byte);
    assert_eq!(WordSize::default(), WordSize::Host);
}
