use warden::primitives::{ConstantTimeEq, ZeroedBuffer};

#[test]
fn zeroed_buffer_starts_zeroed() {
    let buffer = ZeroedBuffer::<u64>::new(16);
    assert_eq!(buffer.len(), 16);
    assert!(buffer.iter().all(|&w| w == 0));
    assert!(!buffer.is_released());
}

#[test]
fn zeroed_buffer_release_wipes_contents() {
    for len in [0usize, 1, 7, 64, 1000] {
        let mut buffer = ZeroedBuffer::from_slice(&vec![0xA5u8; len]);
        buffer.release();

        assert!(buffer.is_released());
        assert_eq!(buffer.len(), len, "length survives release");
        assert!(buffer.iter().all(|&b| b == 0), "len {len}");
    }
}

#[test]
fn zeroed_buffer_release_is_idempotent() {
    let mut buffer = ZeroedBuffer::from_slice(b"secret");
    buffer.release();
    buffer.release();

    assert!(buffer.is_released());
    assert_eq!(buffer.as_slice(), &[0u8; 6]);
}

#[test]
fn zeroed_buffer_release_wipes_writes_made_after_release() {
    let mut buffer = ZeroedBuffer::from_slice(b"secret");
    buffer.release();

    buffer.copy_from_slice(b"again!");
    assert_eq!(buffer.as_slice(), b"again!");

    buffer.release();
    assert!(buffer.is_released());
    assert_eq!(buffer.as_slice(), &[0u8; 6]);
}

#[test]
fn zeroed_buffer_wipes_option_elements() {
    let mut buffer = ZeroedBuffer::from_slice(&[Some(1u32), None, Some(3)]);
    buffer.release();

    assert!(buffer.iter().all(Option::is_none));
}

#[test]
fn zeroed_buffer_indexing() {
    let mut buffer = ZeroedBuffer::<u8>::new(4);
    buffer[0] = 1;
    buffer[3] = 4;
    buffer.as_mut_slice()[1] = 2;

    assert_eq!(buffer.as_slice(), &[1, 2, 0, 4]);
    assert_eq!(buffer[3], 4);
}

#[test]
fn zeroed_buffer_try_new_allocates() {
    let buffer = ZeroedBuffer::<u32>::try_new(128).unwrap();
    assert_eq!(buffer.len(), 128);
    assert!(buffer.iter().all(|&w| w == 0));
}

#[test]
fn zeroed_buffer_try_new_reports_overflow() {
    assert!(ZeroedBuffer::<u64>::try_new(usize::MAX).is_err());
}

#[test]
fn zeroed_buffer_debug_hides_contents() {
    let buffer = ZeroedBuffer::from_slice(b"hunter2");
    let printed = format!("{buffer:?}");

    assert!(printed.contains("len: 7"));
    assert!(!printed.contains("104"), "{printed}");
}

#[test]
fn zeroed_buffer_clone_is_independent() {
    let original = ZeroedBuffer::from_slice(b"key");
    let mut copy = original.clone();
    copy.release();

    assert_eq!(original.as_slice(), b"key");
    assert!(!original.is_released());
}

#[test]
fn ct_eq_compares_contents() {
    assert!(b"abc".as_slice().ct_eq(b"abc".as_slice()));
    assert!(!b"abc".as_slice().ct_eq(b"abd".as_slice()));
    assert!(!b"abc".as_slice().ct_eq(b"ab".as_slice()));
    assert!([0u8; 0].ct_eq(&[]));
}

#[test]
fn ct_eq_detects_difference_at_every_position() {
    let reference = [0x5Au8; 64];
    assert!(reference.ct_eq(&reference));

    for position in 0..64 {
        for bit in 0..8 {
            let mut other = reference;
            other[position] ^= 1 << bit;
            assert!(!reference.ct_eq(&other), "byte {position} bit {bit}");
        }
    }
}
