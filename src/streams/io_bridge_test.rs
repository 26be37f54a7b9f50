use crate::config::ProbeOptions;
use crate::streams::{BridgeState, IoBridge, MediaBuffer, PullStream, ReadOutcome};
use proptest::prelude::*;
use std::io::Read;

fn bridge(init: &[u8], media: &[u8], capacity: usize) -> IoBridge {
    let buffer = MediaBuffer::new(init, media).unwrap();
    IoBridge::new(buffer, &ProbeOptions::default().with_staging_capacity(capacity)).unwrap()
}

/// Pull everything through the callback, cycling through `sizes` for each request.
fn drain_with_sizes(bridge: &mut IoBridge, sizes: &[usize]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    loop {
        let n = sizes[i % sizes.len()];
        i += 1;
        let mut dest = vec![0u8; n];
        match bridge.read_packet(&mut dest) {
            ReadOutcome::Served(served) => {
                assert!(served <= n);
                assert!(bridge.position() <= bridge.buffer().len());
                out.extend_from_slice(&dest[..served]);
            }
            ReadOutcome::EndOfStream => return out,
        }
    }
}

#[test]
fn test_state_machine() {
    let mut bridge = bridge(b"ab", b"c", 4096);
    assert_eq!(bridge.state(), BridgeState::Ready);

    let mut dest = [0u8; 2];
    assert_eq!(bridge.read_packet(&mut dest), ReadOutcome::Served(2));
    assert_eq!(&dest, b"ab");
    assert_eq!(bridge.state(), BridgeState::Serving);

    assert_eq!(bridge.read_packet(&mut dest), ReadOutcome::Served(1));
    assert_eq!(dest[0], b'c');
    assert_eq!(bridge.state(), BridgeState::Serving);
    assert_eq!(bridge.remaining(), 0);

    assert_eq!(bridge.read_packet(&mut dest), ReadOutcome::EndOfStream);
    assert_eq!(bridge.state(), BridgeState::Drained);
    assert_eq!(bridge.read_packet(&mut dest), ReadOutcome::EndOfStream);
    assert_eq!(bridge.position(), 3);
}

#[test]
fn test_zero_length_request_does_not_advance() {
    let mut bridge = bridge(b"x", b"y", 16);
    assert_eq!(bridge.read_packet(&mut []), ReadOutcome::Served(0));
    assert_eq!(bridge.position(), 0);
    assert_eq!(bridge.state(), BridgeState::Ready);
}

#[test]
fn test_end_of_stream_is_not_an_error_through_read() {
    let mut bridge = bridge(b"init", b"media", 3);
    let mut all = Vec::new();
    bridge.read_to_end(&mut all).unwrap();
    assert_eq!(all, b"initmedia");

    let mut buf = [0u8; 8];
    assert_eq!(bridge.read(&mut buf).unwrap(), 0);
    assert_eq!(bridge.state(), BridgeState::Drained);
}

#[test]
fn test_read_goes_through_staging_area() {
    let mut bridge = bridge(&[1u8; 10], &[2u8; 10], 8);
    let mut one = [0u8; 1];
    bridge.read_exact(&mut one).unwrap();
    // One callback filled the whole staging area.
    assert_eq!(bridge.callback_count(), 1);
    assert_eq!(bridge.bytes_served(), 8);
    assert_eq!(bridge.bytes_consumed(), 1);

    let mut rest = [0u8; 7];
    bridge.read_exact(&mut rest).unwrap();
    assert_eq!(bridge.callback_count(), 1);

    bridge.read_exact(&mut one).unwrap();
    assert_eq!(bridge.callback_count(), 2);
    assert_eq!(bridge.bytes_served(), 16);
}

#[test]
fn test_staging_capacity_only_changes_callback_count() {
    let init = vec![7u8; 5000];
    let media = vec![9u8; 5000];
    let mut small = bridge(&init, &media, 4096);
    let mut large = bridge(&init, &media, 8192);

    let (mut a, mut b) = (Vec::new(), Vec::new());
    small.read_to_end(&mut a).unwrap();
    large.read_to_end(&mut b).unwrap();

    assert_eq!(a, b);
    assert!(small.callback_count() > large.callback_count());
}

#[test]
fn test_into_buffer_returns_contents() {
    let mut bridge = bridge(b"ab", b"cd", 2);
    let mut buf = [0u8; 1];
    bridge.read_exact(&mut buf).unwrap();
    let buffer = bridge.into_buffer();
    assert_eq!(buffer.as_slice(), b"abcd");
}

#[test]
fn test_single_byte_requests() {
    let mut bridge = bridge(b"hello ", b"world", 4096);
    let out = drain_with_sizes(&mut bridge, &[1]);
    assert_eq!(out, b"hello world");
    // One callback per byte plus the end-of-stream call.
    assert_eq!(bridge.callback_count(), 12);
}

proptest! {
    #[test]
    fn prop_concatenation_fidelity(
        init in proptest::collection::vec(any::<u8>(), 1..512),
        media in proptest::collection::vec(any::<u8>(), 1..2048),
        sizes in proptest::collection::vec(1usize..300, 1..8),
    ) {
        let mut b = bridge(&init, &media, 64);
        let out = drain_with_sizes(&mut b, &sizes);

        let mut expected = init.clone();
        expected.extend_from_slice(&media);
        prop_assert_eq!(out.len(), init.len() + media.len());
        prop_assert_eq!(out, expected);
        prop_assert_eq!(b.position(), init.len() + media.len());
        prop_assert_eq!(b.state(), BridgeState::Drained);
    }

    #[test]
    fn prop_read_impl_fidelity(
        init in proptest::collection::vec(any::<u8>(), 1..512),
        media in proptest::collection::vec(any::<u8>(), 1..2048),
        capacity in 1usize..9000,
        chunk in 1usize..700,
    ) {
        let mut b = bridge(&init, &media, capacity);
        let mut out = Vec::new();
        let mut buf = vec![0u8; chunk];
        loop {
            let n = b.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
            prop_assert!(b.position() <= init.len() + media.len());
        }
        prop_assert_eq!(&out[..init.len()], &init[..]);
        prop_assert_eq!(&out[init.len()..], &media[..]);
    }

    #[test]
    fn prop_cursor_never_passes_end(
        len_init in 1usize..64,
        len_media in 1usize..64,
        extra_calls in 1usize..10,
    ) {
        let mut b = bridge(&vec![0u8; len_init], &vec![1u8; len_media], 16);
        drain_with_sizes(&mut b, &[1000]);
        for _ in 0..extra_calls {
            let mut dest = [0u8; 32];
            prop_assert_eq!(b.read_packet(&mut dest), ReadOutcome::EndOfStream);
            prop_assert_eq!(b.position(), len_init + len_media);
        }
    }
}
