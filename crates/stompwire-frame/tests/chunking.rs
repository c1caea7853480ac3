//! Decoding must not depend on how the input is split into chunks.

use bytes::{Bytes, BytesMut};
use proptest::prelude::*;
use stompwire_frame::{decode_frame, encode_frame, Command, Frame, FrameHeader};

fn command() -> impl Strategy<Value = Command> {
    proptest::sample::select(Command::ALL.to_vec())
}

fn header_pair() -> impl Strategy<Value = (String, String)> {
    // Names need at least one character; neither side may contain a line feed,
    // names may not contain a colon.
    ("[a-z][a-z0-9-]{0,11}", "[ -~]{0,24}")
}

fn frame() -> impl Strategy<Value = Frame> {
    (
        command(),
        prop::collection::vec(header_pair(), 0..6),
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(command, pairs, body)| {
            let mut header = FrameHeader::new(command);
            for (name, value) in pairs {
                // A stray content-length would change the framing under test.
                if name != "content-length" {
                    header.push(name, value);
                }
            }
            if command.has_body() {
                header = header.with_content_length(body.len());
            }
            Frame::new(header, Bytes::from(body))
        })
}

fn decode_in_chunks(wire: &[u8], chunk_sizes: &[usize]) -> (Vec<Frame>, usize) {
    let mut buf = BytesMut::new();
    let mut frames = Vec::new();
    let mut offset = 0;
    let mut sizes = chunk_sizes.iter().cycle();

    while offset < wire.len() {
        let size = (*sizes.next().unwrap_or(&1)).max(1).min(wire.len() - offset);
        buf.extend_from_slice(&wire[offset..offset + size]);
        offset += size;

        while let Some(frame) = decode_frame(&mut buf).unwrap() {
            frames.push(frame);
        }
    }

    (frames, buf.len())
}

proptest! {
    #[test]
    fn byte_by_byte_yields_the_encoded_frame(frame in frame()) {
        let mut wire = BytesMut::new();
        encode_frame(&frame, &mut wire);

        let (frames, leftover) = decode_in_chunks(&wire, &[1]);
        prop_assert_eq!(frames, vec![frame]);
        prop_assert_eq!(leftover, 0);
    }

    #[test]
    fn any_chunking_yields_the_same_frames(
        frames in prop::collection::vec(frame(), 1..4),
        chunk_sizes in prop::collection::vec(1usize..32, 1..8),
    ) {
        let mut wire = BytesMut::new();
        for frame in &frames {
            encode_frame(frame, &mut wire);
        }

        let (decoded, leftover) = decode_in_chunks(&wire, &chunk_sizes);
        prop_assert_eq!(decoded, frames);
        prop_assert_eq!(leftover, 0);
    }

    #[test]
    fn truncated_input_never_yields_a_frame(frame in frame(), cut in any::<prop::sample::Index>()) {
        let mut wire = BytesMut::new();
        encode_frame(&frame, &mut wire);
        let cut = cut.index(wire.len());

        let mut buf = BytesMut::from(&wire[..cut]);
        prop_assert!(decode_frame(&mut buf).unwrap().is_none());
        prop_assert_eq!(&buf[..], &wire[..cut]);
    }
}
