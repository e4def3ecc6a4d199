use ubx_codec::{
    decode, decode_message, encode, AckAck, ByteSource, FrameDecoder, FrameError, GenericMessage,
    Message, NavSat, SliceSource, SourceExhausted, StreamError, UbxPacketMeta,
};

static FULL_ACK_ACK_PACK: [u8; 10] = [0xb5, 0x62, 0x5, 0x1, 0x2, 0x0, 0x6, 0x1, 0xf, 0x38];

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_decode_ack_ack() {
    let msg = decode_message(&FULL_ACK_ACK_PACK).unwrap();
    let Message::AckAck(ack) = msg else {
        panic!("expected ACK-ACK, got {msg:?}");
    };
    assert_eq!(ack.class(), Ok(0x06));
    assert_eq!(ack.msg_id(), Ok(0x01));
    assert_eq!(AckAck::NAME, "ACK-ACK");
}

#[test]
fn test_decode_ack_ack_bad_checksum() {
    init_logging();
    let mut bad_pack = FULL_ACK_ACK_PACK;
    bad_pack[bad_pack.len() - 3] = 5;
    assert_eq!(
        decode(&bad_pack),
        Err(FrameError::BadChecksum {
            expect: 0x380f,
            got: 0x3c13
        })
    );
}

#[test]
fn test_frame_size_grid() {
    // Every size other than length + 8 is rejected, whatever the declared length
    for declared in [0u16, 1, 2, 27, 92] {
        let payload = vec![0x5a; usize::from(declared)];
        let frame = encode(0x01, 0x02, &payload).unwrap();
        assert_eq!(frame.len(), usize::from(declared) + 8);
        assert!(decode(&frame).is_ok());

        for size in 6..frame.len() {
            assert_eq!(
                decode(&frame[..size]),
                Err(FrameError::Truncated {
                    expect: frame.len(),
                    got: size
                }),
                "declared {declared}, size {size}"
            );
        }
        let mut longer = frame.clone();
        longer.extend_from_slice(&FULL_ACK_ACK_PACK);
        assert!(matches!(
            decode(&longer),
            Err(FrameError::Truncated { .. })
        ));
    }
}

#[test]
fn test_length_cap_boundary() {
    let at_cap = encode(0x0a, 0x04, &vec![0u8; 2048]).unwrap();
    assert!(decode(&at_cap).is_ok());

    let above_cap = encode(0x0a, 0x04, &vec![0u8; 2049]).unwrap();
    assert_eq!(
        decode(&above_cap),
        Err(FrameError::LengthOutOfRange {
            len: 2049,
            max: 2048
        })
    );

    let strict = FrameDecoder::builder().max_payload_len(16).build();
    assert!(matches!(
        strict.decode(&at_cap),
        Err(FrameError::LengthOutOfRange { len: 2048, max: 16 })
    ));
}

#[test]
fn test_unknown_message_is_generic() {
    let frame = encode(0x27, 0x03, &[1, 2, 3, 4]).unwrap();
    let msg = decode_message(&frame).unwrap();
    assert_eq!(
        msg,
        Message::Unknown(GenericMessage {
            class: 0x27,
            id: 0x03,
            payload: vec![1, 2, 3, 4]
        })
    );
    assert_eq!(msg.clone().into_frame().unwrap(), frame);
}

#[test]
fn test_message_frame_round_trip() {
    let frame = encode(NavSat::CLASS, NavSat::ID, &[0u8; 8]).unwrap();
    let msg = decode_message(&frame).unwrap();
    assert_eq!(msg.name(), Some("NAV-SAT"));
    assert_eq!(msg.into_frame().unwrap(), frame);
}

#[test]
fn test_stream_resync_after_garbage() {
    init_logging();
    let mut data = vec![0x00, 0xb5, 0x13];
    data.extend_from_slice(&FULL_ACK_ACK_PACK);
    let nak = encode(0x05, 0x00, &[0x06, 0x08]).unwrap();
    data.extend_from_slice(&nak);

    let decoder = FrameDecoder::default();
    let mut source = SliceSource::new(&data);
    let mut frames = Vec::new();
    let mut skipped = 0;
    loop {
        match decoder.decode_stream(&mut source) {
            Ok(frame) => frames.push(frame),
            Err(StreamError::Frame(_)) => {
                source.consume(1);
                skipped += 1;
            },
            Err(StreamError::Source(SourceExhausted { .. })) => break,
        }
    }

    assert_eq!(skipped, 3);
    assert_eq!(frames.len(), 2);
    assert_eq!((frames[0].class, frames[0].id), (0x05, 0x01));
    assert_eq!((frames[1].class, frames[1].id), (0x05, 0x00));
    assert!(source.is_empty());
}

#[test]
fn test_stream_waits_for_complete_frame() {
    let decoder = FrameDecoder::default();
    for cut in 1..FULL_ACK_ACK_PACK.len() {
        let mut source = SliceSource::new(&FULL_ACK_ACK_PACK[..cut]);
        assert!(matches!(
            decoder.decode_stream(&mut source),
            Err(StreamError::Source(_))
        ));
        assert_eq!(source.remaining().len(), cut);
    }
}

#[cfg(feature = "std")]
#[test]
fn test_io_source() {
    let mut data = FULL_ACK_ACK_PACK.to_vec();
    data.extend_from_slice(&FULL_ACK_ACK_PACK);
    let mut source = ubx_codec::IoSource::new(std::io::Cursor::new(data));
    let decoder = FrameDecoder::default();

    for _ in 0..2 {
        let frame = decoder.decode_stream(&mut source).unwrap();
        assert_eq!(frame.payload, [0x06, 0x01]);
    }
    let err = decoder.decode_stream(&mut source).unwrap_err();
    let StreamError::Source(err) = err else {
        panic!("expected a source error, got {err:?}");
    };
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}
