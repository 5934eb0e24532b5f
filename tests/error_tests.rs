use dynbuf::{BufferError, RawBuffer, Status};

#[test]
fn test_error_display_messages() {
    assert_eq!(
        BufferError::IndexOutOfBounds {
            index: 5,
            length: 1
        }
        .to_string(),
        "Index out of bounds: index 5 is beyond buffer length 1"
    );
    assert_eq!(
        BufferError::ZeroSize {
            parameter: "element_size"
        }
        .to_string(),
        "Zero value for element_size"
    );
    assert_eq!(
        BufferError::Alloc { requested: 128 }.to_string(),
        "Allocation failed: could not reserve 128 bytes"
    );
    assert_eq!(
        BufferError::Uninitialized.to_string(),
        "Buffer is not initialized"
    );
    assert_eq!(
        BufferError::ElementSizeMismatch {
            expected: 4,
            actual: 3
        }
        .to_string(),
        "Element size mismatch: expected 4 bytes, got 3 bytes"
    );
}

#[test]
fn test_error_codes_follow_status_convention() {
    assert_eq!(Status::Warning.code(), -1);
    assert_eq!(Status::Ok.code(), 0);
    assert_eq!(
        BufferError::ElementSizeMismatch {
            expected: 1,
            actual: 2
        }
        .code(),
        1
    );
    assert_eq!(BufferError::Uninitialized.code(), 2);
    assert_eq!(BufferError::Alloc { requested: 0 }.code(), 3);
    assert_eq!(BufferError::ZeroSize { parameter: "x" }.code(), 4);
    assert_eq!(
        BufferError::IndexOutOfBounds {
            index: 0,
            length: 0
        }
        .code(),
        5
    );
}

#[test]
fn test_error_validation_precedes_mutation() {
    let mut buffer = RawBuffer::with_element_size(2).unwrap();
    buffer.push_back(&[1, 1]).unwrap();
    let before = buffer.header();

    // Index is checked before the source size.
    assert_eq!(
        buffer.insert(5, &[0]),
        Err(BufferError::IndexOutOfBounds {
            index: 5,
            length: 1
        })
    );
    let mut short = [0u8; 1];
    assert_eq!(
        buffer.remove(0, Some(&mut short)),
        Err(BufferError::ElementSizeMismatch {
            expected: 2,
            actual: 1
        })
    );
    assert_eq!(buffer.header(), before);
    assert_eq!(buffer.as_bytes(), &[1, 1]);
}

#[test]
fn test_error_uninitialized_everywhere() {
    let mut buffer = RawBuffer::new();
    let mut dest = [0u8; 1];
    assert_eq!(buffer.insert(0, &[1]), Err(BufferError::Uninitialized));
    assert_eq!(buffer.push_front(&[1]), Err(BufferError::Uninitialized));
    assert_eq!(buffer.remove(0, None), Err(BufferError::Uninitialized));
    assert_eq!(
        buffer.pop_front(Some(&mut dest)),
        Err(BufferError::Uninitialized)
    );
    assert_eq!(buffer.copy_to(0, &mut dest), Err(BufferError::Uninitialized));
    assert_eq!(buffer.copy_from(0, &dest), Err(BufferError::Uninitialized));
    assert_eq!(
        buffer.destroy_with(|_| panic!("no elements")),
        Err(BufferError::Uninitialized)
    );
}

#[test]
fn test_error_is_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&BufferError::Uninitialized);
}
