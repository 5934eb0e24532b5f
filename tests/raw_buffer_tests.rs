use dynbuf::{BufferConfig, BufferError, RawBuffer, ShrinkPolicy, Status, HEADER_SIZE};

fn int_buffer(values: &[u32]) -> RawBuffer {
    let mut buffer = RawBuffer::new();
    buffer.init(4).unwrap();
    for value in values {
        buffer.push_back(&value.to_le_bytes()).unwrap();
    }
    buffer
}

fn ints(buffer: &RawBuffer) -> Vec<u32> {
    buffer
        .iter()
        .map(|bytes| u32::from_le_bytes(bytes.try_into().unwrap()))
        .collect()
}

#[test]
fn test_buffer_initialization() {
    let mut buffer = RawBuffer::new();
    assert!(!buffer.is_initialized());

    buffer.init(4).unwrap();
    assert!(buffer.is_initialized());
    assert_eq!(buffer.element_size(), 4);
    assert_eq!(buffer.len(), 0);
    assert!(buffer.is_empty());
    assert_eq!(buffer.reserved(), 0);
    assert_eq!(buffer.bytes_allocated(), HEADER_SIZE);
}

#[test]
fn test_init_zero_element_size() {
    let mut buffer = RawBuffer::new();
    assert_eq!(
        buffer.init(0),
        Err(BufferError::ZeroSize {
            parameter: "element_size"
        })
    );
    assert!(!buffer.is_initialized());
}

#[test]
fn test_concrete_scenario() {
    let mut buffer = int_buffer(&[10, 20, 30, 40, 50]);

    let mut dest = [0u8; 4];
    buffer.remove(2, Some(&mut dest)).unwrap();
    assert_eq!(u32::from_le_bytes(dest), 30);
    assert_eq!(ints(&buffer), vec![10, 20, 40, 50]);
    assert_eq!(buffer.len(), 4);

    assert_eq!(buffer.pop_front(Some(&mut dest)), Ok(Status::Ok));
    assert_eq!(u32::from_le_bytes(dest), 10);
    assert_eq!(ints(&buffer), vec![20, 40, 50]);
    assert_eq!(buffer.len(), 3);
}

#[test]
fn test_insert_at_length_appends() {
    let mut buffer = int_buffer(&[1, 2]);
    buffer.insert(2, &3u32.to_le_bytes()).unwrap();
    assert_eq!(ints(&buffer), vec![1, 2, 3]);
}

#[test]
fn test_insert_past_length_leaves_buffer_unchanged() {
    let mut buffer = int_buffer(&[1, 2]);
    let before = buffer.header();

    let result = buffer.insert(3, &9u32.to_le_bytes());
    assert_eq!(
        result,
        Err(BufferError::IndexOutOfBounds {
            index: 3,
            length: 2
        })
    );
    assert_eq!(buffer.header(), before);
    assert_eq!(ints(&buffer), vec![1, 2]);
}

#[test]
fn test_insert_wrong_size_leaves_buffer_unchanged() {
    let mut buffer = int_buffer(&[1]);
    let result = buffer.push_back(&[1, 2]);
    assert_eq!(
        result,
        Err(BufferError::ElementSizeMismatch {
            expected: 4,
            actual: 2
        })
    );
    assert_eq!(ints(&buffer), vec![1]);
}

#[test]
fn test_remove_out_of_bounds() {
    let mut buffer = int_buffer(&[1, 2]);
    let mut dest = [0xAAu8; 4];
    assert_eq!(
        buffer.remove(2, Some(&mut dest)),
        Err(BufferError::IndexOutOfBounds {
            index: 2,
            length: 2
        })
    );
    assert_eq!(dest, [0xAA; 4]);
    assert_eq!(ints(&buffer), vec![1, 2]);
}

#[test]
fn test_remove_without_dest() {
    let mut buffer = int_buffer(&[1, 2, 3]);
    buffer.remove(1, None).unwrap();
    assert_eq!(ints(&buffer), vec![1, 3]);
}

#[test]
fn test_push_front_shifts_everything() {
    let mut buffer = int_buffer(&[]);
    for value in 0..20u32 {
        buffer.push_front(&value.to_le_bytes()).unwrap();
    }
    assert_eq!(ints(&buffer), (0..20).rev().collect::<Vec<_>>());
    assert_eq!(buffer.reserved(), 24);
}

#[test]
fn test_push_back_then_pop_back_reverses() {
    let values: Vec<u32> = (0..50).collect();
    let mut buffer = int_buffer(&values);

    for index in 0..values.len() {
        assert_eq!(buffer.get(index), Some(&values[index].to_le_bytes()[..]));
    }

    let mut popped = Vec::new();
    let mut dest = [0u8; 4];
    while buffer.pop_back(Some(&mut dest)) == Ok(Status::Ok) {
        popped.push(u32::from_le_bytes(dest));
    }
    popped.reverse();
    assert_eq!(popped, values);
}

#[test]
fn test_pop_empty_is_warning() {
    let mut buffer = int_buffer(&[]);
    let mut dest = [0x55u8; 4];

    assert_eq!(buffer.pop_back(Some(&mut dest)), Ok(Status::Warning));
    assert_eq!(buffer.pop_front(Some(&mut dest)), Ok(Status::Warning));
    assert_eq!(buffer.pop_front(None), Ok(Status::Warning));
    assert_eq!(dest, [0x55; 4]);
    assert_eq!(buffer.len(), 0);
}

#[test]
fn test_reserve_grows_without_shrinking() {
    let mut buffer = int_buffer(&[1, 2, 3]);
    assert_eq!(buffer.reserved(), 16);

    buffer.reserve(1).unwrap();
    assert_eq!(buffer.reserved(), 16);

    buffer.reserve(100).unwrap();
    assert_eq!(buffer.reserved(), 103);
    assert_eq!(buffer.bytes_allocated(), HEADER_SIZE + 103 * 4);
    assert_eq!(ints(&buffer), vec![1, 2, 3]);
}

#[test]
fn test_reserve_failure_keeps_state() {
    let mut buffer = int_buffer(&[1, 2, 3]);
    let before = buffer.header();

    let result = buffer.reserve(isize::MAX as usize);
    assert!(matches!(result, Err(BufferError::Alloc { .. })));
    assert_eq!(buffer.header(), before);
    assert_eq!(ints(&buffer), vec![1, 2, 3]);

    buffer.push_back(&4u32.to_le_bytes()).unwrap();
    assert_eq!(ints(&buffer), vec![1, 2, 3, 4]);
}

#[test]
fn test_compact() {
    let mut buffer = int_buffer(&[1, 2, 3]);
    buffer.compact().unwrap();
    assert_eq!(buffer.reserved(), 3);
    assert_eq!(buffer.bytes_allocated(), HEADER_SIZE + 12);

    let after_first = buffer.header();
    buffer.compact().unwrap();
    assert_eq!(buffer.header(), after_first);

    // Growth after compact goes back to the recommended capacity.
    buffer.push_back(&4u32.to_le_bytes()).unwrap();
    assert_eq!(buffer.reserved(), 16);
}

#[test]
fn test_remove_defers_shrink() {
    let values: Vec<u32> = (0..40).collect();
    let mut buffer = int_buffer(&values);
    assert_eq!(buffer.reserved(), 40);

    while buffer.len() > 1 {
        buffer.pop_back(None).unwrap();
    }
    assert_eq!(buffer.reserved(), 40);
    buffer.compact().unwrap();
    assert_eq!(buffer.reserved(), 1);
}

#[test]
fn test_eager_shrink_policy() {
    let mut buffer = RawBuffer::with_config(BufferConfig::new().with_shrink(ShrinkPolicy::Eager));
    buffer.init(2).unwrap();
    for value in 0..30u16 {
        buffer.push_back(&value.to_le_bytes()).unwrap();
    }
    assert_eq!(buffer.reserved(), 32);

    buffer.pop_back(None).unwrap();
    assert_eq!(buffer.reserved(), 32);
    for _ in 0..10 {
        buffer.pop_back(None).unwrap();
    }
    assert_eq!(buffer.len(), 19);
    assert_eq!(buffer.reserved(), 24);
}

#[test]
fn test_max_bytes_limits_growth() {
    let config = BufferConfig::new().with_max_bytes(HEADER_SIZE + 20);
    let mut buffer = RawBuffer::with_config(config);
    buffer.init(1).unwrap();

    for value in 0..20u8 {
        buffer.push_back(&[value]).unwrap();
    }
    assert_eq!(buffer.reserved(), 20);

    let result = buffer.push_back(&[99]);
    assert_eq!(
        result,
        Err(BufferError::Alloc {
            requested: HEADER_SIZE + 21
        })
    );
    assert_eq!(buffer.len(), 20);
    assert_eq!(buffer.as_bytes(), &(0..20).collect::<Vec<u8>>()[..]);
}

#[test]
fn test_destroy_calls_cleanup_in_order() {
    let mut buffer = int_buffer(&[5, 6, 7]);

    let mut seen = Vec::new();
    buffer
        .destroy_with(|element| seen.push(u32::from_le_bytes(element.try_into().unwrap())))
        .unwrap();

    assert_eq!(seen, vec![5, 6, 7]);
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.reserved(), 0);
    assert_eq!(buffer.bytes_allocated(), HEADER_SIZE);
    assert!(buffer.is_initialized());
}

#[test]
fn test_destroy_then_reuse() {
    let mut buffer = int_buffer(&[1, 2]);
    buffer.destroy().unwrap();

    buffer.push_back(&3u32.to_le_bytes()).unwrap();
    assert_eq!(ints(&buffer), vec![3]);

    buffer.destroy().unwrap();
    buffer.init(2).unwrap();
    buffer.push_back(&[1, 2]).unwrap();
    assert_eq!(buffer.element_size(), 2);
    assert_eq!(buffer.as_bytes(), &[1, 2]);
}

#[test]
fn test_free_with_cleanup() {
    let buffer = int_buffer(&[1, 2, 3]);
    let mut count = 0;
    buffer.free_with(|_| count += 1).unwrap();
    assert_eq!(count, 3);
}

#[test]
fn test_free_uninitialized() {
    assert_eq!(RawBuffer::new().free(), Err(BufferError::Uninitialized));
}

#[test]
fn test_copy_to_and_copy_from() {
    let mut buffer = int_buffer(&[1, 2, 3]);

    buffer.copy_from(1, &20u32.to_le_bytes()).unwrap();
    let mut dest = [0u8; 4];
    buffer.copy_to(1, &mut dest).unwrap();
    assert_eq!(u32::from_le_bytes(dest), 20);

    assert_eq!(
        buffer.copy_to(3, &mut dest),
        Err(BufferError::IndexOutOfBounds {
            index: 3,
            length: 3
        })
    );
    assert_eq!(
        buffer.copy_from(0, &[1]),
        Err(BufferError::ElementSizeMismatch {
            expected: 4,
            actual: 1
        })
    );
}

#[test]
fn test_get_mut() {
    let mut buffer = int_buffer(&[1, 2]);
    buffer.get_mut(0).unwrap().copy_from_slice(&9u32.to_le_bytes());
    assert_eq!(ints(&buffer), vec![9, 2]);
    assert!(buffer.get_mut(2).is_none());
    assert!(buffer.get(2).is_none());
}

#[test]
fn test_reverse_iteration() {
    let buffer = int_buffer(&[1, 2, 3]);
    let reversed: Vec<u32> = buffer
        .iter()
        .rev()
        .map(|bytes| u32::from_le_bytes(bytes.try_into().unwrap()))
        .collect();
    assert_eq!(reversed, vec![3, 2, 1]);
    assert_eq!(buffer.iter().len(), 3);
}

#[test]
fn test_uninitialized_iterates_nothing() {
    let buffer = RawBuffer::new();
    assert_eq!(buffer.iter().count(), 0);
    assert!(buffer.get(0).is_none());
}

#[test]
fn test_config_is_kept_across_init() {
    let config = BufferConfig::new().with_block_size(4).with_shrink(ShrinkPolicy::Lazy);
    let mut buffer = RawBuffer::with_config(config);
    assert_eq!(buffer.config(), &config);

    buffer.init(2).unwrap();
    assert_eq!(buffer.config(), &config);
    buffer.init(8).unwrap();
    assert_eq!(buffer.config(), &config);
}
