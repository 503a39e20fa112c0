use super::*;

#[test_log::test]
fn put_value_then_get_value_roundtrips_packed_bit_widths() {
	let mut buffer = [0u8; 32];
	let values: [(u64, u32); 8] = [
		(0, 3),
		(5, 3),
		(7, 3),
		(1, 1),
		(0, 1),
		(200, 9),
		(u64::MAX, 64),
		(0, 64)
	];

	{
		let mut writer = BitWriter::new(&mut buffer);
		for (value, bits) in values {
			assert!(writer.put_value(value, bits), "write of {value} in {bits} bits failed");
		}
		writer.flush();
	}

	let mut reader = BitReader::new(&buffer);
	for (value, bits) in values {
		assert_eq!(reader.get_value(bits), Some(value));
	}
}

#[test]
fn put_value_zero_width_is_a_no_op_and_always_succeeds() {
	let mut buffer = [0u8; 1];
	let mut writer = BitWriter::new(&mut buffer);
	assert!(writer.put_value(0, 0));
	assert_eq!(writer.bytes_written(), 0);

	let mut reader = BitReader::new(&buffer);
	assert_eq!(reader.get_value(0), Some(0));
}

#[test]
fn put_value_reports_failure_without_mutating_state_on_overflow() {
	let mut buffer = [0u8; 1];
	let mut writer = BitWriter::new(&mut buffer);
	assert!(writer.put_value(0b101, 3));
	assert!(!writer.put_value(0b111111, 6), "3 + 6 bits do not fit in one byte");
	assert_eq!(writer.bytes_written(), 1);

	let mut reader = BitReader::new(&buffer);
	assert_eq!(reader.get_value(3), Some(0b101));
	assert_eq!(reader.get_value(6), None);
}

#[test]
fn put_aligned_pads_partial_byte_before_writing() {
	let mut buffer = [0u8; 3];
	{
		let mut writer = BitWriter::new(&mut buffer);
		assert!(writer.put_value(0b101, 3));
		assert!(writer.put_aligned(0xAB, 1));
		assert_eq!(writer.bytes_written(), 2);
	}
	assert_eq!(buffer[0] & 0b111, 0b101);
	assert_eq!(buffer[1], 0xAB);

	let mut reader = BitReader::new(&buffer);
	assert_eq!(reader.get_value(3), Some(0b101));
	assert_eq!(reader.get_aligned(1), Some(0xAB));
}

#[test]
fn put_aligned_roundtrips_multi_byte_little_endian_values() {
	let mut buffer = [0u8; 8];
	{
		let mut writer = BitWriter::new(&mut buffer);
		assert!(writer.put_aligned(0x0102_0304, 4));
	}

	let mut reader = BitReader::new(&buffer);
	assert_eq!(reader.get_aligned(4), Some(0x0102_0304));
}

#[test]
fn reserve_byte_can_be_patched_after_later_writes() {
	let mut buffer = [0u8; 4];
	{
		let mut writer = BitWriter::new(&mut buffer);
		let indicator_offset = writer.reserve_byte().expect("buffer has room");
		assert!(writer.put_aligned(0x11, 1));
		assert!(writer.put_aligned(0x22, 1));
		writer.set_reserved_byte(indicator_offset, 0x99);
	}

	assert_eq!(buffer[0], 0x99);
	assert_eq!(buffer[1], 0x11);
	assert_eq!(buffer[2], 0x22);
}

#[test]
fn put_vlq_int_roundtrips_small_and_large_values() {
	let mut buffer = [0u8; 64];
	let values = [0u64, 1, 127, 128, 300, 16384, u32::MAX as u64];

	{
		let mut writer = BitWriter::new(&mut buffer);
		for value in values {
			assert!(writer.put_vlq_int(value));
		}
	}

	let mut reader = BitReader::new(&buffer);
	for value in values {
		assert_eq!(reader.get_vlq_int(), Some(value));
	}
}

#[test]
fn put_vlq_int_single_byte_values_have_the_continuation_bit_clear() {
	let mut buffer = [0u8; 1];
	let mut writer = BitWriter::new(&mut buffer);
	assert!(writer.put_vlq_int(100));
	assert_eq!(buffer[0], 100);
}

#[test]
fn get_vlq_int_fails_without_a_terminator_byte() {
	// Every byte has the continuation bit set and the buffer runs out.
	let buffer = [0x80u8; MAX_VLQ_BYTE_LEN];
	let mut reader = BitReader::new(&buffer);
	assert_eq!(reader.get_vlq_int(), None);
}

#[test]
fn clear_allows_a_writer_to_be_reused_without_residual_bits() {
	let mut buffer = [0u8; 2];
	{
		let mut writer = BitWriter::new(&mut buffer);
		assert!(writer.put_value(0b111, 3));
		writer.clear();
		assert_eq!(writer.bytes_written(), 0);
		assert!(writer.put_value(0b001, 3));
		writer.flush();
	}

	let mut reader = BitReader::new(&buffer);
	assert_eq!(reader.get_value(3), Some(0b001));
}

#[test]
fn reset_repoints_a_reader_at_a_new_buffer() {
	let first = [0b0000_0101u8];
	let second = [0b0000_0010u8];

	let mut reader = BitReader::new(&first);
	assert_eq!(reader.get_value(3), Some(0b101));

	reader.reset(&second);
	assert_eq!(reader.get_value(3), Some(0b010));
}

#[test]
fn bit_width_to_bytes_rounds_up() {
	assert_eq!(bit_width_to_bytes(0), 0);
	assert_eq!(bit_width_to_bytes(1), 1);
	assert_eq!(bit_width_to_bytes(8), 1);
	assert_eq!(bit_width_to_bytes(9), 2);
	assert_eq!(bit_width_to_bytes(64), 8);
}

#[test]
fn put_value_and_put_aligned_fail_cleanly_at_buffer_boundary() {
	let mut buffer = [0u8; 1];
	let mut writer = BitWriter::new(&mut buffer);
	assert!(writer.put_value(1, 4));
	assert!(!writer.put_aligned(1, 1), "only half a byte remains");
}
