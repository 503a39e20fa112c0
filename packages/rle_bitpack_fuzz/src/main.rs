use rle_bitpack::{Decoder, Encoder, max_buffer_size};

fn main() {
	afl::fuzz!(|data: &[u8]| {
		// Each fuzz run has to be pretty fast. Just check that no crashes happen, and that
		// decoding a stream this crate produced always gives back what was put in.
		let [bit_width_seed, rest @ ..] = data else {
			return;
		};

		let bit_width = u32::from(*bit_width_seed) % 65;
		let values: Vec<u64> = rest
			.chunks_exact(8)
			.map(|chunk| {
				let raw = u64::from_le_bytes(chunk.try_into().unwrap());
				if bit_width == 64 { raw } else { raw & ((1u64 << bit_width) - 1) }
			})
			.collect();

		let mut buffer = vec![0u8; max_buffer_size(bit_width, values.len())];
		let Ok(mut encoder) = Encoder::new_checked(&mut buffer, bit_width) else {
			return;
		};

		for &value in &values {
			encoder.put_checked(value).expect("put_checked must accept an in-range value");
		}
		let encoded_len = encoder.flush_checked().expect("flush_checked must succeed exactly once");
		buffer.truncate(encoded_len);

		let mut decoder =
			Decoder::new_checked(&buffer, bit_width).expect("bit width was already validated above");
		for &expected in &values {
			let actual = decoder
				.get_checked()
				.expect("a stream this crate just produced must not report malformed or truncated");
			assert_eq!(actual, Some(expected), "round-trip mismatch");
		}

		// Feeding the raw fuzz input back in as if it were an arbitrary, possibly malformed
		// wire stream must never panic or loop forever, regardless of bit width.
		let mut arbitrary_decoder = Decoder::new(data, bit_width);
		while matches!(arbitrary_decoder.get_checked(), Ok(Some(_))) {}
	})
}
