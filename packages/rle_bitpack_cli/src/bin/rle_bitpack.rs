use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::io::{BufReader, Read, stdin};
use std::process::exit;

use getopts::{Matches, Options, ParsingStyle};
use log::info;
use rle_bitpack::{Decoder, Encoder, max_buffer_size};
use stderrlog::ColorChoice;

fn main() {
	exit(match run() {
		Ok(_) => 0,
		Err(err) => {
			eprintln!("{}", err);
			1
		}
	})
}

fn run() -> Result<(), Cow<'static, str>> {
	let mut options = Options::new();

	options
		.optflag(
			"h",
			"help",
			"Prints information about the accepted command line arguments and exits."
		)
		.optflag(
			"",
			"version",
			"Prints version and copyright information, then exits."
		)
		.optflag(
			"q",
			"quiet",
			"When enabled, the program will only print error messages, unless -h is specified."
		)
		.optflagmulti(
			"v",
			"verbose",
			"Increases the verbosity of the messages. Can be repeated several times."
		)
		.optopt(
			"b",
			"bit-width",
			"The number of bits used to pack each input integer, from 0 to 64.",
			"BITS"
		)
		.parsing_style(ParsingStyle::StopAtFirstFree);

	match options.parse(env::args().skip(1)) {
		Ok(matches) => {
			if matches.opt_present("h") {
				print_header();
				println!();
				println!("Usage:");
				print!(
					"    {} [OPTION]... -b BITS <input file or ->",
					env!("CARGO_BIN_NAME")
				);
				println!("{}", options.usage(""));
			} else if matches.opt_present("version") {
				print_header();
			} else {
				let quiet_mode = matches.opt_present("q");

				if !quiet_mode {
					print_header();
					println!();
				}

				if matches.free.len() != 1 {
					return Err(format!(
						"Exactly one input file argument (or -) must be specified. Run {} -h to see command \
						line argument help",
						env!("CARGO_BIN_NAME")
					))?;
				}

				let bit_width: u32 = matches
					.opt_str("bit-width")
					.ok_or("The -b/--bit-width option is required")?
					.parse()
					.map_err(|err| format!("Invalid bit width: {}", err))?;

				init_logging(&matches, quiet_mode);

				let input_file_name = &*matches.free[0];
				encode_and_verify(input_file_name, bit_width)?;
			}

			Ok(())
		}
		Err(parse_err) => Err(format!(
			"{}\nRun {} -h to see command line argument help",
			parse_err,
			env!("CARGO_BIN_NAME")
		))?
	}
}

fn read_values(input_file_name: &str) -> Result<Vec<u64>, Cow<'static, str>> {
	let mut contents = String::new();

	if input_file_name == "-" {
		stdin()
			.lock()
			.read_to_string(&mut contents)
			.map_err(|err| format!("Could not read standard input: {}", err))?;
	} else {
		BufReader::new(
			File::open(input_file_name).map_err(|err| format!("Could not open input file: {}", err))?
		)
		.read_to_string(&mut contents)
		.map_err(|err| format!("Could not read input file: {}", err))?;
	}

	contents
		.split_whitespace()
		.map(|token| token.parse().map_err(|err| format!("Invalid integer {}: {}", token, err).into()))
		.collect()
}

fn encode_and_verify(input_file_name: &str, bit_width: u32) -> Result<(), Cow<'static, str>> {
	let values = read_values(input_file_name)?;

	info!("Read {} values, packing at {} bits each", values.len(), bit_width);

	let mut buffer = vec![0u8; max_buffer_size(bit_width, values.len())];
	let mut encoder = Encoder::new_checked(&mut buffer, bit_width)
		.map_err(|err| format!("Could not create encoder: {}", err))?;

	for &value in &values {
		encoder
			.put_checked(value)
			.map_err(|err| format!("Could not encode value {}: {}", value, err))?;
	}
	let encoded_len = encoder
		.flush_checked()
		.map_err(|err| format!("Could not flush encoder: {}", err))?;
	buffer.truncate(encoded_len);

	let uncompressed_len = values.len() * usize::try_from((u64::from(bit_width) + 7) / 8).unwrap_or(8);
	let ratio = if encoded_len == 0 {
		1.0
	} else {
		uncompressed_len as f64 / encoded_len as f64
	};

	let mut decoder = Decoder::new_checked(&buffer, bit_width)
		.map_err(|err| format!("Could not create decoder: {}", err))?;
	for (index, &expected) in values.iter().enumerate() {
		match decoder.get_checked() {
			Ok(Some(actual)) if actual == expected => {}
			Ok(Some(actual)) => {
				return Err(format!(
					"Round-trip mismatch at value {}: expected {}, got {}",
					index, expected, actual
				))?;
			}
			Ok(None) => {
				return Err(format!("Round-trip mismatch: stream ended early at value {}", index))?;
			}
			Err(err) => return Err(format!("Round-trip decode error at value {}: {}", index, err))?
		}
	}

	println!(
		"Encoded {} values ({} fixed-width bytes) into {} bytes ({:.2}x compression ratio). Round-trip \
		matched.",
		values.len(),
		uncompressed_len,
		encoded_len,
		ratio
	);

	Ok(())
}

fn init_logging(option_matches: &Matches, quiet_mode: bool) {
	let verbosity_level = option_matches.opt_count("v");

	stderrlog::new()
		.module("rle_bitpack")
		.module("rle_bitpack_cli")
		.verbosity(2 + verbosity_level)
		.show_level(false)
		.quiet(quiet_mode)
		.color(ColorChoice::Never)
		.init()
		.unwrap();
}

fn print_header() {
	println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
	println!("{}", env!("CARGO_PKG_DESCRIPTION"));
}
