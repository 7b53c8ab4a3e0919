#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use num_bigint::BigInt;
	use plcer::{Builtins, PlcError, Plcer, builtins};

	fn plcer() -> Plcer {
		let mut natives = Builtins::standard();
		natives.register(builtins::range());
		Plcer::new(natives)
	}

	fn fibonacci() -> PathBuf { PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fibonacci.plc") }

	#[test]
	fn test_plc_file() {
		let result = plcer().run_file(fibonacci());
		assert_eq!(result.unwrap(), BigInt::from(0));
	}

	#[test]
	fn test_plc_output() {
		let source = std::fs::read_to_string(fibonacci()).unwrap();
		let mut out: Vec<u8> = Vec::new();
		plcer().run(&source, &mut out).unwrap();
		let out = String::from_utf8(out).unwrap();
		assert_eq!(out.lines().count(), 10);
		assert_eq!(out.lines().last(), Some("fib(9) = 34"));
	}

	#[test]
	fn test_check_file() {
		assert!(plcer().check_file(fibonacci()).is_ok());
		assert!(matches!(Plcer::default().check_file(fibonacci()), Err(PlcError::Semantic(_))));
	}

	#[test]
	fn test_missing_file() {
		let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("missing.plc");
		assert!(matches!(plcer().run_file(&path), Err(PlcError::InternalError(_))));
	}
}
