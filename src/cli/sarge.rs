use std::convert::Infallible;

use sarge::ArgumentType;

use crate::cli::{OutputArgs, normalize_output};

impl ArgumentType for OutputArgs {
    type Error = Infallible;

    const REPEATABLE: bool = true;

    fn from_value(val: Option<&str>) -> sarge::ArgResult<Self> {
        let outputs = match val {
            None => vec!["-".to_string()],
            Some(v) => v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(normalize_output)
                .collect(),
        };
        Some(Ok(OutputArgs(outputs)))
    }

    fn default_value() -> Option<Self> {
        Some(OutputArgs::default())
    }
}
