use std::io::Error as IOError;

use ex::Wrapper;
use failure::Fail;
use serde_yaml::Error as YamlError;

#[derive(Debug, Fail)]
pub enum CharmError {
    #[fail(display = "I/O error: {}", _0)]
    IOError(IOError),

    #[fail(display = "YAML Error: {}", _0)]
    YamlError(YamlError),

    #[fail(display = "Error running {}: {}", _0, _1)]
    SubcommandError(String, String),

    #[fail(display = "Unknown hook: {}", _0)]
    UnknownHook(String),
}

impl From<IOError> for CharmError {
    fn from(err: IOError) -> Self {
        CharmError::IOError(err)
    }
}

impl From<ex::io::Error> for CharmError {
    fn from(err: ex::io::Error) -> Self {
        CharmError::IOError(err.into_inner())
    }
}

impl From<YamlError> for CharmError {
    fn from(err: YamlError) -> Self {
        CharmError::YamlError(err)
    }
}

impl From<CharmError> for String {
    fn from(err: CharmError) -> Self {
        format!("{}", err)
    }
}
